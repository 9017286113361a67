use crate::SequentialDelayStage;

/// A stage of a schedule together with the attempt number at which it begins.
///
/// Derived from the schedule and the domain counter on every evaluation and never
/// stored, so it cannot drift from the counter it was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedStage<'a> {
    stage: &'a SequentialDelayStage,
    index: usize,
    start: u64,
}

impl<'a> IndexedStage<'a> {
    /// The located stage.
    pub fn stage(&self) -> &'a SequentialDelayStage {
        self.stage
    }

    /// Position of the stage in the schedule.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Counter value of the first attempt in this stage.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Counter value one past the last attempt in this stage.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.stage.attempts())
    }

    /// Seconds that must elapse past the timer before attempt `counter` is admitted.
    ///
    /// Only the first attempt of each batch is delayed; attempts inside a batch are free.
    pub fn delay(&self, counter: u64) -> u64 {
        let offset = counter.saturating_sub(self.start);

        if offset % self.stage.batch_size() == 0 {
            self.stage.delay
        } else {
            0
        }
    }
}

/// Find the stage that applies to attempt number `counter`.
///
/// Stages are walked in declared order, each covering the half-open attempt range
/// `[start, start + batch_size × repetitions)`. Returns `None` once `counter` is past
/// the last stage, meaning the domain has permanently run out of quota.
///
/// ```
/// use sequential_delay::{Repetitions, SequentialDelayStage, indexed_stage};
///
/// let stages = [
///     SequentialDelayStage::new(0).with_repetitions(Repetitions::try_from(3).unwrap()),
///     SequentialDelayStage::new(60),
/// ];
///
/// assert_eq!(indexed_stage(&stages, 2).map(|s| s.index()), Some(0));
/// assert_eq!(indexed_stage(&stages, 3).map(|s| s.start()), Some(3));
/// assert!(indexed_stage(&stages, 4).is_none());
/// ```
pub fn indexed_stage(stages: &[SequentialDelayStage], counter: u64) -> Option<IndexedStage<'_>> {
    let mut start = 0u64;

    for (index, stage) in stages.iter().enumerate() {
        let end = start.saturating_add(stage.attempts());

        if counter < end {
            return Some(IndexedStage {
                stage,
                index,
                start,
            });
        }

        start = end;
    }

    None
}
