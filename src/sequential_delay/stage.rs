use serde::{Deserialize, Serialize};

use crate::{BatchSize, Repetitions};

/// One phase of a sequential delay schedule.
///
/// A stage admits `batch_size × repetitions` attempts. The first attempt of each batch
/// must wait `delay` seconds past the domain timer; the rest of the batch is free.
///
/// Unset optional fields take their defaults when evaluated (`reset_timer = true`,
/// `batch_size = 1`, `repetitions = 1`). An unset field is distinct from an explicit
/// value and round-trips as `{ "defined": false }`.
///
/// # Examples
///
/// ```
/// use sequential_delay::{BatchSize, Repetitions, SequentialDelayStage};
///
/// let stage = SequentialDelayStage::new(60)
///     .with_batch_size(BatchSize::try_from(2).unwrap())
///     .with_repetitions(Repetitions::try_from(3).unwrap())
///     .with_reset_timer(false);
///
/// assert_eq!(stage.attempts(), 6);
/// assert!(!stage.resets_timer());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SequentialDelayStage {
    /// Seconds each batch of attempts in this stage is delayed with respect to the timer.
    pub delay: u64,
    /// Whether the timer resets to the attempt time on each accepted attempt.
    #[serde(with = "crate::common::defined_optional")]
    pub reset_timer: Option<bool>,
    /// Continuous attempts allowed before the delay applies again.
    #[serde(with = "crate::common::defined_optional")]
    pub batch_size: Option<BatchSize>,
    /// Number of batch cycles before the schedule continues to the next stage.
    #[serde(with = "crate::common::defined_optional")]
    pub repetitions: Option<Repetitions>,
}

impl SequentialDelayStage {
    /// A single-attempt stage with the given delay and every optional field unset.
    pub fn new(delay: u64) -> Self {
        Self {
            delay,
            reset_timer: None,
            batch_size: None,
            repetitions: None,
        }
    }

    /// Set `reset_timer` explicitly.
    pub fn with_reset_timer(mut self, reset_timer: bool) -> Self {
        self.reset_timer = Some(reset_timer);
        self
    }

    /// Set `batch_size` explicitly.
    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set `repetitions` explicitly.
    pub fn with_repetitions(mut self, repetitions: Repetitions) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Effective `reset_timer`, defaulting to `true`.
    pub fn resets_timer(&self) -> bool {
        self.reset_timer.unwrap_or(true)
    }

    /// Effective batch size, defaulting to 1.
    pub fn batch_size(&self) -> u64 {
        *self.batch_size.unwrap_or_default()
    }

    /// Effective repetitions, defaulting to 1.
    pub fn repetitions(&self) -> u64 {
        *self.repetitions.unwrap_or_default()
    }

    /// Total attempts admitted by this stage.
    ///
    /// Saturates at `u64::MAX`, which is treated as an unbounded stage.
    pub fn attempts(&self) -> u64 {
        self.repetitions().saturating_mul(self.batch_size())
    }
}
