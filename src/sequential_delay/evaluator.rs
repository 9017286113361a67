use crate::{
    INITIAL_SEQUENTIAL_DELAY_DOMAIN_STATE, SequentialDelayDomainState, SequentialDelayStage,
    indexed_stage,
};

/// Outcome of evaluating one attempt against a sequential delay schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequentialDelayResult {
    /// The attempt is admitted.
    Accepted {
        /// State after charging the attempt against the quota.
        state: SequentialDelayDomainState,
    },
    /// The attempt is refused. Only `state.now` differs from the input state.
    Rejected {
        /// State after recording the attempt time.
        state: SequentialDelayDomainState,
        /// Earliest time an attempt could be admitted in the current stage.
        ///
        /// `None` when no attempt will ever be admitted again, either because the
        /// domain is disabled or because the schedule is exhausted.
        not_before: Option<u64>,
    },
}

impl SequentialDelayResult {
    /// Whether the attempt was admitted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// State the caller should store.
    pub fn state(&self) -> &SequentialDelayDomainState {
        match self {
            Self::Accepted { state } | Self::Rejected { state, .. } => state,
        }
    }

    /// Consume the result, keeping the state to store.
    pub fn into_state(self) -> SequentialDelayDomainState {
        match self {
            Self::Accepted { state } | Self::Rejected { state, .. } => state,
        }
    }

    /// Retry hint of a rejection. Always `None` for accepted attempts.
    pub fn not_before(&self) -> Option<u64> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { not_before, .. } => *not_before,
        }
    }
}

/// Rate limiting predicate for sequential delay domains.
///
/// Decides whether an attempt received at `attempt_time` (Unix seconds) is admitted
/// given the schedule `stages` and the current domain `state`, and returns the state
/// to store next. A missing state is treated as
/// [`INITIAL_SEQUENTIAL_DELAY_DOMAIN_STATE`].
///
/// # Algorithm
///
/// 1. Disabled domains are rejected with no retry hint.
/// 2. The stage covering `state.counter` is located; past the last stage the attempt
///    is rejected with no retry hint.
/// 3. `not_before = state.timer + delay`, where the delay applies only to the first
///    attempt of a batch.
/// 4. Attempts before `not_before` are rejected without consuming quota.
/// 5. Otherwise the counter advances and the timer moves to `attempt_time`, or to
///    `not_before` for stages that do not reset the timer.
///
/// The function is pure: identical inputs always give identical outputs.
///
/// # Examples
///
/// ```
/// use sequential_delay::{
///     Repetitions, SequentialDelayResult, SequentialDelayStage, evaluate,
/// };
///
/// let stages = [
///     SequentialDelayStage::new(60).with_repetitions(Repetitions::try_from(3).unwrap()),
///     SequentialDelayStage::new(3600),
/// ];
///
/// // the first delay is measured from the initial timer of 0
/// let early = evaluate(&stages, 0, None);
/// assert!(matches!(
///     early,
///     SequentialDelayResult::Rejected {
///         not_before: Some(60),
///         ..
///     }
/// ));
///
/// let first = evaluate(&stages, 60, Some(early.into_state()));
/// assert!(first.is_accepted());
///
/// let too_soon = evaluate(&stages, 90, Some(first.into_state()));
/// assert_eq!(too_soon.not_before(), Some(120));
///
/// let on_time = evaluate(&stages, 120, Some(too_soon.into_state()));
/// assert_eq!(on_time.state().counter, 2);
/// ```
pub fn evaluate(
    stages: &[SequentialDelayStage],
    attempt_time: u64,
    state: Option<SequentialDelayDomainState>,
) -> SequentialDelayResult {
    let state = state.unwrap_or(INITIAL_SEQUENTIAL_DELAY_DOMAIN_STATE);

    if state.disabled {
        return SequentialDelayResult::Rejected {
            state: state.seen_at(attempt_time),
            not_before: None,
        };
    }

    let Some(stage) = indexed_stage(stages, state.counter) else {
        tracing::trace!(counter = state.counter, "sequential_delay.exhausted");
        return SequentialDelayResult::Rejected {
            state: state.seen_at(attempt_time),
            not_before: None,
        };
    };

    let delay = stage.delay(state.counter);
    let not_before = state.timer.saturating_add(delay);

    if attempt_time < not_before {
        return SequentialDelayResult::Rejected {
            state: state.seen_at(attempt_time),
            not_before: Some(not_before),
        };
    }

    SequentialDelayResult::Accepted {
        state: SequentialDelayDomainState {
            timer: if stage.stage().resets_timer() {
                attempt_time
            } else {
                not_before
            },
            counter: state.counter + 1,
            disabled: state.disabled,
            now: attempt_time,
        },
    }
}
