use serde::{Deserialize, Serialize};

/// Quota consumption for one sequential delay domain.
///
/// The evaluator never mutates a state in place; every decision carries the state the
/// caller should store next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequentialDelayDomainState {
    /// Unix seconds to which the next delay is applied.
    pub timer: u64,
    /// Number of accepted attempts against the domain.
    pub counter: u64,
    /// Once set, every further attempt is rejected. Never cleared by evaluation.
    pub disabled: bool,
    /// Unix seconds of the most recent evaluation, accepted or not.
    pub now: u64,
}

/// State of a domain that has never been queried.
pub const INITIAL_SEQUENTIAL_DELAY_DOMAIN_STATE: SequentialDelayDomainState =
    SequentialDelayDomainState {
        timer: 0,
        counter: 0,
        disabled: false,
        now: 0,
    };

impl SequentialDelayDomainState {
    /// Copy of this state with only `now` moved to `attempt_time`.
    pub(crate) fn seen_at(self, attempt_time: u64) -> Self {
        Self {
            now: attempt_time,
            ..self
        }
    }
}
