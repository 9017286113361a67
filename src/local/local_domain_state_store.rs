use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::{DashMap, mapref::entry::Entry};

use crate::{
    LocalRateLimiterOptions, MaxStages, SequentialDelayDomain, SequentialDelayDomainOptions,
    SequentialDelayDomainState, SequentialDelayError, SequentialDelayResult,
};

/// In-process store of sequential delay domain states.
///
/// Holds one [`SequentialDelayDomainState`] per key and applies
/// [`evaluate`](crate::evaluate) to it. The key identifies the domain instance; callers
/// typically derive it from a hash of the domain.
///
/// # Thread Safety
///
/// Each check loads, evaluates and stores the state while holding the key's
/// [`DashMap`] shard lock. Concurrent attempts against the same key are serialized, so
/// two of them can never both consume the same quota slot.
///
/// # Semantics & Limitations
///
/// - **Unknown keys** start from the initial state.
/// - **Rejections are stored.** A rejected attempt still records `now`.
/// - **No eviction.** Dropping a state would hand its quota back, so keys are kept for
///   the lifetime of the store.
/// - **Process-scoped.** State does not survive restarts and is not shared.
///
/// # Examples
///
/// ```
/// use sequential_delay::{
///     RateLimiter, RateLimiterOptions, SequentialDelayDomain, SequentialDelayStage,
/// };
///
/// let rl = RateLimiter::new(RateLimiterOptions::default());
/// let store = rl.local().store();
/// let domain = SequentialDelayDomain::new(vec![SequentialDelayStage::new(0)]);
///
/// assert!(store.check("backup_1", &domain, 100).unwrap().is_accepted());
/// assert!(!store.check("backup_1", &domain, 200).unwrap().is_accepted());
/// assert_eq!(store.state("backup_1").counter, 1);
/// ```
pub struct LocalDomainStateStore {
    max_stages: MaxStages,
    states: DashMap<String, SequentialDelayDomainState>,
}

impl LocalDomainStateStore {
    pub(crate) fn new(options: LocalRateLimiterOptions) -> Self {
        Self {
            max_stages: options.max_stages,
            states: DashMap::with_capacity(options.initial_capacity),
        }
    } // end constructor

    /// Validate `domain`, then evaluate an attempt at `attempt_time` and store the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain fails [`SequentialDelayDomain::validate`]. Nothing is
    /// stored in that case.
    pub fn check(
        &self,
        key: &str,
        domain: &SequentialDelayDomain,
        attempt_time: u64,
    ) -> Result<SequentialDelayResult, SequentialDelayError> {
        self.validate_domain(domain)?;

        self.apply(key, domain, attempt_time, |_| Ok(()))
    } // end method check

    /// Like [`check`](Self::check), but also validates the request options and checks
    /// their nonce against the stored counter before evaluating.
    ///
    /// The signature itself is not verified here.
    pub fn check_with_options(
        &self,
        key: &str,
        domain: &SequentialDelayDomain,
        options: &SequentialDelayDomainOptions,
        attempt_time: u64,
    ) -> Result<SequentialDelayResult, SequentialDelayError> {
        self.validate_domain(domain)?;
        options.validate(domain)?;

        self.apply(key, domain, attempt_time, |state| {
            options.check_nonce(state).inspect_err(|err| {
                tracing::debug!(key, error = %err, "sequential_delay.nonce.rejected");
            })
        })
    } // end method check_with_options

    /// [`check`](Self::check) at the current system time.
    pub fn check_now(
        &self,
        key: &str,
        domain: &SequentialDelayDomain,
    ) -> Result<SequentialDelayResult, SequentialDelayError> {
        self.check(key, domain, unix_now())
    }

    /// Preview the decision for an attempt without storing anything.
    ///
    /// The answer may be stale by the time a following [`check`](Self::check) runs.
    pub fn is_allowed(
        &self,
        key: &str,
        domain: &SequentialDelayDomain,
        attempt_time: u64,
    ) -> Result<SequentialDelayResult, SequentialDelayError> {
        self.validate_domain(domain)?;

        Ok(domain.check_rate_limit(attempt_time, Some(self.state(key))))
    } // end method is_allowed

    /// Stored state for `key`, or the initial state if the key has never been seen.
    pub fn state(&self, key: &str) -> SequentialDelayDomainState {
        self.states.get(key).map(|state| *state).unwrap_or_default()
    }

    /// Permanently disable `key`. Every later check is rejected with no retry hint.
    pub fn disable(&self, key: &str, now: u64) -> SequentialDelayDomainState {
        let mut state = self.states.entry(key.to_string()).or_default();
        state.disabled = true;
        state.now = now;

        tracing::warn!(key, "sequential_delay.domain.disabled");

        *state
    } // end method disable

    /// Number of stored domain states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no domain state has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn validate_domain(&self, domain: &SequentialDelayDomain) -> Result<(), SequentialDelayError> {
        domain.validate(self.max_stages).inspect_err(|err| {
            tracing::warn!(error = %err, "sequential_delay.domain.invalid");
        })
    }

    fn apply<F>(
        &self,
        key: &str,
        domain: &SequentialDelayDomain,
        attempt_time: u64,
        precheck: F,
    ) -> Result<SequentialDelayResult, SequentialDelayError>
    where
        F: FnOnce(&SequentialDelayDomainState) -> Result<(), SequentialDelayError>,
    {
        let entry = self.states.entry(key.to_string());

        let current = match &entry {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(_) => SequentialDelayDomainState::default(),
        };

        precheck(&current)?;

        let result = domain.check_rate_limit(attempt_time, Some(current));

        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(*result.state());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(*result.state());
            }
        }

        if let SequentialDelayResult::Rejected { not_before, .. } = result {
            tracing::debug!(
                key,
                counter = current.counter,
                ?not_before,
                "sequential_delay.rejected"
            );
        }

        Ok(result)
    } // end method apply
} // end of impl

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
