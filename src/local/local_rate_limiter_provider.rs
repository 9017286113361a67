use crate::{LocalDomainStateStore, MaxStages};

/// Configuration for the local provider.
#[derive(Clone, Debug)]
pub struct LocalRateLimiterOptions {
    /// Largest schedule a domain may declare before it is refused.
    pub max_stages: MaxStages,
    /// Number of domain states to preallocate room for.
    pub initial_capacity: usize,
}

impl Default for LocalRateLimiterOptions {
    fn default() -> Self {
        Self {
            max_stages: MaxStages::default(),
            initial_capacity: 0,
        }
    }
}

/// Local provider handle.
///
/// Exposes the in-process domain state store.
pub struct LocalRateLimiterProvider {
    store: LocalDomainStateStore,
}

impl LocalRateLimiterProvider {
    pub(crate) fn new(options: LocalRateLimiterOptions) -> Self {
        Self {
            store: LocalDomainStateStore::new(options),
        }
    }

    /// In-process domain state store.
    pub fn store(&self) -> &LocalDomainStateStore {
        &self.store
    }
}
