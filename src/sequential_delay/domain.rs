use serde::{Deserialize, Serialize};

use crate::{
    MaxStages, SequentialDelayDomainState, SequentialDelayError, SequentialDelayResult,
    SequentialDelayStage, evaluate,
};

/// Name carried by every sequential delay domain.
pub const SEQUENTIAL_DELAY_DOMAIN_NAME: &str = "SequentialDelay";

/// Version of the sequential delay domain implemented here.
pub const SEQUENTIAL_DELAY_DOMAIN_VERSION: &str = "1";

/// A rate limited identity and the schedule that throttles it.
///
/// Only `stages` takes part in rate limiting. `address` and `salt` identify and
/// authenticate the domain instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequentialDelayDomain {
    /// Always [`SEQUENTIAL_DELAY_DOMAIN_NAME`] for a well-formed domain.
    pub name: String,
    /// Always [`SEQUENTIAL_DELAY_DOMAIN_VERSION`] for a well-formed domain.
    pub version: String,
    /// Ordered rate limit schedule.
    pub stages: Vec<SequentialDelayStage>,
    /// `0x`-prefixed address that must sign requests against this domain.
    #[serde(with = "crate::common::defined_optional")]
    pub address: Option<String>,
    /// Distinguishes otherwise identical domain instances.
    #[serde(with = "crate::common::defined_optional")]
    pub salt: Option<String>,
}

impl SequentialDelayDomain {
    /// An unauthenticated, unsalted domain with the given schedule.
    pub fn new(stages: Vec<SequentialDelayStage>) -> Self {
        Self {
            name: SEQUENTIAL_DELAY_DOMAIN_NAME.to_string(),
            version: SEQUENTIAL_DELAY_DOMAIN_VERSION.to_string(),
            stages,
            address: None,
            salt: None,
        }
    }

    /// Attach an authenticating address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach a salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Whether name and version identify a sequential delay domain.
    pub fn is_sequential_delay_domain(&self) -> bool {
        self.name == SEQUENTIAL_DELAY_DOMAIN_NAME && self.version == SEQUENTIAL_DELAY_DOMAIN_VERSION
    }

    /// Check the domain shape before it is used for rate limiting.
    ///
    /// Zero batch sizes and repetitions cannot be represented, so this covers the
    /// remaining structural checks: identity, a non-empty schedule no longer than
    /// `max_stages`, and a well-formed address.
    pub fn validate(&self, max_stages: MaxStages) -> Result<(), SequentialDelayError> {
        if self.name != SEQUENTIAL_DELAY_DOMAIN_NAME {
            return Err(SequentialDelayError::InvalidDomainName(self.name.clone()));
        }

        if self.version != SEQUENTIAL_DELAY_DOMAIN_VERSION {
            return Err(SequentialDelayError::UnsupportedVersion(self.version.clone()));
        }

        if self.stages.is_empty() {
            return Err(SequentialDelayError::EmptySchedule);
        }

        if self.stages.len() > *max_stages {
            return Err(SequentialDelayError::TooManyStages {
                count: self.stages.len(),
                max: *max_stages,
            });
        }

        if let Some(address) = &self.address
            && !is_address(address)
        {
            return Err(SequentialDelayError::InvalidAddress(address.clone()));
        }

        Ok(())
    }

    /// Total attempts the schedule admits over the domain lifetime.
    pub fn quota(&self) -> u64 {
        self.stages
            .iter()
            .fold(0u64, |total, stage| total.saturating_add(stage.attempts()))
    }

    /// Evaluate an attempt against this domain's schedule. See [`evaluate`].
    pub fn check_rate_limit(
        &self,
        attempt_time: u64,
        state: Option<SequentialDelayDomainState>,
    ) -> SequentialDelayResult {
        evaluate(&self.stages, attempt_time, state)
    }

    /// Decode a domain from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, SequentialDelayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the domain to JSON.
    pub fn to_json(&self) -> Result<String, SequentialDelayError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn is_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
