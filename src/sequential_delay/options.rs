use serde::{Deserialize, Serialize};

use crate::{SequentialDelayDomain, SequentialDelayDomainState, SequentialDelayError};

/// Per-request options accompanying a query against a sequential delay domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequentialDelayDomainOptions {
    /// Signature over the request by the domain address, `0x`-prefixed hex.
    ///
    /// Required when the domain has an address, forbidden otherwise. Verifying it is
    /// left to the caller.
    #[serde(with = "crate::common::defined_optional")]
    pub signature: Option<String>,
    /// Replay protection for signed requests, checked against the domain counter.
    #[serde(with = "crate::common::defined_optional")]
    pub nonce: Option<u64>,
}

impl SequentialDelayDomainOptions {
    /// Options carrying a signature and nonce.
    pub fn signed(signature: impl Into<String>, nonce: u64) -> Self {
        Self {
            signature: Some(signature.into()),
            nonce: Some(nonce),
        }
    }

    /// Check that the options fit the domain they are sent with.
    pub fn validate(&self, domain: &SequentialDelayDomain) -> Result<(), SequentialDelayError> {
        match (&domain.address, &self.signature) {
            (Some(_), None) => return Err(SequentialDelayError::MissingSignature),
            (None, Some(_)) => return Err(SequentialDelayError::UnexpectedSignature),
            _ => {}
        }

        if self.signature.is_some() && self.nonce.is_none() {
            return Err(SequentialDelayError::MissingNonce);
        }

        Ok(())
    }

    /// Reject nonces below the number of requests already applied to the domain.
    ///
    /// The first request carries nonce 0, the third nonce 2. A nonce ahead of the
    /// counter is allowed, so a client that lost a response is not locked out.
    pub fn check_nonce(
        &self,
        state: &SequentialDelayDomainState,
    ) -> Result<(), SequentialDelayError> {
        match self.nonce {
            Some(nonce) if nonce < state.counter => Err(SequentialDelayError::StaleNonce {
                nonce,
                counter: state.counter,
            }),
            _ => Ok(()),
        }
    }
}
