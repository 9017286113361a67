/// Error type for this crate.
///
/// The evaluator itself never fails; these errors come from validating a domain or
/// its request options before evaluation, and from decoding them.
#[derive(Debug, thiserror::Error)]
pub enum SequentialDelayError {
    /// The domain does not carry the sequential delay name.
    #[error("unexpected domain name: {0}")]
    InvalidDomainName(String),
    /// The domain declares a version this crate does not implement.
    #[error("unsupported domain version: {0}")]
    UnsupportedVersion(String),
    /// The domain declares no stages.
    #[error("domain declares no rate limit stages")]
    EmptySchedule,
    /// The domain declares more stages than allowed.
    #[error("domain declares {count} stages, at most {max} are allowed")]
    TooManyStages {
        /// Number of declared stages.
        count: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The domain address is not a `0x`-prefixed 20-byte hex string.
    #[error("invalid domain address: {0}")]
    InvalidAddress(String),
    /// The domain has an address but the request carries no signature.
    #[error("domain requires a signature but none was provided")]
    MissingSignature,
    /// The request carries a signature for a domain that has no address.
    #[error("signature provided for a domain without an address")]
    UnexpectedSignature,
    /// A signature was provided without a nonce.
    #[error("signed request is missing a nonce")]
    MissingNonce,
    /// The nonce is behind the number of requests already applied.
    #[error("nonce {nonce} is below the domain counter {counter}")]
    StaleNonce {
        /// Nonce supplied with the request.
        nonce: u64,
        /// Counter of the stored domain state.
        counter: u64,
    },
    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}
