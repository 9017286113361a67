//! In-process provider for sequential delay domains.
//!
//! The local provider keeps domain states in memory inside a [`DashMap`](dashmap::DashMap)
//! and evaluates attempts against them with a per-key read-modify-write.
//!
//! # Key Characteristics
//!
//! - **Thread-safe:** Safe for concurrent use across multiple threads
//! - **Atomic per key:** Load, evaluate and store happen under one shard lock
//! - **No I/O:** Nothing leaves the process
//! - **Process-scoped:** State is lost on restart and not shared between processes
//!
//! # When to Use
//!
//! ✅ **Use local provider when:**
//! - A single process owns every domain it serves
//! - Tests and tooling need a ready-made caller for [`evaluate`](crate::evaluate)
//!
//! ❌ **Don't use local provider when:**
//! - Several service replicas must agree on a domain's quota
//! - Quota must survive process restarts
//!
//! # Examples
//!
//! ```
//! use sequential_delay::{
//!     RateLimiter, RateLimiterOptions, Repetitions, SequentialDelayDomain,
//!     SequentialDelayResult, SequentialDelayStage,
//! };
//! use sequential_delay::local::LocalRateLimiterOptions;
//!
//! let rl = RateLimiter::new(RateLimiterOptions {
//!     local: LocalRateLimiterOptions::default(),
//! });
//!
//! let domain = SequentialDelayDomain::new(vec![
//!     SequentialDelayStage::new(60).with_repetitions(Repetitions::try_from(3).unwrap()),
//! ]);
//!
//! let decision = rl.local().store().check("user_123", &domain, 1_000).unwrap();
//! assert!(matches!(decision, SequentialDelayResult::Accepted { .. }));
//! ```

mod local_domain_state_store;
pub use local_domain_state_store::*;

mod local_rate_limiter_provider;
pub use local_rate_limiter_provider::*;
