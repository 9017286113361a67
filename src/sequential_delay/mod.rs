//! Sequential delay rate limiting.
//!
//! A sequential delay domain declares an ordered list of [stages](SequentialDelayStage).
//! Each stage admits `batch_size × repetitions` attempts and delays the first attempt of
//! every batch by `delay` seconds relative to the domain timer. Once every stage has been
//! consumed the domain is permanently out of quota.
//!
//! # Evaluation
//!
//! [`evaluate`] is a pure function of the schedule, the attempt time and the current
//! [`SequentialDelayDomainState`]. It never performs I/O and never fails; it returns a
//! [`SequentialDelayResult`] holding the state the caller must store next.
//!
//! Storing that state is the caller's job, and it must be done as one read-modify-write
//! per domain. Two attempts that both read the same counter would otherwise both be
//! admitted. The [local provider](crate::local) does this under a per-key lock.
//!
//! # Timer modes
//!
//! - `reset_timer = true` (default): each accepted attempt moves the timer to the attempt
//!   time, so delays are measured from the last admission.
//! - `reset_timer = false`: the timer moves to the deadline instead, so admissions follow a
//!   fixed grid `timer, timer + delay, timer + 2·delay, …` however late each one lands.

mod stage;
pub use stage::*;

mod state;
pub use state::*;

mod domain;
pub use domain::*;

mod options;
pub use options::*;

mod indexed_stage;
pub use indexed_stage::*;

mod evaluator;
pub use evaluator::*;
