//! Admission control and batch fan-out/fan-in for one trial.
mod dispatcher;
mod limiter;


pub use dispatcher::{RequestDispatcher, TrialBatch};
pub use limiter::{AdmissionGuard, ConcurrencyLimiter};
