//! Drives the concurrency sweep level by level, trial by trial.
mod controller;
mod state;


pub use controller::{LevelReport, SweepController, SweepObserver, SweepReport};
pub use state::SweepState;
