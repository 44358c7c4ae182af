//! Job runner and daily scheduler.

mod runner;
mod scheduler;

pub use runner::{JobOutcome, RunOptions, Runner};
pub use scheduler::Scheduler;
