//! Background jobs.

pub mod ride_sweep;
pub mod scheduler;

pub use scheduler::{Job, JobFrequency, JobScheduler};
