//! Ride sweep background job.
//!
//! Deactivates rides that passed their arrival time without the owner
//! explicitly finishing them.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use persistence::repositories::RideRepository;

use super::scheduler::{Job, JobFrequency};

/// Background job that finishes overdue rides.
pub struct RideSweepJob {
    rides: RideRepository,
}

impl RideSweepJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            rides: RideRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for RideSweepJob {
    fn name(&self) -> &'static str {
        "ride_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        // Must run at least once per sweep window or overdue rides
        // slip past it and stay active.
        JobFrequency::Minutes(15)
    }

    async fn execute(&self) -> Result<(), String> {
        let swept = self
            .rides
            .sweep(Utc::now())
            .await
            .map_err(|e| format!("Ride sweep failed: {}", e))?;

        info!(swept = swept, "Swept overdue rides");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ride::RIDE_SWEEP_WINDOW_MINUTES;
    use persistence::db::create_lazy_pool;

    #[tokio::test]
    async fn test_sweep_cadence_covers_window() {
        let pool = create_lazy_pool("postgres://t:t@127.0.0.1:1/unused")
            .unwrap();
        let job = RideSweepJob::new(pool);

        assert_eq!(job.name(), "ride_sweep");
        let cadence_secs = job.frequency().duration().as_secs();
        let window_secs = RIDE_SWEEP_WINDOW_MINUTES as u64 * 60;
        assert!(
            cadence_secs <= window_secs,
            "sweep cadence ({cadence_secs}s) must not exceed the sweep window ({window_secs}s)"
        );
    }
}
