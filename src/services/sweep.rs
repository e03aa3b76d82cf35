//! Background expiry sweep
//!
//! Periodically flips donors past their `auto_remove_date` to unavailable so
//! stale profiles drop out of matching even if nobody touches them.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::DonorConfig;
use crate::db::DbPool;
use crate::services::DonorService;

/// Handle to the running sweep task
#[derive(Clone)]
pub struct SweepSchedulerState {
    running: Arc<RwLock<bool>>,
}

impl SweepSchedulerState {
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }
}

/// Start the periodic expiry sweep
///
/// The interval's first tick fires immediately, so expired donors left over
/// from downtime are swept at startup rather than one interval later.
pub fn start_sweep_scheduler(pool: DbPool, config: DonorConfig) -> SweepSchedulerState {
    let state = SweepSchedulerState {
        running: Arc::new(RwLock::new(true)),
    };

    let task_state = state.clone();
    let service = DonorService::new(pool, config.expiry_days);
    let period = Duration::from_secs(config.sweep_interval_hours * 3600);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        info!(
            interval_hours = config.sweep_interval_hours,
            "Donor expiry sweep started"
        );

        loop {
            interval.tick().await;

            if !task_state.is_running().await {
                info!("Donor expiry sweep stopped");
                break;
            }

            match service.sweep_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(swept) => info!(swept, "Marked expired donors unavailable"),
                Err(e) => error!(error = %e, "Donor expiry sweep failed"),
            }
        }
    });

    state
}
