use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::{
    clock::Clock,
    constants::BIRTHDAY_CHECK_INTERVAL,
    platform::Platform,
    services::birthday_service::{BirthdayService, ReconcileReport},
};

/// Background loop granting and revoking the birthday role
pub struct BirthdayTask {
    service: Arc<BirthdayService>,
    platform: Arc<dyn Platform>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

/// Handle to a running [`BirthdayTask`]
pub struct TaskHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Signal the loop to stop and wait for its current tick to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            error!("Birthday task ended abnormally: {}", e);
        }
    }
}

impl BirthdayTask {
    pub fn new(
        service: Arc<BirthdayService>,
        platform: Arc<dyn Platform>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service,
            platform,
            clock,
            period: BIRTHDAY_CHECK_INTERVAL,
        }
    }

    /// Spawn the loop; the first check runs immediately
    pub fn start(self) -> TaskHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            info!(
                "Birthday task started, checking every {}s ({} roles currently granted)",
                self.period.as_secs(),
                self.service.active_grants().await.len()
            );

            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    // A dropped handle stops the loop as well
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow_and_update() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }

            info!("Birthday task stopped");
        });

        TaskHandle { shutdown, join }
    }

    /// Run a single reconciliation pass at the clock's current time
    pub async fn run_once(&self) -> ReconcileReport {
        let report = self
            .service
            .reconcile(self.platform.as_ref(), self.clock.now())
            .await;

        if !report.is_empty() {
            info!(
                "Birthday check: {} granted, {} revoked, {} failed",
                report.granted.len(),
                report.revoked.len(),
                report.failed.len()
            );
        }
        report
    }
}
