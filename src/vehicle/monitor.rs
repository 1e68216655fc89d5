use super::client::VehicleControlClient;
use super::dashboard::{ConnectionStatus, SharedDashboard};
use super::error::ControlError;
use super::models::StatusSnapshot;
use crate::config::DEFAULT_STALE_AFTER_SECS;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Keeps a [`SharedDashboard`] in sync with the car's `/status` endpoint.
#[derive(Debug, Clone)]
pub struct StatusMonitor {
    client: VehicleControlClient,
    dashboard: SharedDashboard,
    interval: Duration,
    stale_after: Duration,
}

/// Stops the polling task when shut down or dropped.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!(error = %e, "Status polling task ended abnormally");
        }
    }
}

impl StatusMonitor {
    pub fn new(client: VehicleControlClient, dashboard: SharedDashboard, interval: Duration) -> Self {
        Self {
            client,
            dashboard,
            interval,
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
        }
    }

    /// How long the dashboard may go without a good `/status` before the
    /// car counts as disconnected.
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Marks a connected dashboard as disconnected once its last update is
    /// older than `stale_after`. Returns true if it did.
    pub async fn expire_stale(&self) -> bool {
        let mut dashboard = self.dashboard.write().await;
        if dashboard.connection == ConnectionStatus::Connected
            && dashboard.is_stale(self.stale_after)
        {
            dashboard.mark_disconnected();
            return true;
        }
        false
    }

    pub fn dashboard(&self) -> &SharedDashboard {
        &self.dashboard
    }

    /// One poll. The dashboard is updated either way; the error is still
    /// returned so an interactive caller can alert.
    pub async fn refresh(&self) -> Result<StatusSnapshot, ControlError> {
        match self.client.get_status().await {
            Ok(snapshot) => {
                self.dashboard.write().await.apply(&snapshot);
                Ok(snapshot)
            }
            Err(e) => {
                self.dashboard.write().await.mark_disconnected();
                Err(e)
            }
        }
    }

    pub async fn check_connection(&self) -> ConnectionStatus {
        self.dashboard.write().await.mark_checking();

        match self.refresh().await {
            Ok(_) => info!(base_url = %self.client.base_url(), "Car reachable"),
            Err(e) => warn!(base_url = %self.client.base_url(), error = %e, "Car unreachable"),
        }

        self.dashboard.read().await.connection
    }

    pub fn spawn(self) -> MonitorHandle {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                base_url = %self.client.base_url(),
                interval_ms = self.interval.as_millis() as u64,
                "Status polling started"
            );

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }

                if self.expire_stale().await {
                    warn!(
                        stale_after_secs = self.stale_after.as_secs(),
                        "No status from car in time, marking disconnected"
                    );
                }

                let was = self.dashboard.read().await.connection;
                match self.refresh().await {
                    Ok(snapshot) => {
                        debug!(?snapshot, "Status received");
                        if was != ConnectionStatus::Connected {
                            info!("Car connected");
                        }
                    }
                    Err(e) => {
                        if was != ConnectionStatus::Disconnected {
                            warn!(error = %e, "Lost connection to car");
                        } else {
                            debug!(error = %e, "Car still unreachable");
                        }
                    }
                }
            }

            info!("Status polling stopped");
        });

        MonitorHandle { shutdown, task }
    }
}
