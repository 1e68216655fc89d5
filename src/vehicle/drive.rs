use super::client::VehicleControlClient;
use super::dashboard::SharedDashboard;
use super::error::ControlError;
use super::models::{Command, Direction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const EMERGENCY_STOP_LABEL: &str = "Emergency stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    Sent,
    /// A newer press/release came in while this one was waiting for the
    /// slot, so it was never sent.
    Superseded,
}

/// Press/release driving on top of a shared [`VehicleControlClient`].
///
/// Directional intents share one in-flight slot: they go out in the order
/// they were issued, one at a time, and an intent that has been overtaken
/// while waiting is dropped. Whatever the user did last decides how the car
/// ends up moving.
#[derive(Debug, Clone)]
pub struct DrivePad {
    client: VehicleControlClient,
    dashboard: Option<SharedDashboard>,
    slot: Arc<Mutex<()>>,
    latest: Arc<AtomicU64>,
}

impl DrivePad {
    pub fn new(client: VehicleControlClient) -> Self {
        Self {
            client,
            dashboard: None,
            slot: Arc::new(Mutex::new(())),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_dashboard(mut self, dashboard: SharedDashboard) -> Self {
        self.dashboard = Some(dashboard);
        self
    }

    pub async fn press(&self, direction: Direction) -> Result<DriveOutcome, ControlError> {
        self.submit(Command::from(direction)).await
    }

    pub async fn release(&self) -> Result<DriveOutcome, ControlError> {
        self.submit(Command::Stop).await
    }

    /// Stops right away without waiting for the slot. Anything still queued
    /// behind the slot is superseded.
    ///
    /// A directional request already in flight is neither awaited nor
    /// cancelled. It travels on its own connection, so the car can in
    /// principle receive it after this stop; callers that need the car
    /// stopped for certain should `release()` once the press has returned.
    pub async fn emergency_stop(&self) -> Result<(), ControlError> {
        self.latest.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = self.client.stop().await {
            warn!(error = %e, "Emergency stop failed");
            return Err(e);
        }

        warn!("Emergency stop sent");
        if let Some(dashboard) = &self.dashboard {
            dashboard.write().await.record_label(EMERGENCY_STOP_LABEL);
        }
        Ok(())
    }

    pub async fn toggle_light(&self) -> Result<(), ControlError> {
        self.fire(Command::ToggleLight).await
    }

    pub async fn send_message(&self, text: &str) -> Result<(), ControlError> {
        self.fire(Command::SendMessage(text.to_string())).await
    }

    async fn fire(&self, command: Command) -> Result<(), ControlError> {
        if let Err(e) = self.client.send(&command).await {
            warn!(command = command.label(), error = %e, "Command failed");
            return Err(e);
        }

        if let Some(dashboard) = &self.dashboard {
            dashboard.write().await.record_command(&command);
        }
        Ok(())
    }

    async fn submit(&self, command: Command) -> Result<DriveOutcome, ControlError> {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let _slot = self.slot.lock().await;

        if self.latest.load(Ordering::SeqCst) != generation {
            debug!(command = command.label(), generation, "Dropping superseded intent");
            return Ok(DriveOutcome::Superseded);
        }

        match self.client.send(&command).await {
            Ok(()) => {
                debug!(command = command.label(), generation, "Intent sent");
                Ok(DriveOutcome::Sent)
            }
            Err(e) => {
                warn!(command = command.label(), error = %e, "Drive command failed");
                Err(e)
            }
        }
    }
}
