use super::models::{Command, StatusSnapshot};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryHealth {
    Excellent,
    Good,
    Low,
    Critical,
}

impl BatteryHealth {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            BatteryHealth::Excellent
        } else if percent > 50.0 {
            BatteryHealth::Good
        } else if percent > 20.0 {
            BatteryHealth::Low
        } else {
            BatteryHealth::Critical
        }
    }
}

/// Last known telemetry of the car, as shown on the dashboard.
///
/// Fields stay `None` until the car reports them once; after that a
/// snapshot that omits a field leaves the old value in place.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub battery: Option<f64>,
    pub voltage: Option<f64>,
    pub uptime: Option<String>,
    pub commands: Option<u64>,
    pub last_command: Option<String>,
    pub connection: ConnectionStatus,
    pub last_update: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            battery: None,
            voltage: None,
            uptime: None,
            commands: None,
            last_command: None,
            connection: ConnectionStatus::Checking,
            last_update: None,
        }
    }

    pub fn shared() -> SharedDashboard {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn apply(&mut self, snapshot: &StatusSnapshot) {
        if let Some(battery) = snapshot.battery {
            self.battery = Some(battery);
        }
        if let Some(voltage) = snapshot.voltage {
            self.voltage = Some(voltage);
        }
        if let Some(uptime) = &snapshot.uptime {
            self.uptime = Some(uptime.clone());
        }
        if let Some(commands) = snapshot.commands {
            self.commands = Some(commands);
        }
        if let Some(last_command) = &snapshot.last_command {
            self.last_command = Some(last_command.clone());
        }

        self.connection = ConnectionStatus::Connected;
        self.last_update = Some(Utc::now());
    }

    pub fn mark_checking(&mut self) {
        self.connection = ConnectionStatus::Checking;
    }

    /// Keeps the last known values; only the connection flag changes.
    pub fn mark_disconnected(&mut self) {
        self.connection = ConnectionStatus::Disconnected;
    }

    /// Shows a command this app just sent as the last one. The counter is
    /// left to the car; only `/status` moves it.
    pub fn record_command(&mut self, command: &Command) {
        self.record_label(command.label());
    }

    pub fn record_label(&mut self, label: &str) {
        self.last_command = Some(label.to_string());
    }

    pub fn reset_stats(&mut self) {
        self.commands = Some(0);
        self.last_command = None;
    }

    pub fn battery_health(&self) -> Option<BatteryHealth> {
        self.battery.map(BatteryHealth::from_percent)
    }

    /// True when the car has not answered a status poll within `max_age`.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        match self.last_update {
            Some(t) => match chrono::Duration::from_std(max_age) {
                Ok(max_age) => Utc::now() - t >= max_age,
                Err(_) => false,
            },
            None => true,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
