pub mod client;
pub mod dashboard;
pub mod drive;
pub mod error;
pub mod models;
pub mod monitor;

pub use client::VehicleControlClient;
pub use dashboard::{BatteryHealth, ConnectionStatus, Dashboard, SharedDashboard};
pub use drive::{DriveOutcome, DrivePad};
pub use error::ControlError;
pub use models::{Command, Direction, StatusSnapshot};
pub use monitor::{MonitorHandle, StatusMonitor};
