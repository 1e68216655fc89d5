pub mod config;
pub mod logging;
pub mod vehicle;

pub use config::{ConfigError, ControlConfig};
pub use vehicle::{
    Command, ControlError, Dashboard, Direction, DrivePad, SharedDashboard, StatusMonitor,
    StatusSnapshot, VehicleControlClient,
};

/// Everything a front end needs, built once around a single client.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: ControlConfig,
    pub client: VehicleControlClient,
    pub dashboard: SharedDashboard,
    pub drive: DrivePad,
}

impl AppState {
    pub fn new(config: ControlConfig) -> Result<Self, ControlError> {
        let client = VehicleControlClient::new(&config)?;
        let dashboard = Dashboard::shared();
        let drive = DrivePad::new(client.clone()).with_dashboard(dashboard.clone());

        Ok(AppState {
            config,
            client,
            dashboard,
            drive,
        })
    }

    pub fn status_monitor(&self) -> StatusMonitor {
        StatusMonitor::new(
            self.client.clone(),
            self.dashboard.clone(),
            self.config.status_poll_interval,
        )
        .with_stale_after(self.config.stale_after)
    }
}
