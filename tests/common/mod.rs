use car_remote::{ControlConfig, VehicleControlClient};
use std::time::Duration;
use wiremock::MockServer;

#[allow(dead_code)]
pub struct TestCar {
    pub server: MockServer,
    pub client: VehicleControlClient,
}

/// Mock car plus a client pointed at it with a short timeout.
pub async fn spawn_car() -> TestCar {
    spawn_car_with_timeout(Duration::from_millis(500)).await
}

#[allow(dead_code)]
pub async fn spawn_car_with_timeout(timeout: Duration) -> TestCar {
    let server = MockServer::start().await;

    let config = ControlConfig {
        request_timeout: timeout,
        ..ControlConfig::new(server.uri())
    };
    let client = VehicleControlClient::new(&config).expect("Failed to create car client");

    TestCar { server, client }
}

/// Raw `go` values of every `/action` request the mock car saw, in order.
#[allow(dead_code)]
pub async fn received_actions(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/action")
        .filter_map(|r| r.url.query().map(|q| q.trim_start_matches("go=").to_string()))
        .collect()
}
