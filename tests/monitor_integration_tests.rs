use car_remote::vehicle::{ConnectionStatus, Dashboard, StatusMonitor};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_refresh_merges_partial_updates() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(car.client.clone(), dashboard.clone(), Duration::from_secs(3));

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "battery": 85,
            "voltage": 4.1,
            "uptime": "00:00:10",
            "commands": 3
        })))
        .up_to_n_times(1)
        .mount(&car.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uptime": "00:00:13"
        })))
        .mount(&car.server)
        .await;

    monitor.refresh().await.unwrap();
    monitor.refresh().await.unwrap();

    let dash = dashboard.read().await;
    assert_eq!(dash.connection, ConnectionStatus::Connected);
    assert_eq!(dash.battery, Some(85.0));
    assert_eq!(dash.voltage, Some(4.1));
    assert_eq!(dash.uptime.as_deref(), Some("00:00:13"));
    assert_eq!(dash.commands, Some(3));
    assert!(dash.last_update.is_some());
}

#[tokio::test]
async fn test_failed_refresh_marks_disconnected_but_keeps_values() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(car.client.clone(), dashboard.clone(), Duration::from_secs(3));

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "battery": 40
        })))
        .up_to_n_times(1)
        .mount(&car.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&car.server)
        .await;

    monitor.refresh().await.unwrap();
    assert!(monitor.refresh().await.is_err());

    let dash = dashboard.read().await;
    assert_eq!(dash.connection, ConnectionStatus::Disconnected);
    assert_eq!(dash.battery, Some(40.0));
}

#[tokio::test]
async fn test_malformed_status_marks_disconnected() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(car.client.clone(), dashboard.clone(), Duration::from_secs(3));

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&car.server)
        .await;

    let status = monitor.check_connection().await;
    assert_eq!(status, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_check_connection_reports_connected() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(car.client.clone(), dashboard.clone(), Duration::from_secs(3));

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&car.server)
        .await;

    assert_eq!(monitor.check_connection().await, ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_spawned_monitor_polls_until_shutdown() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(
        car.client.clone(),
        dashboard.clone(),
        Duration::from_millis(50),
    );

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "battery": 77
        })))
        .mount(&car.server)
        .await;

    let handle = monitor.spawn();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.shutdown().await;

    let polls = car.server.received_requests().await.unwrap().len();
    assert!(polls >= 2, "expected several polls, got {polls}");
    assert_eq!(dashboard.read().await.battery, Some(77.0));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(car.server.received_requests().await.unwrap().len(), polls);
}

#[tokio::test]
async fn test_stale_dashboard_is_marked_disconnected() {
    let car = common::spawn_car().await;
    let dashboard = Dashboard::shared();
    let monitor = StatusMonitor::new(car.client.clone(), dashboard.clone(), Duration::from_secs(3))
        .with_stale_after(Duration::from_secs(10));

    dashboard
        .write()
        .await
        .apply(&car_remote::StatusSnapshot::default());
    assert!(!monitor.expire_stale().await);
    assert_eq!(dashboard.read().await.connection, ConnectionStatus::Connected);

    dashboard.write().await.last_update = Some(chrono::Utc::now() - chrono::Duration::seconds(30));
    assert!(monitor.expire_stale().await);
    assert_eq!(
        dashboard.read().await.connection,
        ConnectionStatus::Disconnected
    );

    // already disconnected: nothing left to expire
    assert!(!monitor.expire_stale().await);
}
