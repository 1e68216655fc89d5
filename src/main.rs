use car_remote::vehicle::{BatteryHealth, Dashboard, Direction};
use car_remote::{logging, AppState, ControlConfig};
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

const HELP: &str = "\
w/forward  s/back  a/left  d/right   move until the next command
x/stop               stop
l/light              toggle the light
m <text>             show a message on the car
status               fetch telemetry now
check                test the connection
reset                reset command stats
estop                emergency stop
q/quit               exit";

enum Input {
    Drive(Direction),
    Stop,
    Light,
    Message(String),
    Status,
    Check,
    Reset,
    EmergencyStop,
    Help,
    Quit,
    Unknown(String),
}

fn parse(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(' ') {
        Some((w, r)) => (w, r),
        None => (line, ""),
    };

    Some(match word {
        "w" | "forward" => Input::Drive(Direction::Forward),
        "s" | "back" => Input::Drive(Direction::Backward),
        "a" | "left" => Input::Drive(Direction::Left),
        "d" | "right" => Input::Drive(Direction::Right),
        "x" | "stop" => Input::Stop,
        "l" | "light" => Input::Light,
        "m" | "msg" => Input::Message(rest.to_string()),
        "status" => Input::Status,
        "check" => Input::Check,
        "reset" => Input::Reset,
        "estop" => Input::EmergencyStop,
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    })
}

fn render(dash: &Dashboard, stale_after: Duration) -> String {
    let battery = match (dash.battery, dash.battery_health()) {
        (Some(pct), Some(health)) => {
            let band = match health {
                BatteryHealth::Excellent => "excellent",
                BatteryHealth::Good => "good",
                BatteryHealth::Low => "low",
                BatteryHealth::Critical => "critical",
            };
            format!("{pct:.0}% ({band})")
        }
        _ => "?".to_string(),
    };
    let voltage = dash
        .voltage
        .map(|v| format!("{v:.1}V"))
        .unwrap_or_else(|| "?".to_string());

    let stale = if dash.last_update.is_some() && dash.is_stale(stale_after) {
        " (stale)"
    } else {
        ""
    };

    format!(
        "{:?}{} | battery {} | {} | uptime {} | commands {} | last {}",
        dash.connection,
        stale,
        battery,
        voltage,
        dash.uptime.as_deref().unwrap_or("?"),
        dash.commands.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
        dash.last_command.as_deref().unwrap_or("none"),
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let _guard = logging::init();

    let config = match ControlConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to build car client");
            return ExitCode::FAILURE;
        }
    };

    info!(base_url = %state.client.base_url(), "car-remote ready");
    println!("{HELP}");

    let monitor = state.status_monitor();
    let polling = monitor.clone().spawn();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let Some(input) = parse(&line) else { continue };

        let result = match input {
            Input::Drive(direction) => state.drive.press(direction).await.map(|_| ()),
            Input::Stop => state.drive.release().await.map(|_| ()),
            Input::Light => state.drive.toggle_light().await,
            Input::Message(text) => state.drive.send_message(&text).await,
            Input::Status => monitor.refresh().await.map(|_| ()),
            Input::Check => {
                let status = monitor.check_connection().await;
                println!("connection: {status:?}");
                Ok(())
            }
            Input::Reset => {
                state.dashboard.write().await.reset_stats();
                Ok(())
            }
            Input::EmergencyStop => state.drive.emergency_stop().await,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Quit => break,
            Input::Unknown(word) => {
                println!("unknown command {word:?}, try `help`");
                continue;
            }
        };

        match result {
            Ok(()) => println!("{}", render(&*state.dashboard.read().await, state.config.stale_after)),
            Err(e) => println!("error: {e}"),
        }
    }

    // leave the car standing still
    if let Err(e) = state.client.stop().await {
        error!(error = %e, "Failed to stop car on exit");
    }
    polling.shutdown().await;

    ExitCode::SUCCESS
}
