// Logging initialisation.
//
// Writes to stderr and to `./logs/car-remote.log`. Stdout belongs to the
// interactive prompt and dashboard lines, so log output stays off it; run
// with `2>/dev/null` to keep only the file. The level comes from `RUST_LOG`
// (default `info`, with the HTTP stack held at `warn`).
//
// To see every command and poll:  `RUST_LOG=car_remote=debug`

use tracing_appender::non_blocking;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Initialise the global tracing subscriber.
//
// The returned guard flushes the file writer; keep it alive until exit.
pub fn init() -> non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never("./logs", "car-remote.log");
    let (file_writer, guard) = non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn,h2=warn")
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    // plain text, no ANSI escapes
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
