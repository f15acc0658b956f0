use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{ConsoleStream, Logging, LoggingStyle};

mod writer;

pub use writer::LoggingStreamMaker;

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let maker = LoggingStreamMaker::new(config.stream);
    let ansi = maker.supports_color();

    let rust_log = std::env::var("RUST_LOG").ok();
    let targets = if config.targets.is_empty() {
        rust_log.clone().unwrap_or_default()
    } else {
        config.targets.clone()
    };

    let registry = tracing_subscriber::Registry::default()
        .with(console_layer(maker, ansi, config.style, &targets))
        .with(tracing_error::ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if rust_log.is_some() && !config.targets.is_empty() {
        tracing::warn!("Both `RUST_LOG` and `SCRIBE_LOGGING_TARGETS` are set, using `SCRIBE_LOGGING_TARGETS`");
    }
    Ok(())
}

/// Logs into the test harness output. Safe to call from every test.
pub fn init_for_tests() {
    let maker = LoggingStreamMaker::new(ConsoleStream::TestWriter);
    let targets = std::env::var("RUST_LOG").unwrap_or_default();
    let registry = tracing_subscriber::Registry::default()
        .with(console_layer(maker, false, LoggingStyle::Full, &targets))
        .with(tracing_error::ErrorLayer::default());

    // only the first test gets to install it
    tracing::subscriber::set_global_default(registry).ok();
}

fn console_layer<S>(
    maker: impl for<'w> MakeWriter<'w> + Send + Sync + 'static,
    ansi: bool,
    style: LoggingStyle,
    targets: &str,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi)
        .with_writer(maker);

    let filter = make_env_filter(targets);
    match style {
        LoggingStyle::Compact => layer.compact().with_filter(filter).boxed(),
        LoggingStyle::Full => layer.with_filter(filter).boxed(),
        LoggingStyle::Pretty => layer.pretty().with_filter(filter).boxed(),
        LoggingStyle::JSON => layer.json().with_filter(filter).boxed(),
    }
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
