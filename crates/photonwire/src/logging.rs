use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;

/// Diagnostics go to stderr; stdout carries command output, which may be
/// raw packet bytes.
#[derive(Args, Debug, Clone, Copy)]
pub struct LogArgs {
    /// Log output format (stderr).
    #[arg(id = "log_format", long = "log-format", value_name = "FORMAT", default_value = "text", global = true)]
    pub format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        env = "PHOTONWIRE_LOG",
        global = true
    )]
    pub level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// `warn` is the level the codec uses for an empty-result best-target
/// request; `trace` shows per-packet encode/decode sizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl LogArgs {
    /// Install the global subscriber. A second call is a no-op.
    pub fn init(self) {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(LevelFilter::from(self.level))
            .with_ansi(false)
            .with_target(self.level == LogLevel::Trace);

        let installed = match self.format {
            LogFormat::Text => subscriber.try_init(),
            LogFormat::Json => subscriber.json().try_init(),
        };
        if installed.is_ok() {
            tracing::debug!(format = ?self.format, level = ?self.level, "logging initialised");
        }
    }
}
