//! Structured logging setup.
//!
//! The library itself only emits `tracing` events: transport spans at debug
//! level, credential findings at warn level. Applications pick a subscriber
//! with [`init_logging`]; `RUST_LOG` overrides the configured level.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level: most detailed debugging information.
    Trace,
    /// Debug level: request and response details.
    Debug,
    /// Info level.
    Info,
    /// Warn level: credential findings, HTTP error statuses.
    Warn,
    /// Error level: transport failures.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(Error::config(format!("unknown log level '{s}'"))),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Single-line output.
    Compact,
    /// JSON lines.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level.
    pub level: LogLevel,
    /// Log format.
    pub format: LogFormat,
    /// Whether to show thread IDs.
    pub show_thread_ids: bool,
    /// Whether to show target module.
    pub show_target: bool,
    /// Whether to log span enter/close (e.g. around each HTTP call).
    pub show_span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_thread_ids: false,
            show_target: true,
            show_span_events: false,
        }
    }
}

impl LogConfig {
    /// Debug level with span events.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_span_events: true,
            ..Self::default()
        }
    }

    /// JSON output with thread ids.
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            show_thread_ids: true,
            ..Self::default()
        }
    }

    /// Compact warnings only.
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            show_target: false,
            ..Self::default()
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("bitex_core={0},bitex_exchanges={0}", self.level)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.show_span_events {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = tracing_subscriber::fmt::layer()
            .with_thread_ids(self.show_thread_ids)
            .with_target(self.show_target)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => base.pretty().with_filter(self.filter()).boxed(),
            LogFormat::Compact => base.compact().with_filter(self.filter()).boxed(),
            LogFormat::Json => base.json().with_filter(self.filter()).boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set.
///
/// ```no_run
/// use bitex_core::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::development()).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(config.layer())
        .try_init()
        .map_err(|e| Error::config(format!("logging already initialized: {e}")))
}

/// Like [`init_logging`], but a second call is a no-op. Returns whether this call
/// installed the subscriber.
pub fn try_init_logging(config: &LogConfig) -> bool {
    init_logging(config).is_ok()
}
