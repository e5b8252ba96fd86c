//! Diagnostic logging for the CLI
//!
//! Logs go to stderr so call graph output on stdout stays machine-readable.
//! `JSCG_LOG` accepts `EnvFilter` directives (e.g. `jscg_core::flow=debug`)
//! on top of the `--log-level` default.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

pub const LOG_ENV: &str = "JSCG_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
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

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::from(level).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Installs the global subscriber. In JSON mode every closed span (one per
/// analysis phase) is logged with its duration.
pub fn init_logging(level: LogLevel, json: bool) {
    let subscriber = tracing_subscriber::registry().with(env_filter(level));

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_onto_tracing() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert!(Level::from(LogLevel::Error) < Level::from(LogLevel::Info));
    }

    #[test]
    fn default_directive_follows_the_level() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        assert!(env_filter(LogLevel::Debug).to_string().contains("debug"));
        assert!(env_filter(LogLevel::Warn).to_string().contains("warn"));
    }
}
