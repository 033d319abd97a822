//! Logging - `Logger` implementations and subscriber setup

use std::fmt;

use crate::domain::traits::{LogLevel, Logger};

/// Forwards log records to `tracing`, tagged with a prefix and the component
#[derive(Debug, Clone)]
pub struct TracingLogger {
    prefix: String,
}

impl TracingLogger {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn write(&self, level: LogLevel, component: &str, args: fmt::Arguments<'_>) {
        let prefix = self.prefix.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(prefix, component, "{}", args),
            LogLevel::Info => tracing::info!(prefix, component, "{}", args),
            LogLevel::Warn => tracing::warn!(prefix, component, "{}", args),
            LogLevel::Error => tracing::error!(prefix, component, "{}", args),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn write(&self, _level: LogLevel, _component: &str, _args: fmt::Arguments<'_>) {}
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loggers_never_fail() {
        init("debug");
        let logger = TracingLogger::new("Test");
        logger.debug("Component", format_args!("value {}", 1));
        logger.error("Component", format_args!("value {}", 2));
        NullLogger.warn("Component", format_args!("dropped"));
    }
}
