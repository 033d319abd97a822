use std::fmt;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Leveled logging capability used by the container and the router.
///
/// `component` names the emitting part (`BotFactory`, `InstanceStore`, ...).
/// Implementations must never panic or fail.
pub trait Logger: Send + Sync {
    fn write(&self, level: LogLevel, component: &str, args: fmt::Arguments<'_>);

    fn debug(&self, component: &str, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Debug, component, args);
    }

    fn log(&self, component: &str, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Info, component, args);
    }

    fn warn(&self, component: &str, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Warn, component, args);
    }

    fn error(&self, component: &str, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Error, component, args);
    }
}
