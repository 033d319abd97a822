//! Domain traits - Abstractions for infrastructure implementations

pub mod argument;
pub mod bot;
pub mod logger;

pub use argument::{ArgumentType, ArgumentValue, DefaultArgumentType};
pub use bot::{Bot, BotInfo};
pub use logger::{LogLevel, Logger};
