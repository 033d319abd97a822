//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Logging: Logger implementations and subscriber setup
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod config;
pub mod logging;
