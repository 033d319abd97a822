//! Application services - Bot construction and the running bot

pub mod bot_factory;
pub mod bot_service;

pub use bot_factory::{BotFactory, FactoryOptions};
pub use bot_service::BotService;
