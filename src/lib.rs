//! xgram - an application container for message-driven bots
//!
//! Modules, providers and controllers are declared as descriptors in a
//! [`Registry`]. [`BotFactory::create`] turns the module graph into live
//! scoped singletons and a command table, and the resulting
//! [`BotService`] routes `/commands` to controller handlers with typed
//! arguments.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod samples;

pub use application::errors::{BotError, BuildError, CommandError};
pub use application::messaging::{Arguments, CommandContext, DispatchOutcome};
pub use application::registry::Registry;
pub use application::services::{BotFactory, BotService, FactoryOptions};
pub use domain::entities::{
    CommandDescriptor, ControllerDescriptor, HandleSyntax, HandlerResult, Key, Message,
    ModuleDescriptor, ProviderDescriptor, SentMessage,
};
pub use domain::traits::{Bot, BotInfo, Logger};
