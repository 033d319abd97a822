//! Domain entities - Identities, declarations and messages

pub mod command;
pub mod descriptor;
pub mod key;
pub mod message;

pub use command::{
    ArgumentsMap, ArgumentsMapMember, BoundHandler, CommandDescriptor, ControllerCommand,
    HandleSyntax, HandlerResult, Trigger,
};
pub use descriptor::{
    ControllerBuilder, ControllerDescriptor, Factory, Injected, Instance, ModuleDescriptor,
    ProviderBuilder, ProviderDescriptor,
};
pub use key::Key;
pub use message::{Message, SentMessage, User};
