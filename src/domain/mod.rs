//! Domain layer - Core types shared by the container and the router
//!
//! This layer contains:
//! - Entities: Identities, module/provider/controller/command declarations, messages
//! - Traits: Abstractions for infrastructure (Bot, Logger, ArgumentType)

pub mod entities;
pub mod traits;
