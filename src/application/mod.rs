//! Application layer - Container and command routing
//!
//! This layer contains:
//! - Registry: Declarations of modules, providers and controllers
//! - Graph: Import tree and dependency tree builders
//! - Container: Scoped singleton instances
//! - Messaging: Command router, argument parsing
//! - Services: Bot factory and the running bot
//! - Errors: Build-time and dispatch errors

pub mod container;
pub mod errors;
pub mod graph;
pub mod messaging;
pub mod registry;
pub mod services;
