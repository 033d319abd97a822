//! Container - Turns a dependency tree into live instances

pub mod instance_store;

pub use instance_store::InstanceStore;
