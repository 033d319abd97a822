//! Sample bot - A small module graph served by the `xgram run` command
//!
//! ```text
//! AppModule
//! ├── GreetingModule ── StatsModule
//! ├── MathModule ────── StatsModule
//! └── StatsModule
//! ```
//! `StatsModule` is reached along three branches and still yields a single
//! `UsageStats` instance.

mod greeting;
mod math;
mod stats;

pub use greeting::{GreetingController, GreetingModule, Greeter};
pub use math::{Calculator, MathController, MathModule};
pub use stats::{StatsController, StatsModule, UsageStats};

use crate::application::errors::BuildError;
use crate::application::registry::Registry;
use crate::domain::entities::ModuleDescriptor;

/// Root module of the sample bot
pub struct AppModule;

/// Registry holding every declaration of the sample bot, introducing
/// itself as `bot_name`
pub fn registry(bot_name: &str) -> Result<Registry, BuildError> {
    let mut registry = Registry::new();
    registry.register_module(
        ModuleDescriptor::of::<AppModule>()
            .import::<GreetingModule>()
            .import::<MathModule>()
            .import::<StatsModule>()
            .controller::<StatsController>(),
    )?;
    stats::register(&mut registry)?;
    greeting::register(&mut registry, bot_name)?;
    math::register(&mut registry)?;
    Ok(registry)
}
