use std::any::Any;
use std::sync::Arc;

use crate::application::errors::ConversionError;

/// Converted argument value
pub type ArgumentValue = Box<dyn Any + Send + Sync>;

/// Conversion of one raw command argument into a typed value.
///
/// Command authors implement this to attach custom argument types.
pub trait ArgumentType: Send + Sync {
    /// Human-readable type name, used in logs and errors
    fn name(&self) -> &str;

    fn on_conversion(&self, raw: &str) -> Result<ArgumentValue, ConversionError>;
}

/// Rust types with a built-in argument conversion
pub trait DefaultArgumentType: Any + Send + Sync {
    fn argument_type() -> Arc<dyn ArgumentType>;
}
