//! Built-in argument types and the parsed argument list

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::application::errors::{CommandError, ConversionError};
use crate::domain::traits::{ArgumentType, ArgumentValue, DefaultArgumentType};

/// Signed integer argument, converted to `i64`
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerArgument;

impl ArgumentType for IntegerArgument {
    fn name(&self) -> &str {
        "integer"
    }

    fn on_conversion(&self, raw: &str) -> Result<ArgumentValue, ConversionError> {
        raw.parse::<i64>()
            .map(|value| Box::new(value) as ArgumentValue)
            .map_err(|_| ConversionError::new(raw, self.name()))
    }
}

/// Raw text argument, passed through as `String`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringArgument;

impl ArgumentType for StringArgument {
    fn name(&self) -> &str {
        "string"
    }

    fn on_conversion(&self, raw: &str) -> Result<ArgumentValue, ConversionError> {
        Ok(Box::new(raw.to_string()))
    }
}

impl DefaultArgumentType for i64 {
    fn argument_type() -> Arc<dyn ArgumentType> {
        Arc::new(IntegerArgument)
    }
}

impl DefaultArgumentType for String {
    fn argument_type() -> Arc<dyn ArgumentType> {
        Arc::new(StringArgument)
    }
}

/// Converted arguments of one invocation, in declared order
#[derive(Default)]
pub struct Arguments {
    values: Vec<ArgumentValue>,
}

impl Arguments {
    pub fn new(values: Vec<ArgumentValue>) -> Self {
        Self { values }
    }

    /// Argument at `index`, cloned out as `T`
    pub fn get<T: Any + Clone>(&self, index: usize) -> Result<T, CommandError> {
        self.values
            .get(index)
            .ok_or(CommandError::MissingArgument { index })?
            .downcast_ref::<T>()
            .cloned()
            .ok_or(CommandError::ArgumentMismatch {
                index,
                expected: type_name::<T>(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments").field("len", &self.values.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversion() {
        let value = IntegerArgument.on_conversion("-42").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&-42));
        assert!(IntegerArgument.on_conversion("4x").is_err());
        assert!(IntegerArgument.on_conversion("").is_err());
    }

    #[test]
    fn test_arguments_access() {
        let args = Arguments::new(vec![
            Box::new(3i64) as ArgumentValue,
            Box::new("abc".to_string()) as ArgumentValue,
        ]);
        assert_eq!(args.get::<i64>(0).unwrap(), 3);
        assert_eq!(args.get::<String>(1).unwrap(), "abc");
        assert!(matches!(
            args.get::<i64>(1),
            Err(CommandError::ArgumentMismatch { index: 1, .. })
        ));
        assert!(matches!(
            args.get::<i64>(2),
            Err(CommandError::MissingArgument { index: 2 })
        ));
    }
}
