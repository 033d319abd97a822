//! Arguments parser - Splits the text after a command into typed arguments

use super::arguments::Arguments;
use crate::application::errors::ParseError;
use crate::domain::entities::ArgumentsMap;

/// Turns the raw argument text of a command into converted values
pub trait ArgumentsParser: Send + Sync {
    fn parse(&self, raw: &str, map: &ArgumentsMap) -> Result<Arguments, ParseError>;
}

/// Splits on single spaces; the count must equal the map length and every
/// position must convert, otherwise the whole parse fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultArgumentsParser;

impl ArgumentsParser for DefaultArgumentsParser {
    fn parse(&self, raw: &str, map: &ArgumentsMap) -> Result<Arguments, ParseError> {
        // A bare command carries no arguments at all
        let parts: Vec<&str> = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split(' ').collect()
        };

        if parts.len() != map.len() {
            return Err(ParseError::Count {
                expected: map.len(),
                actual: parts.len(),
            });
        }

        let values = parts
            .iter()
            .zip(map)
            .enumerate()
            .map(|(index, (part, member))| {
                member
                    .argument_type
                    .on_conversion(part)
                    .map_err(|source| ParseError::Conversion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Arguments::new(values))
    }
}
