//! Message handling - Command routing and argument parsing

pub mod arguments;
pub mod context;
pub mod parser;
pub mod router;

pub use arguments::{Arguments, IntegerArgument, StringArgument};
pub use context::CommandContext;
pub use parser::{ArgumentsParser, DefaultArgumentsParser};
pub use router::{CommandDeclaration, CommandRouter, DispatchOutcome, PARSE_FAILURE_REPLY};
