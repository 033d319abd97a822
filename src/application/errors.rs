//! Application layer errors

use thiserror::Error;

use crate::domain::entities::Key;

/// Formats a resolution chain as `A -> B -> A`
pub fn format_chain(chain: &[Key]) -> String {
    chain
        .iter()
        .map(|key| key.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Faults raised while turning the declared module graph into a live bot.
///
/// All of them are fatal: `BotFactory::create` aborts on the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{0} is not registered as a module")]
    NotAModule(String),

    #[error("{provider} is not registered as a provider (referenced from {scope})")]
    NotAProvider { provider: String, scope: String },

    #[error("{controller} is not registered as a controller (declared in {module})")]
    NotAController { controller: String, module: String },

    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("Detected module import cycle: {chain}")]
    ImportCycle { chain: String },

    #[error("Module {module} exports {provider}, which is not available in its scope")]
    ExportNotAvailable { provider: String, module: String },

    #[error("Detected provider dependency cycle: {chain}")]
    ProviderDependencyCycle { chain: String },

    #[error("Detected dependency loop: {chain}")]
    DependencyLoop { chain: String },

    #[error("Provider {provider} is not available in scope {scope}")]
    ProviderNotInScope { provider: String, scope: String },

    #[error("{owner} in module {module} depends on {dependency}, which is not available in its scope")]
    DependencyNotInScope {
        owner: String,
        dependency: String,
        module: String,
    },

    #[error("Expected root module {expected}, found {found}")]
    UnexpectedRoot { expected: String, found: String },

    #[error("{owner} expected dependency #{position} to be {expected}")]
    InjectionMismatch {
        owner: String,
        position: usize,
        expected: &'static str,
    },

    #[error("{owner} requested dependency #{position}, but only {declared} were declared")]
    MissingDependency {
        owner: String,
        position: usize,
        declared: usize,
    },

    #[error("Controller {controller} of module {module} was never instantiated")]
    ControllerNotResolved { controller: String, module: String },

    #[error("Command /{trigger} is defined multiple times ({first}, {second})")]
    DuplicateCommand {
        trigger: String,
        first: String,
        second: String,
    },

    #[error("Invalid command trigger {trigger:?} in {controller}: {reason}")]
    InvalidTrigger {
        trigger: String,
        controller: String,
        reason: String,
    },

    #[error("Command /{trigger} declares argument position {position} twice")]
    DuplicateArgumentPosition { trigger: String, position: usize },
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Argument #{index} is missing")]
    MissingArgument { index: usize },

    #[error("Argument #{index} is not a {expected}")]
    ArgumentMismatch { index: usize, expected: &'static str },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Failure of a single argument type conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {raw:?} to {expected}")]
pub struct ConversionError {
    pub raw: String,
    pub expected: String,
}

impl ConversionError {
    pub fn new(raw: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            expected: expected.into(),
        }
    }
}

/// Failures of the arguments parser. All of them are reported to the user
/// with the same generic reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} arguments, got {actual}")]
    Count { expected: usize, actual: usize },

    #[error("argument #{index}: {source}")]
    Conversion {
        index: usize,
        #[source]
        source: ConversionError,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
