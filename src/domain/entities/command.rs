use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use regex_lite::Regex;

use crate::application::errors::{BotError, BuildError};
use crate::application::messaging::{Arguments, CommandContext};
use crate::domain::entities::Instance;
use crate::domain::traits::{ArgumentType, DefaultArgumentType};

/// Result of a command handler
pub type HandlerResult = Result<(), BotError>;

/// Boxed future returned by a bound handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Handler bound to one controller instance
pub type BoundHandler = Arc<dyn Fn(CommandContext, Arguments) -> HandlerFuture + Send + Sync>;

/// Binds a handler to a type-erased controller instance
pub type Binder = Arc<dyn Fn(Instance) -> Result<BoundHandler, BuildError> + Send + Sync>;

/// Which invocation forms a command answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleSyntax {
    /// `/trigger` only
    BareOnly,
    /// `/trigger@botname` only
    MentionOnly,
    #[default]
    Both,
}

impl HandleSyntax {
    pub fn accepts_bare(self) -> bool {
        !matches!(self, HandleSyntax::MentionOnly)
    }

    pub fn accepts_mention(self) -> bool {
        !matches!(self, HandleSyntax::BareOnly)
    }
}

/// What a command token is matched against
#[derive(Debug, Clone)]
pub enum Trigger {
    Exact(String),
    Pattern(Regex),
}

impl Trigger {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Trigger::Exact(trigger) => trigger == token,
            Trigger::Pattern(regex) => regex.is_match(token),
        }
    }

    /// The exact trigger or the pattern source
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Exact(trigger) => trigger,
            Trigger::Pattern(regex) => regex.as_str(),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Trigger::Pattern(_))
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Exact(trigger) => f.write_str(trigger),
            Trigger::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// One positional argument of a command
#[derive(Clone)]
pub struct ArgumentsMapMember {
    pub position: usize,
    pub argument_type: Arc<dyn ArgumentType>,
}

impl fmt::Debug for ArgumentsMapMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentsMapMember")
            .field("position", &self.position)
            .field("type", &self.argument_type.name())
            .finish()
    }
}

/// Positional arguments ordered by declared position
pub type ArgumentsMap = Vec<ArgumentsMapMember>;

/// Declaration of a command on a controller: trigger, accepted syntax
/// and typed positional arguments. The handler is attached by
/// `ControllerBuilder::command`.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub trigger: Trigger,
    pub syntax: HandleSyntax,
    pub description: Option<String>,
    pub arguments: Vec<ArgumentsMapMember>,
}

impl CommandDescriptor {
    /// Command answering to exactly `trigger`
    pub fn new(trigger: impl Into<String>) -> Self {
        Self::with_trigger(Trigger::Exact(trigger.into()))
    }

    /// Command answering to every token matching `pattern`
    pub fn matching(pattern: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self::with_trigger(Trigger::Pattern(Regex::new(pattern)?)))
    }

    fn with_trigger(trigger: Trigger) -> Self {
        Self {
            trigger,
            syntax: HandleSyntax::default(),
            description: None,
            arguments: Vec::new(),
        }
    }

    pub fn syntax(mut self, syntax: HandleSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends an argument whose type is the built-in conversion for `T`
    pub fn arg<T: DefaultArgumentType>(self) -> Self {
        let position = self.next_position();
        self.arg_at(position, T::argument_type())
    }

    /// Declares an argument at an explicit position with an explicit type
    pub fn arg_at(mut self, position: usize, argument_type: Arc<dyn ArgumentType>) -> Self {
        self.arguments.push(ArgumentsMapMember {
            position,
            argument_type,
        });
        self
    }

    fn next_position(&self) -> usize {
        self.arguments
            .iter()
            .map(|member| member.position + 1)
            .max()
            .unwrap_or(0)
    }

    /// Arguments sorted by position; a position declared twice is an error
    pub fn arguments_map(&self) -> Result<ArgumentsMap, BuildError> {
        let mut map = self.arguments.clone();
        map.sort_by_key(|member| member.position);
        if let Some(pair) = map.windows(2).find(|pair| pair[0].position == pair[1].position) {
            return Err(BuildError::DuplicateArgumentPosition {
                trigger: self.trigger.as_str().to_string(),
                position: pair[0].position,
            });
        }
        Ok(map)
    }

    /// Checks the trigger can be typed as a single command token
    pub fn validate(&self, controller: &str) -> Result<(), BuildError> {
        let Trigger::Exact(trigger) = &self.trigger else {
            return Ok(());
        };
        let reason = if trigger.is_empty() {
            Some("trigger is empty")
        } else if trigger.contains(char::is_whitespace) {
            Some("trigger contains whitespace")
        } else if trigger.contains('@') {
            Some("trigger contains '@'")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(BuildError::InvalidTrigger {
                trigger: trigger.clone(),
                controller: controller.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A command declaration together with the binder for its handler
#[derive(Clone)]
pub struct ControllerCommand {
    pub descriptor: CommandDescriptor,
    pub bind: Binder,
}

impl fmt::Debug for ControllerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCommand")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::arguments::IntegerArgument;

    #[test]
    fn test_exact_trigger_matching() {
        let cmd = CommandDescriptor::new("add");
        assert!(cmd.trigger.matches("add"));
        assert!(!cmd.trigger.matches("addition"));
        assert!(!cmd.trigger.is_pattern());
    }

    #[test]
    fn test_pattern_trigger_matching() {
        let cmd = CommandDescriptor::matching(r"^roll\d+$").unwrap();
        assert!(cmd.trigger.matches("roll20"));
        assert!(!cmd.trigger.matches("roll"));
        assert_eq!(cmd.trigger.to_string(), r"/^roll\d+$/");
    }

    #[test]
    fn test_arguments_sorted_by_position() {
        let cmd = CommandDescriptor::new("swap")
            .arg_at(1, Arc::new(IntegerArgument))
            .arg::<String>();
        let map = cmd.arguments_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].position, 1);
        assert_eq!(map[1].position, 2);

        let cmd = CommandDescriptor::new("swap")
            .arg_at(1, Arc::new(IntegerArgument))
            .arg_at(0, Arc::new(IntegerArgument));
        let map = cmd.arguments_map().unwrap();
        assert_eq!(map[0].position, 0);
        assert_eq!(map[1].position, 1);
    }

    #[test]
    fn test_duplicate_argument_position() {
        let cmd = CommandDescriptor::new("dup")
            .arg_at(0, Arc::new(IntegerArgument))
            .arg_at(0, Arc::new(IntegerArgument));
        assert!(matches!(
            cmd.arguments_map(),
            Err(BuildError::DuplicateArgumentPosition { position: 0, .. })
        ));
    }

    #[test]
    fn test_trigger_validation() {
        assert!(CommandDescriptor::new("ok").validate("C").is_ok());
        assert!(CommandDescriptor::new("two words").validate("C").is_err());
        assert!(CommandDescriptor::new("a@b").validate("C").is_err());
        assert!(CommandDescriptor::new("").validate("C").is_err());
    }

    #[test]
    fn test_handle_syntax() {
        assert!(HandleSyntax::Both.accepts_bare() && HandleSyntax::Both.accepts_mention());
        assert!(!HandleSyntax::BareOnly.accepts_mention());
        assert!(!HandleSyntax::MentionOnly.accepts_bare());
    }
}
