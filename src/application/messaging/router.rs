//! Command router - Routes command messages to controller handlers

use std::collections::HashSet;
use std::sync::Arc;

use super::context::CommandContext;
use super::parser::ArgumentsParser;
use crate::application::container::InstanceStore;
use crate::application::errors::{BotError, BuildError};
use crate::application::graph::DependencyTreeNode;
use crate::domain::entities::{ArgumentsMap, BoundHandler, HandleSyntax, Key, Message, Trigger};
use crate::domain::traits::{Bot, Logger};

const COMPONENT: &str = "CommandRouter";

/// Reply sent when the arguments of a command cannot be parsed
pub const PARSE_FAILURE_REPLY: &str = "Failed to parse arguments.";

/// A command bound to its controller instance
pub struct CommandDeclaration {
    pub trigger: Trigger,
    pub handler: BoundHandler,
    pub handle_syntax: HandleSyntax,
    pub arguments: ArgumentsMap,
    pub controller: Key,
    pub description: Option<String>,
}

impl std::fmt::Debug for CommandDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDeclaration")
            .field("trigger", &self.trigger)
            .field("handle_syntax", &self.handle_syntax)
            .field("arguments", &self.arguments)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

/// What happened to an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Empty, or not starting with the command prefix
    Ignored,
    /// A command, but no handler (or a mention of another bot)
    NoMatch,
    /// Arguments did not parse; the user got the generic reply
    ParseFailed,
    Handled,
}

/// Trigger table built once from the dependency tree, read-only afterwards
pub struct CommandRouter {
    prefix: char,
    commands: Vec<CommandDeclaration>,
    parser: Arc<dyn ArgumentsParser>,
    logger: Arc<dyn Logger>,
}

impl CommandRouter {
    pub fn new(prefix: char, parser: Arc<dyn ArgumentsParser>, logger: Arc<dyn Logger>) -> Self {
        Self {
            prefix,
            commands: Vec::new(),
            parser,
            logger,
        }
    }

    /// Bind the commands of every controller in `tree` to the controller
    /// instances held by `store`
    pub fn map_module(&mut self, store: &InstanceStore, tree: &DependencyTreeNode) -> Result<(), BuildError> {
        let mut mapped = HashSet::new();
        for node in tree.walk() {
            // A module imported along several branches is mapped once
            if mapped.insert(node.key()) {
                self.map_node(store, node)?;
            }
        }
        Ok(())
    }

    fn map_node(&mut self, store: &InstanceStore, node: &DependencyTreeNode) -> Result<(), BuildError> {
        for controller in &node.controllers {
            let descriptor = store.registry().controller(*controller, node.key())?;
            let instance = store
                .instance(node.key(), *controller)
                .ok_or_else(|| BuildError::ControllerNotResolved {
                    controller: controller.name().to_string(),
                    module: node.key().name().to_string(),
                })?;

            for command in &descriptor.commands {
                let declared = &command.descriptor;
                declared.validate(controller.name())?;

                if let Some(existing) = self.find_declared(&declared.trigger) {
                    return Err(BuildError::DuplicateCommand {
                        trigger: declared.trigger.to_string(),
                        first: existing.controller.name().to_string(),
                        second: controller.name().to_string(),
                    });
                }

                let handler = (command.bind)(Arc::clone(&instance))?;
                self.commands.push(CommandDeclaration {
                    trigger: declared.trigger.clone(),
                    handler,
                    handle_syntax: declared.syntax,
                    arguments: declared.arguments_map()?,
                    controller: *controller,
                    description: declared.description.clone(),
                });
                self.logger.log(
                    COMPONENT,
                    format_args!("Mapped command /{} ({})", declared.trigger, controller),
                );
            }
        }
        Ok(())
    }

    fn find_declared(&self, trigger: &Trigger) -> Option<&CommandDeclaration> {
        self.commands.iter().find(|command| {
            command.trigger.is_pattern() == trigger.is_pattern()
                && command.trigger.as_str() == trigger.as_str()
        })
    }

    /// Route one inbound message. Messages that are not commands, and
    /// commands nobody handles, are dropped silently. Errors raised by a
    /// handler are returned unchanged.
    pub async fn handle_message(&self, bot: Arc<dyn Bot>, message: Message) -> Result<DispatchOutcome, BotError> {
        let text = message.text();
        let Some(body) = text.strip_prefix(self.prefix) else {
            return Ok(DispatchOutcome::Ignored);
        };
        let (token, rest) = body.split_once(' ').unwrap_or((body, ""));
        if token.is_empty() {
            return Ok(DispatchOutcome::Ignored);
        }

        let found = match token.split_once('@') {
            Some((header, mention)) => {
                let username = bot.bot_info().username;
                if mention.contains('@') || mention != username {
                    self.logger.debug(
                        COMPONENT,
                        format_args!("Ignoring /{} addressed to {}", header, mention),
                    );
                    None
                } else {
                    self.find(header, HandleSyntax::accepts_mention)
                }
            }
            None => self.find(token, HandleSyntax::accepts_bare),
        };

        let Some(command) = found else {
            return Ok(DispatchOutcome::NoMatch);
        };
        let rest = rest.to_string();
        self.handle_command(command, bot, message, &rest).await
    }

    /// First command, in registration order, accepting the syntax and
    /// matching `token`
    fn find(&self, token: &str, accepts: fn(HandleSyntax) -> bool) -> Option<&CommandDeclaration> {
        self.commands
            .iter()
            .find(|command| accepts(command.handle_syntax) && command.trigger.matches(token))
    }

    /// Parse the arguments of `command` and invoke its handler
    pub async fn handle_command(
        &self,
        command: &CommandDeclaration,
        bot: Arc<dyn Bot>,
        message: Message,
        raw_arguments: &str,
    ) -> Result<DispatchOutcome, BotError> {
        let ctx = CommandContext::new(bot, message);
        match self.parser.parse(raw_arguments, &command.arguments) {
            Ok(arguments) => {
                self.logger.debug(
                    COMPONENT,
                    format_args!("[{}] /{} {:?}", ctx.chat_id(), command.trigger, arguments),
                );
                (command.handler)(ctx, arguments).await?;
                Ok(DispatchOutcome::Handled)
            }
            Err(e) => {
                self.logger.debug(
                    COMPONENT,
                    format_args!("[{}] /{}: {}", ctx.chat_id(), command.trigger, e),
                );
                ctx.reply(PARSE_FAILURE_REPLY).await?;
                Ok(DispatchOutcome::ParseFailed)
            }
        }
    }

    /// Registered commands, in registration order
    pub fn commands(&self) -> &[CommandDeclaration] {
        &self.commands
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }
}
