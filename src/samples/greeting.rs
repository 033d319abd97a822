use std::sync::Arc;

use super::{StatsModule, UsageStats};
use crate::application::errors::BuildError;
use crate::application::messaging::{Arguments, CommandContext};
use crate::application::registry::Registry;
use crate::domain::entities::{
    CommandDescriptor, ControllerDescriptor, HandleSyntax, HandlerResult, ModuleDescriptor,
    ProviderDescriptor,
};

pub struct GreetingModule;

pub struct Greeter {
    bot_name: String,
}

impl Greeter {
    pub fn welcome(&self, who: &str) -> String {
        format!("Hi {}, I am {}. Try /add 2 3 or /stats", who, self.bot_name)
    }

    pub fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

pub struct GreetingController {
    greeter: Arc<Greeter>,
    stats: Arc<UsageStats>,
}

impl GreetingController {
    async fn start(self: Arc<Self>, ctx: CommandContext, _args: Arguments) -> HandlerResult {
        self.stats.record("start");
        let who = ctx
            .message
            .sender
            .as_ref()
            .map(|user| user.display_name().to_string())
            .unwrap_or_else(|| "there".to_string());
        ctx.reply(self.greeter.welcome(&who)).await?;
        Ok(())
    }

    async fn hello(self: Arc<Self>, ctx: CommandContext, args: Arguments) -> HandlerResult {
        self.stats.record("hello");
        let name: String = args.get(0)?;
        ctx.reply(self.greeter.greet(&name)).await?;
        Ok(())
    }
}

pub(super) fn register(registry: &mut Registry, bot_name: &str) -> Result<(), BuildError> {
    let bot_name = bot_name.to_string();
    registry
        .register_module(
            ModuleDescriptor::of::<GreetingModule>()
                .import::<StatsModule>()
                .provide::<Greeter>()
                .controller::<GreetingController>(),
        )?
        .register_provider(ProviderDescriptor::of::<Greeter>().construct(move |_| {
            Ok(Greeter {
                bot_name: bot_name.clone(),
            })
        }))?
        .register_controller(
            ControllerDescriptor::of::<GreetingController>()
                .inject::<Greeter>()
                .inject::<UsageStats>()
                .command(
                    CommandDescriptor::new("start").describe("Start the bot"),
                    GreetingController::start,
                )
                .command(
                    CommandDescriptor::new("hello")
                        .describe("Greet someone by name")
                        .syntax(HandleSyntax::Both)
                        .arg::<String>(),
                    GreetingController::hello,
                )
                .construct(|deps| {
                    Ok(GreetingController {
                        greeter: deps.next()?,
                        stats: deps.next()?,
                    })
                }),
        )?;
    Ok(())
}
