//! Bot service run loop tests
//! Run with: cargo test --test service_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ensure_init, text, RecordingBot};
use xgram::infrastructure::logging::NullLogger;
use xgram::{
    Arguments, BotFactory, CommandContext, CommandDescriptor, ControllerDescriptor,
    FactoryOptions, HandlerResult, ModuleDescriptor, Registry,
};

struct AppModule;

struct SlowController;

impl SlowController {
    async fn slow(self: Arc<Self>, ctx: CommandContext, _args: Arguments) -> HandlerResult {
        tokio::time::sleep(Duration::from_millis(50)).await;
        ctx.reply("done").await?;
        Ok(())
    }

    async fn fail(self: Arc<Self>, _ctx: CommandContext, _args: Arguments) -> HandlerResult {
        Err(xgram::CommandError::ExecutionFailed("boom".to_string()).into())
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_module(ModuleDescriptor::of::<AppModule>().controller::<SlowController>())
        .unwrap()
        .register_controller(
            ControllerDescriptor::of::<SlowController>()
                .command(CommandDescriptor::new("slow"), SlowController::slow)
                .command(CommandDescriptor::new("fail"), SlowController::fail)
                .construct(|_| Ok(SlowController)),
        )
        .unwrap();
    registry
}

/// The transport stops right after delivering; pending handlers still finish
#[tokio::test]
async fn test_run_waits_for_pending_handlers() {
    ensure_init();
    let bot = Arc::new(RecordingBot::with_inbox(
        "thisbot",
        vec![text("/slow"), text("/fail"), text("/slow")],
    ));
    let options = FactoryOptions::default().with_logger(Arc::new(NullLogger));
    let service = BotFactory::create::<AppModule>(registry(), bot.clone(), options).unwrap();

    service.run().await.unwrap();

    assert_eq!(bot.replies(), vec!["done", "done"]);
}

#[tokio::test]
async fn test_run_with_silent_transport() {
    ensure_init();
    let bot = Arc::new(RecordingBot::new("thisbot"));
    let options = FactoryOptions::default().with_logger(Arc::new(NullLogger));
    let service = BotFactory::create::<AppModule>(registry(), bot.clone(), options).unwrap();

    service.run().await.unwrap();
    assert!(bot.replies().is_empty());
}
