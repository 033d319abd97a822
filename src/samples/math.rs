use std::sync::Arc;

use super::{StatsModule, UsageStats};
use crate::application::errors::BuildError;
use crate::application::messaging::{Arguments, CommandContext};
use crate::application::registry::Registry;
use crate::domain::entities::{
    CommandDescriptor, ControllerDescriptor, HandlerResult, ModuleDescriptor, ProviderDescriptor,
};

pub struct MathModule;

/// Checked integer arithmetic
#[derive(Debug, Default)]
pub struct Calculator;

impl Calculator {
    pub fn add(&self, a: i64, b: i64) -> Option<i64> {
        a.checked_add(b)
    }

    pub fn multiply(&self, a: i64, b: i64) -> Option<i64> {
        a.checked_mul(b)
    }

    pub fn divide(&self, a: i64, b: i64) -> Option<i64> {
        a.checked_div(b)
    }
}

pub struct MathController {
    calculator: Arc<Calculator>,
    stats: Arc<UsageStats>,
}

impl MathController {
    async fn answer(&self, ctx: &CommandContext, result: Option<i64>) -> HandlerResult {
        let text = match result {
            Some(value) => value.to_string(),
            None => "Out of range".to_string(),
        };
        ctx.reply(text).await?;
        Ok(())
    }

    async fn add(self: Arc<Self>, ctx: CommandContext, args: Arguments) -> HandlerResult {
        self.stats.record("add");
        let result = self.calculator.add(args.get(0)?, args.get(1)?);
        self.answer(&ctx, result).await
    }

    async fn multiply(self: Arc<Self>, ctx: CommandContext, args: Arguments) -> HandlerResult {
        self.stats.record("mul");
        let result = self.calculator.multiply(args.get(0)?, args.get(1)?);
        self.answer(&ctx, result).await
    }

    async fn divide(self: Arc<Self>, ctx: CommandContext, args: Arguments) -> HandlerResult {
        self.stats.record("div");
        let result = self.calculator.divide(args.get(0)?, args.get(1)?);
        self.answer(&ctx, result).await
    }

    async fn square(self: Arc<Self>, ctx: CommandContext, args: Arguments) -> HandlerResult {
        self.stats.record("square");
        let value: i64 = args.get(0)?;
        let result = self.calculator.multiply(value, value);
        self.answer(&ctx, result).await
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<(), BuildError> {
    registry
        .register_module(
            ModuleDescriptor::of::<MathModule>()
                .import::<StatsModule>()
                .provide::<Calculator>()
                .export::<Calculator>()
                .controller::<MathController>(),
        )?
        .register_provider(ProviderDescriptor::of::<Calculator>().construct(|_| Ok(Calculator)))?
        .register_controller(
            ControllerDescriptor::of::<MathController>()
                .inject::<Calculator>()
                .inject::<UsageStats>()
                .command(
                    CommandDescriptor::new("add")
                        .describe("Add two integers")
                        .arg::<i64>()
                        .arg::<i64>(),
                    MathController::add,
                )
                .command(
                    CommandDescriptor::new("mul")
                        .describe("Multiply two integers")
                        .arg::<i64>()
                        .arg::<i64>(),
                    MathController::multiply,
                )
                .command(
                    CommandDescriptor::new("div")
                        .describe("Divide two integers")
                        .arg::<i64>()
                        .arg::<i64>(),
                    MathController::divide,
                )
                .command(
                    CommandDescriptor::matching("^sq(uare)?$")
                        .map_err(|e| BuildError::InvalidTrigger {
                            trigger: "^sq(uare)?$".to_string(),
                            controller: "MathController".to_string(),
                            reason: e.to_string(),
                        })?
                        .describe("Square an integer")
                        .arg::<i64>(),
                    MathController::square,
                )
                .construct(|deps| {
                    Ok(MathController {
                        calculator: deps.next()?,
                        stats: deps.next()?,
                    })
                }),
        )?;
    Ok(())
}
