use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::errors::BuildError;
use crate::application::messaging::{Arguments, CommandContext};
use crate::application::registry::Registry;
use crate::domain::entities::{
    CommandDescriptor, ControllerDescriptor, HandlerResult, ModuleDescriptor, ProviderDescriptor,
};

pub struct StatsModule;

/// Per-command usage counters shared by every module importing `StatsModule`
#[derive(Default)]
pub struct UsageStats {
    counts: Mutex<HashMap<String, u64>>,
}

impl UsageStats {
    pub fn record(&self, command: &str) {
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry(command.to_string()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, command: &str) -> u64 {
        self.counts
            .lock()
            .map(|counts| counts.get(command).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Lines of `command: count`, sorted by command
    pub fn summary(&self) -> String {
        let Ok(counts) = self.counts.lock() else {
            return String::new();
        };
        let mut lines: Vec<String> = counts
            .iter()
            .map(|(command, count)| format!("/{}: {}", command, count))
            .collect();
        lines.sort();
        lines.join("\n")
    }
}

pub struct StatsController {
    stats: Arc<UsageStats>,
}

impl StatsController {
    async fn stats(self: Arc<Self>, ctx: CommandContext, _args: Arguments) -> HandlerResult {
        let summary = self.stats.summary();
        let text = if summary.is_empty() {
            "No commands used yet".to_string()
        } else {
            summary
        };
        ctx.reply(text).await?;
        Ok(())
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<(), BuildError> {
    registry
        .register_module(
            ModuleDescriptor::of::<StatsModule>()
                .provide::<UsageStats>()
                .export::<UsageStats>(),
        )?
        .register_provider(ProviderDescriptor::of::<UsageStats>().construct(|_| Ok(UsageStats::default())))?
        .register_controller(
            ControllerDescriptor::of::<StatsController>()
                .inject::<UsageStats>()
                .command(
                    CommandDescriptor::new("stats").describe("Show command usage"),
                    StatsController::stats,
                )
                .construct(|deps| Ok(StatsController { stats: deps.next()? })),
        )?;
    Ok(())
}
