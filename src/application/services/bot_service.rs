use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use crate::application::container::InstanceStore;
use crate::application::errors::BotError;
use crate::application::messaging::{CommandRouter, DispatchOutcome};
use crate::domain::entities::Message;
use crate::domain::traits::{Bot, Logger};

const COMPONENT: &str = "Bot";

/// Inbound messages buffered between the transport and the router
const INBOUND_BUFFER: usize = 64;

/// A constructed bot: transport, resolved instances and the command table
pub struct BotService {
    bot: Arc<dyn Bot>,
    router: Arc<CommandRouter>,
    store: InstanceStore,
    logger: Arc<dyn Logger>,
}

impl BotService {
    pub fn new(
        bot: Arc<dyn Bot>,
        router: CommandRouter,
        store: InstanceStore,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            bot,
            router: Arc::new(router),
            store,
            logger,
        }
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Dispatch one inbound message through the command router
    pub async fn on_inbound_message(&self, message: Message) -> Result<DispatchOutcome, BotError> {
        self.router.handle_message(Arc::clone(&self.bot), message).await
    }

    /// Start the transport and dispatch every inbound message on its own
    /// task until the transport stops. Handlers still running at that point
    /// are awaited before returning.
    pub async fn run(&self) -> Result<(), BotError> {
        let (tx, mut rx) = mpsc::channel(INBOUND_BUFFER);

        let bot = Arc::clone(&self.bot);
        let transport = tokio::spawn(async move { bot.start(tx).await });

        let info = self.bot.bot_info();
        self.logger.log(
            COMPONENT,
            format_args!("Bot started: @{} ({} commands)", info.username, self.router.commands().len()),
        );

        let mut handlers = JoinSet::new();
        while let Some(message) = rx.recv().await {
            let router = Arc::clone(&self.router);
            let bot = Arc::clone(&self.bot);
            let logger = Arc::clone(&self.logger);
            handlers.spawn(async move {
                let chat_id = message.chat_id.clone();
                if let Err(e) = router.handle_message(bot, message).await {
                    logger.error(COMPONENT, format_args!("[{}] Command failed: {}", chat_id, e));
                }
            });
            // Reap finished handlers so the set does not grow unbounded
            while let Some(finished) = handlers.try_join_next() {
                self.report_join(finished);
            }
        }

        while let Some(finished) = handlers.join_next().await {
            self.report_join(finished);
        }

        transport
            .await
            .map_err(|e| BotError::Internal(format!("Transport task failed: {}", e)))?
    }

    fn report_join(&self, result: Result<(), JoinError>) {
        if let Err(e) = result {
            self.logger.error(COMPONENT, format_args!("Handler task failed: {}", e));
        }
    }
}
