use std::sync::Arc;

use super::BotService;
use crate::application::container::InstanceStore;
use crate::application::errors::BuildError;
use crate::application::graph::{
    build_dependency_tree, build_import_tree, render_dependency_tree, DependencyTreeNode,
};
use crate::application::messaging::{ArgumentsParser, CommandRouter, DefaultArgumentsParser};
use crate::application::registry::Registry;
use crate::domain::entities::Key;
use crate::domain::traits::{Bot, Logger};
use crate::infrastructure::logging::TracingLogger;

const COMPONENT: &str = "BotFactory";

/// Knobs of [`BotFactory::create`]
#[derive(Clone)]
pub struct FactoryOptions {
    pub prefix: char,
    pub logger: Arc<dyn Logger>,
    pub parser: Arc<dyn ArgumentsParser>,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            prefix: '/',
            logger: Arc::new(TracingLogger::new("Main")),
            parser: Arc::new(DefaultArgumentsParser),
        }
    }
}

impl FactoryOptions {
    pub fn with_prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn ArgumentsParser>) -> Self {
        self.parser = parser;
        self
    }
}

/// Builds live bots from a registry of declarations
pub struct BotFactory;

impl BotFactory {
    /// Build the module graph rooted at `M`, instantiate it and bind its
    /// commands. Every build-time fault aborts the whole call.
    pub fn create<M: 'static>(
        registry: Registry,
        bot: Arc<dyn Bot>,
        options: FactoryOptions,
    ) -> Result<BotService, BuildError> {
        let root = Key::of::<M>();
        let registry = Arc::new(registry);
        let logger = options.logger;

        logger.log(COMPONENT, format_args!("Building dependency tree for module {}", root));
        let tree = Self::dependency_tree::<M>(&registry)?;
        logger.log(COMPONENT, format_args!("\n{}", render_dependency_tree(&tree)));

        let mut store = InstanceStore::new(Arc::clone(&registry), Arc::clone(&logger));
        store.resolve_for_module(root, &tree)?;

        let mut router = CommandRouter::new(options.prefix, options.parser, Arc::clone(&logger));
        router.map_module(&store, &tree)?;

        Ok(BotService::new(bot, router, store, logger))
    }

    /// Import tree then dependency tree of `M`, without instantiating anything
    pub fn dependency_tree<M: 'static>(registry: &Registry) -> Result<DependencyTreeNode, BuildError> {
        let root = Key::of::<M>();
        registry.module(root)?;
        let imports = build_import_tree(registry, root)?;
        build_dependency_tree(registry, &imports)
    }
}
