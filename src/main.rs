use std::sync::Arc;

use clap::{Parser, Subcommand};

use xgram::application::graph::render_dependency_tree;
use xgram::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use xgram::infrastructure::config::{Config, Transport};
use xgram::infrastructure::logging::{self, TracingLogger};
use xgram::samples::{self, AppModule};
use xgram::{BotError, BotFactory, FactoryOptions};

#[derive(Parser)]
#[command(name = "xgram")]
#[command(about = "An application container for message-driven bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sample bot
    Run,
    /// Print the dependency tree of the sample bot
    Tree,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    // Initialize logging
    logging::init(&config.logging.level);

    let result = match cli.command {
        Commands::Run => run_bot(config, cli.token).await,
        Commands::Tree => print_tree(&config),
        Commands::Version => {
            println!("xgram v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str) -> Config {
    if std::path::Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

async fn run_bot(config: Config, token_override: Option<String>) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);

    let options = FactoryOptions::default()
        .with_prefix(config.command_prefix()?)
        .with_logger(Arc::new(TracingLogger::new(config.logging.prefix.clone())));
    let registry = samples::registry(&config.bot.name)?;

    let (token, poll_timeout) = match config.transport(token_override)? {
        Transport::Telegram {
            token,
            poll_timeout_secs,
        } => (token, poll_timeout_secs),
        Transport::Console => {
            // Run console bot (dev mode)
            let bot = Arc::new(ConsoleAdapter::new(config.bot.name.clone()));
            let service = BotFactory::create::<AppModule>(registry, bot, options)?;
            return service.run().await;
        }
    };

    let mut telegram = TelegramAdapter::new(token, poll_timeout);
    telegram.fetch_bot_info().await?;
    let telegram = Arc::new(telegram);

    let service = BotFactory::create::<AppModule>(registry, telegram.clone(), options)?;

    // Register bot commands with Telegram
    let commands: Vec<(String, String)> = service
        .router()
        .commands()
        .iter()
        .filter(|command| !command.trigger.is_pattern())
        .map(|command| {
            let trigger = command.trigger.as_str().to_string();
            let description = command
                .description
                .clone()
                .unwrap_or_else(|| format!("/{}", trigger));
            (trigger, description)
        })
        .collect();
    if let Err(e) = telegram.register_commands(&commands).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    service.run().await
}

fn print_tree(config: &Config) -> Result<(), BotError> {
    let registry = samples::registry(&config.bot.name)?;
    let tree = BotFactory::dependency_tree::<AppModule>(&registry)?;
    print!("{}", render_dependency_tree(&tree));
    Ok(())
}

fn init_config(path: &str) -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)
        .map_err(|e| BotError::Internal(format!("Failed to write {}: {}", path, e)))?;
    println!("Config written to {}", path);
    Ok(())
}
