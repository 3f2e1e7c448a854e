use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use prick_bot::application::errors::BotError;
use prick_bot::application::messaging::{CommandRouter, RouterState};
use prick_bot::application::services::{BotProfile, MessageService};
use prick_bot::domain::traits::Bot;
use prick_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use prick_bot::infrastructure::config::{load_dotenv, Config};
use prick_bot::infrastructure::llm::OpenAIProvider;
use prick_bot::infrastructure::server::LivenessServer;
use prick_bot::infrastructure::storage::JsonStore;

#[derive(Parser)]
#[command(name = "prick-bot")]
#[command(about = "Command-driven chat bot with an AI relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Telegram bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Liveness endpoint port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Load .env before anything reads the environment
    let dotenv = load_dotenv(Path::new(".env"));

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match dotenv {
        Ok(true) => tracing::info!("Loaded environment from .env"),
        Ok(false) => {}
        Err(e) => tracing::warn!("{}", e),
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = match load_config(&cli.config, cli.token, cli.port) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("{}", e);
                    std::process::exit(1);
                }
            };

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Failed to start runtime: {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = rt.block_on(run_bot(config)) {
                tracing::error!("Bot stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("prick-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(path: &str, token: Option<String>, port: Option<u16>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };

    config.apply_env()?;

    if let Some(token) = token {
        config.apply_overrides(|name| (name == "BOT_TOKEN").then(|| token.clone()))?;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    Ok(config)
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {} bot v{}", config.bot.name, config.bot.version);

    let store = JsonStore::open(&config.storage.variables_file).await?;
    let state = Arc::new(RouterState::new(Arc::new(store)));

    if config.llm.api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY not set, .chatbot prompts will fail");
    }
    let llm = Arc::new(OpenAIProvider::from_config(&config.llm));

    let profile = BotProfile::from(&config.bot);
    let router = Arc::new(CommandRouter::with_default_rules(state, llm, &config.llm, profile));

    let liveness = if config.server.enabled {
        let server = LivenessServer::new(config.server.port, &config.bot.name);
        let (_, handle) = server
            .start()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to bind liveness port: {}", e)))?;
        Some(handle)
    } else {
        None
    };

    let result = match config.telegram_token() {
        Some(token) => {
            let mut bot = TelegramAdapter::new(token);
            if let Err(e) = bot.fetch_bot_info().await {
                tracing::warn!("Failed to fetch bot info: {}", e);
            }
            serve(bot, router, &config.bot.name).await
        }
        None => serve(ConsoleAdapter::new(), router, &config.bot.name).await,
    };

    // Stay reachable for the hosting platform after the inbound stream closes
    if let (Ok(()), Some(handle)) = (&result, liveness) {
        tracing::info!("Message loop finished, liveness endpoint keeps running until Ctrl-C");
        tokio::select! {
            _ = handle => {}
            _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
        }
    }

    result
}

async fn serve<B: Bot + 'static>(bot: B, router: Arc<CommandRouter>, name: &str) -> Result<(), BotError> {
    let service = MessageService::new(Arc::new(bot), router);
    tracing::info!("🤖 {} bot with 35 commands online!", name);
    service.run().await
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render default config: {}", e),
    }
}
