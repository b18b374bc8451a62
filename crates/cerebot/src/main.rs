//! Cerebot - Main entry point.

use cerebot::access::AccessList;
use cerebot::commands::builtin_table;
use cerebot::config::{Config, DEFAULT_CONFIG_FILE};
use cerebot::{AppResult, Dispatcher, Manager};
use chat_gateway::discord::DiscordGateway;
use chat_gateway::{ChatGateway, InboundEvent};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tokio_stream::Stream;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "A Discord chat bot for Dungeon Crawl Stone Soup")]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', value_name = "toml-file", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

/// Why the bot stopped.
#[derive(Debug, Clone, Copy)]
enum Shutdown {
    Interrupt,
    Terminate,
}

impl Shutdown {
    fn exit_code(self) -> ExitCode {
        match self {
            Shutdown::Interrupt => ExitCode::SUCCESS,
            Shutdown::Terminate => ExitCode::FAILURE,
        }
    }
}

type EventStream = Pin<Box<dyn Stream<Item = InboundEvent>>>;

/// Log level used until a config has been loaded.
const FALLBACK_LOG_LEVEL: &str = "info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let Some(config) = load_config(&args.config) else {
        return ExitCode::FAILURE;
    };

    match run(config, args.config).await {
        Ok(code) => code,
        Err(e) => {
            error!("Bot exited with error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config and start logging at its level. A config that fails to
/// load is reported through a logger at the fallback level.
fn load_config(path: &Path) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => {
            init_logging(&config.bot.log_level);
            Some(config)
        }
        Err(e) => {
            init_logging(FALLBACK_LOG_LEVEL);
            error!(
                "Failed to load configuration from {}: {:#}",
                path.display(),
                e
            );
            None
        }
    }
}

async fn run(config: Config, config_path: PathBuf) -> AppResult<ExitCode> {
    info!("Starting Cerebot {}...", env!("CARGO_PKG_VERSION"));

    let discord = config.discord;
    let table = builtin_table(&discord)?;
    info!("Registered {} commands", table.len());

    let access = Arc::new(AccessList::from_file(
        config_path,
        discord.admins.clone(),
        discord.ignored_users.clone(),
    ));

    let client = DiscordGateway::new(discord.token.clone());
    let events: EventStream = if discord.fake_connect {
        warn!("fake_connect is set, not connecting to Discord");
        Box::pin(tokio_stream::pending())
    } else {
        Box::pin(client.connect().stream())
    };

    let gateway: Arc<dyn ChatGateway> = Arc::new(client);
    let dispatcher = Dispatcher::new(gateway.clone(), table, access, &discord);
    let mut manager = Manager::new(gateway, dispatcher, discord.fake_connect);

    info!("Listening for messages...");
    let stopped = manager.run(events, shutdown_signal()).await;
    manager.disconnect().await;

    match stopped {
        Some(Ok(reason)) => {
            info!("Shutting down ({:?})", reason);
            Ok(reason.exit_code())
        }
        Some(Err(e)) => Err(anyhow::Error::from(e)
            .context("Failed to listen for shutdown signals")
            .into()),
        None => {
            info!("Shutting down...");
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<Shutdown> {
    use signal::unix::SignalKind;

    let mut terminate = signal::unix::signal(SignalKind::terminate())?;
    tokio::select! {
        result = signal::ctrl_c() => result.map(|_| Shutdown::Interrupt),
        _ = terminate.recv() => Ok(Shutdown::Terminate),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<Shutdown> {
    signal::ctrl_c().await.map(|_| Shutdown::Interrupt)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
