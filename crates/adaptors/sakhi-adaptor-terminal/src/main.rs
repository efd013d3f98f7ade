//! `sakhi`: chat with the companion from a terminal

use anyhow::Context;
use clap::Parser;
use sakhi_adaptor_terminal::{connect_store, TerminalAdaptor, TerminalConfig};
use sakhi_core::{init_logging, load_env, SakhiConfig};
use sakhi_plugin_lifeengine::{render_lifeengine_banner, TurnEngine};
use sakhi_provider_gemini::{GeminiConfig, GeminiProvider};
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "sakhi", version, about = "Chat with your companion in the terminal")]
struct Cli {
    /// Identifier the conversation is stored under
    #[arg(short, long, default_value = "local")]
    user_id: String,

    /// Print replies immediately instead of simulating typing
    #[arg(long)]
    no_typing: bool,

    /// Delete everything stored for this user and exit
    #[arg(long)]
    forget: bool,

    /// Keep the conversation in memory only
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_file = load_env().context("loading .env")?;
    init_logging();
    match env_file {
        Some(path) => tracing::info!("Loaded environment from: {}", path.display()),
        None => tracing::warn!("No .env file found - using system environment variables only"),
    }

    let config = SakhiConfig::from_env().context("invalid configuration")?;
    render_lifeengine_banner(&config.engine);

    let store = connect_store(&config.credentials, cli.offline).await;
    let generator = Arc::new(GeminiProvider::new(GeminiConfig::from_config(&config)));
    let engine = Arc::new(TurnEngine::new(config.engine.clone(), store, generator)?);

    if cli.forget {
        engine.forget_user(&cli.user_id).await?;
        println!("Forgot everything about '{}'.", cli.user_id);
        return Ok(());
    }

    tracing::info!(user_id = %cli.user_id, model = %config.gemini_model, "Session started");

    let terminal = TerminalAdaptor::new(
        TerminalConfig {
            user_id: cli.user_id,
            typing_delay: config.engine.typing_delay && !cli.no_typing,
        },
        engine,
    );
    terminal
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
