//! Bazaar CLI - terminal shop client.
//!
//! # Usage
//!
//! ```bash
//! # Shop against the in-memory catalog
//! bazaar
//!
//! # Shop against a running storefront API
//! bazaar --api http://localhost:3000
//!
//! # Start with a 5,000 rupee yearly budget and typed voice input
//! bazaar --budget 5000 --period yearly --voice
//! ```
//!
//! Flags override the matching `BAZAAR_*` environment variables (see
//! `bazaar_storefront::config`). Type `help` at the prompt for commands.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bazaar_core::{BudgetPeriod, Price};
use bazaar_storefront::backend::{LocalBackend, RemoteBackend};
use bazaar_storefront::budget::BudgetPolicy;
use bazaar_storefront::config::{ClientConfig, ConfigError, parse_base_url};
use bazaar_storefront::identity;
use bazaar_storefront::shop::Shop;
use bazaar_storefront::voice::SpeechInput;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;
mod repl;
mod speech;

use repl::Repl;
use speech::TypedSpeech;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar terminal shop")]
struct Cli {
    /// Storefront API root; without it the shop runs in memory
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    /// Initial budget limit in rupees
    #[arg(long, value_name = "RUPEES")]
    budget: Option<u32>,

    /// Budget period (`monthly` or `yearly`)
    #[arg(long, default_value = "monthly")]
    period: BudgetPeriod,

    /// Accept `voice <words>` as spoken input
    #[arg(long)]
    voice: bool,

    /// File holding the session id used with `--api`
    #[arg(long, value_name = "PATH")]
    session_file: Option<PathBuf>,
}

/// Errors that stop the client.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid --api URL: {0}")]
    InvalidApiUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // Quiet by default so log lines don't interleave with the prompt
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = client_config(&cli)?;
    let policy = BudgetPolicy {
        period: cli.period,
        limit: config.budget_limit,
    };

    let (speech, speech_tx) = if cli.voice {
        let (speech, tx) = TypedSpeech::channel();
        (Some(Box::new(speech) as Box<dyn SpeechInput>), Some(tx))
    } else {
        (None, None)
    };

    if let Some(base_url) = config.api_base_url.clone() {
        let session_id = identity::load_or_create(&config.session_file)?;
        tracing::info!(%base_url, session_id = %session_id, "Using remote storefront");
        let shop = build_shop(RemoteBackend::new(base_url, session_id), policy, speech);
        let (repl, settled) = Repl::new(shop, config.search_debounce, speech_tx);
        repl::run(repl, settled).await?;
    } else {
        tracing::info!("Using in-memory shop");
        let shop = build_shop(LocalBackend::default(), policy, speech);
        let (repl, settled) = Repl::new(shop, config.search_debounce, speech_tx);
        repl::run(repl, settled).await?;
    }
    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api) = &cli.api {
        config.api_base_url = Some(parse_base_url(api).map_err(CliError::InvalidApiUrl)?);
    }
    if let Some(rupees) = cli.budget {
        config.budget_limit = Price::from_rupees(rupees);
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

fn build_shop<B>(backend: B, policy: BudgetPolicy, speech: Option<Box<dyn SpeechInput>>) -> Shop<B>
where
    B: bazaar_storefront::backend::ShopBackend,
{
    let shop = Shop::new(backend, policy);
    match speech {
        Some(speech) => shop.with_voice(speech),
        None => shop,
    }
}
