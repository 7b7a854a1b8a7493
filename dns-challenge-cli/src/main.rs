//! certbot manual hooks for DNS-01 challenges on Core Networks DNS
//!
//! ```text
//! certbot certonly --manual --preferred-challenges dns \
//!     --manual-auth-hook "dns-challenge auth" \
//!     --manual-cleanup-hook "dns-challenge cleanup" -d example.com
//! ```
//!
//! Each hook invocation handles one challenge and exits non-zero on failure. Logs go to stderr.

mod config;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dns_challenge_core::traits::{HttpProviderConnector, InMemoryNameCache, InMemoryProviderRegistry};
use dns_challenge_core::{
    ChallengeContext, ChallengeError, ChallengeService, HickoryCnameLookup, NameCache,
};
use dns_challenge_provider::{ProviderOptions, normalize_domain_name};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_CONFIG_PATH, FileConfig, load_credentials};
use state::StateFile;

#[derive(Parser)]
#[command(name = "dns-challenge")]
#[command(about = "ACME DNS-01 challenge hooks for Core Networks DNS")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the challenge TXT record (certbot --manual-auth-hook)
    Auth {
        #[command(flatten)]
        challenge: ChallengeArgs,

        /// Seconds to wait for the record to propagate
        #[arg(long)]
        propagation_seconds: Option<u64>,
    },

    /// Remove the challenge TXT record (certbot --manual-cleanup-hook)
    Cleanup {
        #[command(flatten)]
        challenge: ChallengeArgs,
    },

    /// Print the resolved name and provider zone for a record name
    FindZone {
        /// Record name, e.g. _acme-challenge.example.com
        name: String,
    },
}

#[derive(Args)]
struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation string to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,

    /// Record name (default: _acme-challenge.<domain>)
    #[arg(long)]
    validation_name: Option<String>,
}

impl ChallengeArgs {
    fn validation_name(&self) -> String {
        self.validation_name.clone().unwrap_or_else(|| {
            let domain = self.domain.strip_prefix("*.").unwrap_or(&self.domain);
            format!("_acme-challenge.{domain}")
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let expected = e
                .downcast_ref::<ChallengeError>()
                .is_some_and(ChallengeError::is_expected);
            if expected {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FileConfig::load(&cli.config)?.resolve()?;
    tracing::debug!("Using configuration {config:?}");

    match cli.command {
        Command::Auth {
            challenge,
            propagation_seconds,
        } => auth(&config, &challenge, propagation_seconds).await,
        Command::Cleanup { challenge } => cleanup(&config, &challenge).await,
        Command::FindZone { name } => find_zone(&config, &name).await,
    }
}

/// Context for one hook run, seeded with previously resolved names.
fn challenge_context(config: &Config, names: InMemoryNameCache) -> Arc<ChallengeContext> {
    let connector = HttpProviderConnector::new(ProviderOptions {
        base_url: config.api_base_url.clone(),
        ..ProviderOptions::default()
    });

    Arc::new(ChallengeContext::new(
        Arc::new(InMemoryProviderRegistry::new()),
        Arc::new(connector),
        Arc::new(names),
        Arc::new(HickoryCnameLookup::from_system_conf(config.dns_timeout)),
        config.settings,
    ))
}

fn challenge_service(config: &Config, names: InMemoryNameCache) -> anyhow::Result<ChallengeService> {
    let source = load_credentials(&config.credentials)?;
    Ok(ChallengeService::new(
        challenge_context(config, names),
        &source,
    )?)
}

async fn auth(
    config: &Config,
    args: &ChallengeArgs,
    propagation_seconds: Option<u64>,
) -> anyhow::Result<()> {
    let validation_name = args.validation_name();
    let names = InMemoryNameCache::new();
    let service = challenge_service(config, names.clone())?;

    service
        .perform(&args.domain, &validation_name, &args.validation)
        .await?;

    let key = normalize_domain_name(&validation_name);
    if let Some(resolved) = names.get(&key).await {
        let state = StateFile::new(&config.state_file);
        state
            .insert(&key, &resolved)
            .context("Record created but its name could not be saved for cleanup")?;
        tracing::debug!("Saved {key} -> {resolved} to {}", state.path().display());
    }

    let wait = propagation_seconds.map_or(config.propagation, std::time::Duration::from_secs);
    if !wait.is_zero() {
        tracing::info!("Waiting {}s for DNS propagation...", wait.as_secs());
        tokio::time::sleep(wait).await;
    }
    Ok(())
}

async fn cleanup(config: &Config, args: &ChallengeArgs) -> anyhow::Result<()> {
    let validation_name = args.validation_name();
    let state = StateFile::new(&config.state_file);
    let names = InMemoryNameCache::with_entries(state.load()?);
    let service = challenge_service(config, names)?;

    service
        .cleanup(&args.domain, &validation_name, &args.validation)
        .await?;

    state.remove(&normalize_domain_name(&validation_name))?;
    tracing::debug!("Dropped {validation_name} from {}", state.path().display());
    Ok(())
}

async fn find_zone(config: &Config, name: &str) -> anyhow::Result<()> {
    let service = challenge_service(config, InMemoryNameCache::new())?;
    let (resolved, zone) = service.find_zone(name).await?;
    println!("{resolved} {}", zone.name);
    Ok(())
}
