use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cadence_config::{Config, ConfigLoader};
use cadence_engine::{AuthorizationEngine, EngineBuilder};
use cadence_signature::SignatureVerifier;
use cadence_state::StateStore;
use cadence_types::ConfigSchema;

mod allowlist;
mod api;

use allowlist::{AllowAll, Allowlist, StaticAllowlist};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence chunk authorization service", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	#[arg(long, env = "CADENCE_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the authorization service
	Start,
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Some(Commands::Start) | None => start_service(cli).await,
		Some(Commands::Validate) => validate_config(cli).await,
	}
}

async fn start_service(cli: Cli) -> Result<()> {
	info!("Starting Cadence authorization service");
	info!("Loading configuration from: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	info!("Configuration loaded successfully");
	info!("Engine name: {}", config.engine.name);
	info!("Chain id: {}", config.engine.chain_id);
	info!("HTTP port: {}", config.api.http_port);

	let engine = build_engine(&config).context("Failed to build engine")?;
	let allowlist = build_allowlist(&config);

	let state = api::AppState {
		engine: Arc::new(engine),
		allowlist,
	};

	let http_port = config.api.http_port;
	let http_handle = tokio::spawn(async move { api::start_http_server(state, http_port).await });

	let shutdown_signal = setup_shutdown_signal();

	info!("Cadence authorization service started successfully");

	shutdown_signal.await;

	info!("Shutdown signal received, stopping service...");

	http_handle.abort();

	info!("Cadence authorization service stopped");
	Ok(())
}

async fn validate_config(cli: Cli) -> Result<()> {
	info!("Validating configuration file: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	// Exercise the factories so backend tables are schema-checked too.
	build_engine(&config).context("Configuration does not build a runnable engine")?;

	info!("Configuration is valid");
	info!("Engine name: {}", config.engine.name);
	info!("Storage backend: {}", config.storage.backend);
	for signer in &config.signers {
		info!("Smart signer: {} ({})", signer.identity, signer.backend);
	}
	if config.allowlist.enforce {
		info!("Allowlist: {} filler(s)", config.allowlist.fillers.len());
	} else {
		info!("Allowlist: permissive");
	}

	Ok(())
}

fn build_engine(config: &Config) -> Result<AuthorizationEngine> {
	let backend = build_state_backend(config)?;

	let mut verifier = SignatureVerifier::new();
	for signer in &config.signers {
		match signer.backend.as_str() {
			"keyset" => {
				cadence_signature::implementations::keyset::KeySetSignerSchema
					.validate(&signer.config)
					.with_context(|| format!("Invalid keyset config for {}", signer.identity))?;
				let created =
					cadence_signature::implementations::keyset::create_signer(&signer.config);
				verifier.register_smart_signer(signer.identity, Arc::from(created));
			}
			other => bail!("Unknown signer backend: {}", other),
		}
	}

	let engine = EngineBuilder::new()
		.with_address(config.engine.address)
		.with_chain_id(config.engine.chain_id)
		.with_verifier(verifier)
		.with_state_backend(backend)
		.build()
		.context("Engine assembly failed")?;

	Ok(engine)
}

fn build_state_backend(config: &Config) -> Result<Box<dyn StateStore>> {
	let table = &config.storage.config;
	match config.storage.backend.as_str() {
		"memory" => {
			cadence_state::implementations::memory::MemoryStoreSchema
				.validate(table)
				.context("Invalid memory storage config")?;
			Ok(cadence_state::implementations::memory::create_store(table))
		}
		"file" => {
			cadence_state::implementations::file::FileStoreSchema
				.validate(table)
				.context("Invalid file storage config")?;
			Ok(cadence_state::implementations::file::create_store(table))
		}
		other => bail!("Unknown storage backend: {}", other),
	}
}

fn build_allowlist(config: &Config) -> Arc<dyn Allowlist> {
	if config.allowlist.enforce {
		Arc::new(StaticAllowlist::new(config.allowlist.fillers.clone()))
	} else {
		Arc::new(AllowAll)
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
