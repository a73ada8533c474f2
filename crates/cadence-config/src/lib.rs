//! Runtime configuration: TOML types and the loader.
//!
//! The loader reads a TOML file, substitutes `${VAR}` environment references,
//! applies `CADENCE_`-prefixed overrides, and validates the result before the
//! service wires anything up.

use std::env;
use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub engine: EngineSettings,
	pub storage: StorageSettings,
	#[serde(default)]
	pub signers: Vec<SignerSettings>,
	#[serde(default)]
	pub allowlist: AllowlistSettings,
	#[serde(default)]
	pub api: ApiSettings,
}

/// Identity of the deployment intents must target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
	pub name: String,
	pub chain_id: u64,
	pub address: Address,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Which state backend to run and its backend-specific table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
	pub backend: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

/// One smart-signer registration: the on-record identity address and the
/// backend-specific table its factory validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerSettings {
	pub identity: Address,
	pub backend: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

/// Filler allowlist. With `enforce = false` (the default) every filler is
/// admitted and `fillers` is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowlistSettings {
	#[serde(default)]
	pub enforce: bool,
	#[serde(default)]
	pub fillers: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
	#[serde(default = "default_http_port")]
	pub http_port: u16,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			http_port: default_http_port(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_http_port() -> u16 {
	3000
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::map::Map::new())
}

/// Configuration loader with environment variable substitution.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "CADENCE_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		validate(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<Config, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;
		let substituted_content = self.substitute_env_vars(&content)?;

		let config: Config = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.engine.log_level = log_level;
		}

		if let Ok(http_port) = env::var(format!("{}HTTP_PORT", self.env_prefix)) {
			config.api.http_port = http_port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		Ok(())
	}
}

fn validate(config: &Config) -> Result<(), ConfigError> {
	if config.engine.chain_id == 0 {
		return Err(ConfigError::ValidationError(
			"engine.chain_id must be nonzero".to_string(),
		));
	}

	if config.engine.address == Address::ZERO {
		return Err(ConfigError::ValidationError(
			"engine.address must not be the zero address".to_string(),
		));
	}

	if config.storage.backend.is_empty() {
		return Err(ConfigError::ValidationError(
			"storage.backend must be set".to_string(),
		));
	}

	if config.allowlist.enforce && config.allowlist.fillers.is_empty() {
		return Err(ConfigError::ValidationError(
			"allowlist.enforce requires at least one filler".to_string(),
		));
	}

	let mut identities: Vec<Address> = config.signers.iter().map(|s| s.identity).collect();
	identities.sort();
	identities.dedup();
	if identities.len() != config.signers.len() {
		return Err(ConfigError::ValidationError(
			"signers must have distinct identities".to_string(),
		));
	}

	Ok(())
}
