//! Configuration module for the lottery injector.
//!
//! This module provides structures and utilities for loading the injector
//! configuration from a TOML file. Values may reference environment variables
//! with `${VAR}` or `${VAR:-default}`; they are resolved before parsing and the
//! result is validated before use.

use injector_types::{networks::deserialize_networks, parse_ether, NetworkConfig, NetworksConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the signer's private key unless overridden.
pub const DEFAULT_PRIVATE_KEY_ENV: &str = "INJECTOR_PRIVATE_KEY";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the injector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Settings for the injector itself.
	#[serde(default)]
	pub injector: InjectorConfig,
	/// Per-network RPC endpoint, lottery address and injection amount.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Durable log output.
	#[serde(default)]
	pub logging: LoggingConfig,
}

/// Configuration specific to the injector run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InjectorConfig {
	/// Name of the environment variable holding the signer's private key.
	#[serde(default = "default_private_key_env")]
	pub private_key_env: String,
}

impl Default for InjectorConfig {
	fn default() -> Self {
		Self {
			private_key_env: default_private_key_env(),
		}
	}
}

fn default_private_key_env() -> String {
	DEFAULT_PRIVATE_KEY_ENV.to_string()
}

/// Configuration for the audit trail.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	/// File receiving one JSON record per run.
	#[serde(default = "default_audit_log")]
	pub audit_log: PathBuf,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			audit_log: default_audit_log(),
		}
	}
}

fn default_audit_log() -> PathBuf {
	PathBuf::from("logs/injector.log")
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match (std::env::var(var_name.as_str()), default_value) {
			(Ok(v), _) => v,
			(Err(_), Some(default)) => default.to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					var_name.as_str()
				)));
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}

	result.push_str(&input[last_end..]);
	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Returns the configuration of a supported network, if present.
	pub fn network(&self, network: &injector_types::Network) -> Option<&NetworkConfig> {
		self.networks.get(network)
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// The zero lottery address is accepted here; it marks a network that is not
	/// deployed yet and is rejected when a run targets that network.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.injector.private_key_env.trim().is_empty() {
			return Err(ConfigError::Validation(
				"injector.private_key_env cannot be empty".into(),
			));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}

		for (network, config) in &self.networks {
			if config.rpc_url.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have rpc_url",
					network
				)));
			}
			parse_ether(&config.injection).map_err(|e| {
				ConfigError::Validation(format!(
					"Network {} has an invalid injection amount: {}",
					network, e
				))
			})?;
		}

		if self.logging.audit_log.as_os_str().is_empty() {
			return Err(ConfigError::Validation(
				"logging.audit_log cannot be empty".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use injector_types::{Address, Network};
	use tempfile::TempDir;

	const BASE_CONFIG: &str = r#"
[networks.testnet]
rpc_url = "https://data-seed-prebsc-1-s1.binance.org:8545"
lottery_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
injection = "1.5"

[networks.mainnet]
rpc_url = "https://bsc-dataseed.binance.org"
lottery_address = "0x0000000000000000000000000000000000000000"
injection = "2"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("INJECTOR_TEST_HOST", "localhost");
		std::env::set_var("INJECTOR_TEST_PORT", "8545");

		let input = "rpc_url = \"http://${INJECTOR_TEST_HOST}:${INJECTOR_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc_url = \"http://localhost:8545\"");

		std::env::remove_var("INJECTOR_TEST_HOST");
		std::env::remove_var("INJECTOR_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "injection = \"${INJECTOR_MISSING_AMOUNT:-0.5}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "injection = \"0.5\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "rpc_url = \"${INJECTOR_MISSING_RPC}\"";
		let result = resolve_env_vars(input);
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("INJECTOR_MISSING_RPC"));
	}

	#[test]
	fn test_parse_defaults() {
		let config: Config = BASE_CONFIG.parse().unwrap();

		assert_eq!(config.injector.private_key_env, DEFAULT_PRIVATE_KEY_ENV);
		assert_eq!(config.logging.audit_log, PathBuf::from("logs/injector.log"));
		assert_eq!(config.networks.len(), 2);

		let testnet = config.network(&Network::Testnet).unwrap();
		assert_eq!(testnet.injection, "1.5");
		assert!(!testnet.has_zero_address());
	}

	#[test]
	fn test_zero_address_is_loadable() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		let mainnet = config.network(&Network::Mainnet).unwrap();
		assert_eq!(mainnet.lottery_address, Address::ZERO);
	}

	#[test]
	fn test_unknown_network_key_rejected() {
		let config_str = r#"
[networks.hardhat]
rpc_url = "http://localhost:8545"
lottery_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
injection = "1"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err.to_string().contains("hardhat"), "got: {}", err);
	}

	#[test]
	fn test_invalid_injection_rejected() {
		let config_str = r#"
[networks.testnet]
rpc_url = "http://localhost:8545"
lottery_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
injection = "lots"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err
			.to_string()
			.contains("Network testnet has an invalid injection amount"));
	}

	#[test]
	fn test_loose_injection_formats_rejected() {
		for injection in ["", ".", "1_000", "0.0000000000000000019", "1.0000000000000000009"] {
			let config_str = format!(
				r#"
[networks.testnet]
rpc_url = "http://localhost:8545"
lottery_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
injection = "{}"
"#,
				injection
			);
			let err = Config::from_str(&config_str).unwrap_err();
			assert!(
				matches!(err, ConfigError::Validation(_)),
				"accepted {:?}",
				injection
			);
			assert!(err
				.to_string()
				.contains("Network testnet has an invalid injection amount"));
		}
	}

	#[test]
	fn test_empty_rpc_url_rejected() {
		let config_str = r#"
[networks.testnet]
rpc_url = ""
lottery_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
injection = "1"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err.to_string().contains("Network testnet must have rpc_url"));
	}

	#[test]
	fn test_empty_networks_rejected() {
		let err = Config::from_str("[networks]\n").unwrap_err();
		assert!(err
			.to_string()
			.contains("Networks configuration cannot be empty"));
	}

	#[test]
	fn test_overrides() {
		let config_str = format!(
			"{}\n[injector]\nprivate_key_env = \"LOTTERY_KEY\"\n\n[logging]\naudit_log = \"/var/log/injector.jsonl\"\n",
			BASE_CONFIG
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.injector.private_key_env, "LOTTERY_KEY");
		assert_eq!(
			config.logging.audit_log,
			PathBuf::from("/var/log/injector.jsonl")
		);
	}

	#[tokio::test]
	async fn test_from_file() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");
		std::fs::write(&config_path, BASE_CONFIG).unwrap();

		let config = Config::from_file(&config_path).await.unwrap();
		assert_eq!(config.networks.len(), 2);
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let temp_dir = TempDir::new().unwrap();
		let err = Config::from_file(temp_dir.path().join("absent.toml"))
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::Io(_)));
	}
}
