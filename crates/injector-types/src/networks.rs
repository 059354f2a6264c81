//! Network configuration types for the lottery injector.
//!
//! The injector only ever talks to a fixed allow-list of networks. Every
//! per-network setting (RPC endpoint, lottery contract, injection amount) is
//! keyed by the same enumeration, so a name that does not parse into a
//! [`Network`] can never reach a chain client.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Networks the injector is allowed to submit transactions to.
pub const SUPPORTED_NETWORKS: [Network; 2] = [Network::Testnet, Network::Mainnet];

/// Errors raised while resolving a network name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
	/// The name is not part of the supported allow-list.
	#[error("Unsupported network: {0}")]
	Unsupported(String),
}

/// A supported blockchain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	Testnet,
	Mainnet,
}

impl Network {
	/// Returns the canonical lowercase name of the network.
	pub fn as_str(&self) -> &'static str {
		match self {
			Network::Testnet => "testnet",
			Network::Mainnet => "mainnet",
		}
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Network {
	type Err = NetworkError;

	/// Matching is exact: `"Mainnet"` or `" mainnet"` are rejected.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		SUPPORTED_NETWORKS
			.into_iter()
			.find(|network| network.as_str() == s)
			.ok_or_else(|| NetworkError::Unsupported(s.to_string()))
	}
}

impl<'de> Deserialize<'de> for Network {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let name = String::deserialize(deserializer)?;
		name.parse().map_err(serde::de::Error::custom)
	}
}

/// Configuration for a single supported network.
///
/// # Fields
///
/// * `rpc_url` - The HTTP(S) RPC endpoint used for reads and submission
/// * `lottery_address` - Address of the deployed lottery contract; the zero
///   address marks a network that has not been configured yet
/// * `injection` - Amount of native currency to inject, as a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub rpc_url: String,
	pub lottery_address: Address,
	pub injection: String,
}

impl NetworkConfig {
	/// Returns true when the lottery address is still the zero sentinel.
	pub fn has_zero_address(&self) -> bool {
		self.lottery_address.is_zero()
	}
}

/// Per-network configuration keyed by supported network.
pub type NetworksConfig = HashMap<Network, NetworkConfig>;

/// Deserializes network configurations from TOML tables keyed by network name.
///
/// # Errors
///
/// Returns a deserialization error if a key is not a supported network name
/// or if an entry is malformed.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let network = key
			.parse::<Network>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid network '{}': {}", key, e)))?;
		result.insert(network, value);
	}

	Ok(result)
}
