//! Core of the lottery injector.
//!
//! A run resolves its preconditions ([`prepare`]), injects the configured
//! amount into the lottery's current round ([`FundInjector`]), and reports the
//! single outcome through the console and the audit log ([`Reporter`]).
//! [`InjectorEngine`] drives those steps in order.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use injector_config::Config;
use injector_types::{Network, SecretString};
use thiserror::Error;

pub mod engine;
pub mod injector;
pub mod reporter;

pub use engine::InjectorEngine;
pub use injector::{FundInjector, Injection, InjectionError};
pub use reporter::Reporter;

/// Fatal errors that abort a run before or outside the handled submission path.
///
/// Any of these returned from [`InjectorEngine::run`] ends the process with a
/// failing exit status.
#[derive(Debug, Error)]
pub enum InjectorError {
	#[error("Missing private key (signer): set {0}")]
	MissingPrivateKey(String),
	#[error("Missing network configuration for {0}")]
	MissingNetworkConfig(Network),
	#[error("Missing smart contract (Lottery) address for {0}")]
	MissingContractAddress(Network),
	#[error("Invalid private key: {0}")]
	InvalidPrivateKey(String),
	/// Raised by [`Reporter`]. The engine logs it and keeps the run's outcome.
	#[error("Audit log error: {0}")]
	Audit(String),
}

/// Everything a run needs once its preconditions hold.
#[derive(Debug, Clone)]
pub struct InjectionContext {
	pub network: Network,
	pub signer: PrivateKeySigner,
	pub rpc_url: String,
	pub lottery: Address,
	/// Decimal amount of native currency, e.g. `"1.5"`.
	pub injection: String,
}

impl InjectionContext {
	/// Address of the account sending the transaction.
	pub fn signer_address(&self) -> Address {
		self.signer.address()
	}
}

/// Result of checking a run's preconditions.
#[derive(Debug)]
pub enum Preparation {
	/// The ambient network is not on the allow-list. Reported, not fatal.
	Unsupported { network: String },
	/// All preconditions hold.
	Ready(InjectionContext),
}

/// Validates a run's preconditions in order.
///
/// 1. `network_name` must be a supported network.
/// 2. A private key must be present.
/// 3. The network's lottery address must be configured and non-zero.
///
/// No chain access happens here. The private key is only parsed after all
/// three checks pass.
pub fn prepare(
	network_name: &str,
	config: &Config,
	private_key: Option<SecretString>,
) -> Result<Preparation, InjectorError> {
	let Ok(network) = network_name.parse::<Network>() else {
		return Ok(Preparation::Unsupported {
			network: network_name.to_string(),
		});
	};

	let private_key = private_key
		.filter(|key| !key.is_empty())
		.ok_or_else(|| {
			InjectorError::MissingPrivateKey(config.injector.private_key_env.clone())
		})?;

	let network_config = config
		.network(&network)
		.ok_or(InjectorError::MissingNetworkConfig(network))?;
	if network_config.has_zero_address() {
		return Err(InjectorError::MissingContractAddress(network));
	}

	let signer: PrivateKeySigner = private_key.with_exposed(|key| {
		key.trim()
			.parse()
			.map_err(|_| InjectorError::InvalidPrivateKey("unrecognised key format".to_string()))
	})?;

	Ok(Preparation::Ready(InjectionContext {
		network,
		signer,
		rpc_url: network_config.rpc_url.clone(),
		lottery: network_config.lottery_address,
		injection: network_config.injection.clone(),
	}))
}

#[cfg(test)]
pub(crate) mod test_support {
	use injector_config::Config;
	use injector_types::SecretString;

	/// First well-known development key.
	pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
	pub const LOTTERY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

	pub fn config() -> Config {
		format!(
			r#"
[networks.testnet]
rpc_url = "http://localhost:8545"
lottery_address = "{}"
injection = "2"

[networks.mainnet]
rpc_url = "http://localhost:8546"
lottery_address = "0x0000000000000000000000000000000000000000"
injection = "1.5"
"#,
			LOTTERY
		)
		.parse()
		.unwrap()
	}

	pub fn key() -> Option<SecretString> {
		Some(SecretString::from(DEV_KEY))
	}
}
