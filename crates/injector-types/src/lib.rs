//! Common types module for the lottery injector.
//!
//! This module defines the data types shared by every injector crate: the
//! supported network allow-list, per-network configuration records, secret
//! handling for the signing key, base-unit conversions and the outcome
//! record produced once per run.

/// Supported networks and their configuration records.
pub mod networks;
/// Outcome records produced by an injection run.
pub mod report;
/// Secure wrapper for the signer's private key.
pub mod secret_string;
/// Unit conversion and formatting helpers.
pub mod utils;

pub use alloy_primitives::{Address, U256};
pub use networks::{Network, NetworkConfig, NetworkError, NetworksConfig, SUPPORTED_NETWORKS};
pub use report::{InjectionReport, ReportLevel};
pub use secret_string::SecretString;
pub use utils::{double_gas_price, format_gwei, parse_ether, UnitsError, ETHER_DECIMALS};
