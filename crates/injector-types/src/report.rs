//! Outcome records produced by an injection run.
//!
//! Every run ends in exactly one [`InjectionReport`]. The same record feeds
//! both output channels: its `Display` form is the operator-facing console
//! line, and its serialized form is the audit log entry.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// Severity attached to a report when it is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
	Info,
	Error,
}

/// The single outcome of one injection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InjectionReport {
	/// Funds were submitted and the node acknowledged the transaction.
	Injected {
		timestamp: DateTime<Utc>,
		network: String,
		block_number: u64,
		lottery_id: U256,
		tx_hash: B256,
		/// Submitted gas price, rendered in gwei.
		gas_price: String,
		signer: Address,
	},
	/// Something between binding the contract and submission failed.
	Failed {
		timestamp: DateTime<Utc>,
		network: String,
		message: String,
		signer: Address,
	},
	/// The ambient network is not on the allow-list; nothing was sent.
	UnsupportedNetwork {
		timestamp: DateTime<Utc>,
		network: String,
	},
}

impl InjectionReport {
	/// Builds the report for a network outside the allow-list.
	pub fn unsupported(network: impl Into<String>) -> Self {
		Self::UnsupportedNetwork {
			timestamp: Utc::now(),
			network: network.into(),
		}
	}

	/// Severity of the report.
	pub fn level(&self) -> ReportLevel {
		match self {
			Self::Injected { .. } => ReportLevel::Info,
			Self::Failed { .. } | Self::UnsupportedNetwork { .. } => ReportLevel::Error,
		}
	}

	/// Network name the report refers to.
	pub fn network(&self) -> &str {
		match self {
			Self::Injected { network, .. }
			| Self::Failed { network, .. }
			| Self::UnsupportedNetwork { network, .. } => network,
		}
	}

	/// Human-readable message carried by the report.
	pub fn message(&self) -> String {
		match self {
			Self::Injected { lottery_id, .. } => format!("Injected lottery #{}", lottery_id),
			Self::Failed { message, .. } => message.clone(),
			Self::UnsupportedNetwork { .. } => "Unsupported network".to_string(),
		}
	}

	fn timestamp(&self) -> &DateTime<Utc> {
		match self {
			Self::Injected { timestamp, .. }
			| Self::Failed { timestamp, .. }
			| Self::UnsupportedNetwork { timestamp, .. } => timestamp,
		}
	}
}

impl fmt::Display for InjectionReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{}] network={}",
			self.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
			self.network()
		)?;

		match self {
			Self::Injected {
				block_number,
				tx_hash,
				gas_price,
				signer,
				..
			} => write!(
				f,
				" block={} message='{}' hash={} gasPrice={} signer={}",
				block_number,
				self.message(),
				tx_hash,
				gas_price,
				signer
			),
			Self::Failed { signer, .. } => {
				write!(f, " message='{}' signer={}", self.message(), signer)
			},
			Self::UnsupportedNetwork { .. } => write!(f, " message='{}'", self.message()),
		}
	}
}
