//! Chain access module for the lottery injector.
//!
//! This module defines the seam between the injection pipeline and the
//! blockchain: the provider-level reads (gas price, block number), the
//! lottery contract's read (`currentLotteryId`) and its write (`injectFunds`).
//! Signing and nonce management are left to the implementation's wallet.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur while reading from or submitting to the chain.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication or submission.
	#[error("Network error: {0}")]
	Network(String),
	/// Error returned by the contract, such as a revert.
	#[error("Contract error: {0}")]
	Contract(String),
	/// Error that occurs when a contract response cannot be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
}

/// Parameters of a single `injectFunds` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectFundsRequest {
	/// Lottery contract receiving the call.
	pub lottery: Address,
	/// Round to inject into, as returned by `currentLotteryId`.
	pub lottery_id: U256,
	/// Amount in base units.
	pub amount: U256,
	/// Legacy gas price in wei.
	pub gas_price: u128,
	/// Sending account; must match the wallet's signer.
	pub from: Address,
}

/// Trait defining the chain operations the injector relies on.
///
/// Implementations must be safe to call concurrently: the three reads are
/// issued together and joined.
#[async_trait]
pub trait LotteryChain: Send + Sync {
	/// Gets the network-recommended gas price in wei.
	async fn gas_price(&self) -> Result<U256, DeliveryError>;

	/// Gets the latest block number.
	async fn block_number(&self) -> Result<u64, DeliveryError>;

	/// Calls `currentLotteryId()` on the lottery contract.
	async fn current_lottery_id(&self, lottery: Address) -> Result<U256, DeliveryError>;

	/// Signs and broadcasts `injectFunds(lotteryId, amount)`.
	///
	/// Returns once the node has accepted the transaction and produced its
	/// hash. Inclusion is not awaited.
	async fn inject_funds(&self, request: InjectFundsRequest) -> Result<B256, DeliveryError>;
}

/// A lottery contract bound to its deployed address.
///
/// Keeps the address next to the chain handle so callers never pass it
/// around separately.
pub struct LotteryContract<'a> {
	chain: &'a dyn LotteryChain,
	address: Address,
}

impl<'a> LotteryContract<'a> {
	/// Binds the contract interface to `address` on `chain`.
	pub fn bind(chain: &'a dyn LotteryChain, address: Address) -> Self {
		Self { chain, address }
	}

	/// Fetches the identifier of the round currently open.
	pub async fn current_lottery_id(&self) -> Result<U256, DeliveryError> {
		self.chain.current_lottery_id(self.address).await
	}

	/// Submits `injectFunds` for `lottery_id` with the given overrides.
	pub async fn inject_funds(
		&self,
		lottery_id: U256,
		amount: U256,
		gas_price: u128,
		from: Address,
	) -> Result<B256, DeliveryError> {
		self.chain
			.inject_funds(InjectFundsRequest {
				lottery: self.address,
				lottery_id,
				amount,
				gas_price,
				from,
			})
			.await
	}
}
