//! Alloy-based EVM implementation of [`LotteryChain`].
//!
//! Reads go straight to the node over HTTP. The write is encoded from the
//! lottery ABI, signed by the local wallet and broadcast; the recommended
//! fillers take care of nonce, chain id and gas limit.

use crate::{DeliveryError, InjectFundsRequest, LotteryChain};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use std::sync::Arc;

sol! {
	/// Subset of the lottery contract used by the injector.
	interface ILottery {
		function currentLotteryId() external view returns (uint256);
		function injectFunds(uint256 _lotteryId, uint256 _amount) external;
	}
}

/// Alloy-based lottery chain client.
///
/// Holds a single HTTP provider whose wallet signs with the injector key.
pub struct AlloyLotteryChain {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyLotteryChain {
	/// Creates a client for `rpc_url` signing with `signer`.
	pub fn new(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let wallet = EthereumWallet::from(signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		Ok(Self {
			provider: Arc::new(provider),
		})
	}
}

#[async_trait]
impl LotteryChain for AlloyLotteryChain {
	async fn gas_price(&self) -> Result<U256, DeliveryError> {
		let gas_price = self
			.provider
			.get_gas_price()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get gas price: {}", e)))?;

		Ok(U256::from(gas_price))
	}

	async fn block_number(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_block_number()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get block number: {}", e)))
	}

	async fn current_lottery_id(&self, lottery: Address) -> Result<U256, DeliveryError> {
		let call_data = ILottery::currentLotteryIdCall {}.abi_encode();

		let call_result = self
			.provider
			.call(
				&TransactionRequest::default()
					.with_to(lottery)
					.with_input(call_data),
			)
			.await
			.map_err(|e| {
				DeliveryError::Contract(format!("Failed to call currentLotteryId: {}", e))
			})?;

		let decoded = ILottery::currentLotteryIdCall::abi_decode_returns(&call_result, true)
			.map_err(|e| {
				DeliveryError::Decode(format!("Invalid currentLotteryId response: {}", e))
			})?;

		Ok(decoded._0)
	}

	async fn inject_funds(&self, request: InjectFundsRequest) -> Result<B256, DeliveryError> {
		let call_data = ILottery::injectFundsCall {
			_lotteryId: request.lottery_id,
			_amount: request.amount,
		}
		.abi_encode();

		let tx = TransactionRequest::default()
			.with_from(request.from)
			.with_to(request.lottery)
			.with_input(call_data)
			.with_gas_price(request.gas_price);

		// Send transaction - the provider's wallet will handle signing
		let pending_tx = self
			.provider
			.send_transaction(tx)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %tx_hash,
			lottery = %request.lottery,
			lottery_id = %request.lottery_id,
			"Submitted injectFunds"
		);

		Ok(tx_hash)
	}
}
