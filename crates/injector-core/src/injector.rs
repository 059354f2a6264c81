//! The injection pipeline.
//!
//! Reads the chain state the call depends on, prices the transaction and
//! submits a single `injectFunds`. Every failure along the way is returned as
//! an [`InjectionError`] so the caller can turn it into a failure report; there
//! is no retry.

use crate::InjectionContext;
use alloy_primitives::{B256, U256};
use chrono::Utc;
use injector_delivery::{DeliveryError, LotteryChain, LotteryContract};
use injector_types::{double_gas_price, format_gwei, parse_ether, InjectionReport, UnitsError};
use thiserror::Error;
use tracing::instrument;

/// Errors recovered into a failure report.
///
/// The display form is the bare underlying message.
#[derive(Debug, Error)]
pub enum InjectionError {
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
	#[error(transparent)]
	Units(#[from] UnitsError),
	#[error("Gas price {0} wei does not fit a legacy transaction")]
	GasPrice(U256),
}

/// A transaction the node accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
	pub block_number: u64,
	pub lottery_id: U256,
	pub tx_hash: B256,
	/// Gas price actually submitted, in wei.
	pub gas_price: U256,
}

/// Injects funds into the current lottery round through a [`LotteryChain`].
pub struct FundInjector {
	chain: Box<dyn LotteryChain>,
}

impl FundInjector {
	pub fn new(chain: Box<dyn LotteryChain>) -> Self {
		Self { chain }
	}

	/// Runs the pipeline and returns the accepted transaction.
	///
	/// Gas price, block number and the current lottery id are fetched
	/// concurrently and joined; the first failure aborts the run.
	#[instrument(skip_all, fields(network = %context.network, lottery = %context.lottery))]
	pub async fn inject(&self, context: &InjectionContext) -> Result<Injection, InjectionError> {
		let contract = LotteryContract::bind(self.chain.as_ref(), context.lottery);

		let (gas_quote, block_number, lottery_id) = tokio::try_join!(
			self.chain.gas_price(),
			self.chain.block_number(),
			contract.current_lottery_id(),
		)?;
		tracing::debug!(%gas_quote, block_number, %lottery_id, "Fetched chain state");

		let gas_price = double_gas_price(gas_quote)?;
		let legacy_gas_price =
			u128::try_from(gas_price).map_err(|_| InjectionError::GasPrice(gas_price))?;

		let amount = parse_ether(&context.injection)?;

		let tx_hash = contract
			.inject_funds(
				lottery_id,
				amount,
				legacy_gas_price,
				context.signer_address(),
			)
			.await?;

		Ok(Injection {
			block_number,
			lottery_id,
			tx_hash,
			gas_price,
		})
	}

	/// Runs the pipeline and converts the result into the run's report.
	pub async fn run(&self, context: &InjectionContext) -> InjectionReport {
		let outcome = self.inject(context).await.and_then(|injection| {
			let gas_price = format_gwei(injection.gas_price)?;
			Ok((injection, gas_price))
		});

		match outcome {
			Ok((injection, gas_price)) => InjectionReport::Injected {
				timestamp: Utc::now(),
				network: context.network.to_string(),
				block_number: injection.block_number,
				lottery_id: injection.lottery_id,
				tx_hash: injection.tx_hash,
				gas_price,
				signer: context.signer_address(),
			},
			Err(e) => failure_report(context, &e),
		}
	}
}

/// Builds the failure report for `context`.
pub(crate) fn failure_report(
	context: &InjectionContext,
	error: &dyn std::error::Error,
) -> InjectionReport {
	InjectionReport::Failed {
		timestamp: Utc::now(),
		network: context.network.to_string(),
		message: error.to_string(),
		signer: context.signer_address(),
	}
}


#[cfg(test)]
mod tests {
	use super::mock::{Calls, MockChain};
	use super::*;
	use crate::test_support::{config, key, DEV_ADDRESS, LOTTERY};
	use crate::{prepare, Preparation};
	use alloy_primitives::Address;
	use std::sync::Arc;
	use std::time::Duration;
	use tokio::sync::Barrier;

	fn context() -> InjectionContext {
		match prepare("testnet", &config(), key()).unwrap() {
			Preparation::Ready(context) => context,
			other => panic!("expected ready context, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_submits_doubled_gas_price_and_converted_amount() {
		let calls = Arc::new(Calls::default());
		let injector = FundInjector::new(Box::new(MockChain::new(calls.clone())));

		let injection = injector.inject(&context()).await.unwrap();
		assert_eq!(injection.block_number, 38_000_000);
		assert_eq!(injection.lottery_id, U256::from(42u8));
		assert_eq!(injection.gas_price, U256::from(10_000_000_000u64));

		let injections = calls.injections.lock().unwrap();
		assert_eq!(injections.len(), 1);
		let request = &injections[0];
		assert_eq!(request.lottery, LOTTERY.parse::<Address>().unwrap());
		assert_eq!(request.lottery_id, U256::from(42u8));
		assert_eq!(request.amount.to_string(), "2000000000000000000");
		assert_eq!(request.gas_price, 10_000_000_000u128);
		assert_eq!(request.from, DEV_ADDRESS.parse::<Address>().unwrap());
	}

	#[tokio::test]
	async fn test_reads_are_issued_concurrently() {
		let calls = Arc::new(Calls::default());
		let mut chain = MockChain::new(calls.clone());
		// Released only once all three reads are waiting at the same time
		chain.barrier = Some(Arc::new(Barrier::new(3)));
		let injector = FundInjector::new(Box::new(chain));

		let result = tokio::time::timeout(Duration::from_secs(5), injector.inject(&context()))
			.await
			.expect("reads were not issued concurrently");
		assert!(result.is_ok());
		assert_eq!(calls.total(), 4);
	}

	#[tokio::test]
	async fn test_success_report() {
		let calls = Arc::new(Calls::default());
		let injector = FundInjector::new(Box::new(MockChain::new(calls)));

		let report = injector.run(&context()).await;
		match &report {
			InjectionReport::Injected {
				network,
				block_number,
				gas_price,
				signer,
				tx_hash,
				..
			} => {
				assert_eq!(network, "testnet");
				assert_eq!(*block_number, 38_000_000);
				assert_eq!(gas_price, "10.0");
				assert_eq!(*signer, DEV_ADDRESS.parse::<Address>().unwrap());
				assert_eq!(*tx_hash, B256::repeat_byte(0x11));
			},
			other => panic!("expected injected report, got {:?}", other),
		}
		assert_eq!(report.message(), "Injected lottery #42");
	}

	#[tokio::test]
	async fn test_revert_becomes_failure_report() {
		let calls = Arc::new(Calls::default());
		let mut chain = MockChain::new(calls);
		chain.revert = Some("execution reverted: Lottery not open".to_string());
		let injector = FundInjector::new(Box::new(chain));

		let report = injector.run(&context()).await;
		match report {
			InjectionReport::Failed {
				network,
				message,
				signer,
				..
			} => {
				assert_eq!(network, "testnet");
				assert!(message.contains("execution reverted: Lottery not open"));
				assert_eq!(signer, DEV_ADDRESS.parse::<Address>().unwrap());
			},
			other => panic!("expected failed report, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_gas_price_beyond_legacy_range_fails_before_submission() {
		let calls = Arc::new(Calls::default());
		let mut chain = MockChain::new(calls.clone());
		chain.gas_price = U256::from(u128::MAX);
		let injector = FundInjector::new(Box::new(chain));

		let err = injector.inject(&context()).await.unwrap_err();
		assert!(matches!(err, InjectionError::GasPrice(_)));
		assert!(calls.injections.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_invalid_amount_fails_before_submission() {
		let calls = Arc::new(Calls::default());
		let injector = FundInjector::new(Box::new(MockChain::new(calls.clone())));
		let mut context = context();
		context.injection = "-3".to_string();

		let report = injector.run(&context).await;
		assert!(matches!(report, InjectionReport::Failed { .. }));
		assert!(report.message().contains("Negative amount"));
		assert!(calls.injections.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_over_precise_amount_fails_before_submission() {
		let calls = Arc::new(Calls::default());
		let injector = FundInjector::new(Box::new(MockChain::new(calls.clone())));
		let mut context = context();
		context.injection = "1.0000000000000000009".to_string();

		let err = injector.inject(&context).await.unwrap_err();
		assert!(matches!(
			err,
			InjectionError::Units(UnitsError::InvalidAmount { .. })
		));
		assert!(calls.injections.lock().unwrap().is_empty());
	}
}
