//! Base-unit conversions for native currency amounts and gas prices.
//!
//! Amounts travel through the injector as `U256` in the network's smallest
//! unit. Human-readable strings only exist at the edges: the configured
//! injection amount on the way in, and the gas price in the report on the
//! way out.

use super::formatting::trim_fraction;
use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;
use thiserror::Error;

/// Number of decimals of the native currency ("ether" units).
pub const ETHER_DECIMALS: u8 = 18;

/// Number of decimals between wei and gwei.
const GWEI_DECIMALS: u8 = 9;

/// Errors raised while converting between decimal strings and base units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
	/// The input is not a valid decimal amount for the requested precision.
	#[error("Invalid amount '{amount}': {message}")]
	InvalidAmount { amount: String, message: String },
	/// The input parsed but is below zero.
	#[error("Negative amount '{0}' is not allowed")]
	Negative(String),
	/// Arithmetic on a base-unit value left the 256-bit range.
	#[error("Gas price overflow while doubling {0}")]
	Overflow(U256),
	/// The base-unit value could not be rendered.
	#[error("Failed to format {value}: {message}")]
	Format { value: U256, message: String },
}

/// Converts a decimal amount such as `"1.5"` into 18-decimal base units.
///
/// Exact decimal inputs convert without precision loss:
/// `"2"` becomes `2000000000000000000`.
///
/// Only plain decimals are accepted: digits, optionally followed by a point
/// and at most 18 fractional digits. Empty strings, digit separators and
/// amounts finer than one base unit are rejected rather than rounded.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
	let trimmed = amount.trim();
	check_decimal(trimmed.strip_prefix('-').unwrap_or(trimmed), ETHER_DECIMALS).map_err(
		|message| UnitsError::InvalidAmount {
			amount: amount.to_string(),
			message: message.to_string(),
		},
	)?;

	let parsed =
		parse_units(trimmed, ETHER_DECIMALS).map_err(|e| UnitsError::InvalidAmount {
			amount: amount.to_string(),
			message: e.to_string(),
		})?;

	match parsed {
		ParseUnits::U256(value) => Ok(value),
		ParseUnits::I256(value) if value.is_zero() => Ok(U256::ZERO),
		ParseUnits::I256(_) => Err(UnitsError::Negative(amount.to_string())),
	}
}

/// Checks that `digits` has the shape `\d+(\.\d{1,decimals})?`.
fn check_decimal(digits: &str, decimals: u8) -> Result<(), &'static str> {
	let (whole, fraction) = match digits.split_once('.') {
		Some((whole, fraction)) => (whole, Some(fraction)),
		None => (digits, None),
	};

	if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
		return Err("expected a decimal number");
	}
	if let Some(fraction) = fraction {
		if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
			return Err("expected digits after the decimal point");
		}
		if fraction.len() > decimals as usize {
			return Err("too many decimal places");
		}
	}
	Ok(())
}

/// Renders a wei value in gwei, e.g. `10000000000` as `"10.0"`.
pub fn format_gwei(wei: U256) -> Result<String, UnitsError> {
	let formatted = format_units(wei, GWEI_DECIMALS).map_err(|e| UnitsError::Format {
		value: wei,
		message: e.to_string(),
	})?;
	Ok(trim_fraction(&formatted))
}

/// Returns exactly twice the network-recommended gas price.
///
/// The multiplier is fixed; there is no cap and no fee-market awareness.
pub fn double_gas_price(quote: U256) -> Result<U256, UnitsError> {
	quote
		.checked_mul(U256::from(2u8))
		.ok_or(UnitsError::Overflow(quote))
}
