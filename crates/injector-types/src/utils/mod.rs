//! Utility functions for base-unit conversions and amount formatting.

pub mod formatting;
pub mod units;

pub use formatting::trim_fraction;
pub use units::{double_gas_price, format_gwei, parse_ether, UnitsError, ETHER_DECIMALS};
