//! String formatting utilities for decimal amounts.

/// Trims redundant trailing zeros from a decimal string for display.
///
/// At least one fractional digit is always kept, so whole amounts render
/// as `"10.0"` rather than `"10"` or `"10.000000000"`.
///
/// # Arguments
///
/// * `amount` - A decimal string, with or without a fractional part
///
/// # Returns
///
/// A formatted string like `"1.5"` or `"1000.0"`.
pub fn trim_fraction(amount: &str) -> String {
	let Some((integer_part, fraction)) = amount.split_once('.') else {
		return format!("{}.0", amount);
	};

	let fraction = fraction.trim_end_matches('0');
	if fraction.is_empty() {
		format!("{}.0", integer_part)
	} else {
		format!("{}.{}", integer_part, fraction)
	}
}
