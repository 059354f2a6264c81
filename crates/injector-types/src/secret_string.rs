//! Secure string type for the signer's private key.
//!
//! The injector reads its signing key from the environment and hands it to
//! the wallet exactly once. `SecretString` keeps the key out of logs, debug
//! output and audit records, and zeroes the memory when dropped.

use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

const REDACTED: &str = "***REDACTED***";

/// A string that zeroes its memory on drop and never prints its contents.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps an owned string.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Reads the secret from an environment variable.
	///
	/// Returns `None` when the variable is unset, not valid unicode, or
	/// blank, so callers treat all three as a missing credential.
	pub fn from_env(var: &str) -> Option<Self> {
		std::env::var(var)
			.ok()
			.filter(|value| !value.trim().is_empty())
			.map(Self::new)
	}

	/// Exposes the secret to a closure, limiting the scope where it is visible.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// Returns true if the secret is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString({})", REDACTED)
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}

impl Eq for SecretString {}

// Always redacted, the key is never written to the audit log.
impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}
