// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token manager decisions and network calls.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	acquisitions: AtomicU64,
	refreshes: AtomicU64,
	reuses: AtomicU64,
	failures: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of token acquisition calls sent.
	pub fn acquisitions(&self) -> u64 {
		self.acquisitions.load(Ordering::Relaxed)
	}

	/// Returns the number of token refresh calls sent.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of headers signed with the cached token without a network call.
	pub fn reuses(&self) -> u64 {
		self.reuses.load(Ordering::Relaxed)
	}

	/// Returns the number of failed acquisition or refresh calls.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns the number of network round-trips made to the token endpoint.
	pub fn network_calls(&self) -> u64 {
		self.acquisitions() + self.refreshes()
	}

	pub(crate) fn record_acquisition(&self) {
		self.acquisitions.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reuse(&self) {
		self.reuses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
