// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for session refreshes and destroyed sessions.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	refresh_attempts: AtomicU64,
	refresh_successes: AtomicU64,
	refresh_failures: AtomicU64,
	sessions_destroyed: AtomicU64,
}
impl SessionMetrics {
	/// Returns the total number of refresh-token grants attempted.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that produced a new access token.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that failed or yielded no token.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of sessions removed from the store.
	pub fn sessions_destroyed(&self) -> u64 {
		self.sessions_destroyed.load(Ordering::Relaxed)
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_session_destroyed(&self) {
		self.sessions_destroyed.fetch_add(1, Ordering::Relaxed);
	}
}
