//! Session store contract and built-in store implementations.
//!
//! The store is the only state shared across requests. Entries are keyed by [`SessionId`] and
//! expire `ttl` after their last [`set`](SessionStore::set) or [`touch`](SessionStore::touch).

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

// self
use crate::{_prelude::*, auth::SessionId, session::Session};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value backend holding one [`Session`] per session identifier.
///
/// Implementations are expected to serialize access per key or tolerate last-write-wins; the
/// middleware never locks.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Loads a live session, if present.
	fn get<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<Session>>;

	/// Persists or replaces the session and restarts its expiry window.
	fn set<'a>(&'a self, id: &'a SessionId, session: Session, ttl: Duration)
	-> StoreFuture<'a, ()>;

	/// Restarts the expiry window of a live session; returns false when none exists.
	fn touch<'a>(&'a self, id: &'a SessionId, ttl: Duration) -> StoreFuture<'a, bool>;

	/// Removes the session; returns false when none existed.
	fn destroy<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool>;
}

/// Stored payload plus its expiry instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
	/// Session payload.
	pub session: Session,
	/// Instant after which the entry is treated as absent.
	pub expires_at: OffsetDateTime,
}
impl StoredSession {
	/// Wraps `session` with an expiry `ttl` after `now`.
	pub fn new(session: Session, ttl: Duration, now: OffsetDateTime) -> Self {
		Self { session, expires_at: now + ttl }
	}

	/// True once `now` reaches the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
