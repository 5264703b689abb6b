//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	session::Session,
	store::{SessionStore, StoreError, StoreFuture, StoredSession},
};

type StoreMap = Arc<RwLock<HashMap<SessionId, StoredSession>>>;

/// Storage backend that keeps sessions in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(StoreMap);
impl MemorySessionStore {
	/// Number of entries currently held. Expired entries linger until the next read of that id,
	/// the next write, or [`purge_expired`](Self::purge_expired).
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// True when no entries are held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Drops every entry that expired before `now`; returns how many were removed.
	pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, stored| !stored.is_expired_at(now));

		before - guard.len()
	}

	fn get_now(map: &StoreMap, id: &SessionId, now: OffsetDateTime) -> Option<Session> {
		let mut guard = map.write();

		match guard.get(id) {
			Some(stored) if stored.is_expired_at(now) => {
				guard.remove(id);

				None
			},
			Some(stored) => Some(stored.session.clone()),
			None => None,
		}
	}

	fn set_now(
		map: &StoreMap,
		id: &SessionId,
		session: Session,
		ttl: Duration,
		now: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut guard = map.write();

		guard.retain(|_, stored| !stored.is_expired_at(now));
		guard.insert(id.clone(), StoredSession::new(session, ttl, now));

		Ok(())
	}

	fn touch_now(map: &StoreMap, id: &SessionId, ttl: Duration, now: OffsetDateTime) -> bool {
		let mut guard = map.write();

		match guard.get_mut(id) {
			Some(stored) if !stored.is_expired_at(now) => {
				stored.expires_at = now + ttl;

				true
			},
			_ => false,
		}
	}
}
impl SessionStore for MemorySessionStore {
	fn get<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<Session>> {
		Box::pin(async move { Ok(Self::get_now(&self.0, id, OffsetDateTime::now_utc())) })
	}

	fn set<'a>(
		&'a self,
		id: &'a SessionId,
		session: Session,
		ttl: Duration,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move { Self::set_now(&self.0, id, session, ttl, OffsetDateTime::now_utc()) })
	}

	fn touch<'a>(&'a self, id: &'a SessionId, ttl: Duration) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(Self::touch_now(&self.0, id, ttl, OffsetDateTime::now_utc())) })
	}

	fn destroy<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(self.0.write().remove(id).is_some()) })
	}
}
