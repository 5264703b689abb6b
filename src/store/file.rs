//! Simple file-backed [`SessionStore`] for single-node deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::SessionId,
	session::Session,
	store::{SessionStore, StoreError, StoreFuture, StoredSession},
};

type Snapshot = HashMap<SessionId, StoredSession>;

/// Persists sessions to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileSessionStore {
	/// Opens (or creates) a store at the provided path, eagerly loading live entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let mut snapshot = Self::load_snapshot(&path)?;
		let now = OffsetDateTime::now_utc();

		snapshot.retain(|_, stored| !stored.is_expired_at(now));

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let entries: Vec<(SessionId, StoredSession)> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		let snapshot: Vec<_> = contents.iter().collect();
		let serialized = serde_json::to_vec(&snapshot).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize session snapshot: {e}"),
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SessionStore for FileSessionStore {
	fn get<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<Session>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let mut guard = self.inner.write();
			let expired = match guard.get(id) {
				Some(stored) if !stored.is_expired_at(now) =>
					return Ok(Some(stored.session.clone())),
				Some(_) => true,
				None => false,
			};

			if expired {
				guard.remove(id);
				self.persist_locked(&guard)?;
			}

			Ok(None)
		})
	}

	fn set<'a>(
		&'a self,
		id: &'a SessionId,
		session: Session,
		ttl: Duration,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let stored = StoredSession::new(session, ttl, OffsetDateTime::now_utc());
			let mut guard = self.inner.write();

			guard.insert(id.clone(), stored);
			self.persist_locked(&guard)
		})
	}

	fn touch<'a>(&'a self, id: &'a SessionId, ttl: Duration) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let mut guard = self.inner.write();
			let touched = match guard.get_mut(id) {
				Some(stored) if !stored.is_expired_at(now) => {
					stored.expires_at = now + ttl;

					true
				},
				_ => false,
			};

			if touched {
				self.persist_locked(&guard)?;
			}

			Ok(touched)
		})
	}

	fn destroy<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let removed = guard.remove(id).is_some();

			if removed {
				self.persist_locked(&guard)?;
			}

			Ok(removed)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::TokenSecret;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"hawthorn_auth_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn session() -> Session {
		Session {
			access_token: Some(TokenSecret::new("access-token")),
			refresh_token: Some(TokenSecret::new("refresh-token")),
		}
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileSessionStore::open(&path).expect("Failed to open file store snapshot.");
		let id = SessionId::generate();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.set(&id, session(), Duration::days(30)))
			.expect("Failed to save fixture session to file store.");
		drop(store);

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.get(&id))
			.expect("Failed to fetch fixture session from file store.")
			.expect("File store lost session after reopen.");

		assert_eq!(fetched, session());
		assert!(rt.block_on(reopened.destroy(&id)).expect("Destroy should succeed."));

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert!(rt.block_on(reopened.get(&id)).expect("Fetch should succeed.").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn expired_entries_are_dropped_on_open() {
		let path = temp_path();
		let store = FileSessionStore::open(&path).expect("Failed to open file store snapshot.");
		let id = SessionId::generate();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.set(&id, session(), Duration::ZERO))
			.expect("Failed to save fixture session to file store.");
		drop(store);

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert!(rt.block_on(reopened.get(&id)).expect("Fetch should succeed.").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
