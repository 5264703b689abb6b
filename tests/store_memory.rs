#![cfg(feature = "reqwest")]

// crates.io
use time::macros;
// self
use hawthorn_auth::{
	_preludet::*,
	auth::{SessionId, TokenSecret},
	session::Session,
	store::{MemorySessionStore, SessionStore},
};

fn session(access: &str) -> Session {
	Session {
		access_token: Some(TokenSecret::new(access)),
		refresh_token: Some(TokenSecret::new("refresh")),
	}
}

#[tokio::test]
async fn set_get_and_destroy_round_trip() {
	let store = MemorySessionStore::default();
	let id = SessionId::generate();

	store.set(&id, session("access-1"), Duration::days(30)).await.expect("Set should succeed.");

	assert_eq!(
		store.get(&id).await.expect("Get should succeed."),
		Some(session("access-1"))
	);

	store.set(&id, session("access-2"), Duration::days(30)).await.expect("Set should succeed.");

	assert_eq!(
		store.get(&id).await.expect("Get should succeed."),
		Some(session("access-2"))
	);
	assert!(store.destroy(&id).await.expect("Destroy should succeed."));
	assert!(!store.destroy(&id).await.expect("Second destroy should succeed."));
	assert!(store.get(&id).await.expect("Get should succeed.").is_none());
}

#[tokio::test]
async fn expired_entries_are_absent_and_evicted() {
	let store = MemorySessionStore::default();
	let id = SessionId::generate();

	store.set(&id, session("access-1"), Duration::ZERO).await.expect("Set should succeed.");

	assert_eq!(store.len(), 1);
	assert!(store.get(&id).await.expect("Get should succeed.").is_none());
	assert!(store.is_empty());
	assert!(!store.touch(&id, Duration::days(30)).await.expect("Touch should succeed."));
}

#[tokio::test]
async fn writes_sweep_expired_entries() {
	let store = MemorySessionStore::default();
	let live = SessionId::generate();

	store.set(&live, session("live"), Duration::days(30)).await.expect("Set should succeed.");

	for _ in 0..100 {
		store
			.set(&SessionId::generate(), session("stale"), Duration::ZERO)
			.await
			.expect("Set should succeed.");
	}

	assert_eq!(store.len(), 2);
	assert_eq!(
		store.get(&live).await.expect("Get should succeed."),
		Some(session("live"))
	);
}

#[tokio::test]
async fn touch_extends_live_entries_only() {
	let store = MemorySessionStore::default();
	let live = SessionId::generate();
	let missing = SessionId::generate();

	store.set(&live, session("access-1"), Duration::minutes(5)).await.expect("Set should succeed.");

	assert!(store.touch(&live, Duration::days(30)).await.expect("Touch should succeed."));
	assert!(!store.touch(&missing, Duration::days(30)).await.expect("Touch should succeed."));

	let far_future = macros::datetime!(2999-01-01 00:00 UTC);

	assert_eq!(store.purge_expired(OffsetDateTime::now_utc()), 0);
	assert_eq!(store.purge_expired(far_future), 1);
	assert!(store.is_empty());
}
