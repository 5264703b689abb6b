//! Request-scoped session state and the payload persisted in the session store.

pub mod cookie;

pub use self::cookie::*;

// self
use crate::{
	_prelude::*,
	auth::{SessionId, TokenPair, TokenSecret},
};

/// Tokens persisted for one browser client.
///
/// Serialized as `{"jwt": .., "refreshToken": ..}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Current access token.
	#[serde(default, rename = "jwt", skip_serializing_if = "Option::is_none")]
	pub access_token: Option<TokenSecret>,
	/// Refresh token issued alongside the access token.
	#[serde(default, rename = "refreshToken", skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
}
impl Session {
	/// True when neither token is present.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}
}

/// Lifecycle of a [`RequestSession`] within one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
	/// Newly generated; nothing in the store yet.
	Fresh,
	/// Loaded from (or already written to) the store and unchanged since.
	Loaded,
	/// Mutated and waiting to be saved.
	Modified,
	/// Destroyed; no further mutations apply.
	Destroyed,
}

/// Result of committing a [`RequestSession`] back to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
	/// Nothing was written; the expiry window may have been extended.
	Unchanged,
	/// The payload was written and the cookie should be (re-)issued.
	Saved,
	/// The session was removed and the cookie should be cleared.
	Destroyed,
}

/// Session bound to the current request.
#[derive(Clone, Debug)]
pub struct RequestSession {
	id: SessionId,
	session: Session,
	state: SessionState,
}
impl RequestSession {
	/// Starts a new, empty session with a random identifier.
	pub fn fresh() -> Self {
		Self { id: SessionId::generate(), session: Session::default(), state: SessionState::Fresh }
	}

	/// Wraps a payload loaded from the store.
	pub fn loaded(id: SessionId, session: Session) -> Self {
		Self { id, session, state: SessionState::Loaded }
	}

	/// Session identifier carried by the cookie.
	pub fn id(&self) -> &SessionId {
		&self.id
	}

	/// Current payload.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SessionState {
		self.state
	}

	/// Current access token, if any.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.session.access_token.as_ref()
	}

	/// Current refresh token, if any.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.session.refresh_token.as_ref()
	}

	/// True once [`destroy`](Self::destroy) has been called.
	pub fn is_destroyed(&self) -> bool {
		self.state == SessionState::Destroyed
	}

	/// Stores both tokens of a freshly exchanged pair.
	///
	/// Returns false (and changes nothing) when the session was destroyed.
	pub fn set_tokens(&mut self, pair: &TokenPair) -> bool {
		if self.is_destroyed() {
			return false;
		}

		self.session.access_token = Some(pair.access_token.clone());
		self.session.refresh_token = Some(pair.refresh_token.clone());
		self.state = SessionState::Modified;

		true
	}

	/// Replaces the access token after a refresh.
	///
	/// Returns false (and changes nothing) when the session was destroyed.
	pub fn set_access_token(&mut self, token: TokenSecret) -> bool {
		if self.is_destroyed() {
			return false;
		}

		self.session.access_token = Some(token);
		self.state = SessionState::Modified;

		true
	}

	/// Drops both tokens and marks the session for removal.
	pub fn destroy(&mut self) {
		self.session = Session::default();
		self.state = SessionState::Destroyed;
	}

	pub(crate) fn mark_saved(&mut self) {
		if self.state == SessionState::Modified {
			self.state = SessionState::Loaded;
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::UserId;

	fn pair() -> TokenPair {
		TokenPair {
			access_token: TokenSecret::new("access"),
			refresh_token: TokenSecret::new("refresh"),
			user_id: UserId::new("user-1").expect("User fixture should be valid."),
		}
	}

	#[test]
	fn session_uses_wire_field_names() {
		let session = Session {
			access_token: Some(TokenSecret::new("a")),
			refresh_token: Some(TokenSecret::new("r")),
		};
		let json = serde_json::to_value(&session).expect("Session should serialize.");

		assert_eq!(json, serde_json::json!({ "jwt": "a", "refreshToken": "r" }));

		let empty: Session = serde_json::from_str("{}").expect("Empty session should parse.");

		assert!(empty.is_empty());
	}

	#[test]
	fn mutations_after_destroy_are_ignored() {
		let mut session = RequestSession::fresh();

		assert!(session.set_tokens(&pair()));
		assert_eq!(session.state(), SessionState::Modified);

		session.destroy();

		assert!(!session.set_access_token(TokenSecret::new("late")));
		assert!(!session.set_tokens(&pair()));
		assert!(session.access_token().is_none());
		assert!(session.refresh_token().is_none());
		assert_eq!(session.state(), SessionState::Destroyed);
	}

	#[test]
	fn mark_saved_only_settles_modified_sessions() {
		let mut session = RequestSession::fresh();

		session.mark_saved();

		assert_eq!(session.state(), SessionState::Fresh);

		session.set_access_token(TokenSecret::new("a"));
		session.mark_saved();

		assert_eq!(session.state(), SessionState::Loaded);
	}
}
