//! Per-request session middleware built on the identity provider client and a session store.
//!
//! [`SessionMiddleware::handle`] loads the session named by the request cookie, validates (and
//! if needed refreshes) its access token, writes the outcome back to the store, and hands the
//! decoded token to downstream resolvers through a
//! [`RequestContext`](crate::context::RequestContext).

mod login;
mod metrics;
mod refresh;

pub use metrics::SessionMetrics;

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	client::{AuthClient, TransportErrorMapper},
	http::ProviderHttpClient,
	obs,
	session::{RequestSession, SessionCookie, SessionOutcome, SessionState},
	store::SessionStore,
};
#[cfg(feature = "reqwest")]
use crate::{client::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Middleware specialized for the crate's default reqwest transport stack.
pub type ReqwestSessionMiddleware =
	SessionMiddleware<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Glues the identity provider client to the session store for every inbound request.
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct SessionMiddleware<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Identity provider client.
	pub client: Arc<AuthClient<C, M>>,
	/// Session store shared across requests.
	pub store: Arc<dyn SessionStore>,
	/// Cookie settings; `max_age` doubles as the store expiry window.
	pub cookie: SessionCookie,
	/// Shared counters for refresh outcomes and destroyed sessions.
	pub metrics: Arc<SessionMetrics>,
}
impl<C, M> SessionMiddleware<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates middleware with the default cookie settings.
	pub fn new(client: impl Into<Arc<AuthClient<C, M>>>, store: Arc<dyn SessionStore>) -> Self {
		Self {
			client: client.into(),
			store,
			cookie: SessionCookie::default(),
			metrics: Default::default(),
		}
	}

	/// Replaces the cookie settings.
	pub fn with_cookie(mut self, cookie: SessionCookie) -> Self {
		self.cookie = cookie;

		self
	}

	/// Loads the session named by `session_id`.
	///
	/// Absent, unknown, or expired identifiers start a fresh session that is only saved once
	/// something is written into it.
	pub async fn load(&self, session_id: Option<&SessionId>) -> Result<RequestSession> {
		let Some(id) = session_id else {
			return Ok(RequestSession::fresh());
		};

		Ok(match self.store.get(id).await? {
			Some(session) => RequestSession::loaded(id.clone(), session),
			None => RequestSession::fresh(),
		})
	}

	/// Writes the request's changes back to the store.
	///
	/// Modified sessions are saved, destroyed sessions are removed, and loaded sessions have
	/// their expiry window extended.
	pub async fn commit(&self, session: &mut RequestSession) -> Result<SessionOutcome> {
		let ttl = self.cookie.max_age;

		match session.state() {
			SessionState::Fresh => Ok(SessionOutcome::Unchanged),
			SessionState::Loaded => {
				self.store.touch(session.id(), ttl).await?;

				Ok(SessionOutcome::Unchanged)
			},
			SessionState::Modified => {
				self.store.set(session.id(), session.session().clone(), ttl).await?;
				session.mark_saved();

				Ok(SessionOutcome::Saved)
			},
			SessionState::Destroyed => {
				if self.store.destroy(session.id()).await? {
					self.metrics.record_session_destroyed();
				}

				Ok(SessionOutcome::Destroyed)
			},
		}
	}

	/// Commits a session that failed validation.
	///
	/// Store failures are logged and swallowed so the caller can surface the original error;
	/// the cookie is reported as destroyed either way.
	async fn commit_after_failure(&self, session: &mut RequestSession) -> SessionOutcome {
		match self.commit(session).await {
			Ok(outcome) => outcome,
			Err(e) => {
				obs::session_store_failure(&session.id().fingerprint(), &e);

				SessionOutcome::Destroyed
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl SessionMiddleware<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates middleware backed by a reqwest client for `config`.
	pub fn from_config(
		config: crate::provider::ProviderConfig,
		store: Arc<dyn SessionStore>,
	) -> Self {
		Self::new(AuthClient::new(config), store)
	}
}
impl<C, M> Debug for SessionMiddleware<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionMiddleware")
			.field("client", &self.client)
			.field("cookie", &self.cookie)
			.field("metrics", &self.metrics)
			.finish()
	}
}
