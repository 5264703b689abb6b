//! Per-request token validation with a single transparent refresh.
//!
//! The access token held by the session is introspected; an inactive token with a refresh token
//! on hand is exchanged once for a new access token, which is then introspected again. Any
//! provider error along the way destroys the session before the error is surfaced, so no request
//! proceeds with a half-refreshed session.

// self
use crate::{
	_prelude::*,
	auth::{IntrospectionResult, SESSION_EXPIRED_MESSAGE, SessionId, TokenSecret},
	client::TransportErrorMapper,
	context::{RequestContext, RequestFailure},
	http::ProviderHttpClient,
	middleware::SessionMiddleware,
	obs::{self, CallKind},
	session::RequestSession,
};

impl<C, M> SessionMiddleware<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs the middleware for one request.
	///
	/// Requests without an access token continue with no decoded token; enforcement happens
	/// later through [`RequestContext::require_role`]. When validation fails the session has
	/// already been removed from the store, and the returned [`RequestFailure`] reports
	/// [`SessionOutcome::Destroyed`](crate::session::SessionOutcome::Destroyed) so the response
	/// can clear the cookie.
	pub async fn handle(
		&self,
		session_id: Option<&SessionId>,
	) -> Result<RequestContext, RequestFailure> {
		let mut session = self.load(session_id).await.map_err(RequestFailure::unchanged)?;

		match self.refresh_session(&mut session).await {
			Ok(decoded) => {
				let outcome = self.commit(&mut session).await.map_err(RequestFailure::unchanged)?;

				Ok(RequestContext::new(session, decoded, outcome))
			},
			Err(error) => {
				let outcome = self.commit_after_failure(&mut session).await;

				Err(RequestFailure { error, outcome })
			},
		}
	}

	/// Validates the session's access token, refreshing it at most once.
	///
	/// Returns the decoded token to attach to the request, or `None` when the session holds no
	/// access token. On error `session` is destroyed in memory; persisting that is left to
	/// [`commit`](Self::commit).
	pub async fn refresh_session(
		&self,
		session: &mut RequestSession,
	) -> Result<Option<IntrospectionResult>> {
		let result =
			obs::observe(CallKind::SessionRefresh, "refresh_session", self.run_refresh(session))
				.await;

		if let Err(e) = &result {
			let fingerprint = session.id().fingerprint();

			session.destroy();
			obs::session_destroyed(&fingerprint, &e.to_string());
		}

		result
	}

	async fn run_refresh(
		&self,
		session: &mut RequestSession,
	) -> Result<Option<IntrospectionResult>> {
		let Some(access_token) = session.access_token().cloned() else {
			return Ok(None);
		};
		let decoded = self.introspect_checked(&access_token).await?;

		if decoded.active {
			return Ok(Some(decoded));
		}

		let Some(refresh_token) = session.refresh_token().cloned() else {
			return Ok(Some(decoded));
		};

		self.metrics.record_refresh_attempt();

		let refreshed = match self.client.refresh_token(&refresh_token).await {
			Ok(Some(token)) => token,
			Ok(None) | Err(Error::SessionExpired) => {
				self.metrics.record_refresh_failure();

				return Err(Error::authentication(SESSION_EXPIRED_MESSAGE));
			},
			Err(e) => {
				self.metrics.record_refresh_failure();

				return Err(e);
			},
		};

		self.metrics.record_refresh_success();
		session.set_access_token(refreshed.clone());
		obs::session_refreshed(&session.id().fingerprint());

		self.introspect_checked(&refreshed).await.map(Some)
	}

	/// Introspects `token`, turning a provider-reported error into [`Error::UpstreamAuth`].
	async fn introspect_checked(&self, token: &TokenSecret) -> Result<IntrospectionResult> {
		let decoded = self.client.introspect(Some(token)).await?;

		match decoded.error_reason() {
			Some(reason) => Err(Error::UpstreamAuth { reason: reason.to_owned() }),
			None => Ok(decoded),
		}
	}
}
