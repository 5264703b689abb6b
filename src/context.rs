//! Request context handed to downstream resolvers.

// self
use crate::{
	_prelude::*,
	auth::{self, IntrospectionResult},
	session::{RequestSession, SessionCookie, SessionOutcome},
};

/// Everything resolvers need to know about the caller.
#[derive(Clone, Debug)]
pub struct RequestContext {
	/// Session bound to the request.
	pub session: RequestSession,
	/// Decoded access token; `None` when the session holds no access token.
	pub decoded: Option<IntrospectionResult>,
	/// How the session was committed by the middleware.
	pub outcome: SessionOutcome,
}
impl RequestContext {
	/// Bundles the middleware's result for one request.
	pub fn new(
		session: RequestSession,
		decoded: Option<IntrospectionResult>,
		outcome: SessionOutcome,
	) -> Self {
		Self { session, decoded, outcome }
	}

	/// Authorization gate for protected fields; see [`auth::require_role`].
	pub fn require_role(&self, role: &str) -> Result<()> {
		auth::require_role(self.decoded.as_ref(), role)
	}

	/// True when the attached token is active.
	pub fn is_authenticated(&self) -> bool {
		self.decoded.as_ref().is_some_and(|decoded| decoded.active)
	}

	/// `Set-Cookie` value the response should carry, if any.
	pub fn set_cookie_header(&self, cookie: &SessionCookie) -> Option<String> {
		cookie.header_for(self.outcome, self.session.id())
	}
}

/// Error returned by [`SessionMiddleware::handle`](crate::middleware::SessionMiddleware::handle).
///
/// Carries how the session ended so the response can still clear the cookie.
#[derive(Debug, ThisError)]
#[error("{error}")]
pub struct RequestFailure {
	/// Underlying failure.
	#[source]
	pub error: Error,
	/// What happened to the session before the error was returned.
	pub outcome: SessionOutcome,
}
impl RequestFailure {
	/// Wraps a failure that left the session as it was.
	pub fn unchanged(error: Error) -> Self {
		Self { error, outcome: SessionOutcome::Unchanged }
	}

	/// `Set-Cookie` value the error response should carry, if any.
	pub fn set_cookie_header(&self, cookie: &SessionCookie) -> Option<String> {
		match self.outcome {
			SessionOutcome::Destroyed => Some(cookie.clear_cookie()),
			SessionOutcome::Unchanged | SessionOutcome::Saved => None,
		}
	}
}
impl From<RequestFailure> for Error {
	fn from(failure: RequestFailure) -> Self {
		failure.error
	}
}
