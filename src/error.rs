//! Crate-level error types shared by the identity client, session middleware, and stores.

// self
use crate::{_prelude::*, obs::CallKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message surfaced to end users for server-class failures.
pub const UNEXPECTED_SERVER_ERROR: &str = "Unexpected server error";

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity provider could not be reached or answered with garbage.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),

	/// Caller must (re-)authenticate before accessing the resource.
	#[error("{reason}")]
	Authentication {
		/// Human-readable reason shown to the caller.
		reason: String,
	},
	/// Caller is authenticated but lacks the required role.
	#[error("{reason}")]
	Forbidden {
		/// Human-readable reason shown to the caller.
		reason: String,
	},
	/// Identity provider reported an error in its response body.
	#[error("Identity provider rejected the request: {reason}.")]
	UpstreamAuth {
		/// Provider-supplied description (or error code when no description exists).
		reason: String,
	},
	/// Identity provider no longer knows the refresh token.
	#[error("Refresh token is no longer valid.")]
	SessionExpired,
}
impl Error {
	/// Builds an [`Error::Authentication`] from any displayable reason.
	pub fn authentication(reason: impl Into<String>) -> Self {
		Self::Authentication { reason: reason.into() }
	}

	/// Builds an [`Error::Forbidden`] from any displayable reason.
	pub fn forbidden(reason: impl Into<String>) -> Self {
		Self::Forbidden { reason: reason.into() }
	}

	/// Classifies the error for the GraphQL layer.
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::Authentication { .. } | Self::SessionExpired => ErrorClass::Authentication,
			Self::Forbidden { .. } => ErrorClass::Forbidden,
			Self::Storage(_) | Self::Config(_) | Self::Upstream(_) | Self::UpstreamAuth { .. } =>
				ErrorClass::Server,
		}
	}

	/// Message that is safe to return to API clients.
	///
	/// Authentication and authorization failures keep their reason; everything else collapses
	/// into [`UNEXPECTED_SERVER_ERROR`] so internal detail never reaches the caller.
	pub fn public_message(&self) -> String {
		match self {
			Self::Authentication { reason } | Self::Forbidden { reason } => reason.clone(),
			Self::SessionExpired => crate::auth::SESSION_EXPIRED_MESSAGE.into(),
			_ => UNEXPECTED_SERVER_ERROR.into(),
		}
	}
}

/// Error classes distinguished by API clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// Must log in (again).
	Authentication,
	/// Logged in but not allowed.
	Forbidden,
	/// Opaque server-side failure.
	Server,
}
impl ErrorClass {
	/// GraphQL `extensions.code` value for the class.
	pub const fn code(self) -> &'static str {
		match self {
			ErrorClass::Authentication => "UNAUTHENTICATED",
			ErrorClass::Forbidden => "FORBIDDEN",
			ErrorClass::Server => "INTERNAL_SERVER_ERROR",
		}
	}
}
impl Display for ErrorClass {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.code())
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] crate::provider::ProviderConfigError),
	/// User identifier cannot be appended to the user endpoint.
	#[error("User endpoint cannot carry the identifier `{user_id}`.")]
	InvalidUserPath {
		/// Identifier that failed.
		user_id: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures talking to the identity provider (transport, status, payload shape).
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {call} endpoint.")]
	Network {
		/// Provider call that failed.
		call: CallKind,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete in time.
	#[error("Request timed out while calling the {call} endpoint.")]
	Timeout {
		/// Provider call that failed.
		call: CallKind,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity provider.")]
	Io(#[from] std::io::Error),
	/// Response body could not be decoded.
	#[error("The {call} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Provider call that failed.
		call: CallKind,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Provider answered with a non-success status and no OAuth error body.
	#[error("The {call} endpoint returned HTTP {status}: {message}.")]
	UnexpectedStatus {
		/// Provider call that failed.
		call: CallKind,
		/// HTTP status code.
		status: u16,
		/// Truncated response body or transport message.
		message: String,
	},
	/// Successful response omitted a mandatory field or carried an unusable value.
	#[error("The {call} endpoint response has a missing or invalid `{field}`.")]
	InvalidField {
		/// Provider call that failed.
		call: CallKind,
		/// Offending JSON field.
		field: &'static str,
	},
}
impl UpstreamError {
	/// Wraps a transport-specific network error.
	pub fn network(call: CallKind, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { call, source: Box::new(src) }
	}
}
