//! Provider strategy hooks that customize token requests and classify refresh failures.
//!
//! Implementations decorate outgoing form bodies and decide which provider errors mean the
//! session is gone for good, without tying the client to any particular HTTP stack.

// self
use crate::{_prelude::*, obs::CallKind};

/// `error_reason` the provider reports when a refresh token is unknown or already revoked.
pub const REFRESH_TOKEN_NOT_FOUND: &str = "refresh_token_not_found";

/// Strategy hook that lets providers decorate requests and classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data types so
/// downstream crates never depend on transport-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Decides whether a failed refresh grant means the session has expired.
	fn classify_refresh_error(&self, ctx: &ProviderErrorContext) -> RefreshErrorKind;

	/// Gives providers a chance to add custom form parameters before dispatching.
	///
	/// The default implementation does nothing.
	fn augment_form(&self, _call: CallKind, _form: &mut BTreeMap<String, String>) {}
}

/// How the middleware should treat a rejected refresh grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshErrorKind {
	/// The refresh token is no longer usable; the user has to log in again.
	SessionExpired,
	/// Any other provider-side rejection.
	Rejected,
}

/// Context passed to provider strategies when classifying token errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied `error_reason` field.
	pub error_reason: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
}
impl ProviderErrorContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the provider's machine-readable `error_reason`.
	pub fn with_error_reason(mut self, reason: impl Into<String>) -> Self {
		self.error_reason = Some(reason.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}
}

/// Default strategy: only [`REFRESH_TOKEN_NOT_FOUND`] expires the session.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_refresh_error(&self, ctx: &ProviderErrorContext) -> RefreshErrorKind {
		match ctx.error_reason.as_deref() {
			Some(reason) if reason.eq_ignore_ascii_case(REFRESH_TOKEN_NOT_FOUND) =>
				RefreshErrorKind::SessionExpired,
			_ => RefreshErrorKind::Rejected,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_strategy_expires_only_on_missing_refresh_token() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::new()
			.with_http_status(400)
			.with_oauth_error("invalid_grant")
			.with_error_reason(REFRESH_TOKEN_NOT_FOUND);

		assert_eq!(strategy.classify_refresh_error(&ctx), RefreshErrorKind::SessionExpired);

		let ctx = ProviderErrorContext::new()
			.with_http_status(400)
			.with_oauth_error("invalid_grant")
			.with_error_description("The refresh token has expired.");

		assert_eq!(strategy.classify_refresh_error(&ctx), RefreshErrorKind::Rejected);

		let ctx = ProviderErrorContext::new()
			.with_oauth_error("invalid_client")
			.with_error_reason("invalid_client_authentication");

		assert_eq!(strategy.classify_refresh_error(&ctx), RefreshErrorKind::Rejected);
	}

	#[test]
	fn augment_form_defaults_to_noop() {
		let strategy = DefaultProviderStrategy;
		let mut form = BTreeMap::from([("grant_type".to_owned(), "refresh_token".to_owned())]);

		strategy.augment_form(CallKind::RefreshToken, &mut form);

		assert_eq!(form.len(), 1);
	}
}
