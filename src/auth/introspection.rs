//! Decoded view of an access token as reported by the identity provider.

// self
use crate::_prelude::*;

/// Result of introspecting an access token.
///
/// Produced per request and never persisted. A provider-reported failure is carried in
/// [`error_code`](Self::error_code)/[`error_description`](Self::error_description) rather than as
/// an `Err`, so callers decide how terminal it is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionResult {
	/// Whether the token is currently valid.
	pub active: bool,
	/// Role claims in the order the provider listed them.
	pub roles: Vec<String>,
	/// Provider `error` field, if any.
	pub error_code: Option<String>,
	/// Provider `error_description` field, if any.
	pub error_description: Option<String>,
	/// Token subject (`sub`).
	pub subject: Option<String>,
	/// Token expiry (`exp`).
	pub expires_at: Option<OffsetDateTime>,
}
impl IntrospectionResult {
	/// Result used when there is no token to introspect.
	pub fn inactive() -> Self {
		Self::default()
	}

	/// Active result carrying the provided roles.
	pub fn active_with_roles<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { active: true, roles: roles.into_iter().map(Into::into).collect(), ..Self::default() }
	}

	/// True when the provider reported an error for the introspection call.
	pub fn is_error(&self) -> bool {
		self.error_code.is_some()
	}

	/// Returns true when `role` is among the role claims.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|candidate| candidate == role)
	}

	/// Description suitable for an error message, falling back to the error code.
	pub fn error_reason(&self) -> Option<&str> {
		self.error_description.as_deref().or(self.error_code.as_deref())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn inactive_result_has_no_error_and_no_roles() {
		let result = IntrospectionResult::inactive();

		assert!(!result.active);
		assert!(!result.is_error());
		assert!(result.roles.is_empty());
	}

	#[test]
	fn error_reason_prefers_description() {
		let mut result = IntrospectionResult {
			error_code: Some("invalid_request".into()),
			..IntrospectionResult::default()
		};

		assert_eq!(result.error_reason(), Some("invalid_request"));

		result.error_description = Some("Token is malformed".into());

		assert_eq!(result.error_reason(), Some("Token is malformed"));
	}
}
