//! Role-based authorization gate consulted by resolvers before serving protected data.

// self
use crate::{_prelude::*, auth::IntrospectionResult};

/// Message used when no decoded token is attached to the request.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in for that";
/// Message used when the decoded token is no longer active.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session expired, please log back in";
/// Message used when the decoded token lacks the required role.
pub const FORBIDDEN_MESSAGE: &str = "You cannot see that";

/// Validates `decoded` against the required `role`.
///
/// Pure and synchronous: no I/O, no side effects.
pub fn require_role(decoded: Option<&IntrospectionResult>, role: &str) -> Result<()> {
	let decoded = decoded.ok_or_else(|| Error::authentication(LOGIN_REQUIRED_MESSAGE))?;

	if !decoded.active {
		return Err(Error::authentication(SESSION_EXPIRED_MESSAGE));
	}
	if !decoded.has_role(role) {
		return Err(Error::forbidden(FORBIDDEN_MESSAGE));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_token_requires_login() {
		let err = require_role(None, "admin").expect_err("Absent token must be rejected.");

		assert!(matches!(
			err,
			Error::Authentication { ref reason } if reason == LOGIN_REQUIRED_MESSAGE
		));
	}

	#[test]
	fn inactive_token_requires_login() {
		let decoded = IntrospectionResult::inactive();
		let err =
			require_role(Some(&decoded), "admin").expect_err("Inactive token must be rejected.");

		assert!(matches!(
			err,
			Error::Authentication { ref reason } if reason == SESSION_EXPIRED_MESSAGE
		));
	}

	#[test]
	fn inactive_token_is_rejected_even_with_role() {
		let decoded =
			IntrospectionResult { active: false, ..IntrospectionResult::active_with_roles(["admin"]) };

		assert!(matches!(require_role(Some(&decoded), "admin"), Err(Error::Authentication { .. })));
	}

	#[test]
	fn missing_role_is_forbidden() {
		let decoded = IntrospectionResult::active_with_roles(["user"]);
		let err =
			require_role(Some(&decoded), "admin").expect_err("Missing role must be rejected.");

		assert!(matches!(err, Error::Forbidden { ref reason } if reason == FORBIDDEN_MESSAGE));
	}

	#[test]
	fn matching_role_passes() {
		let decoded = IntrospectionResult::active_with_roles(["user", "admin"]);

		require_role(Some(&decoded), "admin").expect("Admin role should be accepted.");
		require_role(Some(&decoded), "user").expect("User role should be accepted.");
	}
}
