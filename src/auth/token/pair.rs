//! Token pair issued by an authorization-code exchange.

// self
use crate::auth::{TokenSecret, UserId};

/// Tokens issued by an authorization-code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
	/// Short-lived access token.
	pub access_token: TokenSecret,
	/// Long-lived refresh token.
	pub refresh_token: TokenSecret,
	/// Identity provider user the tokens belong to.
	pub user_id: UserId,
}
