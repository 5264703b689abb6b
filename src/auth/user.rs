//! User profile model returned by the identity provider.

// self
use crate::{_prelude::*, auth::UserId};

/// User profile returned by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	/// Provider user identifier.
	pub id: UserId,
	/// Primary email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Username, when the provider tracks one.
	#[serde(default)]
	pub username: Option<String>,
	/// Given name.
	#[serde(default)]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default)]
	pub last_name: Option<String>,
	/// Display name.
	#[serde(default)]
	pub full_name: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Whether the email address has been verified.
	#[serde(default)]
	pub verified: bool,
	/// Whether the account is enabled.
	#[serde(default)]
	pub active: bool,
}
