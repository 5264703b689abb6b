//! Session cookie parsing and `Set-Cookie` rendering.

// crates.io
pub use cookie::SameSite;

use cookie::Cookie;
// self
use crate::{_prelude::*, auth::SessionId, session::SessionOutcome};

/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "hawthorn.sid";
/// Default cookie lifetime, also used as the store's rolling expiry window.
pub const DEFAULT_SESSION_TTL: Duration = Duration::days(30);

/// Cookie settings for the session identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie {
	/// Cookie name.
	pub name: String,
	/// Cookie lifetime.
	pub max_age: Duration,
	/// Cookie path.
	pub path: String,
	/// Emit `HttpOnly`.
	pub http_only: bool,
	/// Emit `Secure`.
	pub secure: bool,
	/// Optional `SameSite` attribute.
	pub same_site: Option<SameSite>,
}
impl SessionCookie {
	/// Sets the cookie name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();

		self
	}

	/// Sets the cookie lifetime.
	pub fn with_max_age(mut self, max_age: Duration) -> Self {
		self.max_age = max_age;

		self
	}

	/// Toggles the `Secure` attribute.
	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;

		self
	}

	/// Finds the session identifier in a `Cookie` request header.
	///
	/// Unparsable pairs and malformed identifiers are treated as absent.
	pub fn extract(&self, cookie_header: &str) -> Option<SessionId> {
		Cookie::split_parse_encoded(cookie_header)
			.filter_map(|parsed| parsed.ok())
			.find(|cookie| cookie.name() == self.name)
			.and_then(|cookie| SessionId::new(cookie.value().trim_matches('"')).ok())
	}

	/// Renders the `Set-Cookie` value issuing `id`.
	pub fn set_cookie(&self, id: &SessionId) -> String {
		self.build(id.to_string()).encoded().to_string()
	}

	/// Renders the `Set-Cookie` value that removes the cookie.
	pub fn clear_cookie(&self) -> String {
		let mut cookie = self.build(String::new());

		cookie.make_removal();

		cookie.encoded().to_string()
	}

	/// `Set-Cookie` value matching a commit outcome, if the response needs one.
	pub fn header_for(&self, outcome: SessionOutcome, id: &SessionId) -> Option<String> {
		match outcome {
			SessionOutcome::Unchanged => None,
			SessionOutcome::Saved => Some(self.set_cookie(id)),
			SessionOutcome::Destroyed => Some(self.clear_cookie()),
		}
	}

	fn build(&self, value: String) -> Cookie<'static> {
		let mut builder = Cookie::build((self.name.clone(), value))
			.max_age(self.max_age)
			.path(self.path.clone())
			.http_only(self.http_only)
			.secure(self.secure);

		if let Some(same_site) = self.same_site {
			builder = builder.same_site(same_site);
		}

		builder.build()
	}
}
impl Default for SessionCookie {
	fn default() -> Self {
		Self {
			name: DEFAULT_COOKIE_NAME.into(),
			max_age: DEFAULT_SESSION_TTL,
			path: "/".into(),
			http_only: true,
			secure: false,
			same_site: Some(SameSite::Lax),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn attributes(header: &str) -> Vec<&str> {
		header.split("; ").collect()
	}

	#[test]
	fn extract_finds_named_cookie_among_others() {
		let cookie = SessionCookie::default();
		let id = SessionId::generate();
		let header = format!("theme=dark; {DEFAULT_COOKIE_NAME}={id}; other=1");

		assert_eq!(cookie.extract(&header), Some(id));
		assert_eq!(cookie.extract("theme=dark"), None);
		assert_eq!(cookie.extract(&format!("{DEFAULT_COOKIE_NAME}=")), None);
		assert_eq!(cookie.extract(""), None);
	}

	#[test]
	fn set_cookie_carries_default_attributes() {
		let cookie = SessionCookie::default();
		let id = SessionId::new("abc").expect("Session fixture should be valid.");
		let header = cookie.set_cookie(&id);
		let parts = attributes(&header);

		assert_eq!(parts[0], "hawthorn.sid=abc");
		assert!(parts.contains(&"Max-Age=2592000"));
		assert!(parts.contains(&"Path=/"));
		assert!(parts.contains(&"HttpOnly"));
		assert!(parts.contains(&"SameSite=Lax"));
		assert!(!parts.contains(&"Secure"));

		let header = cookie.with_secure(true).clear_cookie();
		let parts = attributes(&header);

		assert_eq!(parts[0], "hawthorn.sid=");
		assert!(parts.contains(&"Max-Age=0"));
		assert!(parts.contains(&"Secure"));
	}

	#[test]
	fn custom_names_are_encoded_and_round_trip() {
		let cookie = SessionCookie::default().with_name("my session");
		let id = SessionId::generate();
		let header = cookie.set_cookie(&id);

		assert!(header.starts_with("my%20session="));

		let request_header = header.split("; ").next().expect("Header should have a pair.");

		assert_eq!(cookie.extract(request_header), Some(id));
	}

	#[test]
	fn header_follows_commit_outcome() {
		let cookie = SessionCookie::default();
		let id = SessionId::generate();

		assert!(cookie.header_for(SessionOutcome::Unchanged, &id).is_none());
		assert!(
			cookie
				.header_for(SessionOutcome::Saved, &id)
				.is_some_and(|header| header.contains(id.as_ref()))
		);
		assert!(
			cookie
				.header_for(SessionOutcome::Destroyed, &id)
				.is_some_and(|header| header.contains("Max-Age=0"))
		);
	}
}
