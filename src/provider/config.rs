//! Validated identity provider configuration.
//!
//! [`ProviderConfig`] is assembled through [`ProviderConfigBuilder`], which is also the serde
//! entry point, so configuration loaded from any source goes through the same validation.

// self
use crate::{_prelude::*, auth::TokenSecret};

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Errors raised while constructing or validating a provider configuration.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderConfigError {
	/// Provider base endpoint is required.
	#[error("Missing provider endpoint.")]
	MissingEndpoint,
	/// OAuth client identifier is required.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// OAuth client secret is required for code and refresh grants.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Redirect URI registered with the provider is required.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// Non-loopback endpoints must use HTTPS.
	#[error("The provider endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint cannot carry path segments (e.g. `mailto:` URLs).
	#[error("The provider endpoint cannot be used as a base URL: {url}.")]
	InvalidEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Endpoints derived from the provider base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// `{endpoint}/oauth2/introspect`.
	pub introspect: Url,
	/// `{endpoint}/oauth2/token`.
	pub token: Url,
	/// `{endpoint}/api/user`; the user identifier is appended per call.
	pub user: Url,
}

/// Immutable identity provider configuration consumed by [`AuthClient`](crate::client::AuthClient).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProviderConfigBuilder")]
pub struct ProviderConfig {
	/// Provider base URL.
	pub endpoint: Url,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Redirect URI registered for the authorization-code grant.
	pub redirect_uri: Url,
	/// API key used for management calls such as user lookups.
	pub api_key: Option<TokenSecret>,
	/// Provider tenant, when the provider is multi-tenant.
	pub tenant_id: Option<String>,
	/// Derived endpoint set.
	pub endpoints: ProviderEndpoints,
}
impl ProviderConfig {
	/// Creates a new builder seeded with the provider base URL.
	pub fn builder(endpoint: Url) -> ProviderConfigBuilder {
		ProviderConfigBuilder::default().endpoint(endpoint)
	}

	/// Returns the subset of the configuration that is safe to hand to browsers.
	pub fn public_config(&self) -> PublicProviderConfig {
		PublicProviderConfig {
			endpoint: self.endpoint.clone(),
			client_id: self.client_id.clone(),
			tenant_id: self.tenant_id.clone(),
			redirect_uri: self.redirect_uri.clone(),
		}
	}

	/// Builds the user lookup URL for `user_id`.
	pub fn user_url(&self, user_id: &str) -> Option<Url> {
		let mut url = self.endpoints.user.clone();

		url.path_segments_mut().ok()?.push(user_id);

		Some(url)
	}
}

/// Secret-free view of [`ProviderConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProviderConfig {
	/// Provider base URL.
	pub endpoint: Url,
	/// OAuth client identifier.
	pub client_id: String,
	/// Provider tenant.
	pub tenant_id: Option<String>,
	/// Redirect URI registered for the authorization-code grant.
	pub redirect_uri: Url,
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfigBuilder {
	/// Provider base URL.
	pub endpoint: Option<Url>,
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered for the authorization-code grant.
	pub redirect_uri: Option<Url>,
	/// API key used for management calls.
	pub api_key: Option<TokenSecret>,
	/// Provider tenant.
	pub tenant_id: Option<String>,
}
impl ProviderConfigBuilder {
	/// Sets the provider base URL.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Sets the management API key.
	pub fn api_key(mut self, key: impl Into<TokenSecret>) -> Self {
		self.api_key = Some(key.into());

		self
	}

	/// Sets the provider tenant.
	pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
		self.tenant_id = Some(tenant_id.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let endpoint = self.endpoint.ok_or(ProviderConfigError::MissingEndpoint)?;
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(ProviderConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|value| !value.is_empty())
			.ok_or(ProviderConfigError::MissingClientSecret)?;
		let redirect_uri = self.redirect_uri.ok_or(ProviderConfigError::MissingRedirectUri)?;

		validate_endpoint(&endpoint)?;

		let endpoints = ProviderEndpoints {
			introspect: join_segments(&endpoint, &["oauth2", "introspect"])?,
			token: join_segments(&endpoint, &["oauth2", "token"])?,
			user: join_segments(&endpoint, &["api", "user"])?,
		};

		Ok(ProviderConfig {
			endpoint,
			client_id,
			client_secret,
			redirect_uri,
			api_key: self.api_key.filter(|value| !value.is_empty()),
			tenant_id: self.tenant_id.filter(|value| !value.trim().is_empty()),
			endpoints,
		})
	}
}
impl TryFrom<ProviderConfigBuilder> for ProviderConfig {
	type Error = ProviderConfigError;

	fn try_from(builder: ProviderConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

fn validate_endpoint(url: &Url) -> Result<(), ProviderConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if url.host_str().is_some_and(|host| LOOPBACK_HOSTS.contains(&host)) => Ok(()),
		"http" => Err(ProviderConfigError::InsecureEndpoint { url: url.to_string() }),
		_ => Err(ProviderConfigError::InvalidEndpoint { url: url.to_string() }),
	}
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ProviderConfigError> {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);
	url.path_segments_mut()
		.map_err(|_| ProviderConfigError::InvalidEndpoint { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	fn builder(endpoint: &str) -> ProviderConfigBuilder {
		ProviderConfig::builder(url(endpoint))
			.client_id("client-id")
			.client_secret("client-secret")
			.redirect_uri(url("https://app.example.com/oauth-redirect"))
	}

	#[test]
	fn endpoints_are_derived_from_base_path() {
		let config = builder("https://auth.example.com/fusion/")
			.build()
			.expect("Config with trailing slash should build.");

		assert_eq!(
			config.endpoints.introspect.as_str(),
			"https://auth.example.com/fusion/oauth2/introspect"
		);
		assert_eq!(config.endpoints.token.as_str(), "https://auth.example.com/fusion/oauth2/token");

		let config =
			builder("https://auth.example.com").build().expect("Bare host config should build.");

		assert_eq!(config.endpoints.token.as_str(), "https://auth.example.com/oauth2/token");
		assert_eq!(
			config.user_url("user 1").expect("User URL should build.").as_str(),
			"https://auth.example.com/api/user/user%201"
		);
	}

	#[test]
	fn plain_http_is_limited_to_loopback() {
		builder("http://127.0.0.1:9011").build().expect("Loopback HTTP should be accepted.");
		builder("http://localhost:9011").build().expect("Localhost HTTP should be accepted.");

		assert!(matches!(
			builder("http://auth.example.com").build(),
			Err(ProviderConfigError::InsecureEndpoint { .. })
		));
		assert!(matches!(
			builder("ftp://auth.example.com").build(),
			Err(ProviderConfigError::InvalidEndpoint { .. })
		));
	}

	#[test]
	fn required_fields_are_enforced() {
		let err = ProviderConfig::builder(url("https://auth.example.com"))
			.client_secret("secret")
			.redirect_uri(url("https://app.example.com/cb"))
			.build()
			.expect_err("Missing client id must fail.");

		assert_eq!(err, ProviderConfigError::MissingClientId);

		let err = ProviderConfig::builder(url("https://auth.example.com"))
			.client_id("client")
			.client_secret("")
			.redirect_uri(url("https://app.example.com/cb"))
			.build()
			.expect_err("Empty client secret must fail.");

		assert_eq!(err, ProviderConfigError::MissingClientSecret);
	}

	#[test]
	fn deserialization_goes_through_validation() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{
				"endpoint": "https://auth.example.com",
				"client_id": "client",
				"client_secret": "secret",
				"redirect_uri": "https://app.example.com/cb",
				"api_key": "api-key",
				"tenant_id": "tenant-1"
			}"#,
		)
		.expect("Valid configuration should deserialize.");

		assert_eq!(config.api_key.as_ref().map(TokenSecret::expose), Some("api-key"));
		assert!(!format!("{config:?}").contains("api-key"));

		let public = serde_json::to_value(config.public_config())
			.expect("Public config should serialize.");

		assert_eq!(public["clientId"], "client");
		assert_eq!(public["tenantId"], "tenant-1");
		assert!(public.get("clientSecret").is_none());
		assert!(
			serde_json::from_str::<ProviderConfig>(r#"{"endpoint":"http://auth.example.com"}"#)
				.is_err()
		);
	}
}
