//! Identity provider client: introspection, code exchange, refresh, and user lookup.
//!
//! [`AuthClient`] wraps the provider's OAuth endpoints behind typed results. Provider-reported
//! errors become [`Error::UpstreamAuth`] (or [`Error::SessionExpired`] for dead refresh tokens),
//! transport and payload failures become [`Error::Upstream`], and an inactive token is a normal
//! [`IntrospectionResult`], never an error.

pub mod mapper;

mod wire;

pub use mapper::*;

// crates.io
use oauth2::{AsyncHttpClient, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	auth::{IntrospectionResult, TokenPair, TokenSecret, UserId, UserRecord},
	error::{ConfigError, UpstreamError},
	http::ProviderHttpClient,
	obs::{self, CallKind},
	provider::{
		DefaultProviderStrategy, ProviderConfig, ProviderStrategy, PublicProviderConfig,
		RefreshErrorKind,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthClient = AuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Typed wrapper around a hosted OAuth 2.0 identity provider.
#[derive(Clone)]
pub struct AuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Validated provider configuration.
	pub config: ProviderConfig,
	/// Strategy responsible for provider-specific request tweaks and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> AuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			strategy: Arc::new(DefaultProviderStrategy),
		}
	}

	/// Replaces the provider strategy.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Secret-free configuration for browsers building login links.
	pub fn public_config(&self) -> PublicProviderConfig {
		self.config.public_config()
	}

	/// Introspects `token`.
	///
	/// An absent token yields an inactive result without touching the network. A provider
	/// `error` field is reported through [`IntrospectionResult::error_code`], not as `Err`.
	pub async fn introspect(&self, token: Option<&TokenSecret>) -> Result<IntrospectionResult> {
		const CALL: CallKind = CallKind::Introspect;

		let Some(token) = token else {
			return Ok(IntrospectionResult::inactive());
		};

		obs::observe(CALL, "introspect", async move {
			let form = self.form(CALL, false, [("token", token.expose())]);
			let request = wire::form_request(&self.config.endpoints.introspect, &form)?;
			let response = self.dispatch(CALL, request).await?;
			let body: wire::IntrospectResponse = wire::decode(CALL, &response)?;

			if body.error.is_none() {
				wire::ensure_success(CALL, &response)?;
			}

			Ok(body.into())
		})
		.await
	}

	/// Exchanges an authorization code for a [`TokenPair`].
	pub async fn exchange_code(&self, authorization_code: &str) -> Result<TokenPair> {
		const CALL: CallKind = CallKind::ExchangeCode;

		obs::observe(CALL, "exchange_code", async move {
			let form = self.form(
				CALL,
				true,
				[("code", authorization_code), ("grant_type", "authorization_code")],
			);
			let request = wire::form_request(&self.config.endpoints.token, &form)?;
			let response = self.dispatch(CALL, request).await?;
			let body: wire::TokenResponse = wire::decode(CALL, &response)?;

			if let Some(reason) = body.rejection() {
				return Err(Error::UpstreamAuth { reason });
			}

			wire::ensure_success(CALL, &response)?;

			let access_token = non_empty(body.access_token)
				.ok_or(UpstreamError::InvalidField { call: CALL, field: "access_token" })?;
			let refresh_token = non_empty(body.refresh_token)
				.ok_or(UpstreamError::InvalidField { call: CALL, field: "refresh_token" })?;
			let user_id = body
				.user_id
				.and_then(|id| UserId::new(id).ok())
				.ok_or(UpstreamError::InvalidField { call: CALL, field: "userId" })?;

			Ok(TokenPair {
				access_token: TokenSecret::new(access_token),
				refresh_token: TokenSecret::new(refresh_token),
				user_id,
			})
		})
		.await
	}

	/// Exchanges a refresh token for a new access token.
	///
	/// Returns `Ok(None)` when the provider answered without an access token. Fails with
	/// [`Error::SessionExpired`] when the strategy classifies the rejection as a dead refresh
	/// token, and with [`Error::UpstreamAuth`] for every other provider-reported error.
	pub async fn refresh_token(&self, refresh_token: &TokenSecret) -> Result<Option<TokenSecret>> {
		const CALL: CallKind = CallKind::RefreshToken;

		obs::observe(CALL, "refresh_token", async move {
			let form = self.form(
				CALL,
				true,
				[("grant_type", "refresh_token"), ("refresh_token", refresh_token.expose())],
			);
			let request = wire::form_request(&self.config.endpoints.token, &form)?;
			let response = self.dispatch(CALL, request).await?;
			let body: wire::TokenResponse = wire::decode(CALL, &response)?;

			if let Some(reason) = body.rejection() {
				let ctx = body.error_context(response.status().as_u16());

				return Err(match self.strategy.classify_refresh_error(&ctx) {
					RefreshErrorKind::SessionExpired => Error::SessionExpired,
					RefreshErrorKind::Rejected => Error::UpstreamAuth { reason },
				});
			}

			wire::ensure_success(CALL, &response)?;

			Ok(non_empty(body.access_token).map(TokenSecret::new))
		})
		.await
	}

	/// Fetches the user profile for `id`.
	///
	/// Transport, status, and payload failures surface as [`Error::Upstream`]. A user id that
	/// cannot be joined onto the configured base URL, or a request that cannot be assembled,
	/// is a local misconfiguration and surfaces as [`Error::Config`] without contacting the
	/// provider.
	pub async fn get_user(&self, id: &UserId) -> Result<UserRecord> {
		const CALL: CallKind = CallKind::GetUser;

		obs::observe(CALL, "get_user", async move {
			let url = self
				.config
				.user_url(id)
				.ok_or_else(|| ConfigError::InvalidUserPath { user_id: id.to_string() })?;
			let request = wire::user_request(
				&url,
				self.config.api_key.as_ref().map(TokenSecret::expose),
				self.config.tenant_id.as_deref(),
			)?;
			let response = self.dispatch(CALL, request).await?;

			wire::ensure_success(CALL, &response)?;

			let body: wire::UserResponse = wire::decode(CALL, &response)?;

			Ok(body.user)
		})
		.await
	}

	async fn dispatch(&self, call: CallKind, request: HttpRequest) -> Result<HttpResponse> {
		let handle = self.http_client.handle();

		handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(call, err))
	}

	fn form<'a, I>(
		&self,
		call: CallKind,
		confidential: bool,
		fields: I,
	) -> BTreeMap<String, String>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let mut form = BTreeMap::from([("client_id".to_owned(), self.config.client_id.clone())]);

		if confidential {
			form.insert("client_secret".into(), self.config.client_secret.expose().to_owned());
			form.insert("redirect_uri".into(), self.config.redirect_uri.to_string());
		}
		for (key, value) in fields {
			form.insert(key.to_owned(), value.to_owned());
		}

		self.strategy.augment_form(call, &mut form);

		form
	}
}
#[cfg(feature = "reqwest")]
impl AuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client that provisions its own reqwest-backed transport.
	pub fn new(config: ProviderConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for AuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthClient")
			.field("endpoint", &self.config.endpoint.as_str())
			.field("client_id", &self.config.client_id)
			.field("api_key_set", &self.config.api_key.is_some())
			.finish()
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}
