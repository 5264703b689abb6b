//! Session and token lifecycle middleware for APIs fronted by a hosted OAuth 2.0 identity
//! provider: typed provider calls, a per-request refresh state machine, and role checks.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod middleware;
pub mod obs;
pub mod provider;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{AuthClient, ReqwestAuthClient, ReqwestTransportErrorMapper},
		http::ReqwestHttpClient,
		middleware::{ReqwestSessionMiddleware, SessionMiddleware},
		provider::ProviderConfig,
		store::{MemorySessionStore, SessionStore},
	};

	/// Client secret used by [`test_provider_config`].
	pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
	/// Client identifier used by [`test_provider_config`].
	pub const TEST_CLIENT_ID: &str = "test-client";
	/// Redirect URI used by [`test_provider_config`].
	pub const TEST_REDIRECT_URI: &str = "https://app.example.com/oauth-redirect";
	/// API key used by [`test_provider_config`].
	pub const TEST_API_KEY: &str = "test-api-key";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Provider configuration pointing every endpoint at `endpoint` (usually a mock server).
	pub fn test_provider_config(endpoint: &str) -> ProviderConfig {
		ProviderConfig::builder(
			Url::parse(endpoint).expect("Mock provider endpoint should be a valid URL."),
		)
		.client_id(TEST_CLIENT_ID)
		.client_secret(TEST_CLIENT_SECRET)
		.redirect_uri(
			Url::parse(TEST_REDIRECT_URI).expect("Redirect URI fixture should be a valid URL."),
		)
		.api_key(TEST_API_KEY)
		.build()
		.expect("Test provider configuration should validate.")
	}

	/// Constructs a client backed by the insecure test transport.
	pub fn build_reqwest_test_client(config: ProviderConfig) -> ReqwestAuthClient {
		AuthClient::with_http_client(
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Constructs middleware backed by an in-memory store and the insecure test transport.
	pub fn build_reqwest_test_middleware(
		config: ProviderConfig,
	) -> (ReqwestSessionMiddleware, Arc<MemorySessionStore>) {
		let store_backend = Arc::new(MemorySessionStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let middleware = SessionMiddleware::new(build_reqwest_test_client(config), store);

		(middleware, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
