//! Demonstrates the session middleware against a mock identity provider: a stored session is
//! validated, its roles gate resolvers, and logging out clears the cookie.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::Duration;
use url::Url;
// self
use hawthorn_auth::{
	auth::{SessionId, TokenSecret},
	middleware::SessionMiddleware,
	provider::ProviderConfig,
	session::Session,
	store::{MemorySessionStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let introspect_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/introspect");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"active\":true,\"roles\":[\"user\"],\"sub\":\"demo-user\"}");
		})
		.await;
	let config = ProviderConfig::builder(Url::parse(&server.base_url())?)
		.client_id("demo-client")
		.client_secret("demo-secret")
		.redirect_uri(Url::parse("https://app.example.com/oauth-redirect")?)
		.build()?;
	let store = Arc::new(MemorySessionStore::default());
	let middleware = SessionMiddleware::from_config(config, store.clone());
	let session_id = SessionId::generate();

	store
		.set(
			&session_id,
			Session {
				access_token: Some(TokenSecret::new("demo-access")),
				refresh_token: Some(TokenSecret::new("demo-refresh")),
			},
			Duration::days(30),
		)
		.await?;

	let cookie_header = format!("theme=dark; {}={session_id}", middleware.cookie.name);
	let request_id = middleware.cookie.extract(&cookie_header);
	let mut ctx = middleware.handle(request_id.as_ref()).await?;

	introspect_mock.assert_async().await;

	println!("Authenticated: {}.", ctx.is_authenticated());

	match ctx.require_role("user") {
		Ok(()) => println!("The `user` role may read the profile."),
		Err(e) => println!("Unexpected rejection: {}.", e.public_message()),
	}
	match ctx.require_role("admin") {
		Ok(()) => println!("Unexpectedly granted the `admin` role."),
		Err(e) => println!("Admin field rejected with {}: {}.", e.class(), e.public_message()),
	}

	let outcome = middleware.logout(&mut ctx.session).await?;

	if let Some(header) = middleware.cookie.header_for(outcome, ctx.session.id()) {
		println!("Logout response header: Set-Cookie: {header}");
	}

	let anonymous = middleware.handle(request_id.as_ref()).await?;

	println!("After logout the request carries a token: {}.", anonymous.decoded.is_some());

	Ok(())
}
