//! Login and logout mutations.

// self
use crate::{
	_prelude::*,
	auth::UserRecord,
	client::TransportErrorMapper,
	http::ProviderHttpClient,
	middleware::SessionMiddleware,
	obs,
	session::{RequestSession, SessionOutcome},
};

impl<C, M> SessionMiddleware<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Completes a login by exchanging `authorization_code`, storing both tokens in `session`,
	/// and fetching the user's profile.
	///
	/// The session is saved before the profile lookup, so a failed lookup leaves the user
	/// logged in.
	pub async fn login(
		&self,
		session: &mut RequestSession,
		authorization_code: &str,
	) -> Result<UserRecord> {
		if session.is_destroyed() {
			return Err(Error::authentication(crate::auth::LOGIN_REQUIRED_MESSAGE));
		}

		let pair = self.client.exchange_code(authorization_code).await?;

		session.set_tokens(&pair);
		self.commit(session).await?;

		self.client.get_user(&pair.user_id).await
	}

	/// Logs the user out by destroying the session.
	pub async fn logout(&self, session: &mut RequestSession) -> Result<SessionOutcome> {
		session.destroy();
		obs::session_destroyed(&session.id().fingerprint(), "logout");

		self.commit(session).await
	}
}
