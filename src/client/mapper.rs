//! Conversion of transport failures into crate errors.

// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, UpstreamError},
	obs::CallKind,
};

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, call: CallKind, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, call: CallKind, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(call, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => UpstreamError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(call, message),
			_ => map_generic_transport_error(call, "unknown HTTP client failure"),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(call: CallKind, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return UpstreamError::Timeout { call }.into();
	}

	UpstreamError::network(call, err).into()
}

/// Wraps a free-form transport message as a network failure.
pub fn map_generic_transport_error(call: CallKind, message: impl Display) -> Error {
	UpstreamError::Network { call, source: format!("HTTP client error: {message}.").into() }.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn generic_transport_errors_are_server_class() {
		let err = map_generic_transport_error(CallKind::GetUser, "connection reset");

		assert!(matches!(
			err,
			Error::Upstream(UpstreamError::Network { call: CallKind::GetUser, .. })
		));
		assert_eq!(err.class(), crate::error::ErrorClass::Server);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn io_errors_are_preserved() {
		let mapper = ReqwestTransportErrorMapper;
		let err = mapper.map_transport_error(
			CallKind::Introspect,
			HttpClientError::Io(std::io::Error::other("socket closed")),
		);

		assert!(matches!(err, Error::Upstream(UpstreamError::Io(_))));
	}
}
