// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used around provider calls and the session middleware.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("hawthorn_auth.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a structured event when a session is destroyed.
///
/// Only the session fingerprint is logged, never the identifier or its tokens.
pub fn session_destroyed(fingerprint: &str, reason: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(session = fingerprint, reason, "session destroyed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (fingerprint, reason);
	}
}

/// Emits a structured event when a session's access token was replaced by a refresh.
pub fn session_refreshed(fingerprint: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(session = fingerprint, "session access token refreshed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = fingerprint;
	}
}

/// Emits a structured event when the session store could not apply a mutation.
pub fn session_store_failure(fingerprint: &str, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(session = fingerprint, %error, "session store failure");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (fingerprint, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn session_events_noop_without_subscriber() {
		session_destroyed("abc123", "test");
		session_refreshed("abc123");
		session_store_failure("abc123", &"boom");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::Introspect, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
