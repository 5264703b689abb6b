//! Optional observability helpers for identity provider calls and session handling.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `hawthorn_auth.call` with the `call` and
//!   `stage` (call site) fields, plus events whenever a session is refreshed or destroyed.
//! - Enable `metrics` to increment the `hawthorn_auth_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod counters;
mod spans;

pub use counters::*;
pub use spans::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Token introspection.
	Introspect,
	/// Authorization-code exchange.
	ExchangeCode,
	/// Refresh-token grant.
	RefreshToken,
	/// User profile lookup.
	GetUser,
	/// Per-request session refresh middleware.
	SessionRefresh,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Introspect => "introspect",
			CallKind::ExchangeCode => "exchange_code",
			CallKind::RefreshToken => "refresh_token",
			CallKind::GetUser => "get_user",
			CallKind::SessionRefresh => "session_refresh",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a [`CallSpan`] and records attempt + success/failure outcomes.
pub(crate) async fn observe<T, Fut>(kind: CallKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, stage);

	record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_call_outcome(kind, CallOutcome::Success),
		Err(_) => record_call_outcome(kind, CallOutcome::Failure),
	}

	result
}
