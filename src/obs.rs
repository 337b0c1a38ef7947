//! Optional observability helpers for token flows and API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tuya_openapi.flow` with the `flow` and
//!   `stage` (call site) fields, and `WARN` events for every failure.
//! - Enable `metrics` to increment the `tuya_openapi_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.
//!   Every issued token also lands in the `tuya_openapi_token_lifetime_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Token acquisition (`GET /v1.0/token`).
	Acquire,
	/// Token refresh (`GET /v1.0/token/{refresh_token}`).
	Refresh,
	/// Authenticated API request.
	Request,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Acquire => "acquire",
			FlowKind::Refresh => "refresh",
			FlowKind::Request => "request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the final outcome of `result` and logs failures.
pub fn record_result<T>(kind: FlowKind, stage: &'static str, result: &Result<T>) {
	match result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(err) => {
			log_failure(kind, stage, err);
			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}
}
