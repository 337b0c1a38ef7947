// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Counter incremented once per flow attempt, success, and failure.
pub const FLOW_TOTAL: &str = "tuya_openapi_flow_total";
/// Histogram of server-declared token lifetimes in seconds, labeled by the issuing flow.
pub const TOKEN_LIFETIME_SECONDS: &str = "tuya_openapi_token_lifetime_seconds";

/// Counts `outcome` for `kind` on the global recorder (`metrics` feature only).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_TOTAL, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records the lifetime of a freshly issued token (`metrics` feature only).
pub fn record_token_lifetime(kind: FlowKind, lifetime: Duration) {
	#[cfg(feature = "metrics")]
	metrics::histogram!(TOKEN_LIFETIME_SECONDS, "flow" => kind.as_str())
		.record(lifetime.as_seconds_f64());
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, lifetime);
}
