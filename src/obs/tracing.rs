// self
use crate::{_prelude::*, http::HttpMethod, obs::FlowKind};

/// Future returned by [`FlowSpan::instrument`]; instrumented only with the `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; instrumented only with the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `tuya_openapi.flow` span wrapping one token flow or API call.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for a token flow at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::info_span!("tuya_openapi.flow", flow = kind.as_str(), stage) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Opens a span for an API call; the path is recorded without its query string.
	pub fn request(method: HttpMethod, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"tuya_openapi.flow",
					flow = FlowKind::Request.as_str(),
					method = method.as_str(),
					path
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

/// Logs a failed flow at `WARN`, tagging whether the caller may retry.
pub fn log_failure(kind: FlowKind, stage: &'static str, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		flow = kind.as_str(),
		stage,
		retryable = err.is_retryable(),
		error = %err,
		"tuya openapi flow failed"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, stage, err);
}

/// Logs why the token manager chose a network round-trip, at `DEBUG`.
pub fn log_decision(kind: FlowKind, reason: &'static str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), reason, "token decision");
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, reason);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn logging_without_subscriber_is_silent() {
		log_failure(FlowKind::Refresh, "refresh", &Error::MissingAccessToken);
		log_decision(FlowKind::Acquire, "no cached token");

		let _span = FlowSpan::request(HttpMethod::Delete, "/v1.0/devices/dev-1");
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrumented_future_keeps_output() {
		let span = FlowSpan::new(FlowKind::Acquire, "acquire");

		assert_eq!(span.instrument(async { "access-1" }).await, "access-1");
	}
}
