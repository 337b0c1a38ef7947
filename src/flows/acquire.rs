//! Token acquisition (`GET /v1.0/token`).

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenState},
	flows::{Grant, TokenManager, common},
	http::HttpTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	/// Acquires a new token pair with `grant`, replacing any cached token.
	///
	/// On failure the cached state is left untouched.
	pub async fn acquire(&self, grant: &Grant) -> Result<TokenGrant> {
		let mut state = self.state.lock().await;

		self.acquire_locked(&mut state, grant).await
	}

	pub(super) async fn acquire_locked(
		&self,
		state: &mut TokenState,
		grant: &Grant,
	) -> Result<TokenGrant> {
		const KIND: FlowKind = FlowKind::Acquire;

		let span = FlowSpan::new(KIND, "acquire");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_acquisition();

		let result: Result<TokenGrant> = span
			.instrument(async {
				let mut url = common::endpoint_url(&self.base_url, ["v1.0", "token"])?;

				url.query_pairs_mut()
					.append_pair("grant_type", &grant.grant_type().to_string())
					.append_pair("code", grant.code());

				self.request_token(url).await
			})
			.await;

		self.finish(KIND, "acquire", state, result)
	}
}
