//! Token refresh (`GET /v1.0/token/{refresh_token}`).
//!
//! A refresh rotates both the access and the refresh token. Without a cached pair there is
//! nothing to rotate, so the flow degrades to a full acquisition instead of calling the refresh
//! endpoint with an empty token.

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
	/// Rotates the cached token pair, or acquires one with `grant` when none is cached.
	///
	/// On failure the cached state is left untouched.
	pub async fn refresh(&self, grant: &Grant) -> Result<TokenGrant> {
		let mut state = self.state.lock().await;

		self.refresh_locked(&mut state, grant).await
	}

	pub(super) async fn refresh_locked(
		&self,
		state: &mut TokenState,
		grant: &Grant,
	) -> Result<TokenGrant> {
		const KIND: FlowKind = FlowKind::Refresh;

		let Some(refresh_token) = state.grant().map(|current| current.refresh_token.clone()) else {
			obs::log_decision(KIND, "no cached token, acquiring instead");

			return self.acquire_locked(state, grant).await;
		};
		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_refresh();

		let result: Result<TokenGrant> = span
			.instrument(async {
				let url = common::endpoint_url(
					&self.base_url,
					["v1.0", "token", refresh_token.expose()],
				)?;

				self.request_token(url).await
			})
			.await;

		self.finish(KIND, "refresh", state, result)
	}
}
