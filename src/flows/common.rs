//! Shared helpers for token flows (decision policy, grant parameters, endpoint URLs).

// self
use crate::{
	_prelude::*,
	auth::{TokenState, TokenStatus},
	error::ConfigError,
};

/// Authorization mode used when acquiring a token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grant {
	/// Simple mode (`grant_type=1`), authenticating the cloud project itself.
	#[default]
	Simple,
	/// Authorization-code mode (`grant_type=2`) with the code issued to the app.
	AuthorizationCode(String),
}
impl Grant {
	/// Returns the numeric `grant_type` query value.
	pub const fn grant_type(&self) -> u8 {
		match self {
			Grant::Simple => 1,
			Grant::AuthorizationCode(_) => 2,
		}
	}

	/// Returns the `code` query value, empty in simple mode.
	pub fn code(&self) -> &str {
		match self {
			Grant::Simple => "",
			Grant::AuthorizationCode(code) => code,
		}
	}
}

/// What [`TokenManager::ensure_header`](crate::flows::TokenManager::ensure_header) must do
/// before signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenAction {
	/// No token, or the cached one is past its expiry.
	Acquire,
	/// The cached token is still valid but inside the refresh window.
	Refresh,
	/// The cached token can be used as is.
	Reuse,
}

/// Decides the action for `state` at `now`.
///
/// Order matters: expiry is checked before the refresh window so an expired token is always
/// re-acquired, never refreshed.
pub fn plan(state: &TokenState, now: OffsetDateTime, threshold: Duration) -> TokenAction {
	let Some(grant) = state.grant() else {
		return TokenAction::Acquire;
	};

	match grant.status_at(now, threshold) {
		TokenStatus::Expired => TokenAction::Acquire,
		TokenStatus::RefreshDue => TokenAction::Refresh,
		TokenStatus::Active => TokenAction::Reuse,
	}
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn endpoint_url<'a>(
	base: &Url,
	segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::InvalidBaseUrl { url: base.to_string(), source: None })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::{TokenGrant, TokenSecret};

	fn authenticated(issued_at: OffsetDateTime) -> TokenState {
		TokenState::Authenticated(TokenGrant {
			access_token: TokenSecret::new("access"),
			refresh_token: TokenSecret::new("refresh"),
			uid: None,
			issued_at,
			expires_in: Duration::hours(2),
		})
	}

	#[test]
	fn plan_acquires_without_token() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);

		assert_eq!(plan(&TokenState::Unauthenticated, now, Duration::seconds(300)), TokenAction::Acquire);
	}

	#[test]
	fn plan_follows_token_lifetime() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let state = authenticated(issued);
		let threshold = Duration::seconds(300);

		assert_eq!(plan(&state, issued + Duration::minutes(30), threshold), TokenAction::Reuse);
		assert_eq!(plan(&state, issued + Duration::minutes(116), threshold), TokenAction::Refresh);
		assert_eq!(plan(&state, issued + Duration::minutes(121), threshold), TokenAction::Acquire);
	}

	#[test]
	fn zero_threshold_never_refreshes_early() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let state = authenticated(issued);

		assert_eq!(plan(&state, issued + Duration::hours(2), Duration::ZERO), TokenAction::Reuse);
		assert_eq!(
			plan(&state, issued + Duration::hours(2) + Duration::milliseconds(1), Duration::ZERO),
			TokenAction::Acquire
		);
	}

	#[test]
	fn grant_query_values() {
		assert_eq!(Grant::Simple.grant_type(), 1);
		assert_eq!(Grant::Simple.code(), "");

		let grant = Grant::AuthorizationCode("abc".into());

		assert_eq!(grant.grant_type(), 2);
		assert_eq!(grant.code(), "abc");
	}

	#[test]
	fn endpoint_url_encodes_segments() {
		let base = Url::parse("https://openapi.tuyacn.com").expect("Fixture URL should parse.");
		let url = endpoint_url(&base, ["v1.0", "token", "a/b c"]).expect("Endpoint should build.");

		assert_eq!(url.as_str(), "https://openapi.tuyacn.com/v1.0/token/a%2Fb%20c");

		let nested = Url::parse("http://127.0.0.1:9000/proxy/").expect("Fixture URL should parse.");
		let url = endpoint_url(&nested, ["v1.0", "token"]).expect("Endpoint should build.");

		assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/v1.0/token");
	}
}
