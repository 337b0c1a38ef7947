//! Signed header sets attached to outbound requests.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	sign,
};

/// Header carrying the project access id.
pub const CLIENT_ID_HEADER: &str = "client_id";
/// Header carrying the access token on authenticated calls.
pub const ACCESS_TOKEN_HEADER: &str = "access_token";
/// Header carrying the request signature.
pub const SIGN_HEADER: &str = "sign";
/// Header carrying the signature timestamp in milliseconds.
pub const TIMESTAMP_HEADER: &str = "t";

/// Header fields proving possession of the project secret for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeader {
	/// Project access id.
	pub client_id: String,
	/// Access token, absent for token-endpoint calls.
	pub access_token: Option<TokenSecret>,
	/// Upper-case hex signature.
	pub sign: String,
	/// Timestamp in milliseconds that was signed.
	pub t: i64,
}
impl SignedHeader {
	/// Signs a token-endpoint request, where no access token is part of the signature.
	pub fn unauthenticated(credentials: &Credentials, timestamp_millis: i64) -> Self {
		Self {
			client_id: credentials.client_id.clone(),
			access_token: None,
			sign: sign::sign(
				&credentials.client_id,
				credentials.secret.expose(),
				"",
				timestamp_millis,
			),
			t: timestamp_millis,
		}
	}

	/// Signs an API request with the cached access token.
	pub fn authenticated(
		credentials: &Credentials,
		access_token: &TokenSecret,
		timestamp_millis: i64,
	) -> Self {
		Self {
			client_id: credentials.client_id.clone(),
			access_token: Some(access_token.clone()),
			sign: sign::sign(
				&credentials.client_id,
				credentials.secret.expose(),
				access_token.expose(),
				timestamp_millis,
			),
			t: timestamp_millis,
		}
	}

	/// Returns the header name/value pairs in wire order.
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(4);

		pairs.push((CLIENT_ID_HEADER.to_owned(), self.client_id.clone()));

		if let Some(token) = &self.access_token {
			pairs.push((ACCESS_TOKEN_HEADER.to_owned(), token.expose().to_owned()));
		}

		pairs.push((SIGN_HEADER.to_owned(), self.sign.clone()));
		pairs.push((TIMESTAMP_HEADER.to_owned(), self.t.to_string()));

		pairs
	}
}
