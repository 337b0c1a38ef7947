//! Cached token state owned by the token manager.

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
};

/// Either no token at all, or a complete access/refresh pair.
///
/// Modelled as a sum type so a half-populated state (access token without refresh token, or a
/// token without an issue instant) cannot be represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TokenState {
	/// No token has been obtained yet.
	#[default]
	Unauthenticated,
	/// A token pair obtained from the token endpoint.
	Authenticated(TokenGrant),
}
impl TokenState {
	/// Returns the cached grant, if any.
	pub fn grant(&self) -> Option<&TokenGrant> {
		match self {
			Self::Unauthenticated => None,
			Self::Authenticated(grant) => Some(grant),
		}
	}

	/// Returns the access token or [`Error::MissingAccessToken`].
	pub fn access_token(&self) -> Result<&TokenSecret> {
		self.grant().map(|grant| &grant.access_token).ok_or(Error::MissingAccessToken)
	}

	/// Returns `true` when a token pair is cached.
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Self::Authenticated(_))
	}
}
