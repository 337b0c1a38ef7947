//! Cloud project credentials.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Access id/secret pair issued for a cloud project, plus the app schema used by user endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Project access id, sent as the `client_id` header.
	pub client_id: String,
	/// Project access secret; only ever used as signature input.
	pub secret: TokenSecret,
	/// Application namespace (`schema`) for user-management endpoints.
	pub schema: String,
}
impl Credentials {
	/// Bundles the three credential parts.
	pub fn new(
		client_id: impl Into<String>,
		secret: impl Into<String>,
		schema: impl Into<String>,
	) -> Self {
		Self { client_id: client_id.into(), secret: TokenSecret::new(secret), schema: schema.into() }
	}

	/// Rejects empty client ids and secrets, which can never produce a valid signature.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::EmptyCredential { field: "client_id" });
		}
		if self.secret.is_empty() {
			return Err(ConfigError::EmptyCredential { field: "secret" });
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("secret", &"<redacted>")
			.field("schema", &self.schema)
			.finish()
	}
}
