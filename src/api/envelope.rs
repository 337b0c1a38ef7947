//! The `{success, result, code, msg, t}` envelope wrapping every OpenAPI response body.

// self
use crate::{_prelude::*, error::TransientError, http::ApiResponse};

/// Response envelope shared by the token endpoint and every API endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	/// Whether the call succeeded.
	pub success: bool,
	/// Payload, present when `success` is true.
	pub result: Option<T>,
	/// Vendor error code, present on failures.
	pub code: Option<i64>,
	/// Vendor error description, present on failures.
	pub msg: Option<String>,
	/// Server timestamp in milliseconds.
	pub t: Option<i64>,
}
impl<T> Envelope<T>
where
	T: for<'de> Deserialize<'de>,
{
	/// Parses the envelope out of a raw response.
	///
	/// A body that does not parse is reported as [`TransientError::UnexpectedStatus`] when the
	/// HTTP status is not 2xx, and as [`TransientError::ResponseParse`] otherwise.
	pub fn from_response(response: &ApiResponse) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(de).map_err(|source| {
			if response.is_success() {
				TransientError::ResponseParse { source, status: response.status }.into()
			} else {
				TransientError::UnexpectedStatus {
					status: response.status,
					body_preview: response.body_preview(),
				}
				.into()
			}
		})
	}
}
impl<T> Envelope<T> {
	/// Converts a `success: false` envelope into [`Error::Api`] and returns the payload otherwise.
	///
	/// Successful calls without a payload (e.g. deletions on some endpoints) yield `None`.
	pub fn into_result(self) -> Result<Option<T>> {
		if self.success {
			Ok(self.result)
		} else {
			Err(Error::Api { code: self.code, message: self.failure_message() })
		}
	}

	/// Vendor failure message, or a placeholder when the envelope carried none.
	pub fn failure_message(&self) -> String {
		self.msg.clone().unwrap_or_else(|| "no message supplied".into())
	}
}
