//! Client-level error types shared across token flows, transports, and API calls.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Unexpected upstream response; the call may succeed later.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered `success: false`.
	#[error("Token endpoint rejected the credentials: {message}.")]
	Authentication {
		/// Vendor error code, when supplied.
		code: Option<i64>,
		/// Vendor `msg` field.
		message: String,
	},
	/// API endpoint answered `success: false`.
	#[error("API call failed: {message}.")]
	Api {
		/// Vendor error code, when supplied.
		code: Option<i64>,
		/// Vendor `msg` field.
		message: String,
	},
	/// An API request body could not be encoded as JSON.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// A token-bearing signature was requested while no token is cached.
	#[error("Access token is required to sign this request but none is cached.")]
	MissingAccessToken,
}
impl Error {
	/// Returns `true` for failures that may go away by repeating the call.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transient(_) | Self::Transport(_))
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Region is not one of the hosted regions.
	#[error("Region `{region}` is not supported; expected one of cn, us, eu.")]
	UnsupportedRegion {
		/// Rejected region code.
		region: String,
	},
	/// Base URL override cannot be parsed or cannot carry paths.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected URL string.
		url: String,
		/// Underlying parsing failure, when the string did not parse at all.
		#[source]
		source: Option<url::ParseError>,
	},
	/// A required credential field is empty.
	#[error("Credential field `{field}` must not be empty.")]
	EmptyCredential {
		/// Offending field name.
		field: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Malformed or unexpected upstream responses.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Response body could not be parsed.
	#[error("Endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Response carried a non-success HTTP status and no parsable envelope.
	#[error("Endpoint returned HTTP {status}: {body_preview}.")]
	UnexpectedStatus {
		/// HTTP status code of the response.
		status: u16,
		/// Leading part of the response body.
		body_preview: String,
	},
	/// Token endpoint reported success without a `result` payload.
	#[error("Token endpoint reported success without a result.")]
	MissingResult,
	/// Token endpoint returned a non-positive lifetime.
	#[error("The expire_time value must be positive, got {expire_time}.")]
	NonPositiveExpireTime {
		/// Reported lifetime in seconds.
		expire_time: i64,
	},
	/// Token lifetime pushes the expiry past the largest representable instant.
	#[error("The expire_time value {expire_time} is out of range.")]
	ExpiryOutOfRange {
		/// Reported lifetime in seconds.
		expire_time: i64,
	},
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retryable_covers_transport_and_transient_only() {
		let transport = Error::from(TransportError::Io(std::io::Error::other("reset")));
		let transient = Error::from(TransientError::MissingResult);
		let auth = Error::Authentication { code: Some(1004), message: "sign invalid".into() };

		assert!(transport.is_retryable());
		assert!(transient.is_retryable());
		assert!(!auth.is_retryable());
		assert!(!Error::MissingAccessToken.is_retryable());

		let encode = serde_json::to_vec(&std::collections::HashMap::from([((1, 2), 3)]))
			.expect_err("Non-string map keys should not encode.");

		assert!(!Error::RequestBody(encode).is_retryable());
	}

	#[test]
	fn authentication_error_carries_vendor_message() {
		let err = Error::Authentication { code: None, message: "invalid client".into() };

		assert_eq!(err.to_string(), "Token endpoint rejected the credentials: invalid client.");
	}
}
