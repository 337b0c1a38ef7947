//! Transport primitives for OpenAPI calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. Requests and responses are
//! plain data ([`ApiRequest`], [`ApiResponse`]) so custom transports (mocks, proxies, other HTTP
//! crates) only need to move bytes. [`ReqwestHttpClient`] is the default implementation.

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing OpenAPI requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared behind an
/// `Arc` by the token manager and the API client. Dropping the returned future must abort the
/// in-flight request.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the status and raw body.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the OpenAPI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// An outbound request described as plain data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends several headers.
	pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
		self.headers.extend(headers);

		self
	}

	/// Sets a JSON body and the matching `Content-Type` header.
	pub fn with_json_body(self, body: Vec<u8>) -> Self {
		let mut request = self.with_header("Content-Type", "application/json");

		request.body = Some(body);

		request
	}

	/// Returns the first header value matching `name` case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// An inbound response described as plain data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns a lossy, length-capped rendering of the body for error messages.
	pub fn body_preview(&self) -> String {
		const MAX_PREVIEW: usize = 256;

		let text = String::from_utf8_lossy(&self.body);

		match text.char_indices().nth(MAX_PREVIEW) {
			Some((idx, _)) => format!("{}...", &text[..idx]),
			None => text.into_owned(),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are not followed: the OpenAPI answers directly and a redirect would re-send signed
/// headers to another host.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the TLS and timeout switches of `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(config.accept_invalid_certs);

		if let Some(timeout) = config.request_timeout {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_body_sets_content_type() {
		let url = Url::parse("https://openapi.tuyacn.com/v1.0/devices/token")
			.expect("Fixture URL should parse.");
		let request = ApiRequest::new(HttpMethod::Post, url)
			.with_header("client_id", "cid")
			.with_json_body(b"{}".to_vec());

		assert_eq!(request.header("content-type"), Some("application/json"));
		assert_eq!(request.header("CLIENT_ID"), Some("cid"));
		assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
	}

	#[test]
	fn body_preview_is_capped() {
		let response = ApiResponse { status: 502, body: vec![b'x'; 1024] };
		let preview = response.body_preview();

		assert!(!response.is_success());
		assert_eq!(preview.len(), 259);
		assert!(preview.ends_with("..."));
	}
}
