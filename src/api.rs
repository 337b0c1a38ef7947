//! OpenAPI client for user and device endpoints.
//!
//! Each endpoint method asks the [`TokenManager`] for a signed header and then issues exactly one
//! request through the shared transport. Responses come back as [`Envelope`]s with an untyped
//! `result`; use [`Envelope::into_result`] to turn vendor failures into [`Error::Api`].

pub mod devices;
pub mod envelope;
pub mod users;

pub use devices::*;
pub use envelope::*;
pub use users::*;

// std
use std::time::Duration as StdDuration;
// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenGrant},
	clock::Clock,
	config::{ClientConfig, Region},
	error::ConfigError,
	flows::{Grant, TokenManager, common},
	http::{ApiRequest, HttpMethod, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestTuyaClient = TuyaClient<ReqwestHttpClient>;

/// Signed OpenAPI client bound to one cloud project.
pub struct TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	tokens: TokenManager<C>,
}
impl TuyaClient<dyn HttpTransport> {
	/// Starts building a client for `credentials`.
	pub fn builder(credentials: Credentials) -> ClientBuilder {
		ClientBuilder::new(credentials)
	}
}
impl<C> TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Wraps an existing token manager; the client shares its transport and token state.
	pub fn from_token_manager(tokens: TokenManager<C>) -> Self {
		Self { tokens }
	}

	/// Returns the token manager signing every call.
	pub fn token_manager(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Returns the application schema used by user endpoints.
	pub fn schema(&self) -> &str {
		&self.tokens.credentials().schema
	}

	/// Acquires a fresh token pair, replacing the cached one.
	pub async fn get_access_token(&self, grant: &Grant) -> Result<TokenGrant> {
		self.tokens.acquire(grant).await
	}

	/// Rotates the cached token pair, acquiring one if none is cached.
	pub async fn refresh_token(&self, grant: &Grant) -> Result<TokenGrant> {
		self.tokens.refresh(grant).await
	}

	/// Issues a signed request to `segments` (joined under the base URL) and parses the envelope.
	pub async fn call<B>(
		&self,
		method: HttpMethod,
		segments: &[&str],
		query: &[(&str, String)],
		body: Option<&B>,
	) -> Result<Envelope<Value>>
	where
		B: ?Sized + Serialize,
	{
		const KIND: FlowKind = FlowKind::Request;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.dispatch(method, segments, query, body).await;

		obs::record_result(KIND, "call", &result);

		result
	}

	async fn dispatch<B>(
		&self,
		method: HttpMethod,
		segments: &[&str],
		query: &[(&str, String)],
		body: Option<&B>,
	) -> Result<Envelope<Value>>
	where
		B: ?Sized + Serialize,
	{
		let mut url = common::endpoint_url(self.tokens.base_url(), segments.iter().copied())?;
		let span = FlowSpan::request(method, url.path());

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key, value);
			}
		}

		let mut request = ApiRequest::new(method, url);

		if let Some(body) = body {
			request = request.with_json_body(serde_json::to_vec(body).map_err(Error::RequestBody)?);
		}

		span.instrument(async {
			let header = self.tokens.ensure_header().await?;
			let request = request.with_headers(header.to_pairs());
			let response = self.tokens.http_client().execute(request).await?;

			Envelope::from_response(&response)
		})
		.await
	}

	async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Envelope<Value>> {
		self.call::<Value>(HttpMethod::Get, segments, query, None).await
	}

	async fn post<B>(&self, segments: &[&str], body: &B) -> Result<Envelope<Value>>
	where
		B: ?Sized + Serialize,
	{
		self.call(HttpMethod::Post, segments, &[], Some(body)).await
	}

	async fn delete(&self, segments: &[&str]) -> Result<Envelope<Value>> {
		self.call::<Value>(HttpMethod::Delete, segments, &[], None).await
	}
}
impl<C> Clone for TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { tokens: self.tokens.clone() }
	}
}
impl<C> Debug for TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TuyaClient").field("tokens", &self.tokens).finish()
	}
}

/// Builder for [`TuyaClient`]; validation happens in `build`.
pub struct ClientBuilder {
	credentials: Credentials,
	config: ClientConfig,
	region_code: Option<String>,
	base_url: Option<String>,
	grant: Grant,
	clock: Option<Arc<dyn Clock>>,
}
impl ClientBuilder {
	fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			config: ClientConfig::default(),
			region_code: None,
			base_url: None,
			grant: Grant::default(),
			clock: None,
		}
	}

	/// Replaces every tunable at once.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;

		self
	}

	/// Selects a region.
	pub fn region(mut self, region: Region) -> Self {
		self.config.region = region;
		self.region_code = None;

		self
	}

	/// Selects a region by code (`cn`, `us`, `eu`); unknown codes fail in `build`.
	pub fn region_code(mut self, code: impl Into<String>) -> Self {
		self.region_code = Some(code.into());

		self
	}

	/// Overrides the lead time before expiry at which tokens are refreshed.
	pub fn refresh_threshold(mut self, threshold: Duration) -> Self {
		self.config.refresh_threshold = if threshold.is_negative() { Duration::ZERO } else { threshold };

		self
	}

	/// Toggles TLS certificate validation for the default transport.
	pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
		self.config.accept_invalid_certs = accept;

		self
	}

	/// Sets or clears the per-request timeout of the default transport.
	pub fn request_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.config.request_timeout = timeout;

		self
	}

	/// Overrides the region host; parsed and validated in `build`.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Sets the grant used for automatic token acquisition.
	pub fn grant(mut self, grant: Grant) -> Self {
		self.grant = grant;

		self
	}

	/// Replaces the time source.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);

		self
	}

	/// Validates the configuration and returns the final [`ClientConfig`].
	pub fn resolve_config(&self) -> Result<ClientConfig> {
		let mut config = self.config.clone();

		if let Some(code) = &self.region_code {
			config.region = code.parse()?;
		}
		if let Some(raw) = &self.base_url {
			let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
				url: raw.clone(),
				source: Some(source),
			})?;

			config.base_url = Some(url);
		}

		config.base_url()?;

		Ok(config)
	}

	/// Builds a client on top of a caller-provided transport.
	pub fn build_with_http_client<C>(self, http_client: impl Into<Arc<C>>) -> Result<TuyaClient<C>>
	where
		C: ?Sized + HttpTransport,
	{
		let config = self.resolve_config()?;
		let mut tokens = TokenManager::with_http_client(self.credentials, &config, http_client)?
			.with_grant(self.grant);

		if let Some(clock) = self.clock {
			tokens = tokens.with_clock(clock);
		}

		Ok(TuyaClient::from_token_manager(tokens))
	}

	/// Builds a client with its own reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn build(self) -> Result<TuyaClient<ReqwestHttpClient>> {
		let config = self.resolve_config()?;
		let http_client = ReqwestHttpClient::from_config(&config)?;

		self.build_with_http_client(http_client)
	}
}

impl Debug for ClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("credentials", &self.credentials)
			.field("config", &self.config)
			.field("region_code", &self.region_code)
			.field("base_url", &self.base_url)
			.field("grant_type", &self.grant.grant_type())
			.field("custom_clock", &self.clock.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{
		collections::HashMap,
		sync::atomic::{AtomicUsize, Ordering},
	};
	// self
	use super::*;
	use crate::{
		error::TransportError,
		http::{ApiResponse, TransportFuture},
	};

	#[derive(Default)]
	struct CountingTransport(AtomicUsize);
	impl HttpTransport for CountingTransport {
		fn execute(&self, _: ApiRequest) -> TransportFuture<'_> {
			self.0.fetch_add(1, Ordering::SeqCst);

			Box::pin(async {
				Ok::<_, TransportError>(ApiResponse { status: 500, body: Vec::new() })
			})
		}
	}

	#[tokio::test]
	async fn unencodable_body_fails_before_any_request() {
		let transport = Arc::new(CountingTransport::default());
		let client: TuyaClient<CountingTransport> =
			TuyaClient::builder(Credentials::new("cid", "secret", "schema"))
				.build_with_http_client(transport.clone())
				.expect("Client should build with a custom transport.");
		let body = HashMap::from([((1, 2), 3)]);
		let err = client
			.call(HttpMethod::Post, &["v1.0", "devices", "token"], &[], Some(&body))
			.await
			.expect_err("Maps with non-string keys should not encode.");

		assert!(matches!(err, Error::RequestBody(_)));
		assert!(!err.is_retryable());
		assert_eq!(transport.0.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn unknown_region_fails_construction() {
		let err = TuyaClient::builder(Credentials::new("cid", "secret", "schema"))
			.region_code("jp")
			.resolve_config()
			.expect_err("Region `jp` should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::UnsupportedRegion { .. })));
	}

	#[test]
	fn builder_merges_overrides() {
		let config = TuyaClient::builder(Credentials::new("cid", "secret", "schema"))
			.region_code("eu")
			.refresh_threshold(Duration::seconds(-5))
			.base_url("http://127.0.0.1:9000")
			.resolve_config()
			.expect("Builder overrides should validate.");

		assert_eq!(config.region, Region::Eu);
		assert_eq!(config.refresh_threshold, Duration::ZERO);
		assert_eq!(
			config.base_url().expect("Override should be valid.").as_str(),
			"http://127.0.0.1:9000/"
		);
	}

	#[test]
	fn malformed_base_url_is_rejected() {
		let err = TuyaClient::builder(Credentials::new("cid", "secret", "schema"))
			.base_url("not a url")
			.resolve_config()
			.expect_err("Malformed URLs should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { source: Some(_), .. })));
	}
}
