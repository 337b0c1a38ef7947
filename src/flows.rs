//! Token lifecycle orchestration.
//!
//! [`TokenManager`] owns the cached [`TokenState`] behind a single async mutex. Every call to
//! [`TokenManager::ensure_header`] holds the lock across the whole read-decide-fetch-write
//! sequence, so concurrent callers that find an expired token wait for the first caller's
//! acquisition and then reuse its token instead of stampeding the token endpoint.

pub mod common;

mod acquire;
mod metrics;
mod refresh;

pub use common::{Grant, TokenAction, plan};
pub use metrics::TokenMetrics;

// self
use crate::{
	_prelude::*,
	api::Envelope,
	auth::{Credentials, SignedHeader, TokenGrant, TokenState},
	clock::{self, Clock, SystemClock},
	config::ClientConfig,
	error::TransientError,
	http::{ApiRequest, HttpMethod, HttpTransport},
	obs::{self, FlowKind},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Token manager specialized for the crate's default reqwest transport.
pub type ReqwestTokenManager = TokenManager<ReqwestHttpClient>;

/// Acquires, caches, and refreshes the access token, and signs headers with it.
pub struct TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	credentials: Credentials,
	base_url: Url,
	refresh_threshold: Duration,
	grant: Grant,
	clock: Arc<dyn Clock>,
	metrics: Arc<TokenMetrics>,
	state: Arc<AsyncMutex<TokenState>>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a manager that reuses the caller-provided transport.
	///
	/// Fails fast on empty credentials or an unusable base URL.
	pub fn with_http_client(
		credentials: Credentials,
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		credentials.validate()?;

		Ok(Self {
			http_client: http_client.into(),
			credentials,
			base_url: config.base_url()?,
			refresh_threshold: config.refresh_threshold,
			grant: Grant::default(),
			clock: Arc::new(SystemClock),
			metrics: Default::default(),
			state: Default::default(),
		})
	}

	/// Replaces the time source (tests, simulations).
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Sets the grant used when [`ensure_header`](Self::ensure_header) has to acquire a token.
	pub fn with_grant(mut self, grant: Grant) -> Self {
		self.grant = grant;

		self
	}

	/// Returns the credentials used for signing.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the base URL of the token endpoint.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns the shared transport.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Returns the counters recorded by this manager.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	/// Returns the current instant according to the manager's clock.
	pub fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	/// Returns a snapshot of the cached token state.
	pub async fn state(&self) -> TokenState {
		self.state.lock().await.clone()
	}

	/// Drops the cached token so the next header triggers a fresh acquisition.
	pub async fn invalidate(&self) {
		*self.state.lock().await = TokenState::Unauthenticated;
	}

	/// Produces a header signed with a valid access token.
	///
	/// Acquires a token when none is cached or the cached one expired, refreshes it when it is
	/// inside the refresh threshold, and otherwise reuses it. A failed refresh falls back to the
	/// still-valid cached token.
	pub async fn ensure_header(&self) -> Result<SignedHeader> {
		let mut state = self.state.lock().await;

		match common::plan(&state, self.clock.now(), self.refresh_threshold) {
			TokenAction::Acquire => {
				self.acquire_locked(&mut state, &self.grant).await?;
			},
			TokenAction::Refresh => {
				obs::log_decision(FlowKind::Refresh, "token inside refresh threshold");

				if let Err(err) = self.refresh_locked(&mut state, &self.grant).await {
					let now = self.clock.now();

					if state.grant().is_none_or(|grant| grant.is_expired_at(now)) {
						return Err(err);
					}
				}
			},
			TokenAction::Reuse => self.metrics.record_reuse(),
		}

		let access_token = state.access_token()?;
		let timestamp = clock::unix_millis(self.clock.now());

		Ok(SignedHeader::authenticated(&self.credentials, access_token, timestamp))
	}

	/// Calls the token endpoint at `url` and converts the envelope into a [`TokenGrant`].
	async fn request_token(&self, url: Url) -> Result<TokenGrant> {
		let timestamp = clock::unix_millis(self.clock.now());
		let header = SignedHeader::unauthenticated(&self.credentials, timestamp);
		let request = ApiRequest::new(HttpMethod::Get, url).with_headers(header.to_pairs());
		let response = self.http_client.execute(request).await?;
		let envelope = <Envelope<TokenPayload>>::from_response(&response)?;

		if !envelope.success {
			return Err(Error::Authentication {
				code: envelope.code,
				message: envelope.failure_message(),
			});
		}

		let payload = envelope.result.ok_or(TransientError::MissingResult)?;

		if payload.expire_time <= 0 {
			return Err(TransientError::NonPositiveExpireTime { expire_time: payload.expire_time }
				.into());
		}

		let issued_at = self.clock.now();
		let expires_in = Duration::seconds(payload.expire_time);

		if issued_at.checked_add(expires_in).is_none() {
			return Err(TransientError::ExpiryOutOfRange { expire_time: payload.expire_time }.into());
		}

		Ok(TokenGrant {
			access_token: payload.access_token.into(),
			refresh_token: payload.refresh_token.into(),
			uid: payload.uid,
			issued_at,
			expires_in,
		})
	}

	/// Stores a successful grant and records the outcome.
	fn finish(
		&self,
		kind: FlowKind,
		stage: &'static str,
		state: &mut TokenState,
		result: Result<TokenGrant>,
	) -> Result<TokenGrant> {
		obs::record_result(kind, stage, &result);

		match &result {
			Ok(grant) => {
				obs::record_token_lifetime(kind, grant.expires_in);

				*state = TokenState::Authenticated(grant.clone());
			},
			Err(_) => self.metrics.record_failure(),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl TokenManager<ReqwestHttpClient> {
	/// Creates a manager with its own reqwest transport built from `config`.
	pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(config)?;

		Self::with_http_client(credentials, config, http_client)
	}
}
impl<C> Clone for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			credentials: self.credentials.clone(),
			base_url: self.base_url.clone(),
			refresh_threshold: self.refresh_threshold,
			grant: self.grant.clone(),
			clock: self.clock.clone(),
			metrics: self.metrics.clone(),
			state: self.state.clone(),
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("credentials", &self.credentials)
			.field("base_url", &self.base_url.as_str())
			.field("refresh_threshold", &self.refresh_threshold)
			.field("grant_type", &self.grant.grant_type())
			.finish()
	}
}

/// `result` payload of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenPayload {
	access_token: String,
	refresh_token: String,
	/// Lifetime in seconds.
	expire_time: i64,
	#[serde(default)]
	uid: Option<String>,
}
