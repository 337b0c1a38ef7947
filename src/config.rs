//! Region selection and client configuration.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError};

/// Hosted OpenAPI regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
	/// Mainland China (`openapi.tuyacn.com`).
	#[default]
	Cn,
	/// Americas (`openapi.tuyaus.com`).
	Us,
	/// Europe (`openapi.tuyaeu.com`).
	Eu,
}
impl Region {
	/// Returns the region code used in the host name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Region::Cn => "cn",
			Region::Us => "us",
			Region::Eu => "eu",
		}
	}

	/// Returns the API base URL for the region.
	pub fn base_url(self) -> Result<Url, ConfigError> {
		let raw = format!("https://openapi.tuya{}.com", self.as_str());

		Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source: Some(source) })
	}
}
impl FromStr for Region {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"cn" => Ok(Region::Cn),
			"us" => Ok(Region::Us),
			"eu" => Ok(Region::Eu),
			other => Err(ConfigError::UnsupportedRegion { region: other.to_owned() }),
		}
	}
}
impl TryFrom<String> for Region {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<Region> for String {
	fn from(value: Region) -> Self {
		value.as_str().to_owned()
	}
}
impl Display for Region {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Tunables shared by the token manager, the transport, and the API client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Region whose host receives every call.
	pub region: Region,
	/// Lead time before expiry at which the cached token is refreshed.
	#[serde(with = "seconds")]
	pub refresh_threshold: Duration,
	/// Skips TLS certificate validation. Only for endpoints behind intercepting proxies.
	pub accept_invalid_certs: bool,
	/// Per-request timeout enforced by the transport; `None` disables it.
	pub request_timeout: Option<StdDuration>,
	/// Overrides the region host (proxies, test servers).
	pub base_url: Option<Url>,
}
impl ClientConfig {
	/// Default refresh lead time (300 seconds).
	pub const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::seconds(300);
	/// Default per-request timeout (30 seconds).
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a configuration for `region` with default tunables.
	pub fn new(region: Region) -> Self {
		Self { region, ..Default::default() }
	}

	/// Returns the validated base URL every endpoint path is joined onto.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let Some(url) = &self.base_url else {
			return self.region.base_url();
		};

		if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidBaseUrl { url: url.to_string(), source: None });
		}

		Ok(url.clone())
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			region: Region::default(),
			refresh_threshold: Self::DEFAULT_REFRESH_THRESHOLD,
			accept_invalid_certs: false,
			request_timeout: Some(Self::DEFAULT_REQUEST_TIMEOUT),
			base_url: None,
		}
	}
}

mod seconds {
	// crates.io
	use serde::{Deserialize, Deserializer, Serializer};
	use time::Duration;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(|secs| Duration::seconds(secs.max(0)))
	}
}
