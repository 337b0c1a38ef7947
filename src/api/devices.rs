//! Device, pairing-token, function, status, and command endpoints.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::{Envelope, TuyaClient},
	http::HttpTransport,
};

/// Pairing-token request for [`TuyaClient::generate_device_token`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTokenRequest {
	/// User id the paired devices will belong to.
	pub uid: String,
	/// IANA time zone of the user, e.g. `Asia/Shanghai`.
	#[serde(rename = "timeZoneId")]
	pub time_zone_id: String,
	/// Longitude.
	pub lon: Option<String>,
	/// Latitude.
	pub lat: Option<String>,
	/// Language of the app, `zh` by default.
	pub lang: String,
}
impl DeviceTokenRequest {
	/// Default language.
	pub const DEFAULT_LANG: &'static str = "zh";

	/// Creates a request without coordinates.
	pub fn new(uid: impl Into<String>, time_zone_id: impl Into<String>) -> Self {
		Self {
			uid: uid.into(),
			time_zone_id: time_zone_id.into(),
			lon: None,
			lat: None,
			lang: Self::DEFAULT_LANG.into(),
		}
	}

	/// Attaches coordinates.
	pub fn with_location(mut self, lon: impl Into<String>, lat: impl Into<String>) -> Self {
		self.lon = Some(lon.into());
		self.lat = Some(lat.into());

		self
	}

	/// Overrides the language.
	pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();

		self
	}
}

/// A single data-point instruction sent to a device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
	/// Function code, e.g. `switch_led`.
	pub code: String,
	/// Target value.
	pub value: Value,
}
impl Command {
	/// Creates a command.
	pub fn new(code: impl Into<String>, value: impl Into<Value>) -> Self {
		Self { code: code.into(), value: value.into() }
	}
}

#[derive(Serialize)]
struct CommandBatch<'a> {
	commands: &'a [Command],
}

impl<C> TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Generates a pairing token for devices joining the account of `request.uid`.
	pub async fn generate_device_token(
		&self,
		request: &DeviceTokenRequest,
	) -> Result<Envelope<Value>> {
		self.post(&["v1.0", "devices", "token"], request).await
	}

	/// Lists the devices paired with a pairing token.
	pub async fn get_devices_by_token(&self, token: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "devices", "tokens", token], &[]).await
	}

	/// Fetches a single device.
	pub async fn get_device(&self, device_id: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "devices", device_id], &[]).await
	}

	/// Fetches several devices at once.
	pub async fn get_devices<S>(&self, device_ids: &[S]) -> Result<Envelope<Value>>
	where
		S: AsRef<str>,
	{
		self.get(&["v1.0", "devices"], &[("device_ids", join_ids(device_ids))]).await
	}

	/// Lists the functions supported by a device category.
	pub async fn get_category_functions(&self, category: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "functions", category], &[]).await
	}

	/// Lists the functions supported by a device.
	pub async fn get_device_functions(&self, device_id: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "devices", device_id, "functions"], &[]).await
	}

	/// Fetches the latest data-point values of a device.
	pub async fn get_device_status(&self, device_id: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "devices", device_id, "status"], &[]).await
	}

	/// Fetches the latest data-point values of several devices.
	pub async fn get_devices_status<S>(&self, device_ids: &[S]) -> Result<Envelope<Value>>
	where
		S: AsRef<str>,
	{
		self.get(&["v1.0", "devices", "status"], &[("device_ids", join_ids(device_ids))]).await
	}

	/// Sends instructions to a device.
	pub async fn send_commands(
		&self,
		device_id: &str,
		commands: &[Command],
	) -> Result<Envelope<Value>> {
		self.post(&["v1.0", "devices", device_id, "commands"], &CommandBatch { commands }).await
	}

	/// Removes a device from its account.
	pub async fn delete_device(&self, device_id: &str) -> Result<Envelope<Value>> {
		self.delete(&["v1.0", "devices", device_id]).await
	}
}

fn join_ids<S>(ids: &[S]) -> String
where
	S: AsRef<str>,
{
	ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}
