//! User endpoints.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::{Envelope, TuyaClient},
	http::HttpTransport,
};

/// Registration payload for [`TuyaClient::add_user`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
	/// Country calling code, e.g. `86`.
	pub country_code: String,
	/// Account name (phone number, email, or plain username).
	pub username: String,
	/// Account password.
	pub password: String,
	/// Display name.
	pub nick_name: String,
	/// Kind of `username`: `1` mobile, `2` email, `3` plain username.
	pub username_type: String,
}
impl NewUser {
	/// Default `username_type` (plain username).
	pub const DEFAULT_USERNAME_TYPE: &'static str = "3";

	/// Creates a plain-username registration.
	pub fn new(
		country_code: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
		nick_name: impl Into<String>,
	) -> Self {
		Self {
			country_code: country_code.into(),
			username: username.into(),
			password: password.into(),
			nick_name: nick_name.into(),
			username_type: Self::DEFAULT_USERNAME_TYPE.into(),
		}
	}

	/// Overrides the username type.
	pub fn with_username_type(mut self, username_type: impl Into<String>) -> Self {
		self.username_type = username_type.into();

		self
	}
}

impl<C> TuyaClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the users registered under the app schema (`page_no` starts at 1).
	pub async fn get_users(&self, page_no: u32, page_size: u32) -> Result<Envelope<Value>> {
		let schema = self.schema();

		self.get(
			&["v1.0", "apps", schema, "users"],
			&[("page_no", page_no.to_string()), ("page_size", page_size.to_string())],
		)
		.await
	}

	/// Registers a user under the app schema.
	pub async fn add_user(&self, user: &NewUser) -> Result<Envelope<Value>> {
		let schema = self.schema();

		self.post(&["v1.0", "apps", schema, "user"], user).await
	}

	/// Lists the devices bound to the user `uid`.
	pub async fn get_user_devices(&self, uid: &str) -> Result<Envelope<Value>> {
		self.get(&["v1.0", "users", uid, "devices"], &[]).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn new_user_defaults_to_plain_username() {
		let user = NewUser::new("86", "test", "123456", "tester");
		let json = serde_json::to_value(&user).expect("Registration payload should serialize.");

		assert_eq!(json["username_type"], "3");
		assert_eq!(json["nick_name"], "tester");
		assert_eq!(user.with_username_type("2").username_type, "2");
	}
}
