//! Demonstrates the default reqwest transport against a local mock of the OpenAPI.
//!
//! The first call acquires a token, the second reuses it; both carry signed headers.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use tuya_openapi::{Credentials, TuyaClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token").query_param("grant_type", "1");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"t\":1700000000000,\"result\":{\"access_token\":\"demo-access\",\
				 \"refresh_token\":\"demo-refresh\",\"expire_time\":7200,\"uid\":\"demo-uid\"}}",
			);
		})
		.await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/apps/demo-schema/users")
				.header("access_token", "demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"t\":1700000000000,\"result\":{\"has_more\":false,\
				 \"list\":[{\"uid\":\"u-1\",\"username\":\"alice\"}]}}",
			);
		})
		.await;
	let client = TuyaClient::builder(Credentials::new("demo-client", "demo-secret", "demo-schema"))
		.base_url(server.base_url())
		.build()?;

	for page_no in 1..=2 {
		let users = client.get_users(page_no, 10).await?.into_result()?;

		println!("Page {page_no}: {users:?}.");
	}

	println!("Token endpoint calls: {}.", client.token_manager().metrics().network_calls());

	token_mock.assert_calls_async(1).await;
	users_mock.assert_calls_async(2).await;

	Ok(())
}
