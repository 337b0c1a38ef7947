#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::{OffsetDateTime, macros};
// self
use tuya_openapi::{
	Credentials, Error, TuyaClient,
	api::{Command, DeviceTokenRequest, NewUser},
	clock::ManualClock,
	http::ReqwestHttpClient,
	sign,
};

const START: OffsetDateTime = macros::datetime!(2023-11-14 22:13:20 UTC);
const TOKEN_BODY: &str = "{\"success\":true,\"t\":1700000000000,\"result\":{\"access_token\":\
	\"access-1\",\"refresh_token\":\"refresh-1\",\"expire_time\":7200}}";
const OK_BODY: &str = "{\"success\":true,\"t\":1700000000000,\"result\":true}";

async fn setup() -> (MockServer, TuyaClient<ReqwestHttpClient>) {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;

	let client = TuyaClient::builder(Credentials::new("cid-1", "sec-1", "schema-1"))
		.base_url(server.base_url())
		.clock(Arc::new(ManualClock::new(START)))
		.build()
		.expect("Client should build against the mock server.");

	(server, client)
}

#[tokio::test]
async fn get_users_sends_signed_paged_request() {
	let (server, client) = setup().await;
	let expected_sign = sign::sign("cid-1", "sec-1", "access-1", 1_700_000_000_000);
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/apps/schema-1/users")
				.query_param("page_no", "2")
				.query_param("page_size", "20")
				.header("client_id", "cid-1")
				.header("access_token", "access-1")
				.header("sign", expected_sign.as_str())
				.header("t", "1700000000000");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"t\":1700000000000,\"result\":{\"has_more\":false,\"list\":[]}}",
			);
		})
		.await;
	let result = client
		.get_users(2, 20)
		.await
		.expect("User listing should succeed.")
		.into_result()
		.expect("Envelope should report success.");

	assert_eq!(result, Some(json!({ "has_more": false, "list": [] })));

	users_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn add_user_posts_registration_json() {
	let (server, client) = setup().await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/apps/schema-1/user")
				.header("content-type", "application/json")
				.json_body(json!({
					"country_code": "86",
					"username": "alice",
					"password": "secret",
					"nick_name": "Alice",
					"username_type": "3"
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"t\":1,\"result\":{\"uid\":\"uid-9\"}}");
		})
		.await;
	let result = client
		.add_user(&NewUser::new("86", "alice", "secret", "Alice"))
		.await
		.expect("Registration should succeed.")
		.into_result()
		.expect("Envelope should report success.");

	assert_eq!(result, Some(json!({ "uid": "uid-9" })));

	user_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn device_token_uses_camel_case_time_zone() {
	let (server, client) = setup().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/devices/token").json_body(json!({
				"uid": "uid-1",
				"timeZoneId": "Asia/Shanghai",
				"lon": null,
				"lat": null,
				"lang": "zh"
			}));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"t\":1,\"result\":{\"token\":\"pair-1\",\"secret\":\"s\"}}",
			);
		})
		.await;

	client
		.generate_device_token(&DeviceTokenRequest::new("uid-1", "Asia/Shanghai"))
		.await
		.expect("Pairing token request should succeed.");

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn device_reads_hit_their_paths() {
	let (server, client) = setup().await;
	let mut mocks = Vec::new();

	for path in [
		"/v1.0/users/uid-1/devices",
		"/v1.0/devices/tokens/pair-1",
		"/v1.0/devices/dev-1",
		"/v1.0/functions/dj",
		"/v1.0/devices/dev-1/functions",
		"/v1.0/devices/dev-1/status",
	] {
		mocks.push(
			server
				.mock_async(|when, then| {
					when.method(GET).path(path).header("access_token", "access-1");
					then.status(200).header("content-type", "application/json").body(OK_BODY);
				})
				.await,
		);
	}

	client.get_user_devices("uid-1").await.expect("User devices should load.");
	client.get_devices_by_token("pair-1").await.expect("Paired devices should load.");
	client.get_device("dev-1").await.expect("Device should load.");
	client.get_category_functions("dj").await.expect("Category functions should load.");
	client.get_device_functions("dev-1").await.expect("Device functions should load.");
	client.get_device_status("dev-1").await.expect("Device status should load.");

	for mock in mocks {
		mock.assert_calls_async(1).await;
	}
}

#[tokio::test]
async fn batch_reads_join_device_ids() {
	let (server, client) = setup().await;
	let devices_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/devices").query_param("device_ids", "dev-1,dev-2");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;
	let status_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/devices/status").query_param("device_ids", "dev-1,dev-2");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;

	client.get_devices(&["dev-1", "dev-2"]).await.expect("Device batch should load.");
	client.get_devices_status(&["dev-1", "dev-2"]).await.expect("Status batch should load.");

	devices_mock.assert_calls_async(1).await;
	status_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn commands_and_deletion_use_write_methods() {
	let (server, client) = setup().await;
	let commands_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/devices/dev-1/commands").json_body(json!({
				"commands": [{ "code": "switch_led", "value": true }]
			}));
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1.0/devices/dev-1").header("access_token", "access-1");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;

	client
		.send_commands("dev-1", &[Command::new("switch_led", true)])
		.await
		.expect("Commands should be accepted.");
	client.delete_device("dev-1").await.expect("Deletion should be accepted.");

	commands_mock.assert_calls_async(1).await;
	delete_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn vendor_failures_surface_as_api_errors() {
	let (server, client) = setup().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/devices/dev-404");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":false,\"code\":2001,\"msg\":\"device is offline\",\"t\":1}",
			);
		})
		.await;

	let envelope = client.get_device("dev-404").await.expect("Failure envelopes still parse.");

	assert!(!envelope.success);

	let err = envelope.into_result().expect_err("Failure envelopes should map to errors.");

	assert!(
		matches!(err, Error::Api { code: Some(2001), ref message } if message == "device is offline")
	);
}

#[tokio::test]
async fn token_is_reused_across_endpoint_calls() {
	let (server, client) = setup().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/devices/dev-1");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;

	for _ in 0..3 {
		client.get_device("dev-1").await.expect("Device should load.");
	}

	let metrics = client.token_manager().metrics();

	assert_eq!(metrics.acquisitions(), 1);
	assert_eq!(metrics.reuses(), 2);
}
