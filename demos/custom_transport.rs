//! Demonstrates plugging a custom [`HttpTransport`] into the client.
//!
//! The transport below answers from memory and logs every signed request, which is also how the
//! client can be wired to an HTTP stack other than reqwest.

// std
use std::sync::{Arc, Mutex};
// crates.io
use color_eyre::Result;
// self
use tuya_openapi::{
	Credentials, TuyaClient,
	api::Command,
	http::{ApiRequest, ApiResponse, HttpTransport, TransportFuture},
};

#[derive(Default)]
struct CannedTransport {
	seen: Mutex<Vec<String>>,
}
impl HttpTransport for CannedTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let line = format!(
			"{} {} sign={}",
			request.method,
			request.url.path(),
			request.header("sign").unwrap_or("-")
		);

		if let Ok(mut seen) = self.seen.lock() {
			seen.push(line);
		}

		let body = if request.url.path() == "/v1.0/token" {
			"{\"success\":true,\"t\":1,\"result\":{\"access_token\":\"canned-access\",\
			 \"refresh_token\":\"canned-refresh\",\"expire_time\":7200}}"
		} else {
			"{\"success\":true,\"t\":1,\"result\":true}"
		};

		Box::pin(async move { Ok(ApiResponse { status: 200, body: body.as_bytes().to_vec() }) })
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let transport = Arc::new(CannedTransport::default());
	let client: TuyaClient<CannedTransport> =
		TuyaClient::builder(Credentials::new("demo-client", "demo-secret", "demo-schema"))
			.build_with_http_client(transport.clone())?;
	let sent = client
		.send_commands("device-1", &[Command::new("switch_led", true)])
		.await?
		.into_result()?;

	println!("Command accepted: {sent:?}.");

	if let Ok(seen) = transport.seen.lock() {
		for line in seen.iter() {
			println!("{line}");
		}
	}

	Ok(())
}
