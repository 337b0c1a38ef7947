//! Request signature calculation.
//!
//! Every call to the OpenAPI carries a `sign` header computed as the upper-case MD5 hex digest of
//! `client_id + token + secret + t`, where `token` is empty for token-endpoint calls and `t` is the
//! decimal millisecond timestamp also sent in the `t` header. MD5 is mandated by the vendor wire
//! format and must not be swapped for another digest.

// crates.io
use md5::{Digest, Md5};

/// Length of a signature in hex characters.
pub const SIGNATURE_LEN: usize = 32;

/// Computes the signature for a client id, secret, optional token, and timestamp in milliseconds.
///
/// Pass an empty `token` for unauthenticated calls (token acquisition and refresh).
pub fn sign(client_id: &str, secret: &str, token: &str, timestamp_millis: i64) -> String {
	let mut hasher = Md5::new();

	hasher.update(client_id.as_bytes());
	hasher.update(token.as_bytes());
	hasher.update(secret.as_bytes());
	hasher.update(timestamp_millis.to_string().as_bytes());

	format!("{:X}", hasher.finalize())
}
