//! Issued token pairs and their lifecycle helpers.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status of a [`TokenGrant`] relative to a refresh threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is valid and outside the refresh window.
	Active,
	/// Token is still valid but inside the refresh window.
	RefreshDue,
	/// Token exceeded its expiry instant and must not sign requests.
	Expired,
}

/// Access/refresh token pair issued by a single successful token response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Access token signed into every API call.
	pub access_token: TokenSecret,
	/// Refresh token used to rotate the pair before expiry.
	pub refresh_token: TokenSecret,
	/// User id bound to the token, when the grant carries one.
	pub uid: Option<String>,
	/// Local instant at which the token response was received.
	pub issued_at: OffsetDateTime,
	/// Server-declared lifetime of the access token.
	pub expires_in: Duration,
}
impl TokenGrant {
	/// Absolute expiry instant, saturating at the largest representable instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at
			.checked_add(self.expires_in)
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc())
	}

	/// Instant after which a refresh should be attempted, saturating at the smallest
	/// representable instant.
	pub fn refresh_due_at(&self, threshold: Duration) -> OffsetDateTime {
		self.expires_at()
			.checked_sub(threshold)
			.unwrap_or_else(|| PrimitiveDateTime::MIN.assume_utc())
	}

	/// Computes the lifecycle status at `instant`.
	///
	/// Both boundaries are exclusive: a token is expired only once `instant` is strictly past the
	/// expiry instant, and refresh becomes due strictly past `expires_at - threshold`.
	pub fn status_at(&self, instant: OffsetDateTime, threshold: Duration) -> TokenStatus {
		if instant > self.expires_at() {
			return TokenStatus::Expired;
		}
		if instant > self.refresh_due_at(threshold) {
			return TokenStatus::RefreshDue;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the grant has expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant > self.expires_at()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn grant() -> TokenGrant {
		TokenGrant {
			access_token: TokenSecret::new("access"),
			refresh_token: TokenSecret::new("refresh"),
			uid: None,
			issued_at: macros::datetime!(2025-01-01 00:00 UTC),
			expires_in: Duration::hours(2),
		}
	}

	#[test]
	fn status_transitions_cover_all_states() {
		let grant = grant();
		let threshold = Duration::seconds(300);

		assert_eq!(grant.expires_at(), macros::datetime!(2025-01-01 02:00 UTC));
		assert_eq!(
			grant.status_at(macros::datetime!(2025-01-01 01:00 UTC), threshold),
			TokenStatus::Active
		);
		assert_eq!(
			grant.status_at(macros::datetime!(2025-01-01 01:55 UTC), threshold),
			TokenStatus::Active
		);
		assert_eq!(
			grant.status_at(macros::datetime!(2025-01-01 01:55:01 UTC), threshold),
			TokenStatus::RefreshDue
		);
		assert_eq!(
			grant.status_at(macros::datetime!(2025-01-01 02:00 UTC), threshold),
			TokenStatus::RefreshDue
		);
		assert_eq!(
			grant.status_at(macros::datetime!(2025-01-01 02:00:01 UTC), threshold),
			TokenStatus::Expired
		);
	}

	#[test]
	fn threshold_wider_than_lifetime_is_always_due() {
		let grant = grant();

		assert_eq!(
			grant.status_at(grant.issued_at + Duration::seconds(1), Duration::hours(3)),
			TokenStatus::RefreshDue
		);
		assert!(!grant.is_expired_at(grant.issued_at));
	}

	#[test]
	fn out_of_range_instants_saturate() {
		let long_lived = TokenGrant { expires_in: Duration::seconds(1_000_000_000_000), ..grant() };

		assert_eq!(long_lived.expires_at(), PrimitiveDateTime::MAX.assume_utc());
		assert_eq!(
			long_lived.status_at(long_lived.issued_at, Duration::seconds(300)),
			TokenStatus::Active
		);

		let grant = grant();

		assert_eq!(grant.refresh_due_at(Duration::MAX), PrimitiveDateTime::MIN.assume_utc());
		assert_eq!(grant.status_at(grant.issued_at, Duration::MAX), TokenStatus::RefreshDue);
	}
}
