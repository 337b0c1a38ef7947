//! Time sources used by token flows.

// std
use std::sync::atomic::{AtomicI64, Ordering};
// self
use crate::_prelude::*;

/// Source of the current instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for tests and simulations.
///
/// Precision is one millisecond, matching the resolution of request timestamps.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);
impl ManualClock {
	/// Creates a clock frozen at `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(AtomicI64::new(unix_millis(instant)))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		self.0.store(unix_millis(instant), Ordering::SeqCst);
	}

	/// Moves the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		let millis = i64::try_from(delta.whole_milliseconds()).unwrap_or(i64::MAX);

		self.0.fetch_add(millis, Ordering::SeqCst);
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		let nanos = i128::from(self.0.load(Ordering::SeqCst)) * 1_000_000;

		OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}
}

/// Milliseconds since the Unix epoch, the unit of the `t` request header.
pub fn unix_millis(instant: OffsetDateTime) -> i64 {
	i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
