//! Async Tuya OpenAPI client with signed requests and self-refreshing, singleflight access
//! tokens.
//!
//! The crate is split along the request path:
//!
//! - [`sign`] computes the vendor signature for a client id, secret, optional token and timestamp.
//! - [`flows::TokenManager`] owns the cached token and decides, per call, whether to acquire a new
//!   token, refresh the current one, or reuse it before handing out a [`auth::SignedHeader`].
//! - [`api::TuyaClient`] wraps the user and device endpoints on top of the manager.
//! - [`http::HttpTransport`] is the only dependency on an HTTP stack; a reqwest implementation
//!   ships behind the default `reqwest` feature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod sign;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};

pub use api::TuyaClient;
pub use auth::{Credentials, SignedHeader};
pub use config::{ClientConfig, Region};
pub use error::{Error, Result};
pub use flows::{Grant, TokenManager};
