//! Credentials, token state, and signed header models.

pub mod credentials;
pub mod header;
pub mod token;

pub use credentials::*;
pub use header::*;
pub use token::{grant::*, secret::*, state::*};
