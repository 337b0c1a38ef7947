//! Access token lifecycle models.

pub mod grant;
pub mod secret;
pub mod state;
