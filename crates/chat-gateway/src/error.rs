//! Gateway errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] twilight_http::Error),

    #[error("Response body error: {0}")]
    Body(#[from] twilight_http::response::DeserializeBodyError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Invalid id: {0}")]
    InvalidId(u64),

    /// Discord answered 404 for the id.
    #[error("Not found: {0}")]
    NotFound(u64),

    #[error("Not connected")]
    NotConnected,

    #[error("Send failed: {0}")]
    SendFailed(String),
}
