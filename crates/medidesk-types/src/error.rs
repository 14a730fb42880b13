use thiserror::Error;

/// Errors from talking to the clinic server.
///
/// Flows never show these to the user; every variant collapses into the
/// fixed notice of the flow that hit it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid server url '{0}'")]
    InvalidBaseUrl(String),
}
