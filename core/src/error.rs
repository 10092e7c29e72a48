//! Errors raised by `ReqwestTransport`.
//!
//! # Design
//! The client itself defines no error type: each operation returns whatever
//! its transport reports. This is the default transport's own error. A
//! non-2xx status is not an error; the response comes back as data.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// DNS, connect, TLS, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A multipart file part could not be opened for streaming.
    #[error("failed to open {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}
