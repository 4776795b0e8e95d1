//! Error types for the geocamera crate.

use std::fmt;

/// Result type for geocamera operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching ground elevation.
///
/// None of these are fatal to the readout: the cache logs them and the
/// affected key simply stays absent until the next lookup.
#[derive(Debug)]
pub enum Error {
    /// The elevation request URL could not be built.
    InvalidUrl {
        /// The URL that was rejected.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The underlying client error.
        source: reqwest::Error,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Response body was not the expected JSON shape.
    Decode {
        /// The URL whose response failed to decode.
        url: String,
        /// The underlying decode error.
        source: reqwest::Error,
    },
    /// Invalid data in response.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUrl { url, message } => {
                write!(f, "invalid elevation url {url}: {message}")
            }
            Error::Http { url, source } => {
                write!(f, "http request to {url} failed: {source}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Decode { url, source } => {
                write!(f, "failed to decode response from {url}: {source}")
            }
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http { source, .. } | Error::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
