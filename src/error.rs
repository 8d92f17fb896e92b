//! Error types for the Uphold client.
//!
//! Every call returns one of a small, closed set of failures. Responses that
//! made it back from the API (`Api`, `RateLimit`) carry the [`Response`]
//! envelope so callers can still look at status, headers and rate counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::http::{Rate, Response};

/// A specialized `Result` type for Uphold operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response from the API.
    #[error("API error: {0}")]
    Api(ErrorResponse),

    /// 429 with the remaining-requests counter at zero.
    #[error("{0}")]
    RateLimit(RateLimitError),

    /// Connection, timeout or body read failure in the HTTP transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON encoding of a request body or decoding of a response body failed.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Writing a raw response body into the caller's sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A resource passed to a service is missing data the call needs, such as an id.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// The envelope of the response that produced this error, if one was received.
    pub fn response(&self) -> Option<&Response> {
        self.api_error().map(|e| &e.response)
    }

    /// The generic API error. Rate limit errors are API errors too.
    pub fn api_error(&self) -> Option<&ErrorResponse> {
        match self {
            Error::Api(e) => Some(e),
            Error::RateLimit(e) => Some(&e.error),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.response().map(|r| r.status())
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimit(_))
    }
}

/// Structured error body returned by the API. All fields are best effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

/// Validation failure on a single field of a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub code: String,
}

/// Present when the account is blocked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        rename = "created_at",
        alias = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A non-2xx response from the API.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub response: Response,
    /// Parsed error body; `None` when the body was empty or not the expected shape.
    pub body: Option<ErrorBody>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.message.as_deref())
    }

    pub fn errors(&self) -> &[FieldError] {
        self.body.as_ref().map(|b| b.errors.as_slice()).unwrap_or(&[])
    }

    pub fn block(&self) -> Option<&Block> {
        self.body.as_ref().and_then(|b| b.block.as_ref())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.response.status();
        write!(
            f,
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )?;
        if let Some(msg) = self.message() {
            write!(f, ": {}", msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorResponse {}

/// Returned when the API rate limit for the current window is exhausted.
#[derive(Debug, Clone)]
pub struct RateLimitError {
    pub error: ErrorResponse,
    pub rate: Rate,
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rate.reset_at {
            Some(reset) => write!(
                f,
                "rate limit exhausted; window resets at {}, retry after {}s",
                reset.to_rfc3339(),
                self.rate.retry_after
            ),
            None => write!(
                f,
                "rate limit exhausted; retry after {}s",
                self.rate.retry_after
            ),
        }
    }
}

impl std::error::Error for RateLimitError {}
