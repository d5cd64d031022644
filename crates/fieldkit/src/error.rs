//! Error types for FieldKit

use thiserror::Error;

/// Broad failure category, used to pick the HTTP status at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied missing or malformed input; no I/O was attempted
    Validation,
    /// Retrieving the target page failed
    Fetch,
    /// The completion provider failed or returned nothing usable
    Completion,
}

/// Errors that can occur while extracting fields from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    /// One of url, fields, model or apiKey is absent or empty
    #[error("Missing required parameters")]
    MissingParameters,

    /// Request body could not be decoded into an extraction request
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Page fetch failed
    #[error("Error fetching webpage: {0}")]
    Fetch(#[from] FetchError),

    /// Completion call failed or produced no content
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ExtractError {
    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::MissingParameters | ExtractError::InvalidBody(_) => ErrorKind::Validation,
            ExtractError::Fetch(_) => ErrorKind::Fetch,
            ExtractError::Completion(_) => ErrorKind::Completion,
        }
    }
}

/// Errors that can occur while fetching the target page
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// URL is blocked by prefix list
    #[error("Blocked URL: prefix not allowed")]
    BlockedUrl,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Transport timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(String),

    /// Server answered with a non-2xx status
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(error_chain(&err))
        } else if err.is_connect() {
            FetchError::ConnectError(error_chain(&err))
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::RequestError(error_chain(&err))
        }
    }
}

/// Render an error with its source chain, reqwest keeps the OS detail there
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Errors that can occur while calling the completion provider
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider answered but the first choice carried no content
    #[error("No result from OpenAI")]
    NoResult,

    /// Failed to build HTTP client
    #[error("Failed to create completion client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Provider rejected the request
    #[error("Completion request failed with status code {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure talking to the provider
    #[error("Completion request failed: {0}")]
    RequestError(String),

    /// Provider response did not match the expected shape
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CompletionError::InvalidResponse(err.to_string())
        } else {
            CompletionError::RequestError(error_chain(&err))
        }
    }
}
