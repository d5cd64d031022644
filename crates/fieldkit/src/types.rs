//! Core types for FieldKit

use crate::error::ExtractError;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Request to extract fields from a web page
///
/// Absent and `null` keys deserialize as empty values so that a missing key
/// and an empty one are rejected the same way by [`ExtractRequest::validate`].
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    /// The page to fetch (required, must be http:// or https://)
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Names of the fields to extract, in order (required, non-empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<String>,

    /// Completion model identifier, e.g. "gpt-4o-mini" (required)
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,

    /// Provider credential, used for this request only (required)
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl std::fmt::Debug for ExtractRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractRequest")
            .field("url", &self.url)
            .field("fields", &self.fields)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ExtractRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Append a field to extract
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Replace the list of fields to extract
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the completion model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the provider credential
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Check that every required parameter is present and non-empty
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.url.is_empty()
            || self.fields.is_empty()
            || self.model.is_empty()
            || self.api_key.is_empty()
        {
            return Err(ExtractError::MissingParameters);
        }
        Ok(())
    }
}

/// Successful extraction result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    /// Text produced by the completion provider
    pub result: String,

    /// Whitespace-delimited word count of the prompt
    pub input_tokens: usize,

    /// Whitespace-delimited word count of the result
    pub output_tokens: usize,

    /// Estimated cost in dollars
    pub total_cost: f64,
}

/// JSON error payload returned by the HTTP boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    /// Human readable failure message
    pub error: String,
}

impl ErrorBody {
    /// Create a new error payload
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
