//! Extractor builder and request handling

use crate::completion::{CompletionProvider, OpenAiProvider};
use crate::convert::html_to_text;
use crate::error::{CompletionError, ExtractError};
use crate::fetchers::{DefaultFetcher, FetchOptions, Fetcher};
use crate::prompt::build_prompt;
use crate::types::{ExtractRequest, ExtractResponse};
use crate::usage::calculate_usage;
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status update during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractStatus {
    /// Current phase ("validate", "fetch", "convert", "complete", "done")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ExtractStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for configuring an [`Extractor`]
#[derive(Default)]
pub struct ExtractorBuilder {
    /// Custom User-Agent for page fetches
    user_agent: Option<String>,
    /// Allow list of URL prefixes
    allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    block_prefixes: Vec<String>,
    /// Base URL of the OpenAI-compatible API
    api_base: Option<String>,
    /// Custom page fetcher
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Custom completion provider
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ExtractorBuilder {
    /// Create a new extractor builder with default collaborators
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Add URL prefix to allow list
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.allow_prefixes.push(prefix.into());
        self
    }

    /// Add URL prefix to block list
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.block_prefixes.push(prefix.into());
        self
    }

    /// Point the default OpenAI provider at another API base URL
    ///
    /// Ignored when a custom provider is set.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Use a custom page fetcher
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use a custom completion provider
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the extractor
    pub fn build(self) -> Extractor {
        let provider = self.provider.unwrap_or_else(|| match self.api_base {
            Some(api_base) => Arc::new(OpenAiProvider::with_api_base(api_base)),
            None => Arc::new(OpenAiProvider::new()),
        });

        Extractor {
            fetcher: self
                .fetcher
                .unwrap_or_else(|| Arc::new(DefaultFetcher::new())),
            provider,
            fetch_options: FetchOptions {
                user_agent: self.user_agent,
                allow_prefixes: self.allow_prefixes,
                block_prefixes: self.block_prefixes,
            },
        }
    }
}

/// Configured extraction handler
///
/// Immutable once built; share it behind an `Arc` across requests.
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    provider: Arc<dyn CompletionProvider>,
    fetch_options: FetchOptions,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("fetcher", &self.fetcher.name())
            .field("provider", &self.provider.name())
            .field("fetch_options", &self.fetch_options)
            .finish()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        ExtractorBuilder::new().build()
    }
}

impl Extractor {
    /// Create a new extractor builder
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractResponse);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Run one extraction
    pub async fn execute(&self, req: ExtractRequest) -> Result<ExtractResponse, ExtractError> {
        self.execute_with_status(req, |_| {}).await
    }

    /// Run one extraction with status updates
    ///
    /// Validation happens before any I/O. The page fetch and the completion
    /// call run strictly in sequence and are never retried.
    pub async fn execute_with_status<F>(
        &self,
        req: ExtractRequest,
        mut status_callback: F,
    ) -> Result<ExtractResponse, ExtractError>
    where
        F: FnMut(ExtractStatus),
    {
        status_callback(ExtractStatus::new("validate").with_percent(0.0));
        req.validate()?;

        status_callback(
            ExtractStatus::new("fetch")
                .with_message(req.url.clone())
                .with_percent(10.0),
        );
        let html = self
            .fetcher
            .fetch(&req.url, &self.fetch_options)
            .await
            .inspect_err(|e| warn!(url = %req.url, error = %e, "Page fetch failed"))?;

        status_callback(ExtractStatus::new("convert").with_percent(40.0));
        let text = html_to_text(&html);
        let prompt = build_prompt(&req.fields, &text);
        debug!(
            text_length = text.chars().count(),
            prompt_length = prompt.len(),
            "Built extraction prompt"
        );

        status_callback(
            ExtractStatus::new("complete")
                .with_message(req.model.clone())
                .with_percent(50.0),
        );
        let result = self
            .provider
            .complete(&req.model, &req.api_key, &prompt)
            .await?
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::NoResult)?;

        let usage = calculate_usage(&prompt, &result);
        info!(
            url = %req.url,
            model = %req.model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_cost = usage.total_cost,
            "Extraction complete"
        );
        status_callback(ExtractStatus::new("done").with_percent(100.0));

        Ok(ExtractResponse {
            result,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_cost: usage.total_cost,
        })
    }
}
