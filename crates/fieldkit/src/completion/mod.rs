//! Completion providers
//!
//! A [`CompletionProvider`] turns a prompt into generated text. The
//! credential travels with every call and is never stored by the provider.

mod openai;

pub use openai::{OpenAiProvider, DEFAULT_OPENAI_API_BASE};

use crate::error::CompletionError;
use async_trait::async_trait;

/// Trait for LLM completion backends
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Unique identifier for this provider (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Send `prompt` as a single user message to `model`
    ///
    /// Returns `Ok(None)` when the provider answered without any content.
    async fn complete(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<Option<String>, CompletionError>;
}
