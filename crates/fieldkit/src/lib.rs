//! FieldKit - LLM-assisted field extraction from web pages
//!
//! Fetches a URL, reduces the HTML body to plain text, asks an
//! OpenAI-compatible chat completion API to extract named fields from it,
//! and reports a rough token/cost estimate.
//!
//! ## Collaborators
//!
//! The [`Extractor`] talks to the outside world through two traits:
//! - [`Fetcher`] - retrieves the page ([`DefaultFetcher`] uses reqwest)
//! - [`CompletionProvider`] - generates the answer ([`OpenAiProvider`])
//!
//! The [`server`] module exposes the extractor as `POST /api/scrape`.

pub mod client;
pub mod completion;
mod convert;
mod error;
mod extractor;
pub mod fetchers;
pub mod prompt;
pub mod server;
mod types;
pub mod usage;

pub use client::extract;
pub use completion::{CompletionProvider, OpenAiProvider, DEFAULT_OPENAI_API_BASE};
pub use convert::html_to_text;
pub use error::{CompletionError, ErrorKind, ExtractError, FetchError};
pub use extractor::{ExtractStatus, Extractor, ExtractorBuilder};
pub use fetchers::{DefaultFetcher, FetchOptions, Fetcher};
pub use types::{ErrorBody, ExtractRequest, ExtractResponse};
pub use usage::{calculate_usage, count_tokens, Usage};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns FieldKit/1.0";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Fetches a web page and extracts named fields from its text with an LLM.

- Reduces HTML to visible body text
- Sends at most 3000 characters of text to the model
- Returns the model's answer with a token and cost estimate"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# FieldKit

Fetches a web page, reduces it to plain text and asks an OpenAI-compatible
chat completion model to extract the requested fields.

## Endpoint
`POST /api/scrape` with a JSON body.

## Input Parameters
- `url` (required): The page to fetch (must be http:// or https://)
- `fields` (required): Non-empty list of field names to extract
- `model` (required): Completion model, e.g. "gpt-4o-mini"
- `apiKey` (required): Provider API key, used for this request only

## Output Fields
- `result`: The model's answer
- `inputTokens`: Whitespace-delimited words in the prompt
- `outputTokens`: Whitespace-delimited words in the answer
- `totalCost`: (inputTokens + outputTokens) * 0.00002

## Examples

### Extract a title and a price
```json
{"url": "https://example.com", "fields": ["title", "price"], "model": "gpt-4o-mini", "apiKey": "sk-..."}
```

## Error Handling
- 400 `{"error": "Missing required parameters"}` when a parameter is absent or empty
- 400 `{"error": "Invalid request body: ..."}` when the body is not valid JSON of the right shape
- 500 `{"error": "Error fetching webpage: ..."}` when the page cannot be retrieved
- 500 `{"error": "No result from OpenAI"}` when the model returns no content
- 405 `{"error": "Method not allowed"}` for any method other than POST
"#;
