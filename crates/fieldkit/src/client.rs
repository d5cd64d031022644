//! Convenience entry points for FieldKit
//!
//! The actual request handling lives in [`Extractor`](crate::Extractor);
//! these helpers run it with default collaborators.

use crate::error::ExtractError;
use crate::extractor::Extractor;
use crate::types::{ExtractRequest, ExtractResponse};

/// Extract fields from a page using the default fetcher and OpenAI provider
///
/// For custom fetchers, providers or prefix lists, build an [`Extractor`].
pub async fn extract(req: ExtractRequest) -> Result<ExtractResponse, ExtractError> {
    Extractor::default().execute(req).await
}
