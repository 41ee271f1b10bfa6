//! Text-generation port used by the suggestion fetcher.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Error type returned by [`LlmClient`] implementations.
pub type LlmError = Box<dyn Error + Send + Sync>;

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type LlmFuture<'a> = Pin<Box<dyn Future<Output = Result<GenerateResponse, LlmError>> + Send + 'a>>;

/// A single-shot generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The model identifier (e.g. `"gemini-2.5-flash"`).
    pub model: String,
    /// The full prompt text.
    pub prompt: String,
}

/// The text returned by a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text.
    pub text: String,
}

/// Sends generation requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates text for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, unknown model, etc.).
    fn generate(&self, request: &GenerateRequest) -> LlmFuture<'_>;
}
