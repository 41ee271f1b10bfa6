//! Replaying adapter for the `LlmClient` port.

use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{GenerateRequest, GenerateResponse, LlmClient, LlmFuture};

/// Serves recorded generation results from a cassette.
///
/// Requests are not matched against the recording; results are served in
/// recorded order.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLlmClient {
    /// Creates a replaying client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn generate(&self, _request: &GenerateRequest) -> LlmFuture<'_> {
        let output = next_output(&self.replayer, "llm", "generate");
        let result = extract_result::<GenerateResponse>(&output, "llm::generate");
        Box::pin(async move { result })
    }
}
