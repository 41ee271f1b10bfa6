//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::SystemClock;
use crate::adapters::live::llm::GeminiClient;
use crate::adapters::recording::{RecordingClock, RecordingLlmClient};
use crate::adapters::replaying::{ReplayingClock, ReplayingLlmClient};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::llm::{GenerateRequest, LlmClient, LlmFuture};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Clock used to stamp and number new tasks.
    pub clock: Box<dyn Clock>,
    /// Text-generation client used by the suggestion fetcher.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a live context talking to the Gemini API.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self { clock: Box::new(SystemClock), llm: Box::new(GeminiClient::from_config(config)) }
    }

    /// Creates a live context whose interactions are captured by `session`.
    ///
    /// The context must be dropped before `session.finish()` is called.
    #[must_use]
    pub fn recording(config: &Config, session: &RecordingSession) -> Self {
        Self {
            clock: Box::new(RecordingClock::new(Box::new(SystemClock), Arc::clone(&session.clock))),
            llm: Box::new(RecordingLlmClient::new(
                Box::new(GeminiClient::from_config(config)),
                Arc::clone(&session.llm),
            )),
        }
    }

    /// Starts a recording session under `root` and returns a context wired to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(config: &Config, root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(root)?;
        let ctx = Self::recording(config, &session);
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette holding every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;

        // Separate replayers keep per-port cursors independent.
        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            llm: Box::new(ReplayingLlmClient::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            llm: match replayers.llm {
                Some(r) => Box::new(ReplayingLlmClient::new(r)),
                None => Box::new(PanickingLlmClient),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingLlmClient;
impl LlmClient for PanickingLlmClient {
    fn generate(&self, _request: &GenerateRequest) -> LlmFuture<'_> {
        panic!("LlmClient port not configured in CassetteConfig: no cassette loaded for llm");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[tokio::test]
    async fn replaying_context_from_monolithic_cassette() {
        let dir = std::env::temp_dir().join("taskspark_ctx_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.cassette.yaml");

        let mut rec = CassetteRecorder::new(&path, "full", "abc");
        rec.record("clock", "now", json!(null), json!("2024-06-15T10:30:00Z"));
        rec.record("llm", "generate", json!({}), json!({"ok": {"text": "[\"one\"]"}}));
        rec.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        let request = GenerateRequest { model: "m".into(), prompt: "p".into() };
        assert_eq!(ctx.llm.generate(&request).await.unwrap().text, "[\"one\"]");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_from_per_port_cassettes() {
        let dir = std::env::temp_dir().join("taskspark_ctx_test_ports");
        std::fs::create_dir_all(&dir).unwrap();
        let clock_path = dir.join("clock.cassette.yaml");

        let mut rec = CassetteRecorder::new(&clock_path, "clock", "abc");
        rec.record("clock", "now", json!(null), json!("2024-01-01T00:00:00Z"));
        rec.finish().unwrap();

        let config = CassetteConfig { clock: Some(clock_path), ..CassetteConfig::default() };
        let ctx = ServiceContext::replaying_from(&config).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified()).unwrap();
        let _ = ctx.clock.now();
    }

    #[test]
    fn replaying_missing_file_is_an_error() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/x.cassette.yaml")).err().unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }
}
