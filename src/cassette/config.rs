//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path are left unconfigured
/// and panic if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the LLM port cassette file.
    pub llm: Option<PathBuf>,
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the LLM port.
    pub llm: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Config with no cassettes at all; every port panics when called.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Config pointing at the `<port>.cassette.yaml` files a recording
    /// session wrote into `dir`. Missing files are left unconfigured.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self { llm: existing("llm"), clock: existing("clock") }
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            llm: self.llm.as_deref().map(Self::load_port_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn from_session_dir_picks_up_existing_files_only() {
        let dir = std::env::temp_dir().join("taskspark_cassette_config_session");
        std::fs::create_dir_all(&dir).unwrap();
        let mut rec = CassetteRecorder::new(dir.join("llm.cassette.yaml"), "llm", "abc");
        rec.record("llm", "generate", json!({}), json!({"ok": {"text": "[\"a\"]"}}));
        rec.finish().unwrap();
        let _ = std::fs::remove_file(dir.join("clock.cassette.yaml"));

        let config = CassetteConfig::from_session_dir(&dir);
        assert_eq!(config.llm, Some(dir.join("llm.cassette.yaml")));
        assert!(config.clock.is_none());

        let mut replayers = config.load_all().unwrap();
        let llm = replayers.llm.as_mut().unwrap();
        assert_eq!(llm.next_interaction("llm", "generate").output, json!({"ok": {"text": "[\"a\"]"}}));
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_all_with_no_cassettes() {
        let replayers = CassetteConfig::panic_on_unspecified().load_all().unwrap();
        assert!(replayers.llm.is_none());
        assert!(replayers.clock.is_none());
    }

    #[test]
    fn load_all_propagates_parse_errors() {
        let dir = std::env::temp_dir().join("taskspark_cassette_config_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clock.cassette.yaml");
        std::fs::write(&path, "not: [a cassette").unwrap();

        let config = CassetteConfig { clock: Some(path), ..CassetteConfig::default() };
        let err = config.load_all().err().unwrap();
        assert!(err.contains("Failed to parse cassette file"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
