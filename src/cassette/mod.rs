//! YAML cassettes for recording and replaying port interactions.
//!
//! A cassette is an ordered list of `(port, method, input, output)` entries.
//! Recording adapters append to a [`recorder::CassetteRecorder`]; replaying
//! adapters pull entries back out through a [`replayer::CassetteReplayer`].

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
