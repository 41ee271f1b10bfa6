//! Adapter implementations of the port traits.
//!
//! - `live`: real clock and the Gemini HTTP client.
//! - `recording`: wrap a live adapter and capture every call to a cassette.
//! - `replaying`: serve calls from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
