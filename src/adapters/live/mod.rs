//! Live adapters for real external interactions.

pub mod clock;
pub mod llm;
