//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the task list core and an
//! external system (time, text generation). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod llm;

pub use clock::Clock;
pub use llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError, LlmFuture};
