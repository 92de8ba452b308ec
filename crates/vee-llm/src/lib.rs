//! # vee-llm
//!
//! The completion boundary: a [`ChatClient`] trait for chat and image
//! analysis, an OpenAI-compatible HTTP implementation with per-call timeout
//! budgets, and a scriptable mock for orchestrator tests.
//!
//! A timeout is a first-class outcome here, not a generic transport error:
//! callers must be able to tell "the model took too long" apart from every
//! other failure, because a timed-out exchange is never logged as a
//! completed one.
//!
//! ## Crate Position
//!
//! Depends on: vee-core. Depended on by: vee-runtime, vee.

#![deny(unsafe_code)]

pub mod errors;
pub mod openai;
pub mod service;
mod types;

pub use errors::{LlmError, Result};
pub use openai::{LlmConfig, OpenAiClient};
pub use service::{ChatClient, MockChatClient};
