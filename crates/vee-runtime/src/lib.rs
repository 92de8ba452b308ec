//! # vee-runtime
//!
//! The answer orchestrator: ties the turn store, conversation log, vector
//! index, and completion client together into the two answering flows
//! (text and image).
//!
//! The glue is thin but its ordering contract matters: history fed to the
//! model is reconstructed-then-live, the completion call happens before any
//! write-back, and a turn that produced no answer (timeout, upstream
//! failure) is never written to either sink.
//!
//! ## Crate Position
//!
//! Depends on: vee-core, vee-memory, vee-log, vee-retrieval, vee-llm.
//! Depended on by: vee.

#![deny(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod gate;
pub mod prompt;

pub use engine::{ChatEngine, ChatRequest, EngineConfig, ImageRequest};
pub use errors::{ChatError, Result};
pub use gate::is_food_related;
