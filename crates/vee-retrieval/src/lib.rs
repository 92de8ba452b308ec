//! # vee-retrieval
//!
//! The knowledge-retrieval boundary: a [`VectorIndex`] trait covering the
//! sidecar vector service's `add`/`query`/`reset` contract, an HTTP client
//! implementation, and a deterministic in-memory mock for tests.
//!
//! Retrieval is a read-mostly dependency of answering: the orchestrator
//! queries for context documents per question; `add`/`reset` exist for the
//! ingestion path, which writes through the same seam.
//!
//! ## Crate Position
//!
//! Depends on: (no internal crates). Depended on by: vee-runtime, vee.

#![deny(unsafe_code)]

pub mod errors;
pub mod http;
pub mod service;
pub mod types;

pub use errors::{Result, RetrievalError};
pub use http::HttpVectorIndex;
pub use service::{MockVectorIndex, VectorIndex};
pub use types::Document;
