//! # vee-memory
//!
//! Fast, ephemeral, process-local conversation memory keyed by conversation
//! id — the Turn Store. Conversations live for the lifetime of the process
//! and are evicted after a period of inactivity; the durable conversation
//! log (vee-log) is the source of truth beyond that.
//!
//! ## Crate Position
//!
//! Depends on: vee-core. Depended on by: vee-runtime, vee.

#![deny(unsafe_code)]

pub mod store;

pub use store::{TurnStore, DEFAULT_MAX_AGE_HOURS};
