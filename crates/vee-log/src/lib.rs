//! # vee-log
//!
//! The durable conversation record and its read paths:
//!
//! - [`ConversationLog`]: append-only, date-partitioned NDJSON log of every
//!   answered exchange — the source of truth for history reconstruction.
//! - History reconstruction: bounded backward scans rebuilding a user's
//!   turns, conversation summaries, and one conversation's messages.
//! - [`MirrorSink`]: best-effort post-commit replication seam.
//!
//! The on-disk schema (one JSON object per line, snake_case fields, one
//! file per UTC day named `conversations_YYYY-MM-DD.jsonl`) is shared with
//! log files written by earlier generations of this system and must not
//! change shape.
//!
//! ## Crate Position
//!
//! Depends on: vee-core. Depended on by: vee-runtime, vee.

#![deny(unsafe_code)]

pub mod entry;
pub mod errors;
pub mod history;
pub mod log;
pub mod mirror;

pub use entry::{AppendRequest, ConversationMessage, ConversationSummary, LogEntry};
pub use errors::{LogError, Result};
pub use log::ConversationLog;
pub use mirror::{FsMirrorSink, MirrorError, MirrorSink};
