//! The [`ConversationLog`] — durable, append-only, date-partitioned record
//! of every answered exchange.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use vee_core::time::{today_utc, utc_timestamp};

use crate::entry::{AppendRequest, LogEntry};
use crate::errors::Result;
use crate::mirror::MirrorSink;

/// Append-only conversation log, one NDJSON file per UTC calendar day.
///
/// INVARIANT: entries are never mutated or deleted by this system; the day
/// files are the permanent record and the sole source for history
/// reconstruction beyond what the in-memory turn store retains.
///
/// Appends are line-atomic within this process: an internal lock serializes
/// writers and each entry goes out as a single `write_all` of a full line,
/// so concurrent requests never interleave partial lines. A single writer
/// process per log directory is assumed; replicas must not share one
/// directory.
pub struct ConversationLog {
    dir: PathBuf,
    append_lock: Mutex<()>,
    mirror: Option<(Arc<dyn MirrorSink>, String)>,
}

impl ConversationLog {
    /// Open (creating if needed) a log rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            append_lock: Mutex::new(()),
            mirror: None,
        })
    }

    /// Attach a best-effort mirror sink with the given key prefix.
    #[must_use]
    pub fn with_mirror(mut self, sink: Arc<dyn MirrorSink>, prefix: impl Into<String>) -> Self {
        self.mirror = Some((sink, prefix.into()));
        self
    }

    /// The log directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the day file for `date`.
    pub fn day_file(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("conversations_{}.jsonl", date.format("%Y-%m-%d")))
    }

    /// Append one completed exchange to today's file, creating it if needed.
    ///
    /// A failure writing the local file propagates — it is the log's only
    /// durability guarantee. The mirror push afterwards is fire-and-forget:
    /// its failures are logged and swallowed, and it can neither fail nor
    /// delay the primary write's result.
    pub fn log_conversation(&self, req: &AppendRequest<'_>) -> Result<()> {
        let timestamp = utc_timestamp();
        let entry = LogEntry {
            timestamp,
            user_id: req.user_id.map(str::to_string),
            conversation_id: req.conversation_id.map(str::to_string),
            question: req.question.to_string(),
            answer: req.answer.to_string(),
            is_food_related: req.is_food_related,
            num_retrieved_docs: req.num_retrieved_docs,
            history_length: req.history_length,
            metadata: req.metadata.clone().unwrap_or_default(),
        };

        // serde_json leaves non-ASCII untouched, so Arabic content lands in
        // the file literally, matching the historical files.
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let date = today_utc();
        let path = self.day_file(date);
        {
            let _guard = self.append_lock.lock();
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            file.write_all(line.as_bytes())?;
        }

        debug!(
            user_id = ?req.user_id,
            conversation_id = ?req.conversation_id,
            is_food_related = req.is_food_related,
            num_retrieved_docs = req.num_retrieved_docs,
            history_length = req.history_length,
            "conversation logged"
        );

        if let Some((sink, prefix)) = &self.mirror {
            let key = mirror_key(prefix, date, &entry);
            if let Err(e) = sink.put_object(&key, line.trim_end().as_bytes()) {
                warn!(error = %e, key, "log mirror push failed, continuing");
            }
        }

        Ok(())
    }

    /// Record an operational error with context. Best-effort; never fails
    /// and never touches conversation state.
    pub fn log_error(&self, err: &dyn Display, context: Option<&Map<String, Value>>) {
        match context {
            Some(ctx) => error!(error = %err, context = %serde_json::Value::Object(ctx.clone()), "chat error"),
            None => error!(error = %err, "chat error"),
        }
    }
}

/// Mirror object key for one entry:
/// `{prefix}/conversations/{date}/conversation_{timestamp}_{user}_{id}.json`.
fn mirror_key(prefix: &str, date: NaiveDate, entry: &LogEntry) -> String {
    let user = entry
        .user_id
        .as_deref()
        .map_or_else(|| "anonymous".to_string(), sanitize_key_component);
    let timestamp = sanitize_key_component(&entry.timestamp);
    let short_id = format!("{:08x}", rand::random::<u32>());
    format!(
        "{prefix}/conversations/{}/conversation_{timestamp}_{user}_{short_id}.json",
        date.format("%Y-%m-%d")
    )
}

/// Replace anything outside `[A-Za-z0-9_-]` so the component is safe in
/// object keys and file names.
fn sanitize_key_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MirrorError;

    fn log_in(dir: &Path) -> ConversationLog {
        ConversationLog::new(dir).unwrap()
    }

    fn read_today(log: &ConversationLog) -> Vec<Value> {
        let raw = std::fs::read_to_string(log.day_file(today_utc())).unwrap();
        raw.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn append_creates_day_file_with_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());

        log.log_conversation(&AppendRequest {
            question: "What's for breakfast?",
            answer: "Oatmeal.",
            is_food_related: true,
            num_retrieved_docs: 4,
            history_length: 0,
            user_id: Some("u1"),
            conversation_id: Some("c1"),
            metadata: None,
        })
        .unwrap();
        log.log_conversation(&AppendRequest {
            question: "More?",
            answer: "Try eggs.",
            is_food_related: true,
            user_id: Some("u1"),
            conversation_id: Some("c1"),
            ..AppendRequest::default()
        })
        .unwrap();

        let entries = read_today(&log);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["question"], "What's for breakfast?");
        assert_eq!(entries[0]["num_retrieved_docs"], 4);
        assert_eq!(entries[1]["answer"], "Try eggs.");
    }

    #[test]
    fn arabic_content_is_written_literally() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        log.log_conversation(&AppendRequest {
            question: "كم سعرة حرارية في الكبسة؟",
            answer: "حوالي ٦٥٠ سعرة",
            is_food_related: true,
            ..AppendRequest::default()
        })
        .unwrap();

        let raw = std::fs::read_to_string(log.day_file(today_utc())).unwrap();
        assert!(raw.contains("كم سعرة حرارية في الكبسة؟"));
        assert!(!raw.contains("\\u"));
    }

    #[test]
    fn reading_twice_yields_identical_results() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        log.log_conversation(&AppendRequest {
            question: "q",
            answer: "a",
            ..AppendRequest::default()
        })
        .unwrap();

        assert_eq!(read_today(&log), read_today(&log));
    }

    #[test]
    fn day_file_name_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(
            log.day_file(date)
                .ends_with("conversations_2024-03-01.jsonl")
        );
    }

    struct RecordingSink(Mutex<Vec<String>>);
    impl MirrorSink for RecordingSink {
        fn put_object(&self, key: &str, _body: &[u8]) -> std::result::Result<(), MirrorError> {
            self.0.lock().push(key.to_string());
            Ok(())
        }
    }

    struct FailingSink;
    impl MirrorSink for FailingSink {
        fn put_object(&self, _key: &str, _body: &[u8]) -> std::result::Result<(), MirrorError> {
            Err(MirrorError::Unavailable("down for maintenance".into()))
        }
    }

    #[test]
    fn mirror_receives_key_with_expected_layout() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
        let log = log_in(dir.path()).with_mirror(Arc::clone(&sink) as Arc<dyn MirrorSink>, "vee");

        log.log_conversation(&AppendRequest {
            question: "q",
            answer: "a",
            user_id: Some("user 7!"),
            ..AppendRequest::default()
        })
        .unwrap();

        let keys = sink.0.lock();
        assert_eq!(keys.len(), 1);
        let date = today_utc().format("%Y-%m-%d").to_string();
        assert!(keys[0].starts_with(&format!("vee/conversations/{date}/conversation_")));
        assert!(keys[0].ends_with(".json"));
        // Sanitized user id: space and '!' replaced
        assert!(keys[0].contains("_user-7-_"));
    }

    #[test]
    fn mirror_failure_does_not_fail_the_append() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path()).with_mirror(Arc::new(FailingSink), "vee");

        log.log_conversation(&AppendRequest {
            question: "q",
            answer: "a",
            ..AppendRequest::default()
        })
        .unwrap();

        // Primary write landed despite the mirror failure
        assert_eq!(read_today(&log).len(), 1);
    }

    #[test]
    fn unwritable_dir_fails_construction() {
        // A file where the directory should be
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        assert!(ConversationLog::new(&blocker).is_err());
    }

    #[test]
    fn sanitize_key_component_replaces_specials() {
        assert_eq!(sanitize_key_component("a b:c.d"), "a-b-c-d");
        assert_eq!(sanitize_key_component("user_1-ok"), "user_1-ok");
    }
}
