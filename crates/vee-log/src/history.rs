//! History reconstruction — read-only queries over the conversation log.
//!
//! All three queries are bounded backward scans from today's day file,
//! never a forward walk of the whole log directory. Day files are visited
//! newest to oldest; lines within a file in their natural (chronological)
//! order. A malformed line is skipped, never fatal; a missing day file
//! means "no entries that day". Scans read the log "as of" scan time and
//! are not linearizable with in-flight appends.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{instrument, trace};

use vee_core::text::{normalize_id, truncate_chars, truncate_with_suffix};
use vee_core::time::{parse_naive_timestamp, today_utc};
use vee_core::turns::HistoricalTurn;

use crate::entry::{normalized_id, str_field, ConversationMessage, ConversationSummary};
use crate::log::ConversationLog;

/// Hard cap on how many day files a scan will visit.
const MAX_SCAN_DAYS: i64 = 365;

/// Title truncation budget (chars).
const TITLE_MAX_CHARS: usize = 100;

/// Preview truncation budget (chars).
const PREVIEW_MAX_CHARS: usize = 150;

/// Fold state for one conversation while building summaries.
#[derive(Default)]
struct SummaryFold {
    title: Option<String>,
    preview: String,
    message_count: usize,
    created_at: Option<(NaiveDateTime, String)>,
    last_updated: Option<(NaiveDateTime, String)>,
}

impl ConversationLog {
    /// Rebuild a user's past exchanges as prompt-ready turns.
    ///
    /// `days = -1` means unbounded lookback (capped at 365 day files);
    /// `days = N > 0` scans one day file past the cutoff date and keeps
    /// entries whose timestamp is `>= now - N days`. Results are sorted
    /// ascending by timestamp string and truncated to `limit`.
    ///
    /// Returns `[]` for a blank `user_id` without touching the disk.
    #[instrument(skip(self))]
    pub fn load_user_history_as_turns(
        &self,
        user_id: &str,
        days: i64,
        limit: usize,
    ) -> Vec<HistoricalTurn> {
        let Some(target) = normalize_id(user_id) else {
            return Vec::new();
        };

        let now = vee_core::time::now_naive_utc();
        let cutoff = (days > 0).then(|| now - Duration::days(days));
        // One day past the cutoff date: the boundary day file can hold
        // entries on both sides of the cutoff instant, and the per-entry
        // filter below keeps only the in-window ones.
        let span = if days > 0 {
            (days + 1).min(MAX_SCAN_DAYS)
        } else {
            MAX_SCAN_DAYS
        };

        let mut turns = Vec::new();
        for date in scan_dates(today_utc(), span) {
            for entry in self.read_day_entries(date) {
                if normalized_id(entry.get("user_id")).as_deref() != Some(target) {
                    continue;
                }
                let Some(raw_ts) = entry.get("timestamp").and_then(Value::as_str) else {
                    continue;
                };
                let Some(ts) = parse_naive_timestamp(raw_ts) else {
                    continue;
                };
                if let Some(cutoff) = cutoff
                    && ts < cutoff
                {
                    continue;
                }
                turns.push(HistoricalTurn {
                    user: str_field(&entry, "question").to_string(),
                    assistant: str_field(&entry, "answer").to_string(),
                    timestamp: raw_ts.to_string(),
                });
            }
        }

        turns.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        turns.truncate(limit);
        turns
    }

    /// Group a user's log entries into per-conversation summaries, most
    /// recently updated first.
    ///
    /// Scans up to 365 day files back unconditionally. The `title` is taken
    /// from the first entry with a non-empty question encountered during
    /// the scan, and the `preview` from the last entry processed — both are
    /// artifacts of the newest-day-first, in-file-order traversal that
    /// existing consumers depend on, so the traversal order here is part of
    /// the contract. `created_at`/`last_updated` are true min/max over the
    /// matching entries' timestamps regardless of scan order.
    #[instrument(skip(self))]
    pub fn list_user_conversations(
        &self,
        user_id: &str,
        max_conversations: usize,
    ) -> Vec<ConversationSummary> {
        let Some(target) = normalize_id(user_id) else {
            return Vec::new();
        };

        let mut folds: HashMap<String, SummaryFold> = HashMap::new();
        // First-encounter order, so ties on last_updated stay deterministic
        // under the stable sort below.
        let mut order: Vec<String> = Vec::new();

        for date in scan_dates(today_utc(), MAX_SCAN_DAYS) {
            for entry in self.read_day_entries(date) {
                if normalized_id(entry.get("user_id")).as_deref() != Some(target) {
                    continue;
                }
                let Some(conv_id) = normalized_id(entry.get("conversation_id")) else {
                    continue;
                };
                let Some(raw_ts) = entry.get("timestamp").and_then(Value::as_str) else {
                    continue;
                };
                let Some(ts) = parse_naive_timestamp(raw_ts) else {
                    trace!(conversation_id = %conv_id, "skipping entry with unparsable timestamp");
                    continue;
                };

                let fold = folds.entry(conv_id.clone()).or_insert_with(|| {
                    order.push(conv_id.clone());
                    SummaryFold::default()
                });

                let question = str_field(&entry, "question");
                if fold.title.is_none() && !question.is_empty() {
                    fold.title = Some(truncate_with_suffix(question, TITLE_MAX_CHARS, "..."));
                }
                let preview_source = if question.is_empty() {
                    str_field(&entry, "answer")
                } else {
                    question
                };
                fold.preview = truncate_chars(preview_source, PREVIEW_MAX_CHARS).to_string();
                fold.message_count += 1;

                let stamped = (ts, raw_ts.to_string());
                match &fold.created_at {
                    Some((min_ts, _)) if *min_ts <= ts => {}
                    _ => fold.created_at = Some(stamped.clone()),
                }
                match &fold.last_updated {
                    Some((max_ts, _)) if *max_ts >= ts => {}
                    _ => fold.last_updated = Some(stamped),
                }
            }
        }

        let mut summaries: Vec<ConversationSummary> = order
            .into_iter()
            .filter_map(|conv_id| {
                let fold = folds.remove(&conv_id)?;
                let (_, created_at) = fold.created_at?;
                let (_, last_updated) = fold.last_updated?;
                Some(ConversationSummary {
                    conversation_id: conv_id,
                    title: fold.title.unwrap_or_default(),
                    preview: fold.preview,
                    message_count: fold.message_count,
                    created_at,
                    last_updated,
                })
            })
            .collect();

        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        summaries.truncate(max_conversations);
        summaries
    }

    /// Rebuild one conversation's messages under a user-ownership check.
    ///
    /// An entry is included only when BOTH the normalized user id and the
    /// normalized conversation id match. A mismatch on either simply
    /// excludes the entry: absence of authorization reads as "not found",
    /// never as a distinguishable error, so other users' conversation ids
    /// cannot be probed. Returns `[]` without scanning when either id is
    /// blank.
    #[instrument(skip(self))]
    pub fn get_conversation_history(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Vec<ConversationMessage> {
        let (Some(conv_target), Some(user_target)) =
            (normalize_id(conversation_id), normalize_id(user_id))
        else {
            return Vec::new();
        };

        let mut messages = Vec::new();
        for date in scan_dates(today_utc(), MAX_SCAN_DAYS) {
            for entry in self.read_day_entries(date) {
                if normalized_id(entry.get("user_id")).as_deref() != Some(user_target)
                    || normalized_id(entry.get("conversation_id")).as_deref() != Some(conv_target)
                {
                    continue;
                }
                messages.push(ConversationMessage {
                    question: str_field(&entry, "question").to_string(),
                    answer: str_field(&entry, "answer").to_string(),
                    timestamp: str_field(&entry, "timestamp").to_string(),
                    image_url: entry
                        .get("metadata")
                        .and_then(|m| m.get("image_url"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                });
            }
        }

        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages
    }

    /// Parse one day file into loose JSON values, skipping malformed lines.
    ///
    /// A missing or unreadable file is "no entries that day".
    fn read_day_entries(&self, date: NaiveDate) -> Vec<Value> {
        let path = self.day_file(date);
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Vec::new();
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .collect()
    }
}

/// Dates to scan: today, then backward, `span` entries total.
fn scan_dates(today: NaiveDate, span: i64) -> impl Iterator<Item = NaiveDate> {
    (0..span.max(1)).map(move |offset| today - Duration::days(offset))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
