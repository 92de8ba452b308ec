//! The [`TurnStore`] — in-memory conversation state with TTL eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use vee_core::turns::Turn;

/// Default inactivity window before a conversation is evicted.
pub const DEFAULT_MAX_AGE_HOURS: u64 = 24;

/// Per-conversation metadata tracked alongside the turn list.
#[derive(Clone, Debug)]
struct ConversationMeta {
    /// Owning user, when known. Later non-null values overwrite earlier
    /// ones — last-writer-wins, no conflict detection.
    user_id: Option<String>,
    /// Wall-clock creation time (diagnostics only).
    created_at: DateTime<Utc>,
    /// Monotonic last-touch instant driving eviction.
    last_accessed: Instant,
}

/// Guarded map state: turn lists plus metadata, always mutated together.
#[derive(Default)]
struct Inner {
    conversations: HashMap<String, Vec<Turn>>,
    metadata: HashMap<String, ConversationMeta>,
}

/// In-memory conversation store keyed by conversation id.
///
/// One coarse lock guards the whole map: operations are in-memory map
/// touches that never block on I/O, so finer-grained locking buys nothing.
/// Reads take the lock too because the eviction sweep may mutate state
/// during a "read".
///
/// Eviction is swept opportunistically on every operation; there is no
/// background timer. An idle process may therefore hold stale entries
/// indefinitely, which is acceptable — the conversation log is the durable
/// record.
///
/// Constructed once at process start and passed to request handlers
/// (dependency-injected, not a process-wide global), so tests can run
/// isolated instances.
pub struct TurnStore {
    inner: Mutex<Inner>,
    max_age: Duration,
}

impl Default for TurnStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_HOURS)
    }
}

impl TurnStore {
    /// Create a store evicting conversations idle for more than
    /// `max_age_hours`.
    pub fn new(max_age_hours: u64) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_age: Duration::from_secs(max_age_hours * 3600),
        }
    }

    /// Ordered turn history for a conversation; empty if unknown.
    ///
    /// Sweeps stale conversations first. Never fails.
    pub fn get_history(&self, conversation_id: &str) -> Vec<Turn> {
        let mut inner = self.inner.lock();
        Self::sweep(&mut inner, self.max_age);
        inner
            .conversations
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a turn, creating the conversation entry if absent.
    ///
    /// Updates `last_accessed`, and overwrites the owning user id when a
    /// non-null `user_id` is supplied.
    pub fn add_turn(
        &self,
        conversation_id: &str,
        user_message: impl Into<String>,
        assistant_message: impl Into<String>,
        user_id: Option<&str>,
    ) {
        let mut inner = self.inner.lock();
        Self::sweep(&mut inner, self.max_age);

        if !inner.conversations.contains_key(conversation_id) {
            let _ = inner
                .conversations
                .insert(conversation_id.to_string(), Vec::new());
            let _ = inner.metadata.insert(
                conversation_id.to_string(),
                ConversationMeta {
                    user_id: user_id.map(str::to_string),
                    created_at: Utc::now(),
                    last_accessed: Instant::now(),
                },
            );
        }

        inner
            .conversations
            .get_mut(conversation_id)
            .expect("conversation entry just ensured")
            .push(Turn::new(user_message, assistant_message));

        let meta = inner
            .metadata
            .get_mut(conversation_id)
            .expect("metadata entry just ensured");
        meta.last_accessed = Instant::now();
        if let Some(uid) = user_id {
            meta.user_id = Some(uid.to_string());
        }
    }

    /// Remove a conversation and its metadata; returns whether it existed.
    pub fn clear_conversation(&self, conversation_id: &str) -> bool {
        let mut inner = self.inner.lock();
        let existed = inner.conversations.remove(conversation_id).is_some();
        let _ = inner.metadata.remove(conversation_id);
        existed
    }

    /// Number of live (post-eviction) conversations.
    pub fn count(&self) -> usize {
        let mut inner = self.inner.lock();
        Self::sweep(&mut inner, self.max_age);
        inner.conversations.len()
    }

    /// Owning user id for a conversation, if tracked.
    pub fn owner(&self, conversation_id: &str) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .metadata
            .get(conversation_id)
            .and_then(|m| m.user_id.clone())
    }

    /// Wall-clock creation time for a conversation, if tracked.
    pub fn created_at(&self, conversation_id: &str) -> Option<DateTime<Utc>> {
        let inner = self.inner.lock();
        inner.metadata.get(conversation_id).map(|m| m.created_at)
    }

    /// Drop conversations idle for longer than `max_age`. Caller holds the lock.
    fn sweep(inner: &mut Inner, max_age: Duration) {
        let now = Instant::now();
        let stale: Vec<String> = inner
            .metadata
            .iter()
            .filter(|(_, meta)| now.duration_since(meta.last_accessed) > max_age)
            .map(|(id, _)| id.clone())
            .collect();

        for id in stale {
            let _ = inner.conversations.remove(&id);
            let _ = inner.metadata.remove(&id);
            debug!(conversation_id = %id, "evicted stale conversation");
        }
    }

    /// Backdate a conversation's last-accessed instant (test hook).
    ///
    /// Clamps to now when the host's monotonic clock is younger than `by`;
    /// bare subtraction would panic there.
    #[cfg(test)]
    fn backdate(&self, conversation_id: &str, by: Duration) {
        let mut inner = self.inner.lock();
        if let Some(meta) = inner.metadata.get_mut(conversation_id) {
            let now = Instant::now();
            meta.last_accessed = now.checked_sub(by).unwrap_or(now);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_conversation_returns_empty() {
        let store = TurnStore::default();
        assert!(store.get_history("missing").is_empty());
    }

    #[test]
    fn turns_returned_in_call_order() {
        let store = TurnStore::default();
        store.add_turn("c1", "What's for breakfast?", "Oatmeal.", Some("u1"));
        store.add_turn("c1", "More?", "Try eggs.", Some("u1"));

        let history = store.get_history("c1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Turn::new("What's for breakfast?", "Oatmeal."));
        assert_eq!(history[1], Turn::new("More?", "Try eggs."));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn conversations_are_isolated() {
        let store = TurnStore::default();
        store.add_turn("a", "qa", "aa", None);
        store.add_turn("b", "qb", "ab", None);

        let history_b = store.get_history("b");
        assert_eq!(history_b.len(), 1);
        assert_eq!(history_b[0].user, "qb");
    }

    #[test]
    fn clear_reports_existence() {
        let store = TurnStore::default();
        store.add_turn("c1", "q", "a", None);
        assert!(store.clear_conversation("c1"));
        assert!(!store.clear_conversation("c1"));
        assert!(store.get_history("c1").is_empty());
    }

    #[test]
    fn stale_conversation_evicted_on_read() {
        let store = TurnStore::new(1);
        store.add_turn("old", "q", "a", None);
        store.add_turn("fresh", "q", "a", None);
        store.backdate("old", Duration::from_secs(2 * 3600));

        assert!(store.get_history("old").is_empty());
        assert_eq!(store.count(), 1);
        assert_eq!(store.get_history("fresh").len(), 1);
    }

    #[test]
    fn eviction_swept_on_write_too() {
        let store = TurnStore::new(1);
        store.add_turn("old", "q", "a", None);
        store.backdate("old", Duration::from_secs(2 * 3600));

        store.add_turn("new", "q", "a", None);
        assert_eq!(store.count(), 1);
        assert!(store.get_history("old").is_empty());
    }

    #[test]
    fn stale_conversation_restarts_fresh_on_next_turn() {
        let store = TurnStore::new(1);
        store.add_turn("c1", "q1", "a1", None);
        store.backdate("c1", Duration::from_secs(2 * 3600));

        // The sweep runs before the append, so the stale history is gone
        // and the new turn starts a fresh conversation under the same id.
        store.add_turn("c1", "q2", "a2", None);
        let history = store.get_history("c1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user, "q2");
    }

    #[test]
    fn backdate_clamps_oversized_spans() {
        let store = TurnStore::new(1);
        store.add_turn("c1", "q", "a", None);
        // Longer than any host uptime, so the subtraction cannot represent it.
        store.backdate("c1", Duration::from_secs(u64::MAX / 2));
        assert_eq!(store.get_history("c1").len(), 1);
    }

    #[test]
    fn owner_follows_last_writer() {
        let store = TurnStore::default();
        store.add_turn("c1", "q1", "a1", Some("u1"));
        store.add_turn("c1", "q2", "a2", None);
        assert_eq!(store.owner("c1").as_deref(), Some("u1"));

        store.add_turn("c1", "q3", "a3", Some("u2"));
        assert_eq!(store.owner("c1").as_deref(), Some("u2"));
    }

    #[test]
    fn created_at_tracked_on_first_turn() {
        let store = TurnStore::default();
        assert!(store.created_at("c1").is_none());
        store.add_turn("c1", "q", "a", None);
        assert!(store.created_at("c1").is_some());
    }

    #[test]
    fn concurrent_writers_never_lose_turns() {
        use std::sync::Arc;

        let store = Arc::new(TurnStore::default());
        let mut handles = Vec::new();
        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    store.add_turn("shared", format!("q{t}-{i}"), "a", Some("u1"));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.get_history("shared").len(), 400);
        assert_eq!(store.count(), 1);
    }
}
