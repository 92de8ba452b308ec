//! Best-effort log replication seam.
//!
//! After a successful local append, the entry may additionally be pushed to
//! an object store as its own object. The mirror is a post-commit hook with
//! its own error boundary: it must never block, fail, or slow the primary
//! write. It is a convenience copy, not a second source of truth.

use std::path::PathBuf;

/// Errors from a mirror sink. Always swallowed (logged as warnings) by the
/// caller; surfaced as a type so sinks can report what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Object write failed.
    #[error("mirror write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Sink rejected the object or is unreachable.
    #[error("mirror unavailable: {0}")]
    Unavailable(String),
}

/// An object store receiving one object per log entry.
///
/// Keys follow the layout
/// `{prefix}/conversations/{date}/conversation_{timestamp}_{user}_{id}.json`
/// so mirrored entries stay browsable by day without reading the primary
/// log files.
pub trait MirrorSink: Send + Sync {
    /// Store `body` under `key`, overwriting any existing object.
    fn put_object(&self, key: &str, body: &[u8]) -> Result<(), MirrorError>;
}

/// Filesystem-backed mirror: each object becomes a file under a root
/// directory (typically a replicated or remote-mounted path).
pub struct FsMirrorSink {
    root: PathBuf,
}

impl FsMirrorSink {
    /// Create a sink rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MirrorSink for FsMirrorSink {
    fn put_object(&self, key: &str, body: &[u8]) -> Result<(), MirrorError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_sink_writes_object_under_key() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsMirrorSink::new(dir.path());
        sink.put_object("vee/conversations/2024-03-01/entry.json", b"{}")
            .unwrap();

        let written = dir
            .path()
            .join("vee/conversations/2024-03-01/entry.json");
        assert_eq!(std::fs::read(written).unwrap(), b"{}");
    }

    #[test]
    fn fs_sink_overwrites_existing_object() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsMirrorSink::new(dir.path());
        sink.put_object("k.json", b"one").unwrap();
        sink.put_object("k.json", b"two").unwrap();
        assert_eq!(std::fs::read(dir.path().join("k.json")).unwrap(), b"two");
    }
}
