use crate::error::Result;
use crate::io;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// FrameKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Image,
    /// Legacy upload path, kept for clients that still record video.
    Video,
}

impl FrameKind {
    /// Multipart field carrying the payload.
    pub fn field(self) -> &'static str {
        match self {
            FrameKind::Image => "image",
            FrameKind::Video => "video",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            FrameKind::Image => "images",
            FrameKind::Video => "videos",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            FrameKind::Image => "frame",
            FrameKind::Video => "recording",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            FrameKind::Image => "jpg",
            FrameKind::Video => "webm",
        }
    }

    /// `frame_<unix_seconds>.jpg` / `recording_<unix_seconds>.webm`.
    ///
    /// Second resolution: two uploads in the same second share a name.
    pub fn filename(self, at: DateTime<Utc>) -> String {
        format!("{}_{}.{}", self.prefix(), at.timestamp(), self.extension())
    }
}

// ---------------------------------------------------------------------------
// FrameStore
// ---------------------------------------------------------------------------

/// A payload that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub filename: String,
    pub path: PathBuf,
    /// Caller-supplied timestamp, kept verbatim for logging.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FrameStore {
    root: PathBuf,
}

impl FrameStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: FrameKind) -> PathBuf {
        self.root.join(kind.dir())
    }

    /// Create `images/` and `videos/` under the root.
    pub fn ensure_layout(&self) -> Result<()> {
        io::ensure_dir(&self.dir(FrameKind::Image))?;
        io::ensure_dir(&self.dir(FrameKind::Video))?;
        Ok(())
    }

    /// Persist `bytes` under a name derived from `at`, replacing any file of
    /// the same name.
    pub fn save(
        &self,
        kind: FrameKind,
        bytes: &[u8],
        timestamp: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Frame> {
        let filename = kind.filename(at);
        let path = self.dir(kind).join(&filename);
        io::atomic_write(&path, bytes)?;
        Ok(Frame {
            kind,
            filename,
            path,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn filenames_follow_kind_layout() {
        assert_eq!(FrameKind::Image.filename(at(1_700_000_000)), "frame_1700000000.jpg");
        assert_eq!(
            FrameKind::Video.filename(at(1_700_000_000)),
            "recording_1700000000.webm"
        );
    }

    #[test]
    fn ensure_layout_creates_both_dirs() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(dir.path());
        store.ensure_layout().unwrap();
        assert!(dir.path().join("images").is_dir());
        assert!(dir.path().join("videos").is_dir());
    }

    #[test]
    fn save_writes_bytes_under_kind_dir() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(dir.path());
        let frame = store
            .save(FrameKind::Image, b"\xff\xd8jpeg", Some("42".into()), at(1_000))
            .unwrap();
        assert_eq!(frame.filename, "frame_1000.jpg");
        assert_eq!(frame.path, dir.path().join("images/frame_1000.jpg"));
        assert_eq!(std::fs::read(&frame.path).unwrap(), b"\xff\xd8jpeg");
        assert_eq!(frame.timestamp.as_deref(), Some("42"));
    }

    #[test]
    fn same_second_uploads_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(dir.path());
        store.save(FrameKind::Video, b"one", None, at(5)).unwrap();
        let second = store.save(FrameKind::Video, b"two", None, at(5)).unwrap();
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
        assert_eq!(std::fs::read_dir(store.dir(FrameKind::Video)).unwrap().count(), 1);
    }
}
