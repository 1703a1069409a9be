//! The ordered queue of pending source files.
//!
//! The queue is mutated only by the foreground controller timeline; the
//! background task never sees it. Insertion order is semantically significant:
//! it defines merge order, and in split mode it determines the single split
//! target. Switching modes always clears the queue so an invalid queue can
//! never survive a mode change.

use crate::error::{Result, SpliceError};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Declared media type accepted by the queue.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Operating mode of the recomposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Concatenate the pages of every queued document, in queue order.
    #[default]
    Merge,
    /// Explode the single queued document into one file per page.
    Split,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Split => write!(f, "split"),
        }
    }
}

/// Backing storage for a queued file's contents.
#[derive(Debug, Clone)]
enum FileContents {
    /// Raw bytes supplied directly by the caller.
    Inline(Vec<u8>),
    /// Contents read from disk when the submission materializes its buffers.
    OnDisk(PathBuf),
}

/// An opaque named byte buffer supplied by the user.
///
/// Immutable once added to the queue. Identity is queue position, not
/// content; duplicates by name or content are permitted.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    media_type: String,
    contents: FileContents,
}

impl SourceFile {
    /// Create a source file from raw bytes and a declared media type.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: FileContents::Inline(bytes),
        }
    }

    /// Create a source file backed by a path on disk.
    ///
    /// The contents are not read until the file is materialized for a
    /// submission. The declared media type is derived from the file
    /// extension, never from sniffed bytes.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
            _ => "application/octet-stream",
        };
        Self {
            name,
            media_type: media_type.to_string(),
            contents: FileContents::OnDisk(path),
        }
    }

    /// Display name of the file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type of the file.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Whether the declared media type marks this file as a PDF.
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    /// Byte length, when already known without touching the filesystem.
    pub fn declared_size(&self) -> Option<usize> {
        match &self.contents {
            FileContents::Inline(bytes) => Some(bytes.len()),
            FileContents::OnDisk(_) => None,
        }
    }

    /// Turn the file into a raw buffer, reading from disk if necessary.
    ///
    /// Consumes the file: the returned buffer is the sole owner of the
    /// contents and is handed onward across the task boundary.
    pub(crate) async fn materialize(self) -> Result<Vec<u8>> {
        match self.contents {
            FileContents::Inline(bytes) => Ok(bytes),
            FileContents::OnDisk(path) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| SpliceError::FileRead {
                        name: self.name,
                        source,
                    })
            }
        }
    }
}

/// Ordered, user-mutable list of pending source files.
#[derive(Debug, Default)]
pub struct InputQueue {
    mode: Mode,
    files: Vec<SourceFile>,
}

impl InputQueue {
    /// Create an empty queue in [`Mode::Merge`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of queued files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Queued files, in submission order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Add files to the queue, keeping only PDF-typed entries.
    ///
    /// In merge mode every accepted file is appended. In split mode only the
    /// first accepted file of the batch is kept and it replaces whatever was
    /// queued before; the rest of the batch is discarded.
    ///
    /// Returns the number of files accepted into the queue.
    pub fn add(&mut self, incoming: Vec<SourceFile>) -> usize {
        let mut accepted: Vec<SourceFile> = incoming.into_iter().filter(|f| f.is_pdf()).collect();

        match self.mode {
            Mode::Merge => {
                let count = accepted.len();
                self.files.append(&mut accepted);
                count
            }
            Mode::Split => {
                if accepted.is_empty() {
                    return 0;
                }
                if accepted.len() > 1 {
                    debug!(
                        "split mode keeps one file; discarding {} extra",
                        accepted.len() - 1
                    );
                }
                accepted.truncate(1);
                self.files = accepted;
                1
            }
        }
    }

    /// Remove the file at `position`, shifting the remainder down.
    ///
    /// Out-of-range positions are ignored: mutation and rendering share the
    /// single foreground timeline, so a stale index can only come from a
    /// caller bug, not from interleaving.
    pub fn remove(&mut self, position: usize) {
        if position < self.files.len() {
            self.files.remove(position);
        }
    }

    /// Move the file at `from` so it sits at `to`, as a single splice.
    ///
    /// Length and the set of queued files are preserved; only positions
    /// change. `from == to` and out-of-range `from` are no-ops; `to` is
    /// clamped to the tail.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.files.len() {
            return;
        }
        let moved = self.files.remove(from);
        let to = to.min(self.files.len());
        self.files.insert(to, moved);
    }

    /// Switch modes, clearing the queue unconditionally.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.files.clear();
    }

    /// Take every queued file, leaving the queue empty.
    ///
    /// Used at submission time: ownership of the buffers moves into the job.
    pub(crate) fn drain(&mut self) -> Vec<SourceFile> {
        std::mem::take(&mut self.files)
    }
}
