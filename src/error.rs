//! Error types for pdfsplice.
//!
//! Every fallible operation in the crate returns [`Result`]. Recoverable job
//! failures and caller-contract violations are separate variants so the
//! bridge can report the former through the status stream while the
//! controller rejects the latter before they ever reach the background task.

use crate::bridge::WorkerState;
use crate::queue::Mode;
use std::io;

/// Result type alias for pdfsplice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;

/// Main error type for pdfsplice operations.
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// No input buffers were handed to a merge.
    #[error("no documents supplied for merging")]
    NoInputs,

    /// The codec rejected an input buffer.
    #[error("failed to parse document #{position}: {source}")]
    MalformedDocument {
        /// 1-based position of the buffer in the submitted order.
        position: usize,
        /// Underlying codec error.
        source: lopdf::Error,
    },

    /// The codec failed to serialize an output document.
    #[error("failed to serialize document: {source}")]
    WriteDocument {
        /// Underlying codec error.
        source: lopdf::Error,
    },

    /// The page tree of a document could not be rewritten.
    #[error("page recomposition failed: {reason}")]
    Recompose {
        /// Description of what went wrong.
        reason: String,
    },

    /// An archive entry could not be written.
    #[error("failed to write archive entry '{name}': {reason}")]
    ArchiveWrite {
        /// Name of the entry being written.
        name: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// A queued file's contents could not be read from disk.
    #[error("failed to read '{name}': {source}")]
    FileRead {
        /// Display name of the source file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The queue does not satisfy the submission arity for the current mode.
    #[error("queue does not satisfy {mode} submission requirements ({len} file(s) selected)")]
    QueueNotReady {
        /// Mode the submission was attempted in.
        mode: Mode,
        /// Queue length at the time of the attempt.
        len: usize,
    },

    /// A job was submitted while the background task was not ready.
    #[error("processor is not ready to accept jobs (state: {state})")]
    NotReady {
        /// Background task state at the time of the attempt.
        state: WorkerState,
    },

    /// The background task's bootstrap failed; it will never become ready.
    #[error("processor bootstrap failed: {reason}")]
    Bootstrap {
        /// Description of the bootstrap failure.
        reason: String,
    },

    /// The background task hit an unrecoverable boundary fault.
    #[error("processor faulted: {reason}")]
    WorkerFault {
        /// Description of the fault.
        reason: String,
    },

    /// The background task terminated before delivering a result.
    #[error("processor terminated before the job completed")]
    WorkerGone,
}

impl SpliceError {
    /// Create a [`SpliceError::Recompose`] error.
    pub fn recompose(reason: impl Into<String>) -> Self {
        Self::Recompose {
            reason: reason.into(),
        }
    }

    /// Whether the background task stays usable after reporting this error.
    ///
    /// Bootstrap and boundary faults are terminal; everything else leaves the
    /// task ready for the next job.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Bootstrap { .. } | Self::WorkerFault { .. } | Self::WorkerGone
        )
    }
}
