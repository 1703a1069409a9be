//! Typed lifecycle states and status-stream events.
//!
//! The lifecycle is consumed as an enum, never inferred from human-readable
//! text; the messages carried by [`StatusEvent`] exist only for display.

use crate::error::Result;
use serde::Serialize;
use std::fmt;

use super::job::JobId;

/// Lifecycle of the background processing task.
///
/// `Booting` and `InstallingDependencies` occur once at startup and are never
/// re-entered. `Working` always returns to `Ready` unless an unrecoverable
/// boundary fault moves the task to the terminal `Faulted` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// The task is bringing up its execution environment.
    Booting,
    /// The task is installing the codec toolkit.
    InstallingDependencies,
    /// The task is idle and accepting submissions.
    Ready,
    /// The task is executing a job.
    Working,
    /// The task hit an unrecoverable fault; all submissions are rejected.
    Faulted,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Booting => "booting",
            Self::InstallingDependencies => "installing dependencies",
            Self::Ready => "ready",
            Self::Working => "working",
            Self::Faulted => "faulted",
        };
        write!(f, "{name}")
    }
}

/// One event on the subscribable status stream.
///
/// Result buffers never travel on this stream; they move through the per-job
/// reply channel so they are never cloned per subscriber.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Bootstrap progress; emitted before the task becomes ready.
    Loading {
        /// Human-readable progress message.
        message: String,
    },
    /// The task finished bootstrapping; emitted exactly once.
    Ready {
        /// Human-readable message.
        message: String,
    },
    /// A job started executing.
    Working {
        /// The job being executed.
        job: JobId,
        /// Human-readable message.
        message: String,
    },
    /// A job finished successfully.
    Complete {
        /// The job that finished.
        job: JobId,
        /// Output filename of the produced buffer.
        filename: String,
    },
    /// Bootstrap or job failure.
    Error {
        /// The failed job, absent for bootstrap failures.
        job: Option<JobId>,
        /// Human-readable failure description.
        message: String,
    },
}

/// One-time startup steps run inside the background task.
///
/// `boot` brings the execution environment up, `install` prepares the codec
/// toolkit. A failure in either step is fatal: the task faults and rejects
/// every future submission.
pub trait Bootstrap: Send + 'static {
    /// Bring the execution environment up.
    fn boot(&mut self) -> Result<()>;

    /// Install the dependencies the engine needs.
    fn install(&mut self) -> Result<()>;
}

/// Default bootstrap: round-trips a minimal document through the codec.
#[derive(Debug, Default)]
pub struct CodecSelfTest;

impl Bootstrap for CodecSelfTest {
    fn boot(&mut self) -> Result<()> {
        Ok(())
    }

    fn install(&mut self) -> Result<()> {
        crate::codec::self_test()
    }
}
