//! Foreground controller coordinating the queue, readiness, and the bridge.
//!
//! The controller runs on a single foreground timeline. It owns the input
//! queue outright; the background task only ever receives an immutable,
//! already-ordered snapshot of buffers per job. Every queue mutation answers
//! with the recomputed [`Readiness`], which is the queue-changed
//! notification a host UI binds to.

use crate::bridge::{JobPayload, StatusEvent, WorkerBridge, WorkerState};
use crate::error::{Result, SpliceError};
use crate::queue::{InputQueue, Mode, SourceFile};
use crate::readiness::Readiness;
use futures::future::try_join_all;
use log::info;
use tokio::sync::broadcast;

/// Fallback base name used when a split submission carries a blank job name.
pub const SPLIT_FALLBACK_JOB_NAME: &str = "split_files";

/// Caller-supplied options for one submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    /// Split only: base name for the archive and its entries. Blank or
    /// absent falls back to [`SPLIT_FALLBACK_JOB_NAME`] after trimming.
    pub job_name: Option<String>,
    /// Merge only: override for the output filename.
    pub output_filename: Option<String>,
}

/// A finished job's output, ready for delivery by the caller.
#[derive(Debug)]
pub struct OutputFile {
    /// Suggested filename, `.pdf` for merge and `.zip` for split.
    pub filename: String,
    /// The produced bytes; the caller becomes the sole owner.
    pub bytes: Vec<u8>,
}

/// The foreground controller.
pub struct Recomposer {
    queue: InputQueue,
    bridge: WorkerBridge,
}

impl Recomposer {
    /// Create a controller with a freshly spawned background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self::with_bridge(WorkerBridge::spawn())
    }

    /// Create a controller over an existing bridge.
    pub fn with_bridge(bridge: WorkerBridge) -> Self {
        Self {
            queue: InputQueue::new(),
            bridge,
        }
    }

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.queue.mode()
    }

    /// Queued files, in submission order.
    pub fn files(&self) -> &[SourceFile] {
        self.queue.files()
    }

    /// Subscribe to the background task's status stream.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.bridge.subscribe()
    }

    /// Wait for the background task's one-time bootstrap to finish.
    pub async fn wait_until_ready(&self) -> Result<()> {
        self.bridge.wait_until_ready().await
    }

    /// Add files to the queue; non-PDF entries are filtered out.
    pub fn add_files(&mut self, files: Vec<SourceFile>) -> Readiness {
        self.queue.add(files);
        self.readiness()
    }

    /// Remove the file at `position`; out-of-range positions are ignored.
    pub fn remove(&mut self, position: usize) -> Readiness {
        self.queue.remove(position);
        self.readiness()
    }

    /// Move the file at `from` so it sits at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Readiness {
        self.queue.reorder(from, to);
        self.readiness()
    }

    /// Switch modes, clearing the queue unconditionally.
    pub fn set_mode(&mut self, mode: Mode) -> Readiness {
        self.queue.set_mode(mode);
        self.readiness()
    }

    /// Recompute readiness from the current observable state.
    pub fn readiness(&self) -> Readiness {
        Readiness::evaluate(self.queue.mode(), self.queue.len(), self.bridge.state())
    }

    /// Submit the queued files as one job and await its terminal event.
    ///
    /// Contract violations (task not ready, queue not satisfying the
    /// mode's arity) are rejected synchronously and never reach the
    /// background task; the queue is left untouched in that case. An
    /// accepted submission drains the queue: ownership of every buffer
    /// moves into the job.
    pub async fn submit(&mut self, request: SubmitRequest) -> Result<OutputFile> {
        let mode = self.queue.mode();

        if !self.readiness().can_submit {
            let state = self.bridge.state();
            return Err(if state == WorkerState::Ready {
                SpliceError::QueueNotReady {
                    mode,
                    len: self.queue.len(),
                }
            } else {
                SpliceError::NotReady { state }
            });
        }

        let files = self.queue.drain();
        info!("submitting {mode} job with {} file(s)", files.len());

        // Materialize every buffer concurrently before crossing the boundary.
        let buffers = try_join_all(files.into_iter().map(SourceFile::materialize)).await?;

        let payload = match mode {
            Mode::Merge => JobPayload::Merge {
                inputs: buffers,
                output_filename: request.output_filename,
            },
            Mode::Split => {
                let mut buffers = buffers;
                let input = buffers.pop().ok_or(SpliceError::QueueNotReady { mode, len: 0 })?;
                JobPayload::Split {
                    input,
                    job_name: resolve_job_name(request.job_name.as_deref()),
                }
            }
        };

        let ticket = self.bridge.submit(payload)?;
        let result = ticket.wait().await?;

        Ok(OutputFile {
            filename: result.filename,
            bytes: result.bytes,
        })
    }
}

impl Default for Recomposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the blank-name fallback after trimming whitespace.
fn resolve_job_name(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => SPLIT_FALLBACK_JOB_NAME.to_string(),
    }
}
