//! Job descriptions and results exchanged with the background task.
//!
//! A job owns its input buffers outright: submitting moves them across the
//! task boundary, and the result buffer moves back the same way. Nothing in
//! this module copies document bytes.

/// Correlation identifier for a submitted job.
///
/// Monotonic per bridge; used only to match status events and results to
/// submissions, never for concurrency control.
pub type JobId = u64;

/// Default output filename for merge jobs.
pub const MERGED_OUTPUT_NAME: &str = "merged_document.pdf";

/// A single submitted request.
#[derive(Debug)]
pub struct Job {
    /// Correlation identifier assigned by the bridge.
    pub id: JobId,
    /// What to do and with which buffers.
    pub payload: JobPayload,
}

/// The work carried by a [`Job`], with owned input buffers.
#[derive(Debug)]
pub enum JobPayload {
    /// Concatenate every page of every input, in input order.
    Merge {
        /// Ordered input documents.
        inputs: Vec<Vec<u8>>,
        /// Optional override for the output filename.
        output_filename: Option<String>,
    },
    /// Explode the input into one single-page document per page.
    Split {
        /// The document to explode.
        input: Vec<u8>,
        /// Base name for the archive and its entries.
        job_name: String,
    },
}

impl JobPayload {
    /// Short human-readable description for the status stream.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Merge { inputs, .. } => format!("Merging {} document(s)", inputs.len()),
            Self::Split { job_name, .. } => format!("Splitting document as '{job_name}'"),
        }
    }

    /// Output filename derived from the job kind, never from content.
    pub(crate) fn output_filename(&self) -> String {
        match self {
            Self::Merge {
                output_filename, ..
            } => output_filename
                .clone()
                .unwrap_or_else(|| MERGED_OUTPUT_NAME.to_string()),
            Self::Split { job_name, .. } => format!("{job_name}.zip"),
        }
    }
}

/// Terminal output of a successful job.
#[derive(Debug)]
pub struct JobResult {
    /// Identifier of the job that produced this result.
    pub id: JobId,
    /// Suggested filename, `.pdf` for merge and `.zip` for split.
    pub filename: String,
    /// The produced bytes; the receiver becomes the sole owner.
    pub bytes: Vec<u8>,
}
