//! pdfsplice - merge and split PDF documents through an asynchronous
//! background job engine.
//!
//! The crate provides:
//!
//! - An ordered, user-mutable [`queue::InputQueue`] of pending source files
//!   with mode-dependent add semantics and splice reordering
//! - A pure [`engine`] that concatenates page streams ([`engine::merge`]) or
//!   explodes a document into an archive of single-page documents
//!   ([`engine::split`])
//! - A [`bridge::WorkerBridge`] running the engine on a sequential background
//!   task, with a typed lifecycle, a subscribable status stream, and
//!   ownership-transferred buffers
//! - A [`readiness::Readiness`] gate deriving whether a submission is
//!   currently legal
//! - A [`controller::Recomposer`] tying the pieces together for a host UI
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::{Recomposer, SourceFile, SubmitRequest};
//!
//! # async fn example() -> pdfsplice::Result<()> {
//! let mut recomposer = Recomposer::new();
//! recomposer.wait_until_ready().await?;
//!
//! recomposer.add_files(vec![
//!     SourceFile::from_path("chapter_1.pdf"),
//!     SourceFile::from_path("chapter_2.pdf"),
//! ]);
//!
//! if recomposer.readiness().can_submit {
//!     let output = recomposer.submit(SubmitRequest::default()).await?;
//!     println!("produced {} ({} bytes)", output.filename, output.bytes.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is persisted: results are handed back as named byte buffers for
//! immediate delivery by the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod codec;
pub mod controller;
pub mod engine;
pub mod error;
pub mod queue;
pub mod readiness;

// Re-export commonly used types
pub use bridge::{
    Bootstrap, CodecSelfTest, JobId, JobPayload, JobResult, JobTicket, MERGED_OUTPUT_NAME,
    StatusEvent, WorkerBridge, WorkerState,
};
pub use controller::{OutputFile, Recomposer, SPLIT_FALLBACK_JOB_NAME, SubmitRequest};
pub use error::{Result, SpliceError};
pub use queue::{InputQueue, Mode, PDF_MEDIA_TYPE, SourceFile};
pub use readiness::Readiness;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
