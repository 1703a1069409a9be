//! Submission gating derived from mode, queue length, and task lifecycle.

use crate::bridge::WorkerState;
use crate::queue::Mode;

/// Result of evaluating the submission gate for one observable state.
///
/// A submission is legal exactly when the background task is `Ready` and the
/// queue satisfies the mode's arity: at least two files for merge, exactly
/// one for split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Whether a submission is currently legal.
    pub can_submit: bool,
    /// Deterministic label for the host UI's action control.
    pub label: &'static str,
}

impl Readiness {
    /// Evaluate the gate as a pure function of the observable state.
    pub fn evaluate(mode: Mode, queue_len: usize, worker: WorkerState) -> Self {
        let arity_ok = match mode {
            Mode::Merge => queue_len >= 2,
            Mode::Split => queue_len == 1,
        };
        let can_submit = worker == WorkerState::Ready && arity_ok;

        let label = match (worker, mode) {
            (WorkerState::Booting | WorkerState::InstallingDependencies, _) => {
                "Preparing processor"
            }
            (WorkerState::Working, _) => "Processing",
            (WorkerState::Faulted, _) => "Processor offline",
            (WorkerState::Ready, Mode::Merge) if arity_ok => "Merge PDFs",
            (WorkerState::Ready, Mode::Merge) => "Add at least 2 PDFs",
            (WorkerState::Ready, Mode::Split) if arity_ok => "Split PDF",
            (WorkerState::Ready, Mode::Split) => "Select a single PDF",
        };

        Self { can_submit, label }
    }
}
