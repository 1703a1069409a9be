//! Bridge between the foreground controller and the background processing
//! task.
//!
//! The bridge is an explicitly constructed component: [`WorkerBridge::spawn`]
//! creates the channel set and the task, and the handle is injected wherever
//! it is needed; there is no ambient global instance. Communication is
//! message passing only: an unbounded command channel into the task, a
//! broadcast status stream out of it, a `watch` channel publishing the typed
//! lifecycle state, and a per-job `oneshot` carrying the terminal outcome.
//!
//! Buffers handed into a job are moved, never cloned; the task becomes their
//! sole owner, and the result buffer moves back through the job's reply
//! channel with the same discipline.

mod job;
mod status;

pub use job::{Job, JobId, JobPayload, JobResult, MERGED_OUTPUT_NAME};
pub use status::{Bootstrap, CodecSelfTest, StatusEvent, WorkerState};

use crate::engine;
use crate::error::{Result, SpliceError};
use log::{error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Buffered status events per subscriber before the oldest are dropped.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A job together with its reply channel, as sent to the task.
struct JobRequest {
    job: Job,
    reply: oneshot::Sender<Result<JobResult>>,
}

/// Awaitable handle for one submitted job.
///
/// Exactly one terminal outcome is delivered per job; [`JobTicket::wait`]
/// resolves to it.
#[derive(Debug)]
pub struct JobTicket {
    id: JobId,
    outcome: oneshot::Receiver<Result<JobResult>>,
}

impl JobTicket {
    /// Correlation identifier of the submitted job.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Await the job's terminal event.
    pub async fn wait(self) -> Result<JobResult> {
        self.outcome.await.map_err(|_| SpliceError::WorkerGone)?
    }
}

/// Handle to the background processing task.
pub struct WorkerBridge {
    commands: mpsc::UnboundedSender<JobRequest>,
    state: Arc<watch::Sender<WorkerState>>,
    events: broadcast::Sender<StatusEvent>,
    next_job: AtomicU64,
}

impl WorkerBridge {
    /// Spawn a background task with the default codec self-test bootstrap.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        Self::spawn_with_bootstrap(CodecSelfTest)
    }

    /// Spawn a background task with a caller-supplied bootstrap.
    pub fn spawn_with_bootstrap<B: Bootstrap>(bootstrap: B) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(WorkerState::Booting);
        let state = Arc::new(state);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tokio::spawn(run_worker(
            bootstrap,
            Arc::clone(&state),
            events.clone(),
            command_rx,
        ));

        Self {
            commands,
            state,
            events,
            next_job: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state of the task.
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn watch_state(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    /// Subscribe to the status stream.
    ///
    /// Events are delivered in emission order. Only events emitted after the
    /// subscription are observed.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Wait for the one-time bootstrap to finish.
    ///
    /// Resolves once the task is `Ready`; reports an error if the task
    /// faulted during bootstrap instead.
    pub async fn wait_until_ready(&self) -> Result<()> {
        let mut rx = self.state.subscribe();
        let state = *rx
            .wait_for(|s| matches!(s, WorkerState::Ready | WorkerState::Faulted))
            .await
            .map_err(|_| SpliceError::WorkerGone)?;
        match state {
            WorkerState::Ready => Ok(()),
            state => Err(SpliceError::NotReady { state }),
        }
    }

    /// Submit a job, transferring ownership of its buffers to the task.
    ///
    /// Rejected synchronously unless the task is exactly `Ready`; the bridge
    /// never queues a second submission behind an in-flight job. On success
    /// the state moves to `Working` immediately, so a second submit in the
    /// same tick is deterministically rejected.
    pub fn submit(&self, payload: JobPayload) -> Result<JobTicket> {
        let current = self.state();
        if current != WorkerState::Ready {
            return Err(SpliceError::NotReady { state: current });
        }

        let id = self.next_job.fetch_add(1, Ordering::Relaxed) + 1;
        let (reply, outcome) = oneshot::channel();
        self.state.send_replace(WorkerState::Working);

        let request = JobRequest {
            job: Job { id, payload },
            reply,
        };
        if self.commands.send(request).is_err() {
            // The task is gone; nothing will ever serve this or any job.
            self.state.send_replace(WorkerState::Faulted);
            return Err(SpliceError::WorkerGone);
        }

        Ok(JobTicket { id, outcome })
    }
}

/// The background task: one-time bootstrap, then a strictly sequential job
/// loop.
async fn run_worker<B: Bootstrap>(
    mut bootstrap: B,
    state: Arc<watch::Sender<WorkerState>>,
    events: broadcast::Sender<StatusEvent>,
    mut commands: mpsc::UnboundedReceiver<JobRequest>,
) {
    state.send_replace(WorkerState::Booting);
    emit(
        &events,
        StatusEvent::Loading {
            message: "Booting recomposition engine".into(),
        },
    );
    if let Err(err) = bootstrap.boot() {
        bootstrap_fault(&state, &events, &err);
        return;
    }

    state.send_replace(WorkerState::InstallingDependencies);
    emit(
        &events,
        StatusEvent::Loading {
            message: "Preparing PDF codec".into(),
        },
    );
    if let Err(err) = bootstrap.install() {
        bootstrap_fault(&state, &events, &err);
        return;
    }

    state.send_replace(WorkerState::Ready);
    emit(
        &events,
        StatusEvent::Ready {
            message: "Ready to process documents".into(),
        },
    );
    info!("background processor ready");

    while let Some(JobRequest { job, reply }) = commands.recv().await {
        let id = job.id;
        emit(
            &events,
            StatusEvent::Working {
                job: id,
                message: job.payload.describe(),
            },
        );

        // The engine is synchronous CPU-bound work; run it off the async
        // runtime. A panic out of the blocking call is an unrecoverable
        // boundary fault.
        match tokio::task::spawn_blocking(move || execute(job)).await {
            Ok(Ok(result)) => {
                info!("job {id} complete: {}", result.filename);
                emit(
                    &events,
                    StatusEvent::Complete {
                        job: id,
                        filename: result.filename.clone(),
                    },
                );
                state.send_replace(WorkerState::Ready);
                let _ = reply.send(Ok(result));
            }
            Ok(Err(err)) => {
                warn!("job {id} failed: {err}");
                emit(
                    &events,
                    StatusEvent::Error {
                        job: Some(id),
                        message: err.to_string(),
                    },
                );
                state.send_replace(WorkerState::Ready);
                let _ = reply.send(Err(err));
            }
            Err(join_err) => {
                let reason = format!("job {id} aborted the processing task: {join_err}");
                error!("{reason}");
                emit(
                    &events,
                    StatusEvent::Error {
                        job: Some(id),
                        message: reason.clone(),
                    },
                );
                state.send_replace(WorkerState::Faulted);
                let _ = reply.send(Err(SpliceError::WorkerFault { reason }));
                return;
            }
        }
    }
}

fn bootstrap_fault(
    state: &watch::Sender<WorkerState>,
    events: &broadcast::Sender<StatusEvent>,
    err: &SpliceError,
) {
    error!("bootstrap failed: {err}");
    emit(
        events,
        StatusEvent::Error {
            job: None,
            message: err.to_string(),
        },
    );
    state.send_replace(WorkerState::Faulted);
}

fn emit(events: &broadcast::Sender<StatusEvent>, event: StatusEvent) {
    // A send with no live subscribers is not an error for a status stream.
    let _ = events.send(event);
}

/// Run one job to completion on the blocking thread.
fn execute(job: Job) -> Result<JobResult> {
    let filename = job.payload.output_filename();
    let bytes = match job.payload {
        JobPayload::Merge { inputs, .. } => engine::merge(inputs)?,
        JobPayload::Split { input, job_name } => engine::split(input, &job_name)?,
    };
    Ok(JobResult {
        id: job.id,
        filename,
        bytes,
    })
}
