// src/services/workflow_controller.rs
//! Verification workflow controller.
//!
//! Owns the single verification session and moves it through
//! `Upload -> Scanning -> Checking -> Result`. Every simulated delay is a
//! task in a virtual-time [`TaskQueue`]; the controller never sleeps. A
//! driver (see [`crate::scheduler::driver`]) or a test advances the clock
//! and the due tasks run in order.
//!
//! ## Timeline of a session (default timings)
//! - `proceed()` enters Scanning; the scan begins 1 s later
//! - progress ticks every 200 ms until it reaches 100
//! - 500 ms later the extracted fields appear
//! - 2 s later the session auto-advances to Checking
//! - the three checks complete at +1 s, +2 s, +3 s
//! - at +4 s the session auto-advances to Result and the verdict is drawn
//!
//! ## Cancellation
//! `reset()` drops every queued task and bumps the session epoch. Tasks
//! carry the epoch they were scheduled under, and a task from an older
//! epoch is discarded if it is ever dispatched, so a timer left over from a
//! previous session can never touch the new one.

use crate::config::{Settings, Timings};
use crate::errors::WorkflowError;
use crate::models::upload::{AcceptedFile, UploadedFile};
use crate::models::verification::{ExtractedFields, VerificationResult};
use crate::models::workflow::{CheckKind, Checklist, WorkflowState, WorkflowStatus, WorkflowStep};
use crate::scheduler::task_queue::{Scheduled, TaskQueue};
use crate::services::outcome::OutcomeGenerator;
use crate::services::progress::{ProgressSimulator, ProgressTicks};
use crate::services::upload_gate::UploadGate;
use crate::storage::fixtures;
use crate::utils::random::{RandomSource, SystemRandom};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::broadcast;

/// Upper bound on tasks run by [`WorkflowController::run_until_idle`].
const IDLE_RUN_LIMIT: usize = 100_000;

const EVENT_CAPACITY: usize = 256;

/// Work the controller schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowTask {
    BeginScan,
    ProgressTick,
    RevealFields,
    CompleteCheck(CheckKind),
    /// Move on from `from`, unless the session already left it.
    AutoAdvance { from: WorkflowStep },
}

/// Notifications published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    FileAccepted { name: String },
    StepChanged { from: WorkflowStep, to: WorkflowStep },
    Progress { percent: u8 },
    FieldsExtracted,
    CheckCompleted { check: CheckKind },
    ResultReady { verified: bool, authenticity_score: u8 },
    Reset { epoch: u64 },
}

/// Mutable state of one verification session.
struct Session {
    epoch: u64,
    state: WorkflowState,
    file: Option<AcceptedFile>,
    scan: Option<ProgressTicks>,
    fields: Option<ExtractedFields>,
    checks: Checklist,
    result: Option<VerificationResult>,
}

impl Session {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            state: WorkflowState::initial(),
            file: None,
            scan: None,
            fields: None,
            checks: Checklist::default(),
            result: None,
        }
    }
}

/// Display state of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckView {
    pub check: CheckKind,
    pub label: &'static str,
    pub completed: bool,
}

/// Read-only copy of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub state: WorkflowState,
    pub step_number: u8,
    pub file: Option<AcceptedFile>,
    pub can_proceed: bool,
    pub progress: u8,
    pub fields: Option<ExtractedFields>,
    pub checks: Vec<CheckView>,
    pub result: Option<VerificationResult>,
}

pub struct WorkflowController {
    session: Session,
    queue: TaskQueue<WorkflowTask>,
    gate: UploadGate,
    timings: Timings,
    outcome: OutcomeGenerator,
    rng: Box<dyn RandomSource>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowController {
    /// Creates a controller with an empty session at `Upload`.
    ///
    /// # Arguments
    /// * `gate` - Upload validation rules
    /// * `timings` - Pacing of the simulated steps
    /// * `rng` - Source for scan increments and verdicts
    pub fn new(gate: UploadGate, timings: Timings, rng: Box<dyn RandomSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Session::new(0),
            queue: TaskQueue::new(),
            gate,
            timings,
            outcome: OutcomeGenerator::new(),
            rng,
            events,
        }
    }

    /// Builds a controller from loaded settings; seeded when
    /// `random_seed` is set.
    pub fn from_settings(settings: &Settings) -> Self {
        let rng: Box<dyn RandomSource> = match settings.random_seed {
            Some(seed) => Box::new(SystemRandom::seeded(seed)),
            None => Box::new(SystemRandom::from_entropy()),
        };
        Self::new(
            UploadGate::new(settings.upload.max_size_bytes),
            settings.timings,
            rng,
        )
    }

    /// Subscribes to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> WorkflowState {
        self.session.state
    }

    pub fn step(&self) -> WorkflowStep {
        self.session.state.step
    }

    /// Session epoch; bumped by every reset.
    pub fn epoch(&self) -> u64 {
        self.session.epoch
    }

    pub fn uploaded_file(&self) -> Option<&AcceptedFile> {
        self.session.file.as_ref()
    }

    pub fn extracted_fields(&self) -> Option<&ExtractedFields> {
        self.session.fields.as_ref()
    }

    pub fn result(&self) -> Option<&VerificationResult> {
        self.session.result.as_ref()
    }

    pub fn checklist(&self) -> Checklist {
        self.session.checks
    }

    /// Scan progress in percent; 0 before the scan starts.
    pub fn progress(&self) -> u8 {
        self.session.scan.as_ref().map(ProgressTicks::current).unwrap_or(0)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let checks = CheckKind::ALL
            .iter()
            .map(|check| CheckView {
                check: *check,
                label: check.label(),
                completed: self.session.checks.is_complete(*check),
            })
            .collect();

        SessionSnapshot {
            epoch: self.session.epoch,
            state: self.session.state,
            step_number: self.session.state.step.number(),
            file: self.session.file.clone(),
            can_proceed: self.can_proceed(),
            progress: self.progress(),
            fields: self.session.fields.clone(),
            checks,
            result: self.session.result.clone(),
        }
    }

    fn can_proceed(&self) -> bool {
        self.session.state.step == WorkflowStep::Upload && self.session.file.is_some()
    }

    /// Validates and stages a file for the session.
    ///
    /// A new submission while still at `Upload` replaces the staged file.
    ///
    /// # Errors
    /// - `Rejected(..)` if the upload gate refuses the file; the session is
    ///   left untouched
    /// - `InvalidTransition` if the session is past `Upload`
    pub fn submit(&mut self, file: &UploadedFile) -> Result<AcceptedFile, WorkflowError> {
        let from = self.session.state.step;
        if from != WorkflowStep::Upload {
            return Err(WorkflowError::InvalidTransition {
                from,
                reason: "a verification is already in progress",
            });
        }

        let accepted = self.gate.submit(file)?;
        info!(
            "accepted '{}' ({}, {:.2} MiB)",
            accepted.name,
            accepted.document_type,
            accepted.size_mib()
        );
        self.session.file = Some(accepted.clone());
        self.session.state.status = WorkflowStatus::Uploading;
        self.emit(WorkflowEvent::FileAccepted {
            name: accepted.name.clone(),
        });
        Ok(accepted)
    }

    /// The user's "proceed" action: starts scanning the staged file.
    ///
    /// # Errors
    /// `InvalidTransition` when not at `Upload` or no file is staged.
    pub fn proceed(&mut self) -> Result<(), WorkflowError> {
        let from = self.session.state.step;
        if from != WorkflowStep::Upload {
            return Err(WorkflowError::InvalidTransition {
                from,
                reason: "proceed is only available while uploading",
            });
        }
        self.advance().map(|_| ())
    }

    /// Moves the session to the next step.
    ///
    /// # Returns
    /// The step entered.
    ///
    /// # Errors
    /// `InvalidTransition` when
    /// - the session is at `Result` (reset first)
    /// - at `Upload` without an accepted file
    /// - at `Scanning` before the fields were extracted
    /// - at `Checking` before all three checks completed
    pub fn advance(&mut self) -> Result<WorkflowStep, WorkflowError> {
        let from = self.session.state.step;
        let to = from.next().ok_or(WorkflowError::InvalidTransition {
            from,
            reason: "the session is finished; reset before starting again",
        })?;

        let blocked = match from {
            WorkflowStep::Upload if self.session.file.is_none() => Some("no accepted file"),
            WorkflowStep::Scanning if self.session.fields.is_none() => Some("the scan has not finished"),
            WorkflowStep::Checking if !self.session.checks.all_complete() => {
                Some("checks are still running")
            }
            _ => None,
        };
        if let Some(reason) = blocked {
            return Err(WorkflowError::InvalidTransition { from, reason });
        }

        self.enter(from, to);
        Ok(to)
    }

    /// Returns to `Upload` from any step, clearing the file, fields, checks
    /// and verdict and cancelling every pending task of the session.
    pub fn reset(&mut self) {
        let cancelled = self.queue.cancel_all();
        let epoch = self.session.epoch + 1;
        self.session = Session::new(epoch);
        info!("session reset (epoch {}, {} pending tasks cancelled)", epoch, cancelled);
        self.emit(WorkflowEvent::Reset { epoch });
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// Due time of the next pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.next_due()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Runs every task due at or before `now` and leaves the clock at
    /// `now`, so delays scheduled afterwards are measured from it. Returns
    /// the number of tasks run.
    pub fn run_due(&mut self, now: Duration) -> usize {
        self.run_until(now)
    }

    /// Advances the virtual clock by `by`, running due tasks in order.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let target = self.queue.now() + by;
        self.run_until(target)
    }

    /// Runs tasks until the queue is empty.
    ///
    /// Stops after a large fixed number of tasks in case a random source
    /// that never advances the scan keeps it ticking forever.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(due) = self.queue.next_due() {
            if ran >= IDLE_RUN_LIMIT {
                warn!("stopped after {} tasks with work still queued", ran);
                break;
            }
            ran += self.run_until(due);
        }
        ran
    }

    fn run_until(&mut self, target: Duration) -> usize {
        let mut ran = 0;
        while let Some(due) = self.queue.next_due() {
            if due > target {
                break;
            }
            // tasks scheduled from inside a task are measured from its due time
            self.queue.set_clock(due);
            while let Some(task) = self.queue.pop_due() {
                self.dispatch(task);
                ran += 1;
            }
        }
        self.queue.set_clock(target);
        ran
    }

    /// Applies one scheduled task, ignoring it if it belongs to an older
    /// session or no longer fits the current step.
    pub(crate) fn dispatch(&mut self, scheduled: Scheduled<WorkflowTask>) {
        if scheduled.epoch != self.session.epoch {
            debug!(
                "dropping stale {:?} from epoch {} (current {})",
                scheduled.task, scheduled.epoch, self.session.epoch
            );
            return;
        }

        let step = self.session.state.step;
        match scheduled.task {
            WorkflowTask::BeginScan => {
                if step != WorkflowStep::Scanning || self.session.scan.is_some() {
                    return;
                }
                debug!("scan started");
                self.session.scan = Some(ProgressSimulator::new().start());
                self.schedule(self.timings.tick_interval(), WorkflowTask::ProgressTick);
            }
            WorkflowTask::ProgressTick => {
                if step != WorkflowStep::Scanning {
                    return;
                }
                let Some(scan) = self.session.scan.as_mut() else {
                    return;
                };
                let Some(percent) = scan.tick(&mut *self.rng) else {
                    return;
                };
                let complete = scan.is_complete();
                debug!("scan progress {}%", percent);
                self.emit(WorkflowEvent::Progress { percent });
                if complete {
                    self.schedule(self.timings.reveal_delay(), WorkflowTask::RevealFields);
                } else {
                    self.schedule(self.timings.tick_interval(), WorkflowTask::ProgressTick);
                }
            }
            WorkflowTask::RevealFields => {
                if step != WorkflowStep::Scanning || self.session.fields.is_some() {
                    return;
                }
                self.session.fields = Some(fixtures::scanned_fields());
                info!("extracted certificate fields");
                self.emit(WorkflowEvent::FieldsExtracted);
                self.schedule(
                    self.timings.field_display(),
                    WorkflowTask::AutoAdvance {
                        from: WorkflowStep::Scanning,
                    },
                );
            }
            WorkflowTask::CompleteCheck(check) => {
                if step == WorkflowStep::Checking && self.session.checks.complete(check) {
                    info!("check complete: {}", check.label());
                    self.emit(WorkflowEvent::CheckCompleted { check });
                }
            }
            WorkflowTask::AutoAdvance { from } => {
                if step != from {
                    return;
                }
                if let Err(err) = self.advance() {
                    warn!("automatic advance from {} failed: {}", from, err);
                }
            }
        }
    }

    fn enter(&mut self, from: WorkflowStep, to: WorkflowStep) {
        self.session.state = WorkflowState::entering(to);
        info!("step {} -> {}", from, to);
        self.emit(WorkflowEvent::StepChanged { from, to });

        match to {
            WorkflowStep::Upload => {}
            WorkflowStep::Scanning => {
                self.schedule(self.timings.scan_start_delay(), WorkflowTask::BeginScan);
            }
            WorkflowStep::Checking => {
                for (check, offset) in CheckKind::ALL.iter().zip(self.timings.check_offsets()) {
                    self.schedule(offset, WorkflowTask::CompleteCheck(*check));
                }
                self.schedule(
                    self.timings.checking_deadline(),
                    WorkflowTask::AutoAdvance {
                        from: WorkflowStep::Checking,
                    },
                );
            }
            WorkflowStep::Result => {
                let result = self.outcome.generate(&mut *self.rng);
                info!(
                    "verdict: {} (score {}, tx {})",
                    result.headline(),
                    result.authenticity_score,
                    result.transaction_id
                );
                self.emit(WorkflowEvent::ResultReady {
                    verified: result.verified,
                    authenticity_score: result.authenticity_score,
                });
                self.session.result = Some(result);
            }
        }
    }

    fn schedule(&mut self, delay: Duration, task: WorkflowTask) {
        self.queue.schedule(delay, self.session.epoch, task);
    }

    fn emit(&self, event: WorkflowEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
