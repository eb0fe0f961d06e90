// src/scheduler/driver.rs
//! Wall-clock driver for the workflow controller.
//!
//! The controller works in virtual time starting at zero. The driver pins
//! that zero to the instant it was created and runs a background loop that
//! sleeps until the next task is due, runs everything that is due, and goes
//! back to sleep. User actions go through [`SessionDriver::with_controller`],
//! which first catches the controller up to the current time and then wakes
//! the loop so newly scheduled work is picked up.

use crate::services::workflow_controller::{SessionSnapshot, WorkflowController, WorkflowEvent};
use log::debug;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Shared handle to a controller and its timer loop.
#[derive(Clone)]
pub struct SessionDriver {
    controller: Arc<Mutex<WorkflowController>>,
    wake: Arc<Notify>,
    started: Instant,
}

impl SessionDriver {
    pub fn new(controller: WorkflowController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            wake: Arc::new(Notify::new()),
            started: Instant::now(),
        }
    }

    /// Starts the timer loop on the current tokio runtime.
    ///
    /// The loop runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn spawn(&self) -> JoinHandle<()> {
        let driver = self.clone();
        tokio::spawn(async move { driver.run().await })
    }

    async fn run(self) {
        loop {
            let next_due = {
                let mut controller = self.controller.lock().await;
                let ran = controller.run_due(self.started.elapsed());
                if ran > 0 {
                    debug!("ran {} scheduled tasks", ran);
                }
                controller.next_due()
            };

            match next_due {
                Some(due) => {
                    tokio::select! {
                        _ = time::sleep_until(self.started + due) => {}
                        _ = self.wake.notified() => {}
                    }
                }
                None => self.wake.notified().await,
            }
        }
    }

    /// Runs `f` against the controller at the current wall-clock time.
    ///
    /// Overdue tasks are applied before `f`, and the timer loop is woken
    /// afterwards in case `f` scheduled something.
    pub async fn with_controller<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut WorkflowController) -> R,
    {
        let result = {
            let mut controller = self.controller.lock().await;
            controller.run_due(self.started.elapsed());
            f(&mut *controller)
        };
        self.wake.notify_one();
        result
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.with_controller(|controller| controller.snapshot()).await
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.controller.lock().await.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::errors::WorkflowError;
    use crate::models::upload::UploadedFile;
    use crate::models::workflow::WorkflowStep;
    use crate::services::upload_gate::UploadGate;
    use crate::utils::random::SystemRandom;
    use std::time::Duration;

    fn fast_timings() -> Timings {
        Timings {
            scan_start_delay_ms: 5,
            tick_interval_ms: 1,
            reveal_delay_ms: 2,
            field_display_ms: 5,
            database_check_ms: 2,
            signature_check_ms: 4,
            fraud_check_ms: 6,
            checking_duration_ms: 8,
        }
    }

    fn driver(timings: Timings) -> SessionDriver {
        SessionDriver::new(WorkflowController::new(
            UploadGate::default(),
            timings,
            Box::new(SystemRandom::seeded(17)),
        ))
    }

    #[tokio::test]
    async fn test_driver_runs_session_to_result() {
        let driver = driver(fast_timings());
        let handle = driver.spawn();
        let mut events = driver.subscribe().await;

        driver
            .with_controller(|c| -> Result<(), WorkflowError> {
                c.submit(&UploadedFile::new("degree.pdf", "application/pdf", 2048))?;
                c.proceed()
            })
            .await
            .unwrap();

        let verdict = time::timeout(Duration::from_secs(5), async {
            loop {
                if let Ok(WorkflowEvent::ResultReady { authenticity_score, .. }) = events.recv().await {
                    return authenticity_score;
                }
            }
        })
        .await
        .expect("session did not finish in time");

        assert!((20..100).contains(&verdict));
        let snapshot = driver.snapshot().await;
        assert_eq!(snapshot.state.step, WorkflowStep::Result);
        assert_eq!(snapshot.progress, 100);
        handle.abort();
    }

    #[tokio::test]
    async fn test_reset_cancels_running_session() {
        let mut timings = fast_timings();
        timings.scan_start_delay_ms = 50;
        let driver = driver(timings);
        let handle = driver.spawn();

        driver
            .with_controller(|c| -> Result<(), WorkflowError> {
                c.submit(&UploadedFile::new("scan.jpg", "image/jpeg", 4096))?;
                c.proceed()
            })
            .await
            .unwrap();
        driver.with_controller(|c| c.reset()).await;

        time::sleep(Duration::from_millis(200)).await;

        let snapshot = driver.snapshot().await;
        assert_eq!(snapshot.state.step, WorkflowStep::Upload);
        assert_eq!(snapshot.progress, 0);
        assert!(snapshot.file.is_none());
        assert_eq!(snapshot.epoch, 1);
        handle.abort();
    }
}
