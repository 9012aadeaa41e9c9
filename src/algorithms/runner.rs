//! Runs a solver on a background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use super::error::RunnerError;
use super::report::SolveReport;
use super::Solver;
use crate::grid::GridState;

/// Handle to a solve running on its own thread.
///
/// Dropping the handle raises the cancel flag and detaches the thread.
#[derive(Debug)]
pub struct SolveHandle {
    report_rx: mpsc::Receiver<SolveReport>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

/// Moves `solver` onto a new thread and starts solving from `initial`.
pub fn spawn(mut solver: Box<dyn Solver + Send>, initial: GridState) -> SolveHandle {
    let (report_tx, report_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let thread = std::thread::spawn(move || {
        debug!(solver = solver.name(), "background solve started");
        let report = solver.solve_with_cancel(&initial, &flag);
        // The receiver may already be gone.
        let _ = report_tx.send(report);
    });

    SolveHandle {
        report_rx,
        cancel,
        thread: Some(thread),
    }
}

impl SolveHandle {
    /// Asks the solver to stop at its next check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// The shared flag the solver polls.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Returns the report if the solve has finished.
    pub fn try_report(&self) -> Option<SolveReport> {
        self.report_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the report.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SolveReport> {
        self.report_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the solver finishes and returns its report.
    pub fn wait(mut self) -> Result<SolveReport, RunnerError> {
        let report = self.report_rx.recv().map_err(|_| RunnerError::Panicked);
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| RunnerError::Panicked)?;
        }
        report
    }
}

impl Drop for SolveHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.cancel();
        }
    }
}
