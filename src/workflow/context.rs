use crate::error::WorkflowError;
use crate::model::{ProgressSink, ProgressState};

/// Busy flag and status line shared by every workflow.
///
/// Only the active run mutates it; a presentation layer reads `status()` and
/// `is_busy()`. An optional observer sees every status change as it happens.
#[derive(Default)]
pub struct RunContext {
    busy: bool,
    status: ProgressState,
    observer: Option<Box<dyn ProgressSink>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every status change to `observer`
    pub fn with_observer(mut self, observer: Box<dyn ProgressSink>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> &ProgressState {
        &self.status
    }

    /// Mark a run as started, refusing if one is already in progress
    pub fn begin(&mut self, message: impl Into<String>) -> Result<(), WorkflowError> {
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        self.busy = true;
        self.set_status(ProgressState::message(message));
        Ok(())
    }

    /// Clear the busy flag and leave a final message
    pub fn end(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.set_status(ProgressState::message(message));
    }

    /// Replace the status line without touching the busy flag
    pub fn set_status(&mut self, status: ProgressState) {
        if let Some(observer) = self.observer.as_mut() {
            observer.report(&status);
        }
        self.status = status;
    }

    pub fn reset(&mut self) {
        self.set_status(ProgressState::default());
    }
}

impl ProgressSink for RunContext {
    fn report(&mut self, state: &ProgressState) {
        self.set_status(state.clone());
    }
}
