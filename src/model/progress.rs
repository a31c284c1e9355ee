use std::fmt;

/// Status text plus optional percent-complete for the active run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub message: String,
    pub percent: Option<u8>,
    pub current_entry: Option<String>,
}

impl ProgressState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            percent: None,
            current_entry: None,
        }
    }

    /// Archive progress: `percent` of input bytes written so far
    pub fn archiving(percent: u8, current_entry: Option<&str>) -> Self {
        let percent = percent.min(100);
        let message = match current_entry {
            Some(entry) => format!("Zipping: {}% ({})", percent, entry),
            None => format!("Zipping: {}%", percent),
        };
        Self {
            message,
            percent: Some(percent),
            current_entry: current_entry.map(String::from),
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives progress updates from the active run
pub trait ProgressSink {
    fn report(&mut self, state: &ProgressState);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressState),
{
    fn report(&mut self, state: &ProgressState) {
        self(state)
    }
}

/// Sink that drops every update
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _state: &ProgressState) {}
}
