// Probe report and state machine

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Position of the runner in its lifecycle
///
/// `Idle → SessionAcquired → {Navigated | Waiting | Captured | Interacting}*
/// → SessionReleased`. Both success and failure end in `SessionReleased`;
/// the only run that does not is one whose session could never be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Idle,
    SessionAcquired,
    Navigated,
    Waiting,
    Captured,
    Interacting,
    SessionReleased,
}

/// The failure recorded by an unsuccessful run
#[derive(Debug)]
pub struct StepFailure {
    /// Index of the failing step, or `None` when the failure occurred
    /// before the step sequence started (session or page acquisition)
    pub step: Option<usize>,
    /// What went wrong
    pub error: Error,
}

/// Outcome of one probe run
///
/// Produced by [`Runner::run`](crate::Runner::run). Step failures do not
/// propagate out of the runner; they are recorded here.
#[derive(Debug)]
pub struct ProbeReport {
    target: String,
    state: ProbeState,
    artifacts: Vec<PathBuf>,
    failure: Option<StepFailure>,
}

impl ProbeReport {
    pub(crate) fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            state: ProbeState::Idle,
            artifacts: Vec::new(),
            failure: None,
        }
    }

    pub(crate) fn transition(&mut self, state: ProbeState) {
        tracing::trace!(from = ?self.state, to = ?state, "probe state transition");
        self.state = state;
    }

    pub(crate) fn record_artifact(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    pub(crate) fn record_failure(&mut self, step: Option<usize>, error: Error) {
        self.failure = Some(StepFailure { step, error });
    }

    /// The target URL this probe ran against
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The runner's terminal state
    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Artifacts written by the run, in capture order
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// The recorded failure, if any
    pub fn failure(&self) -> Option<&StepFailure> {
        self.failure.as_ref()
    }

    /// Whether every step completed and the session was released
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.state == ProbeState::SessionReleased
    }

    /// Converts the report into a `Result` over the written artifacts.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.failure {
            None => Ok(self.artifacts),
            Some(failure) => Err(match failure.step {
                Some(index) => failure.error.context(format!("step {} failed", index)),
                None => failure.error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_report_is_not_success() {
        let report = ProbeReport::new("http://localhost:8154/");
        assert_eq!(report.state(), ProbeState::Idle);
        assert!(!report.is_success());
        assert!(report.artifacts().is_empty());
    }

    #[test]
    fn test_success_requires_release() {
        let mut report = ProbeReport::new("http://localhost:8154/");
        report.transition(ProbeState::SessionAcquired);
        report.transition(ProbeState::Captured);
        assert!(!report.is_success());
        report.transition(ProbeState::SessionReleased);
        assert!(report.is_success());
    }

    #[test]
    fn test_failure_is_terminal_even_after_release() {
        let mut report = ProbeReport::new("http://localhost:8154/");
        report.transition(ProbeState::SessionAcquired);
        report.record_failure(Some(1), Error::AssertionTimeout("visibility".to_string()));
        report.transition(ProbeState::SessionReleased);
        assert!(!report.is_success());
        assert_eq!(report.failure().unwrap().step, Some(1));
    }

    #[test]
    fn test_into_result_carries_step_context() {
        let mut report = ProbeReport::new("http://localhost:8154/");
        report.record_failure(Some(2), Error::ElementNotFound("#theme_toggle".to_string()));
        let error = report.into_result().unwrap_err();
        assert!(error.to_string().starts_with("step 2 failed"));
    }
}
