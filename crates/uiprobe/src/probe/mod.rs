//! The verification probe: step vocabulary, runner, and report
//!
//! A probe is a scripted sequence of [`Step`]s run by a [`Runner`] against a
//! target URL. The runner owns one browser session per run and guarantees
//! its release on every exit path; the outcome lands in a [`ProbeReport`].

mod report;
mod runner;
mod step;

pub use report::{ProbeReport, ProbeState, StepFailure};
pub use runner::Runner;
pub use step::{Action, Step};
