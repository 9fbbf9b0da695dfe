//! Pipeline phase tracking.
//!
//! `DriverPhase` enumerates the discrete states of one driver run;
//! `PipelineState` validates transitions between them and records the
//! first error. Advancement is strictly linear: environment preparation,
//! then each module in sequence, then the test runner. Any failure drops
//! into the terminal `Failed` state; a missing source tree short-circuits
//! into the distinct terminal `UsageError` state before anything runs.

use std::fmt;
use std::time::{Duration, SystemTime};

use crate::error::DriverError;

/// Discrete phases of the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Nothing has run yet.
    NotStarted,

    /// Required system packages are being queried and installed.
    PreparingEnvironment,

    /// Module `i` (zero-based, in suite order) is being configured and
    /// compiled.
    BuildingModule(usize),

    /// The test module is being built and its binary executed.
    RunningTests,

    /// Every step succeeded.
    Completed,

    /// A step failed; the pipeline stopped there.
    Failed,

    /// The source tree precondition failed; nothing was installed or
    /// built.
    UsageError,
}

impl DriverPhase {
    /// Terminal phases admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DriverPhase::Completed | DriverPhase::Failed | DriverPhase::UsageError
        )
    }
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverPhase::NotStarted => write!(f, "not started"),
            DriverPhase::PreparingEnvironment => write!(f, "preparing environment"),
            DriverPhase::BuildingModule(i) => write!(f, "building module {}", i + 1),
            DriverPhase::RunningTests => write!(f, "running tests"),
            DriverPhase::Completed => write!(f, "completed"),
            DriverPhase::Failed => write!(f, "failed"),
            DriverPhase::UsageError => write!(f, "usage error"),
        }
    }
}

/// Execution state for one driver run.
#[derive(Debug, Clone)]
pub struct PipelineState {
    phase: DriverPhase,
    /// Number of regular modules in the suite (the test runner is not
    /// counted; it runs in its own phase).
    module_count: usize,
    error: Option<String>,
    start_time: SystemTime,
    last_update_time: SystemTime,
}

impl PipelineState {
    pub fn new(module_count: usize) -> Self {
        let now = SystemTime::now();
        PipelineState {
            phase: DriverPhase::NotStarted,
            module_count,
            error: None,
            start_time: now,
            last_update_time: now,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check whether a transition from the current phase is legal.
    pub fn can_transition_to(&self, next: DriverPhase) -> bool {
        use DriverPhase::*;
        match (self.phase, next) {
            (NotStarted, PreparingEnvironment) => true,
            (NotStarted, UsageError) => true,
            (PreparingEnvironment, BuildingModule(0)) => self.module_count > 0,
            (PreparingEnvironment, RunningTests) => self.module_count == 0,
            (BuildingModule(i), BuildingModule(j)) => j == i + 1 && j < self.module_count,
            (BuildingModule(i), RunningTests) => i + 1 == self.module_count,
            (RunningTests, Completed) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Attempt to advance to the next phase.
    pub fn transition_to(&mut self, next: DriverPhase) -> Result<(), DriverError> {
        if !self.can_transition_to(next) {
            return Err(DriverError::Phase(format!(
                "{} -> {}",
                self.phase, next
            )));
        }
        self.phase = next;
        self.last_update_time = SystemTime::now();
        Ok(())
    }

    /// Record an error and drop into the Failed phase.
    ///
    /// A run already in a terminal phase keeps that phase (a usage error
    /// stays a usage error); only the message is stored.
    pub fn record_error(&mut self, error: String) {
        self.error = Some(error);
        if !self.phase.is_terminal() {
            self.phase = DriverPhase::Failed;
        }
        self.last_update_time = SystemTime::now();
    }

    /// Time elapsed since the run started.
    pub fn elapsed_since_start(&self) -> Duration {
        self.start_time.elapsed().unwrap_or(Duration::ZERO)
    }
}
