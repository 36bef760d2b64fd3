//! Invocation state machine
//!
//! ```text
//! Start → EnvLoaded → [ProviderResolved] → TaskRunning → TaskDone → EnvSaved
//! ```
//!
//! There are no failure states: a failing step ends the invocation in the
//! phase it had reached.

use std::fmt;

/// Phase of one task invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationPhase {
    /// Nothing done yet
    Start,
    /// Environment loaded and configuration reloaded
    EnvLoaded,
    /// `--provider` built
    ProviderResolved,
    /// Task body running
    TaskRunning,
    /// Task body returned successfully
    TaskDone,
    /// Environment handed to the store
    EnvSaved,
}

impl InvocationPhase {
    /// All phases in order
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::EnvLoaded,
        Self::ProviderResolved,
        Self::TaskRunning,
        Self::TaskDone,
        Self::EnvSaved,
    ];

    /// Upper-case name used in logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::EnvLoaded => "ENV_LOADED",
            Self::ProviderResolved => "PROVIDER_RESOLVED",
            Self::TaskRunning => "TASK_RUNNING",
            Self::TaskDone => "TASK_DONE",
            Self::EnvSaved => "ENV_SAVED",
        }
    }

    /// Whether no further phase follows
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EnvSaved)
    }
}

impl fmt::Display for InvocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Illegal phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal invocation transition: {from} -> {to}")]
pub struct PhaseError {
    /// Phase the invocation was in
    pub from: InvocationPhase,
    /// Phase it tried to enter
    pub to: InvocationPhase,
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: InvocationPhase) -> Vec<InvocationPhase> {
    use InvocationPhase::*;
    match from {
        Start => vec![EnvLoaded],
        EnvLoaded => vec![ProviderResolved, TaskRunning],
        ProviderResolved => vec![TaskRunning],
        TaskRunning => vec![TaskDone],
        TaskDone => vec![EnvSaved],
        EnvSaved => vec![],
    }
}

/// Validates a phase change
///
/// # Errors
/// `PhaseError` when `to` does not directly follow `from`
pub fn validate_transition(from: InvocationPhase, to: InvocationPhase) -> Result<(), PhaseError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PhaseError { from, to })
    }
}

/// Phases traversed by one invocation, starting at `Start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTrace {
    phases: Vec<InvocationPhase>,
}

impl PhaseTrace {
    /// Trace positioned at `Start`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: vec![InvocationPhase::Start],
        }
    }

    /// Current phase
    #[must_use]
    pub fn current(&self) -> InvocationPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(InvocationPhase::Start)
    }

    /// Move to the next phase
    ///
    /// # Errors
    /// `PhaseError` if `to` is not reachable from the current phase; the trace
    /// is left unchanged.
    pub fn advance(&mut self, to: InvocationPhase) -> Result<(), PhaseError> {
        let from = self.current();
        validate_transition(from, to)?;
        tracing::debug!("Invocation phase {} -> {}", from, to);
        self.phases.push(to);
        Ok(())
    }

    /// Whether the trace passed through `phase`
    #[must_use]
    pub fn reached(&self, phase: InvocationPhase) -> bool {
        self.phases.contains(&phase)
    }

    /// Traversed phases in order
    #[must_use]
    pub fn phases(&self) -> &[InvocationPhase] {
        &self.phases
    }

    /// Consume into the traversed phases
    #[must_use]
    pub fn into_phases(self) -> Vec<InvocationPhase> {
        self.phases
    }
}

impl Default for PhaseTrace {
    fn default() -> Self {
        Self::new()
    }
}
