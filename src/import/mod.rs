//! Entity import transaction: validate, start, commit, poll

pub mod payload;
pub mod transaction;

use std::fmt;
use std::time::Duration;

pub use payload::ImportPayload;
pub use transaction::{ImportOutcome, Importer};

/// Step of an import run, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validate,
    Start,
    Commit,
    Status,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Validate => "Input validation",
            Phase::Start => "Upload and verification",
            Phase::Commit => "File commit",
            Phase::Status => "File import",
        })
    }
}

/// Where the orchestrator currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Validating,
    Starting,
    Discarding,
    Committing,
    Polling,
    Done { success: bool },
}

/// Progress notifications handed to the caller of [`Importer::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// The orchestrator moved to a new state
    Entered(TransactionState),
    /// A phase finished successfully
    Passed(Phase),
    /// Start was rejected but force mode carries on to commit
    Forced { diagnostics: Vec<String> },
}

/// How the status endpoint is polled after commit
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Wait between two status requests
    pub interval: Duration,
    /// Give up after this many busy answers; `None` polls forever
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: Some(600),
        }
    }
}

/// Options for one import run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Commit even when start reported errors
    pub force: bool,
    pub poll: PollPolicy,
}
