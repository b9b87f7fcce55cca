//! Error types for chartgoal-helm

use thiserror::Error;

use chartgoal_core::CoreError;

/// Result type for goal operations
pub type Result<T> = std::result::Result<T, GoalError>;

/// Exit code reported for failures that are not a subprocess exit
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Exit code reported when the helm binary could not be started
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Errors that terminate a goal invocation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalError {
    /// Goal registration is unusable
    #[error("invalid goal configuration: {0}")]
    Configuration(String),

    /// Chart descriptor, build directory or version problem
    #[error(transparent)]
    Chart(#[from] CoreError),

    /// The release to upgrade is in a failed state
    #[error("Helm release {release} is in a failed state, cannot upgrade!")]
    OperationConflict { release: String },

    /// No concrete install/upgrade operation could be determined
    #[error("Could not determine operation type for helm install command!")]
    Unresolvable,

    /// helm exited with a non-zero status
    #[error("{message}")]
    Subprocess { code: i32, message: String },

    /// helm could not be started
    #[error("failed to run '{command}': {message}")]
    Spawn { command: String, message: String },

    /// `helm list` output could not be parsed
    #[error("failed to parse helm release list: {0}")]
    ReleaseListParse(String),

    /// Chart upload failed
    #[error("Failed to upload chart. Error Code: {}, {message}", status_text(.status))]
    Upload { status: Option<u16>, message: String },

    /// Version tracking lookup failed
    #[error("version lookup failed: {0}")]
    VersionLookup(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_text(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl GoalError {
    /// Exit code reported to the pipeline for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            GoalError::Subprocess { code, .. } => *code,
            GoalError::Spawn { .. } => SPAWN_FAILURE_CODE,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}

impl From<reqwest::Error> for GoalError {
    fn from(e: reqwest::Error) -> Self {
        GoalError::Upload {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Goal-level result reported to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalOutcome {
    Success,
    Failure { code: i32, message: String },
}

impl GoalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GoalOutcome::Success)
    }

    /// Process exit code for this outcome
    pub fn code(&self) -> i32 {
        match self {
            GoalOutcome::Success => 0,
            GoalOutcome::Failure { code, .. } => *code,
        }
    }
}

impl From<Result<()>> for GoalOutcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => GoalOutcome::Success,
            Err(e) => {
                tracing::error!("{}", e);
                GoalOutcome::Failure {
                    code: e.exit_code(),
                    message: e.to_string(),
                }
            }
        }
    }
}
