//! CLI error types with exit code handling
//!
//! Every failure is mapped to an exit code; goal failures carry the code of
//! the helm command that failed.

use miette::Diagnostic;
use thiserror::Error;

use chartgoal_core::CoreError;
use chartgoal_helm::GoalError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Goal or user configuration is unusable
    #[error("Configuration error: {message}")]
    #[diagnostic(code(chartgoal::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Chart descriptor missing or invalid
    #[error("Chart error: {message}")]
    #[diagnostic(code(chartgoal::cli::chart))]
    Chart {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(chartgoal::cli::io))]
    Io { message: String },

    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(chartgoal::cli::usage))]
    Usage { message: String },

    /// A helm goal reported failure
    #[error("Goal {goal} failed: {message}")]
    #[diagnostic(code(chartgoal::cli::goal))]
    GoalFailed {
        goal: String,
        code: i32,
        message: String,
    },

    /// The project holds no chart descriptor
    #[error("{path} is not a Helm project")]
    #[diagnostic(
        code(chartgoal::cli::not_helm),
        help("a Helm project contains a Chart.yaml or Chart.yml")
    )]
    NotHelmProject { path: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(chartgoal::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::GoalFailed { code, .. } => *code,
            CliError::NotHelmProject { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DescriptorNotFound { .. } => CliError::Chart {
                message: err.to_string(),
                help: Some("run chartgoal from the chart's project or pass --project".to_string()),
            },
            CoreError::InvalidDescriptor { .. }
            | CoreError::InvalidVersion { .. }
            | CoreError::YamlParse(_) => CliError::Chart {
                message: err.to_string(),
                help: None,
            },
            CoreError::BuildDirExists { .. } | CoreError::MissingChartFile { .. } | CoreError::Io(_) => {
                CliError::Io {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<GoalError> for CliError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::Chart(core) => core.into(),
            GoalError::Configuration(message) => CliError::config(message),
            GoalError::Io(e) => e.into(),
            other => CliError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
