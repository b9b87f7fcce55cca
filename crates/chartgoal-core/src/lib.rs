//! chartgoal Core - building blocks for Helm chart delivery goals
//!
//! This crate provides the synchronous pieces the goal executors are made of:
//! - `CliOption`: a bare flag or a single `key: value` option
//! - `synthesize_args`: merges layered option lists into one helm argument list
//! - `ChartDetail` / `ReleaseDetail` / `Operation`: what to deploy and how
//! - `chart`: reading and rewriting the chart descriptor (`Chart.yaml`)
//! - `build_dir`: assembling an isolated chart build directory
//! - `versioner`: computing per-commit chart versions

pub mod args;
pub mod build_dir;
pub mod chart;
pub mod detail;
pub mod error;
pub mod options;
pub mod project;
pub mod versioner;

pub use args::synthesize_args;
pub use build_dir::{OPTIONAL_DIRS, OPTIONAL_FILES, REQUIRED_FILES, assemble_build_dir};
pub use chart::{
    ChartData, is_helm_project, read_chart_data, read_chart_version, write_chart_version,
};
pub use detail::{ChartDetail, Operation, ReleaseDetail, ReleaseList, ReleaseListEntry};
pub use error::{CoreError, Result};
pub use options::{CliOption, OptionList};
pub use project::Project;
pub use versioner::project_version;
