//! Chart build directory assembly
//!
//! `helm package` requires the chart directory to be named after the chart.
//! A fresh `<project>/<chart name>` directory is created and only the files
//! that belong to the chart are copied into it, so unrelated repository
//! content never ends up in the package.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CoreError, Result};
use crate::project::Project;

/// Chart templates directory (required)
pub const TEMPLATES_DIR: &str = "templates";

/// Files that must exist in the chart source
pub const REQUIRED_FILES: &[&str] = &["Chart.yaml", "values.yaml"];

/// Files copied only when present
pub const OPTIONAL_FILES: &[&str] = &[
    "README.md",
    "requirements.yaml",
    "requirements.lock",
    ".helmignore",
];

/// Directories copied only when present
pub const OPTIONAL_DIRS: &[&str] = &["ci"];

/// Create `<project>/<chart_name>` and copy the chart files into it
///
/// `source` is relative to the project root and defaults to the root itself.
/// Fails if the chart name is not a single path component, the build
/// directory already exists or a required item is missing;
/// a failure part way through leaves the partially copied directory behind.
pub fn assemble_build_dir(
    chart_name: &str,
    source: Option<&Path>,
    project: &Project,
) -> Result<PathBuf> {
    if !is_plain_name(chart_name) {
        return Err(CoreError::InvalidDescriptor {
            path: project.base_dir().display().to_string(),
            message: format!("chart name '{}' is not a valid directory name", chart_name),
        });
    }

    let source_dir = match source {
        Some(rel) => project.path(rel),
        None => project.base_dir().to_path_buf(),
    };
    let build_dir = project.path(chart_name);

    fs::create_dir(&build_dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => CoreError::BuildDirExists {
            path: build_dir.clone(),
        },
        _ => CoreError::Io(e),
    })?;

    tracing::info!(
        build_dir = %build_dir.display(),
        "Copying required folders and files to temporary chart build directory..."
    );

    let templates = source_dir.join(TEMPLATES_DIR);
    if !templates.is_dir() {
        return Err(CoreError::MissingChartFile { path: templates });
    }
    copy_dir(&templates, &build_dir.join(TEMPLATES_DIR))?;

    for file in REQUIRED_FILES {
        let from = source_dir.join(file);
        if !from.is_file() {
            return Err(CoreError::MissingChartFile { path: from });
        }
        fs::copy(&from, build_dir.join(file))?;
    }

    for file in OPTIONAL_FILES {
        let from = source_dir.join(file);
        if from.is_file() {
            tracing::info!("Copying optional {} file to temporary chart build directory...", file);
            fs::copy(&from, build_dir.join(file))?;
        }
    }

    for dir in OPTIONAL_DIRS {
        let from = source_dir.join(dir);
        if from.is_dir() {
            tracing::info!("Copying optional {} folder to temporary chart build directory...", dir);
            copy_dir(&from, &build_dir.join(dir))?;
        }
    }

    Ok(build_dir)
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

/// Recursively copy a directory, preserving relative structure
fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| {
            CoreError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let dest = to.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
