//! Chart descriptor access
//!
//! The descriptor is located anywhere in the project by a case-insensitive
//! match on `Chart.yaml` / `Chart.yml`. Only `name` and `version` are
//! interpreted; every other key is passed through untouched on rewrite.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use crate::error::{CoreError, Result};
use crate::project::Project;

/// Descriptor file name patterns
const DESCRIPTOR_PATTERNS: &[&str] = &["Chart.yaml", "Chart.yml"];

/// Directories never searched for descriptors
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Name and version read from a chart descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    pub name: String,
    pub version: Option<String>,
}

/// Find all chart descriptors in a project
///
/// Shallower paths come first, so a descriptor at the project root is
/// always the first entry.
pub fn find_descriptors(project: &Project) -> Vec<PathBuf> {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let patterns: Vec<Pattern> = DESCRIPTOR_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut found: Vec<(usize, PathBuf)> = WalkDir::new(project.base_dir())
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && SKIPPED_DIRS
                    .iter()
                    .any(|s| e.file_name().to_string_lossy() == *s))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            patterns.iter().any(|p| p.matches_with(&name, options))
        })
        .map(|e| (e.depth(), e.into_path()))
        .collect();

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    found.into_iter().map(|(_, path)| path).collect()
}

/// Check whether a project contains a Helm chart
pub fn is_helm_project(project: &Project) -> bool {
    !find_descriptors(project).is_empty()
}

/// Read chart name and version from the project's descriptor
pub fn read_chart_data(project: &Project) -> Result<ChartData> {
    let path = first_descriptor(project)?;
    let mapping = load_descriptor(&path)?;

    let name = mapping
        .get("name")
        .and_then(scalar_to_string)
        .ok_or_else(|| CoreError::InvalidDescriptor {
            path: path.display().to_string(),
            message: "missing 'name'".to_string(),
        })?;
    let version = mapping.get("version").and_then(scalar_to_string);

    tracing::debug!(path = %path.display(), %name, ?version, "read chart descriptor");

    Ok(ChartData { name, version })
}

/// Read only the version from the project's descriptor
///
/// Unlike [`read_chart_data`] a descriptor without `name` is accepted.
pub fn read_chart_version(project: &Project) -> Result<Option<String>> {
    let path = first_descriptor(project)?;
    let mapping = load_descriptor(&path)?;
    Ok(mapping.get("version").and_then(scalar_to_string))
}

fn first_descriptor(project: &Project) -> Result<PathBuf> {
    find_descriptors(project)
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::DescriptorNotFound {
            path: project.base_dir().display().to_string(),
        })
}

/// Set the version in every chart descriptor of the project
///
/// Only the top-level `version:` line is rewritten (or appended when there
/// is none); every other byte of the descriptor is kept. Descriptors whose
/// version cannot be replaced line-wise are re-serialized instead.
/// Returns the rewritten descriptor paths.
pub fn write_chart_version(project: &Project, version: &str) -> Result<Vec<PathBuf>> {
    let descriptors = find_descriptors(project);
    if descriptors.is_empty() {
        return Err(CoreError::DescriptorNotFound {
            path: project.base_dir().display().to_string(),
        });
    }

    let scalar = serde_yaml::to_string(&Value::String(version.to_string()))?;
    let scalar = scalar.trim_end();

    for path in &descriptors {
        let content = std::fs::read_to_string(path)?;
        let rewritten = replace_version_line(&content, scalar);
        let updated = match parse_descriptor(path, &rewritten) {
            Ok(mapping)
                if mapping.get("version").and_then(scalar_to_string).as_deref()
                    == Some(version) =>
            {
                rewritten
            }
            _ => {
                tracing::debug!(path = %path.display(), "re-serializing chart descriptor");
                let mut mapping = parse_descriptor(path, &content)?;
                mapping.insert(
                    Value::String("version".to_string()),
                    Value::String(version.to_string()),
                );
                serde_yaml::to_string(&mapping)?
            }
        };
        std::fs::write(path, updated)?;
        tracing::debug!(path = %path.display(), version, "updated chart version");
    }

    Ok(descriptors)
}

/// Replace the first unindented `version:` line, or append one
fn replace_version_line(content: &str, scalar: &str) -> String {
    let mut out = String::with_capacity(content.len() + scalar.len());
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        if !replaced && is_version_line(line) {
            let ending = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            out.push_str("version: ");
            out.push_str(scalar);
            out.push_str(ending);
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if !replaced {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("version: ");
        out.push_str(scalar);
        out.push('\n');
    }
    out
}

fn is_version_line(line: &str) -> bool {
    line.strip_prefix("version")
        .map(|rest| rest.trim_start_matches([' ', '\t']).starts_with(':'))
        .unwrap_or(false)
}

fn load_descriptor(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path)?;
    parse_descriptor(path, &content)
}

fn parse_descriptor(path: &Path, content: &str) -> Result<Mapping> {
    match serde_yaml::from_str::<Value>(content)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(CoreError::InvalidDescriptor {
            path: path.display().to_string(),
            message: "descriptor is not a map".to_string(),
        }),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
