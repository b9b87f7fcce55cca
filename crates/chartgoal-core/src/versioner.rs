//! Per-commit chart versions
//!
//! A version goal records a unique pre-release version for every commit,
//! derived from the descriptor version, the branch and the commit time:
//! `0.1.0` on branch `feature/x` becomes `0.1.0-feature.x.20190301120000`.

use chrono::{DateTime, Utc};
use semver::Version;

use crate::error::{CoreError, Result};

/// Compute the version to record for a commit
///
/// Every branch, the default one included, contributes a segment. Each `/`
/// separated part of the branch becomes its own pre-release identifier.
pub fn project_version(
    descriptor_version: &str,
    branch: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let parsed =
        Version::parse(descriptor_version.trim()).map_err(|source| CoreError::InvalidVersion {
            version: descriptor_version.to_string(),
            source,
        })?;
    let base = format!("{}.{}.{}", parsed.major, parsed.minor, parsed.patch);
    let timestamp = now.format("%Y%m%d%H%M%S");

    let branch = branch_identifiers(branch);
    if branch.is_empty() {
        Ok(format!("{}-{}", base, timestamp))
    } else {
        Ok(format!("{}-{}.{}", base, branch, timestamp))
    }
}

/// Turn `a/b` into `a.b`, restricting each part to `[0-9A-Za-z-]`
fn branch_identifiers(branch: &str) -> String {
    branch
        .split('/')
        .map(|part| {
            part.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
