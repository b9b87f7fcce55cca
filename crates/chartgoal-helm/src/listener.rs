//! Pre-goal project listener

use chartgoal_core::write_chart_version;

use crate::error::Result;
use crate::invocation::GoalInvocation;

/// Write the version tracked for this commit into the chart descriptor(s)
///
/// Returns the applied version, or `None` when nothing is tracked for the
/// commit, in which case the descriptors are left untouched.
pub async fn apply_tracked_version(invocation: &GoalInvocation) -> Result<Option<String>> {
    let Some(version) = invocation
        .tracker()
        .lookup_version(&invocation.event)
        .await?
    else {
        tracing::warn!(
            sha = %invocation.event.sha,
            branch = %invocation.event.branch,
            "no tracked version for commit, leaving chart version unchanged"
        );
        return Ok(None);
    };

    let written = write_chart_version(&invocation.project, &version)?;
    for path in &written {
        tracing::info!(path = %path.display(), %version, "updated chart version");
    }
    Ok(Some(version))
}
