//! Chart version resolution

use chartgoal_core::{ChartDetail, CoreError, read_chart_version};

use crate::error::Result;
use crate::invocation::GoalInvocation;
use crate::registration::PackageRegistration;

/// Determine the chart version to deploy
///
/// First match wins:
/// 1. the version set on the chart details
/// 2. the version tracked for this commit
/// 3. the version in the project's chart descriptor
///
/// Returns `None` when no source has a version, including when the project
/// has no descriptor at all.
pub async fn resolve_chart_version(
    chart: &ChartDetail,
    invocation: &GoalInvocation,
) -> Result<Option<String>> {
    if let Some(version) = &chart.version {
        return Ok(Some(version.clone()));
    }

    if let Some(version) = invocation.tracker().lookup_version(&invocation.event).await? {
        tracing::debug!(%version, "using tracked chart version");
        return Ok(Some(version));
    }

    match read_chart_version(&invocation.project) {
        Ok(version) => Ok(version),
        Err(CoreError::DescriptorNotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Determine the version for `helm package`
///
/// An explicit or computed registration version wins over `descriptor_version`.
pub async fn resolve_package_version(
    registration: &PackageRegistration,
    invocation: &GoalInvocation,
    descriptor_version: Option<&str>,
) -> Result<Option<String>> {
    if let Some(provided) = &registration.version {
        let computed = provided.resolve(registration, invocation).await?;
        if computed.version.is_some() {
            return Ok(computed.version);
        }
    }
    Ok(descriptor_version.map(str::to_string))
}
