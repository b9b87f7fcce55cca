//! Chart, release and operation types

use serde::{Deserialize, Serialize};

use crate::options::OptionList;

/// Registry prefix used when a chart has no registry configured
pub const LOCAL_REGISTRY: &str = "local";

/// Which chart artifact to act on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDetail {
    /// Chart name (required)
    pub name: String,

    /// Chart version to install
    #[serde(default)]
    pub version: Option<String>,

    /// Chart repository the chart is referenced through.
    /// An install references `<registry>/<name>`, defaults to `local`.
    #[serde(default)]
    pub registry: Option<String>,

    /// Chart-level options passed to `helm install` / `helm upgrade`
    #[serde(default)]
    pub options: OptionList,
}

impl ChartDetail {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Chart reference as passed to helm, e.g. `stable/nginx`
    pub fn reference(&self) -> String {
        format!(
            "{}/{}",
            self.registry.as_deref().unwrap_or(LOCAL_REGISTRY),
            self.name
        )
    }
}

/// Target deployed release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDetail {
    /// Release name (required)
    pub name: String,

    /// Namespace the release is installed into
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ReleaseDetail {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Helm operation requested by a deploy goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Create the release for the first time
    #[default]
    Install,
    /// Upgrade the existing release
    Upgrade,
    /// Upgrade when a release with the same name exists, install otherwise
    InstallOrUpgrade,
}

impl Operation {
    /// Whether this operation maps directly onto a helm subcommand
    pub fn is_concrete(self) -> bool {
        !matches!(self, Operation::InstallOrUpgrade)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::InstallOrUpgrade => "installOrUpgrade",
        };
        write!(f, "{}", s)
    }
}

/// Release status reported by `helm list` for a failed release
pub const STATUS_FAILED: &str = "FAILED";

/// One entry of `helm list --output json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseListEntry {
    pub name: String,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub chart: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub namespace: String,
}

impl ReleaseListEntry {
    /// Only the exact `FAILED` status counts
    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED
    }
}

/// Output of `helm list --output json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseList {
    #[serde(default)]
    pub releases: Vec<ReleaseListEntry>,
}

impl ReleaseList {
    /// Find a release by exact name
    pub fn find(&self, name: &str) -> Option<&ReleaseListEntry> {
        self.releases.iter().find(|r| r.name == name)
    }
}
