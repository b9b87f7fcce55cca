//! Goal registrations
//!
//! Chart and release details are either fixed in configuration or computed
//! per invocation by an async creator:
//!
//! ```rust,no_run
//! use chartgoal_core::{ChartDetail, ReleaseDetail, read_chart_data};
//! use chartgoal_helm::{InstallRegistration, Provided};
//! use futures::FutureExt;
//!
//! let registration = InstallRegistration::new(
//!     Provided::computed(|_registration, invocation| {
//!         async move {
//!             let chart = read_chart_data(&invocation.project)?;
//!             Ok(ChartDetail::new(chart.name).with_registry("chartmuseum"))
//!         }
//!         .boxed()
//!     }),
//!     Provided::Literal(ReleaseDetail::new("web").with_namespace("prod")),
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use chartgoal_core::{ChartDetail, Operation, OptionList, ReleaseDetail};

use crate::error::Result;
use crate::invocation::GoalInvocation;

/// Async function computing a value from a registration and an invocation
pub type Creator<R, T> =
    Arc<dyn for<'a> Fn(&'a R, &'a GoalInvocation) -> BoxFuture<'a, Result<T>> + Send + Sync>;

/// A value fixed in configuration or computed per invocation
pub enum Provided<T, R> {
    Literal(T),
    Computed(Creator<R, T>),
}

impl<T, R> Provided<T, R> {
    /// Wrap an async creator
    pub fn computed<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a R, &'a GoalInvocation) -> BoxFuture<'a, Result<T>>
            + Send
            + Sync
            + 'static,
    {
        Provided::Computed(Arc::new(f))
    }
}

impl<T: Clone, R> Provided<T, R> {
    /// Produce the value for this invocation
    pub async fn resolve(&self, registration: &R, invocation: &GoalInvocation) -> Result<T> {
        match self {
            Provided::Literal(value) => Ok(value.clone()),
            Provided::Computed(create) => create(registration, invocation).await,
        }
    }
}

impl<T: Clone, R> Clone for Provided<T, R> {
    fn clone(&self) -> Self {
        match self {
            Provided::Literal(value) => Provided::Literal(value.clone()),
            Provided::Computed(create) => Provided::Computed(Arc::clone(create)),
        }
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Provided<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provided::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Provided::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T, R> From<T> for Provided<T, R> {
    fn from(value: T) -> Self {
        Provided::Literal(value)
    }
}

impl<'de, T: Deserialize<'de>, R> Deserialize<'de> for Provided<T, R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::deserialize(deserializer).map(Provided::Literal)
    }
}

/// Registration of a helm deploy (install/upgrade) goal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRegistration {
    /// Release to create or upgrade
    pub release_details: Provided<ReleaseDetail, InstallRegistration>,

    /// Chart to deploy
    pub chart_details: Provided<ChartDetail, InstallRegistration>,

    /// Operation to run, defaults to install
    #[serde(default)]
    pub operation: Operation,

    /// Additional options for `helm install` / `helm upgrade`
    #[serde(default)]
    pub cmd_args: OptionList,

    /// Environment variables set for the helm commands
    #[serde(default)]
    pub env_args: HashMap<String, String>,

    /// Values files passed with `-f`, in order
    #[serde(default)]
    pub config_files: Vec<String>,
}

impl InstallRegistration {
    pub fn new(
        chart_details: impl Into<Provided<ChartDetail, InstallRegistration>>,
        release_details: impl Into<Provided<ReleaseDetail, InstallRegistration>>,
    ) -> Self {
        Self {
            release_details: release_details.into(),
            chart_details: chart_details.into(),
            operation: Operation::default(),
            cmd_args: OptionList::new(),
            env_args: HashMap::new(),
            config_files: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }
}

/// Version computed by a package version creator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersion {
    pub version: Option<String>,
}

/// Registration of a helm package goal
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRegistration {
    /// Chart source path relative to the project, defaults to the project root
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Chart version; read from the descriptor when absent
    #[serde(default, deserialize_with = "deserialize_package_version")]
    pub version: Option<Provided<PackageVersion, PackageRegistration>>,

    /// `--app-version`
    #[serde(default)]
    pub app_version: Option<String>,

    /// `-u`: update dependencies before packaging
    #[serde(default)]
    pub dependency_update: bool,

    /// `-d`: where helm writes the archive, relative to the build directory
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Sign the package with this key (`--sign`)
    #[serde(default)]
    pub sign: Option<String>,

    /// `--key`
    #[serde(default)]
    pub key: Option<String>,

    /// `--keyring`
    #[serde(default)]
    pub keyring: Option<String>,

    /// `--save`
    #[serde(default)]
    pub save: bool,

    /// Upload the packaged chart; no upload when absent
    #[serde(default)]
    pub push: Option<PushTarget>,
}

fn deserialize_package_version<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Provided<PackageVersion, PackageRegistration>>, D::Error>
where
    D: Deserializer<'de>,
{
    let version: Option<String> = Option::deserialize(deserializer)?;
    Ok(version.map(|v| Provided::Literal(PackageVersion { version: Some(v) })))
}

impl PackageRegistration {
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(Provided::Literal(PackageVersion {
            version: Some(version.into()),
        }));
        self
    }

    /// Source argument for `helm package`
    pub fn source_arg(&self) -> String {
        self.source
            .as_ref()
            .map(|s| s.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    }
}

/// Chart repository upload target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTarget {
    /// Upload URL, e.g. `http://chartmuseum:8080/api/charts`
    pub registry: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// Request overrides applied last. Use with care.
    #[serde(default)]
    pub options: PushRequestOptions,
}

/// Overrides for the upload request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequestOptions {
    /// HTTP method, defaults to POST
    #[serde(default)]
    pub method: Option<String>,

    /// Extra headers; an `Authorization` header here replaces the computed one
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Request timeout
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}
