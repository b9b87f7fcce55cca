//! Process-wide helm settings applied to every goal

use serde::{Deserialize, Serialize};

use chartgoal_core::OptionList;

/// Default helm executable
pub const DEFAULT_HELM_CMD: &str = "helm";

/// Helm settings shared by all helm goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmConfiguration {
    /// Path to the helm executable
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Kubernetes context passed as `--kube-context`
    #[serde(default)]
    pub context: Option<String>,

    /// Options passed to every helm install/upgrade
    #[serde(default)]
    pub global_options: OptionList,

    /// Log the full helm command line.
    /// Off by default because command lines may carry credentials.
    #[serde(default)]
    pub log_command: bool,
}

fn default_cmd() -> String {
    DEFAULT_HELM_CMD.to_string()
}

impl Default for HelmConfiguration {
    fn default() -> Self {
        Self {
            cmd: default_cmd(),
            context: None,
            global_options: OptionList::new(),
            log_command: false,
        }
    }
}

/// Partial configuration read from one layer (file, environment, flags)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmConfigurationLayer {
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub global_options: OptionList,
    #[serde(default)]
    pub log_command: Option<bool>,
}

impl HelmConfiguration {
    /// Apply a higher-priority layer on top of this configuration
    ///
    /// Scalars set in the layer replace the current ones; global options are
    /// appended so that the layer's valued options win on key collision.
    pub fn merge(&mut self, layer: HelmConfigurationLayer) {
        if let Some(cmd) = layer.cmd {
            self.cmd = cmd;
        }
        if layer.context.is_some() {
            self.context = layer.context;
        }
        self.global_options.extend(layer.global_options);
        if let Some(log_command) = layer.log_command {
            self.log_command = log_command;
        }
    }

    /// Build a configuration from layers, lowest priority first
    pub fn layered(layers: impl IntoIterator<Item = HelmConfigurationLayer>) -> Self {
        let mut config = Self::default();
        for layer in layers {
            config.merge(layer);
        }
        config
    }

    /// `--kube-context` arguments, empty when no context is configured
    pub fn context_args(&self) -> Vec<String> {
        match &self.context {
            Some(context) => vec!["--kube-context".to_string(), context.clone()],
            None => Vec::new(),
        }
    }
}
