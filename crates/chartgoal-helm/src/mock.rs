//! Mock command runner for testing
//!
//! Records every command and answers with scripted outputs, useful for
//! exercising goals without a helm binary or a cluster.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::process::{CommandRunner, ProcessOutput, SpawnOptions};

/// A command seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub cmd: String,
    pub args: Vec<String>,
    pub options: SpawnOptions,
}

/// In-memory command runner for testing
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    /// Scripted responses: first entry whose prefix matches the args wins
    responses: Arc<RwLock<Vec<(Vec<String>, ProcessOutput)>>>,
    /// Every command run, in order
    calls: Arc<RwLock<Vec<RecordedCommand>>>,
}

impl MockCommandRunner {
    /// Create a runner that answers every command with exit code 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose arguments start with `prefix`
    pub fn respond(self, prefix: &[&str], output: ProcessOutput) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    /// All recorded commands
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.read().unwrap().clone()
    }

    /// Argument lists of all recorded commands
    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.args).collect()
    }

    /// Count recorded commands whose first argument is `subcommand`
    pub fn count(&self, subcommand: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some(subcommand))
            .count()
    }

    fn response_for(&self, args: &[String]) -> ProcessOutput {
        self.responses
            .read()
            .unwrap()
            .iter()
            .find(|(prefix, _)| args.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn spawn(
        &self,
        cmd: &str,
        args: &[String],
        options: &SpawnOptions,
    ) -> Result<ProcessOutput> {
        self.calls.write().unwrap().push(RecordedCommand {
            cmd: cmd.to_string(),
            args: args.to_vec(),
            options: options.clone(),
        });
        Ok(self.response_for(args))
    }
}
