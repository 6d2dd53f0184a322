use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use system_utils::process::{exit_code, run_command};
use tokio::process::Command;

use super::output::combine_output;
use crate::config::{LimitsConfig, ToolConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExecutableResult {
    Success,
    Failure { status_code: i32, output: String },
}

impl ExecutableResult {
    pub(crate) fn status_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    /// Captured output; only failures carry it.
    pub(crate) fn output(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { output, .. } => Some(output.as_str()),
        }
    }
}

/// The analysis tool, seen as arguments in and a status out.
#[async_trait]
pub(crate) trait Executable: Send + Sync {
    async fn execute(
        &self,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> anyhow::Result<ExecutableResult>;
}

/// Runs the configured tool as a child process.
#[derive(Debug, Clone)]
pub(crate) struct ToolExecutable {
    program: String,
    prefix_args: Vec<String>,
    env: BTreeMap<String, String>,
    max_output_bytes: usize,
}

impl ToolExecutable {
    pub(crate) fn from_config(tool: &ToolConfig, limits: &LimitsConfig) -> Self {
        Self {
            program: tool.program.clone(),
            prefix_args: tool.args.clone(),
            env: tool.env.clone(),
            max_output_bytes: limits.max_output_bytes(),
        }
    }

    fn command(&self, args: &[String], working_dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args).args(args).envs(&self.env);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl Executable for ToolExecutable {
    async fn execute(
        &self,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> anyhow::Result<ExecutableResult> {
        let mut cmd = self.command(args, working_dir);
        let output = run_command(&mut cmd, &self.program).await?;
        let status_code = exit_code(output.status);
        tracing::debug!(program = %self.program, exit_code = status_code, "tool finished");
        if status_code == 0 {
            return Ok(ExecutableResult::Success);
        }
        Ok(ExecutableResult::Failure {
            status_code,
            output: combine_output(&output.stdout, &output.stderr, self.max_output_bytes),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolExecutable {
        ToolExecutable {
            program: "sh".to_string(),
            prefix_args: vec!["-c".to_string(), script.to_string(), "lint".to_string()],
            env: BTreeMap::from([("LINT_MARKER".to_string(), "set".to_string())]),
            max_output_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn zero_status_is_success_without_output() {
        let result = sh("echo noise; exit 0").execute(&[], None).await.expect("run");
        assert_eq!(result, ExecutableResult::Success);
        assert_eq!(result.output(), None);
    }

    #[tokio::test]
    async fn failure_captures_status_and_output() {
        let result = sh("echo \"$1 $LINT_MARKER\"; echo issue >&2; exit 2")
            .execute(&["--input".to_string()], None)
            .await
            .expect("run");
        assert_eq!(result.status_code(), 2);
        assert_eq!(result.output(), Some("--input set\nissue\n"));
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = sh("pwd; exit 1")
            .execute(&[], Some(dir.path()))
            .await
            .expect("run");
        let canonical = dir.path().canonicalize().expect("canonical");
        let printed = result.output().expect("output").trim().to_string();
        assert_eq!(Path::new(&printed).canonicalize().expect("printed"), canonical);
    }

    #[tokio::test]
    async fn launch_failure_is_an_error() {
        let tool = ToolExecutable::from_config(
            &ToolConfig {
                program: "/nonexistent/detekt".to_string(),
                ..ToolConfig::default()
            },
            &LimitsConfig::default(),
        );
        assert!(tool.execute(&[], None).await.is_err());
    }
}
