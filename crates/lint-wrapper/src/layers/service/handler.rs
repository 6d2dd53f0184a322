use std::path::{Path, PathBuf};
use std::sync::Arc;

use protocol::flags::{EXECUTION_RESULT, PROTOCOL_FLAGS, RUN_AS_TEST_TARGET};

use crate::error::RunError;
use crate::layers::arguments::sanitize::{flag_value, has_flag, sanitize};
use crate::layers::execution::executable::Executable;
use crate::layers::execution::result_file::write_execution_result;

/// What a raw argument list asks the wrapper to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExecutionPlan {
    pub(crate) run_as_test_target: bool,
    pub(crate) result_path: PathBuf,
    pub(crate) tool_args: Vec<String>,
}

impl ExecutionPlan {
    pub(crate) fn from_arguments(raw: &[String]) -> Result<Self, RunError> {
        let run_as_test_target = has_flag(raw, RUN_AS_TEST_TARGET);
        let result_path = flag_value(raw, EXECUTION_RESULT)
            .map(PathBuf::from)
            .ok_or(RunError::MissingResultPath {
                flag: EXECUTION_RESULT,
            })?;
        Ok(Self {
            run_as_test_target,
            result_path,
            tool_args: sanitize(raw, &PROTOCOL_FLAGS),
        })
    }

    /// Resolves a relative result path against `base`.
    pub(crate) fn relative_to(mut self, base: &Path) -> Self {
        if self.result_path.is_relative() {
            self.result_path = base.join(&self.result_path);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExecutionOutcome {
    /// Status of the tool, as recorded in the result file.
    pub(crate) exit_code: i32,
    /// Status reported to the build system.
    pub(crate) reported_exit_code: i32,
    pub(crate) output: Option<String>,
}

/// Runs one planned execution: tool, result file, exit code override.
pub(crate) struct RequestHandler {
    executable: Arc<dyn Executable>,
}

impl RequestHandler {
    pub(crate) fn new(executable: Arc<dyn Executable>) -> Self {
        Self { executable }
    }

    /// `invocation` is what the tool receives; it is the sanitized argument
    /// list unless the caller rewrote a params file.
    pub(crate) async fn execute(
        &self,
        plan: &ExecutionPlan,
        invocation: &[String],
        working_dir: Option<&Path>,
    ) -> Result<ExecutionOutcome, RunError> {
        let result = self
            .executable
            .execute(invocation, working_dir)
            .await
            .map_err(RunError::ToolLaunch)?;
        let exit_code = result.status_code();

        if let Some(output) = result.output().filter(|output| !output.is_empty()) {
            eprintln!("{output}");
        }

        write_execution_result(&plan.result_path, exit_code).await?;
        tracing::info!(
            exit_code,
            result = %plan.result_path.display(),
            test_target = plan.run_as_test_target,
            "execution result written"
        );

        let reported_exit_code = if plan.run_as_test_target { 0 } else { exit_code };
        Ok(ExecutionOutcome {
            exit_code,
            reported_exit_code,
            output: result.output().map(str::to_string),
        })
    }
}
