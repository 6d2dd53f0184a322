use crate::error::RunError;
use crate::layers::arguments::params::{params_file_path, read_params_file, write_params_file};

use super::handler::{ExecutionPlan, RequestHandler};

/// Runs a single build action and returns the exit code the process should
/// terminate with.
///
/// A lone `@path` argument is expanded from the params file, and the file is
/// rewritten with the sanitized arguments before the tool is handed the same
/// `@path` reference.
pub(crate) async fn run_once(args: Vec<String>, handler: &RequestHandler) -> Result<i32, RunError> {
    let params_path = params_file_path(&args);
    let raw = match &params_path {
        Some(path) => read_params_file(path).await?,
        None => args.clone(),
    };

    let plan = ExecutionPlan::from_arguments(&raw)?;

    let invocation = match &params_path {
        Some(path) => {
            write_params_file(path, &plan.tool_args).await?;
            args
        }
        None => plan.tool_args.clone(),
    };

    let outcome = handler.execute(&plan, &invocation, None).await?;
    if outcome.reported_exit_code != outcome.exit_code {
        tracing::info!(
            exit_code = outcome.exit_code,
            "running as test target, reporting success"
        );
    }
    Ok(outcome.reported_exit_code)
}
