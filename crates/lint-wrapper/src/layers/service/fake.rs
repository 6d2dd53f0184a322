use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::layers::execution::executable::{Executable, ExecutableResult};

/// Pretend tool flag: sleep for the given number of milliseconds first.
pub(crate) const SLEEP_MS: &str = "--sleep-ms";
/// Pretend tool flag: exit with the given status.
pub(crate) const EXIT_WITH: &str = "--exit-with";

/// Records invocations and answers with a canned result, unless the
/// arguments ask for something else.
pub(crate) struct FakeExecutable {
    result: ExecutableResult,
    calls: Mutex<Vec<(Vec<String>, Option<PathBuf>)>>,
}

impl FakeExecutable {
    pub(crate) fn new(result: ExecutableResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.invocations().into_iter().map(|(args, _)| args).collect()
    }

    pub(crate) fn invocations(&self) -> Vec<(Vec<String>, Option<PathBuf>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn numeric_value(args: &[String], flag: &str) -> Option<u64> {
    let index = args.iter().position(|arg| arg == flag)?;
    args.get(index + 1)?.parse().ok()
}

#[async_trait]
impl Executable for FakeExecutable {
    async fn execute(
        &self,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> anyhow::Result<ExecutableResult> {
        self.calls
            .lock()
            .unwrap()
            .push((args.to_vec(), working_dir.map(Path::to_path_buf)));
        if let Some(delay) = numeric_value(args, SLEEP_MS) {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match numeric_value(args, EXIT_WITH) {
            Some(0) => Ok(ExecutableResult::Success),
            Some(status) => Ok(ExecutableResult::Failure {
                status_code: status as i32,
                output: format!("exited with {status}"),
            }),
            None => Ok(self.result.clone()),
        }
    }
}
