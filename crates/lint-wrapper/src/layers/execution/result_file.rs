use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::RunError;

/// Script that exits with `exit_code` when run.
///
/// The build rule uses the result file as a test runner, so the file alone
/// must reproduce the status of the analysis run.
pub(crate) fn result_script(exit_code: i32) -> String {
    format!("#!/bin/sh\n\nexit {exit_code}\n")
}

/// Overwrites `path` with the result script for `exit_code`.
pub(crate) async fn write_execution_result(path: &Path, exit_code: i32) -> Result<(), RunError> {
    write_script(path, &result_script(exit_code))
        .await
        .map_err(|source| RunError::ResultWrite {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_script(path: &Path, script: &str) -> std::io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(script.as_bytes()).await?;
    file.flush().await?;
    drop(file);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    }
    Ok(())
}
