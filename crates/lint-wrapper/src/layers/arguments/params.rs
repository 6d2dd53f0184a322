use std::path::{Path, PathBuf};

use protocol::flags::PARAMS_FILE_PREFIX;

use crate::error::RunError;

/// Returns the params file named by a lone `@path` argument.
pub(crate) fn params_file_path(args: &[String]) -> Option<PathBuf> {
    let [only] = args else {
        return None;
    };
    only.strip_prefix(PARAMS_FILE_PREFIX)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// Reads one argument per line. Lines are taken verbatim, so arguments may
/// contain spaces but not newlines.
pub(crate) async fn read_params_file(path: &Path) -> Result<Vec<String>, RunError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RunError::ParamsRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(content.lines().map(str::to_string).collect())
}

pub(crate) async fn write_params_file(path: &Path, args: &[String]) -> Result<(), RunError> {
    let mut content = String::new();
    for arg in args {
        content.push_str(arg);
        content.push('\n');
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|source| RunError::ParamsWrite {
            path: path.to_path_buf(),
            source,
        })
}
