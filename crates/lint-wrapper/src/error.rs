use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single execution request.
///
/// The tool exiting non-zero is not an error; it is reported through the
/// outcome like any other status.
#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("file path for execution-result was not set (expected `{flag} <path>`)")]
    MissingResultPath { flag: &'static str },

    #[error("failed to read params file {}: {source}", path.display())]
    ParamsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write arguments to params file {}: {source}", path.display())]
    ParamsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write execution result to {}: {source}", path.display())]
    ResultWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to launch analysis tool: {0:#}")]
    ToolLaunch(anyhow::Error),
}

impl RunError {
    /// Configuration errors are caused by the caller's arguments; everything
    /// else is an environment failure.
    pub(crate) fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingResultPath { .. } | Self::ParamsRead { .. } | Self::ParamsWrite { .. }
        )
    }
}
