use std::process::{ExitStatus, Output, Stdio};

use anyhow::Context;
use tokio::process::Command;

/// Exit code reported when a child exposes neither a code nor a signal.
pub const UNKNOWN_EXIT_CODE: i32 = 1;

/// Spawns `cmd` with stdin closed and both output streams captured, then waits
/// for it to finish. No timeout is applied.
pub async fn run_command(cmd: &mut Command, label: &str) -> anyhow::Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {label}"))?;
    child
        .wait_with_output()
        .await
        .with_context(|| format!("{label} failed"))
}

/// Maps a child's exit status to the code a shell would report, so a child
/// killed by SIGKILL yields 137.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_status_and_streams() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");
        let output = run_command(&mut cmd, "sh").await.expect("run");
        assert_eq!(exit_code(output.status), 3);
        assert_eq!(String::from_utf8_lossy(&output.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "err\n");
    }

    #[tokio::test]
    async fn signal_exit_maps_to_shell_code() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("kill -9 $$");
        let output = run_command(&mut cmd, "sh").await.expect("run");
        assert_eq!(exit_code(output.status), 137);
    }

    #[tokio::test]
    async fn missing_program_reports_label() {
        let mut cmd = Command::new("/nonexistent/lint-tool");
        let err = run_command(&mut cmd, "lint-tool").await.unwrap_err();
        assert!(err.to_string().contains("lint-tool"));
    }
}
