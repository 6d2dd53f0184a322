use clap::builder::RangedU64ValueParser;
use clap::Parser;
use protocol::flags::PERSISTENT_WORKER;
use std::path::PathBuf;

use crate::config::MAX_CONCURRENCY;

#[derive(Parser, Debug)]
#[command(
    name = "lint-wrapper",
    version,
    about = "Runs a static-analysis tool as a build action or persistent worker"
)]
pub(crate) struct Args {
    /// Serve work requests from stdin instead of running once.
    #[arg(long = "persistent_worker")]
    pub(crate) persistent_worker: bool,
    #[arg(long = "wrapper-config")]
    pub(crate) config: Option<PathBuf>,
    /// Overrides `tool.program` from the config file.
    #[arg(long)]
    pub(crate) tool: Option<String>,
    /// Overrides `worker.concurrency` from the config file.
    #[arg(
        long,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CONCURRENCY as u64)
    )]
    pub(crate) concurrency: Option<usize>,
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    /// Arguments for the analysis tool, or a single `@path` params file.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub(crate) arguments: Vec<String>,
}

impl Args {
    /// The build system appends the worker flag after its startup arguments,
    /// so it may end up among the trailing arguments.
    pub(crate) fn is_persistent_worker(&self) -> bool {
        self.persistent_worker || self.arguments.iter().any(|arg| arg == PERSISTENT_WORKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_tool_flags_verbatim() {
        let args = Args::try_parse_from([
            "lint-wrapper",
            "--input",
            "src",
            "--execution-result",
            "out.sh",
            "--run-as-test-target",
        ])
        .unwrap();
        assert!(!args.is_persistent_worker());
        assert_eq!(
            args.arguments,
            vec!["--input", "src", "--execution-result", "out.sh", "--run-as-test-target"]
        );
    }

    #[test]
    fn parses_wrapper_options_before_tool_arguments() {
        let args = Args::try_parse_from([
            "lint-wrapper",
            "--wrapper-config",
            "lint.toml",
            "--concurrency",
            "2",
            "@bazel-out/lint.params",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("lint.toml")));
        assert_eq!(args.concurrency, Some(2));
        assert_eq!(args.arguments, vec!["@bazel-out/lint.params"]);
    }

    #[test]
    fn detects_worker_flag_in_either_position() {
        let args = Args::try_parse_from(["lint-wrapper", "--persistent_worker"]).unwrap();
        assert!(args.is_persistent_worker());

        let args =
            Args::try_parse_from(["lint-wrapper", "--jvm-flag", "--persistent_worker"]).unwrap();
        assert!(args.is_persistent_worker());
    }

    #[test]
    fn concurrency_must_be_within_bounds() {
        for value in ["0", "1025", "18446744073709551615"] {
            assert!(Args::try_parse_from(["lint-wrapper", "--concurrency", value]).is_err());
        }
        let args = Args::try_parse_from(["lint-wrapper", "--concurrency", "1024"]).unwrap();
        assert_eq!(args.concurrency, Some(MAX_CONCURRENCY));
    }
}
