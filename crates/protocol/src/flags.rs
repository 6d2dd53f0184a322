//! Flags reserved by the wrapper. None of them is ever forwarded to the tool.

/// Path the exit status of the tool is recorded to.
pub const EXECUTION_RESULT: &str = "--execution-result";

/// Report success to the build system even when the tool fails.
pub const RUN_AS_TEST_TARGET: &str = "--run-as-test-target";

/// Startup flag the build system appends when launching a persistent worker.
pub const PERSISTENT_WORKER: &str = "--persistent_worker";

pub const LONG_FLAG_PREFIX: &str = "--";

pub const PARAMS_FILE_PREFIX: char = '@';

/// Flags stripped from every argument list before the tool sees it.
pub const PROTOCOL_FLAGS: [&str; 2] = [EXECUTION_RESULT, RUN_AS_TEST_TARGET];
