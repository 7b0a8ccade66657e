//! Compile-time configuration for the rewrite engine and the interactive shell.

/// The prompt shown by the interactive shell.
pub const PROMPT: &'static str = "REWRITE> ";

/// The file the shell keeps its line history in, relative to the working directory.
pub const HISTORY_FILE: &'static str = ".history";

/// The environment variable read by the binary to pick a log level (`error` through `trace`).
pub const LOG_ENV_VAR: &'static str = "NANOREWRITE_LOG";

/// When less than this much stack remains, tree walks move onto a freshly allocated stack segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// The size of each stack segment allocated for deep tree walks.
pub const STACK_GROWTH: usize = 1024 * 1024;
