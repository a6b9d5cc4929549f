//! Line-oriented shell over the subscription manager.

pub mod commands;
pub mod formatters;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;
pub mod shell_context;

pub use shell::{run_cli, SCRIPT_MODE_ENV};
pub use shell_context::{CliMode, ShellContext, TODAY_OVERRIDE_ENV};
