pub mod reminder;
pub mod subscription;
pub mod system;

use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::core::errors::{CliError, SubtrackError};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] SubtrackError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in subscription::definitions()
        .into_iter()
        .chain(reminder::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Fails with the command's usage line unless `args` has `expected` entries.
pub(crate) fn expect_args(args: &[&str], expected: usize, usage: &str) -> CommandResult {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    }
}
