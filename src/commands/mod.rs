//! This module contains the classes that represent the commands that the rewriting shell
//! recognizes.
//!
//! All of the commands implement the [`Command`](trait.Command.html) trait:
//!
//! - `(replace ...)` | `(replace-all ...)` - [`ReplaceCommand`](struct.ReplaceCommand.html)
//! - `(simplify ...)` - [`SimplifyCommand`](struct.SimplifyCommand.html)
//! - `(eval ...)` - [`EvalCommand`](struct.EvalCommand.html)
//! - `EXIT` | `QUIT` - [`ExitCommand`](struct.ExitCommand.html)

use std::any::Any;
use std::fmt;

mod eval;
mod replace;
mod simplify;

pub use self::eval::EvalCommand;
pub use self::replace::ReplaceCommand;
pub use self::simplify::SimplifyCommand;

use super::expressions::{ExprRef, ExpressionError, Value};

#[derive(Debug, Clone, PartialEq)]
/// An error that occurred while attempting to execute a command.
pub enum ExecutionError {
    /// Building, rewriting or evaluating an expression failed.
    ExpressionError(ExpressionError),
    /// The same parameter was given two values.
    DuplicateParameter(String),
}

impl From<ExpressionError> for ExecutionError {
    fn from(error: ExpressionError) -> ExecutionError {
        ExecutionError::ExpressionError(error)
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ExecutionError::ExpressionError(ref e) => write!(f, "{}", e),
            ExecutionError::DuplicateParameter(ref name) => {
                write!(f, "The parameter {} is bound more than once.", name)
            }
        }
    }
}

impl ::std::error::Error for ExecutionError {}

#[derive(Debug, Clone, PartialEq)]
/// What a successfully executed command produced.
pub enum Output {
    /// A rewritten expression tree.
    Tree(ExprRef),
    /// The value of an evaluated expression.
    Value(Value),
    /// The shell should stop.
    Exit,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Output::Tree(ref tree) => write!(f, "{}", tree),
            Output::Value(ref value) => write!(f, "{}", value),
            Output::Exit => write!(f, "Bye"),
        }
    }
}

/// The result of executing a command.
pub type CommandResult = Result<Output, ExecutionError>;

/// Trait for all commands that the shell supports. Command classes contain the arguments for the
/// command being executed, as well as the code for actually performing the command.
pub trait Command: ::std::fmt::Debug + Any {
    /// Actually performs the command.
    ///
    /// # Errors
    ///
    /// If executing the command results in an error, an
    /// [`ExecutionError`](enum.ExecutionError.html) will be returned.
    fn execute(&mut self) -> CommandResult;

    /// Casts the command to Any. Needed to ensure polymorphism.
    fn as_any(&self) -> &Any;
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A command for leaving the shell.
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&mut self) -> CommandResult {
        Ok(Output::Exit)
    }

    fn as_any(&self) -> &Any {
        self
    }
}
