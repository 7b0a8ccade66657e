//! The module containing shell sessions.

use ::commands::{Command, Output};
use ::parser::parse_commands;

/// This class provides the entry-point operations for executing commands typed into the shell.
pub struct Session {
    /// How many commands have run successfully.
    pub executed: usize,
}

impl Session {
    /// Instantiates a new session.
    pub fn new() -> Session {
        Session { executed: 0 }
    }

    /// Executes a provided command, printing its output. Returns `false` once the command asks
    /// the shell to stop.
    ///
    /// If an error occurs in the command, it is printed to the console.
    pub fn handle_command(&mut self, mut command: Box<Command>) -> bool {
        debug!("Executing {:?}", command);
        match command.execute() {
            Ok(Output::Exit) => false,
            Ok(output) => {
                self.executed += 1;
                println!("{}", output);
                true
            }
            Err(e) => {
                println!("Command error: {}", e);
                true
            }
        }
    }

    /// Parses and executes a line of input. Returns `false` once a command asks the shell to
    /// stop; the commands after it on the same line are not run.
    pub fn handle_line(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        match parse_commands(line) {
            Ok(commands) => {
                for command in commands {
                    if !self.handle_command(command) {
                        return false;
                    }
                }
                true
            }
            Err(e) => {
                println!("Parser Error: {}", e);
                true
            }
        }
    }
}
