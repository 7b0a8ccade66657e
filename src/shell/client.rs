//! The module containing the interactive shell client.

use rustyline::Editor;
use rustyline::error::ReadlineError;

use ::constants::{HISTORY_FILE, PROMPT};
use ::shell::Session;

/// A client which reads commands from the terminal and executes them in a session.
pub struct Client {
    session: Session,
}

impl Client {
    /// Creates a new client.
    pub fn new() -> Client {
        Client { session: Session::new() }
    }

    /// Runs the client, prompting user for input.
    pub fn run(&mut self) {
        println!("Welcome to the rewriting shell.  Exit with EXIT or QUIT command.\n");

        let mut rl = Editor::<()>::new();
        rl.load_history(HISTORY_FILE).unwrap_or(());
        loop {
            let readline = rl.readline(PROMPT);
            match readline {
                Ok(line) => {
                    rl.add_history_entry(&line);
                    if !self.session.handle_line(&line) {
                        println!("Bye");
                        break;
                    }
                }
                Err(ReadlineError::Eof) |
                Err(ReadlineError::Interrupted) => {
                    println!("Bye");
                    break;
                }
                Err(e) => {
                    println!("{:?}", e);
                    break;
                }
            }
        }
        info!("Executed {} command(s)", self.session.executed);
        if let Err(e) = rl.save_history(HISTORY_FILE) {
            warn!("Could not save history: {:?}", e);
        }
    }
}
