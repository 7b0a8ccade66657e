//! A module encompassing the interactive rewriting shell.

pub mod client;
pub mod session;

pub use self::client::Client;
pub use self::session::Session;
