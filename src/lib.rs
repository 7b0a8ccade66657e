#![deny(missing_docs)]
//! NanoRewrite is a small engine for rewriting typed expression trees, of the kind a query
//! compiler builds from a query before translating it.  Its central pass replaces chosen subtrees
//! with other trees and then simplifies the member reads the replacements made trivial, so that
//! reading a property of a freshly constructed object becomes the value it was constructed with.

#[macro_use]
extern crate nom;
extern crate rustyline;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate stacker;

pub mod commands;
pub mod constants;
pub mod expressions;
pub mod parser;
pub mod queries;
pub mod shell;
pub mod types;

pub use expressions::{ExprRef, Expression, ExpressionError};
pub use queries::{ReplacingVisitor, replace};
pub use shell::{Client, Session};
pub use types::Type;
