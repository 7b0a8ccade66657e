#![allow(missing_docs)]
//! A module for parsing the expression trees and shell commands used by the rewriter.

pub mod command;
pub mod expression;
pub mod literal;
pub mod sexp;
pub mod utils;

use nom::IResult::{Done, Error, Incomplete};

use self::sexp::{Sexp, sexp};
use self::utils::{separator, skip_space};
use super::commands::Command;
use super::expressions::ExprRef;

/// An error that can occur while reading expressions or commands.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input is not well-formed.
    Syntax(String),
    /// The input continues after a complete statement.
    TrailingInput(String),
    /// The head of a form is not a known form name.
    UnknownForm(String),
    /// A form received the wrong number of arguments.
    WrongArity {
        /// The form name.
        form: String,
        /// A description of the accepted argument counts.
        expected: String,
        /// The number of arguments that were given.
        found: usize,
    },
    /// A symbol was expected.
    ExpectedSymbol(String),
    /// A list was expected.
    ExpectedList(String),
    /// The text does not describe a type.
    InvalidType(String),
}

impl ::std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            ParseError::Syntax(ref desc) => write!(f, "Syntax error: {}", desc),
            ParseError::TrailingInput(ref rest) => write!(f, "Unexpected input: {}", rest),
            ParseError::UnknownForm(ref name) => write!(f, "Unknown form {}.", name),
            ParseError::WrongArity { ref form, ref expected, found } => {
                write!(f, "{} takes {} argument(s) but got {}.", form, expected, found)
            }
            ParseError::ExpectedSymbol(ref got) => write!(f, "Expected a name but got {}.", got),
            ParseError::ExpectedList(ref got) => write!(f, "Expected a list but got {}.", got),
            ParseError::InvalidType(ref got) => write!(f, "{} is not a type.", got),
        }
    }
}

impl ::std::error::Error for ParseError {}

named!(pub statements (&[u8]) -> Vec<Sexp>, do_parse!(
    stmts: separated_nonempty_list!(separator, sexp) >>
    opt!(separator) >>
    skip_space >>
    (stmts)
));

fn complete_input<T>(result: ::nom::IResult<&[u8], T>) -> Result<T, ParseError> {
    match result {
        Done(rest, value) => {
            if rest.is_empty() {
                Ok(value)
            } else {
                Err(ParseError::TrailingInput(String::from_utf8_lossy(rest).into_owned()))
            }
        }
        Error(e) => Err(ParseError::Syntax(format!("{:?}", e))),
        Incomplete(_) => Err(ParseError::Syntax("unexpected end of input".into())),
    }
}

/// Parses a line of `;`-separated statements into s-expressions.
pub fn parse_statements(input: &str) -> Result<Vec<Sexp>, ParseError> {
    complete_input(statements(input.as_bytes()))
}

/// Parses a line of `;`-separated commands.
pub fn parse_commands(input: &str) -> Result<Vec<Box<Command>>, ParseError> {
    parse_statements(input)?.iter().map(command::command).collect()
}

/// Parses a single expression tree.
pub fn parse_expression(input: &str) -> Result<ExprRef, ParseError> {
    let bytes = input.as_bytes();
    let parsed = complete_input(do_parse!(bytes, e: sexp >> skip_space >> (e)))?;
    expression::expression(&parsed)
}
