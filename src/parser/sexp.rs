//! The s-expression reader underneath the expression and command syntax.

use std::fmt;
use std::str;

use super::ParseError;
use super::literal::{signed_number, string_literal};
use super::utils::{looks_numeric, skip_space, token};
use ::expressions::Literal;

/// A parsed s-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    /// A string or numeric literal.
    Literal(Literal),
    /// Any other atom, such as a form name, a member name or a type name.
    Symbol(String),
    /// A parenthesized list.
    List(Vec<Sexp>),
}

impl Sexp {
    /// The symbol's text, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match *self {
            Sexp::Symbol(ref s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The list items, if this is a list.
    pub fn as_list(&self) -> Option<&[Sexp]> {
        match *self {
            Sexp::List(ref items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Sexp::Literal(ref literal) => write!(f, "{}", literal),
            Sexp::Symbol(ref s) => write!(f, "{}", s),
            Sexp::List(ref items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn atom(token: &[u8]) -> Result<Sexp, ParseError> {
    let text = str::from_utf8(token).map_err(|e| ParseError::Syntax(format!("{}", e)))?;
    if looks_numeric(token) {
        signed_number(token)
            .map(Sexp::Literal)
            .ok_or_else(|| ParseError::Syntax(format!("Invalid number {}", text)))
    } else {
        Ok(Sexp::Symbol(text.into()))
    }
}

named!(list (&[u8]) -> Sexp, do_parse!(
    tag!("(") >>
    items: many0!(sexp) >>
    skip_space >>
    complete!(tag!(")")) >>
    (Sexp::List(items))
));

named!(pub sexp (&[u8]) -> Sexp, do_parse!(
    skip_space >>
    value: alt_complete!(
        list |
        map!(string_literal, Sexp::Literal) |
        map_res!(token, atom)
    ) >>
    (value)
));
