//! A module containing classes for representing, traversing and evaluating typed expression trees.

pub mod environment;
pub mod evaluate;
pub mod expression;
pub mod helpers;
pub mod literal;
pub mod member;
pub mod value;
pub mod visitor;

pub use self::environment::Environment;
pub use self::expression::{ExprRef, Expression, NewObject};
pub use self::literal::Literal;
pub use self::member::{MemberBinding, MemberInfo, MethodInfo};
pub use self::value::Value;
pub use self::visitor::ExpressionVisitor;

/// Describes a comparison operation
#[derive(Debug, Clone, PartialEq, Copy)]
pub enum CompareType {
    /// Equality
    Equals,
    /// Inequality
    NotEquals,
    /// Less than
    LessThan,
    /// Less than or equal to
    LessThanEqual,
    /// Greater than
    GreaterThan,
    /// Greater than or equal to
    GreaterThanEqual,
}

impl<'a> From<&'a [u8]> for CompareType {
    fn from(bytes: &'a [u8]) -> Self {
        match bytes {
            b"!=" | b"<>" => CompareType::NotEquals,
            b"<" => CompareType::LessThan,
            b"<=" => CompareType::LessThanEqual,
            b">" => CompareType::GreaterThan,
            b">=" => CompareType::GreaterThanEqual,
            b"=" | b"==" | _ => CompareType::Equals,
        }
    }
}

impl ::std::fmt::Display for CompareType {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        let symbol = match *self {
            CompareType::Equals => "==",
            CompareType::NotEquals => "!=",
            CompareType::LessThan => "<",
            CompareType::LessThanEqual => "<=",
            CompareType::GreaterThan => ">",
            CompareType::GreaterThanEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Describes an arithmetic operation.
#[derive(Debug, Clone, PartialEq, Copy)]
pub enum ArithmeticType {
    /// Addition
    Plus,
    /// Subtraction
    Minus,
    /// Multiplication
    Multiply,
    /// Division
    Divide,
    /// Modulo
    Remainder,
}

impl<'a> From<&'a [u8]> for ArithmeticType {
    fn from(bytes: &'a [u8]) -> Self {
        match bytes {
            b"-" => ArithmeticType::Minus,
            b"*" => ArithmeticType::Multiply,
            b"/" => ArithmeticType::Divide,
            b"%" => ArithmeticType::Remainder,
            b"+" | _ => ArithmeticType::Plus,
        }
    }
}

impl ::std::fmt::Display for ArithmeticType {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        let symbol = match *self {
            ArithmeticType::Plus => "+",
            ArithmeticType::Minus => "-",
            ArithmeticType::Multiply => "*",
            ArithmeticType::Divide => "/",
            ArithmeticType::Remainder => "%",
        };
        write!(f, "{}", symbol)
    }
}

/// An error that can occur while building, rewriting or evaluating expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The original and replacement lists of a rewrite have different lengths.
    MismatchedReplacements {
        /// How many originals were given.
        originals: usize,
        /// How many replacements were given.
        replacements: usize,
    },
    /// A parameter has no value in the environment.
    UnboundParameter(String),
    /// A member was read from a `null` value.
    NullReference(String),
    /// The object does not have the member being read.
    MissingMember(String),
    /// An operator was applied to a value it does not support.
    InvalidOperand(String),
    /// Division or remainder by zero.
    DivideByZero,
    /// The expression cannot be evaluated, such as a call to an unknown method.
    CannotEvaluate(String),
}

impl ::std::fmt::Display for Error {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            Error::MismatchedReplacements { originals, replacements } => {
                write!(f, "Got {} originals but {} replacements.", originals, replacements)
            }
            Error::UnboundParameter(ref name) => {
                write!(f, "The parameter {} has no value.", name)
            }
            Error::NullReference(ref member) => {
                write!(f, "Cannot read {} from a null value.", member)
            }
            Error::MissingMember(ref member) => {
                write!(f, "The object does not have a member {}.", member)
            }
            Error::InvalidOperand(ref desc) => write!(f, "Invalid operand: {}", desc),
            Error::DivideByZero => write!(f, "Division by zero."),
            Error::CannotEvaluate(ref expr) => write!(f, "The expression {} cannot be evaluated.", expr),
        }
    }
}

impl ::std::error::Error for Error {}

pub use self::Error as ExpressionError;
