//! This module contains the values that expressions evaluate to.

use super::Literal;
use ::types::Type;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar value, including `null`.
    Literal(Literal),
    /// A constructed object. Fields built from constructor arguments without a member list have
    /// no name and can only be told apart by position.
    Object {
        /// The type of the object.
        ty: Type,
        /// The fields, in construction order.
        fields: Vec<(Option<String>, Value)>,
    },
    /// A collection, as filled in by a list binding.
    List(Vec<Value>),
    /// A single group of a grouped sequence.
    Grouping {
        /// The key shared by the group's elements.
        key: Box<Value>,
        /// The elements of the group.
        element: Box<Value>,
    },
}

impl Value {
    /// Whether this is the `null` value.
    pub fn is_null(&self) -> bool {
        *self == Value::Literal(Literal::Null)
    }

    /// Looks up a named field of an object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match *self {
            Value::Object { ref fields, .. } => {
                fields.iter()
                    .rev()
                    .find(|&&(ref field, _)| field.as_ref().map_or(false, |f| f == name))
                    .map(|&(_, ref value)| value)
            }
            _ => None,
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Value {
        Value::Literal(literal)
    }
}

impl ::std::fmt::Display for Value {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            Value::Literal(ref literal) => write!(f, "{}", literal),
            Value::Object { ref ty, ref fields } => {
                let values: Vec<String> = fields.iter()
                    .map(|&(ref name, ref value)| match *name {
                        Some(ref name) => format!("{} = {}", name, value),
                        None => format!("{}", value),
                    })
                    .collect();
                write!(f, "{} {{ {} }}", ty, values.join(", "))
            }
            Value::List(ref items) => {
                let values: Vec<String> = items.iter().map(|v| format!("{}", v)).collect();
                write!(f, "[{}]", values.join(", "))
            }
            Value::Grouping { ref key, ref element } => {
                write!(f, "Grouping {{ Key = {}, Element = {} }}", key, element)
            }
        }
    }
}
