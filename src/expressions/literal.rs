//! This module contains utilities and classes for constant literals.

use ::types::Type;

/// An enum representing a constant literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer
    Int(i32),
    /// A big integer (long)
    Long(i64),
    /// A double
    Double(f64),
    /// A float
    Float(f32),
    /// A string
    String(String),
    /// A `null` value
    Null,
    /// A `true` value
    True,
    /// A `false` value
    False,
}

impl ::std::fmt::Display for Literal {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            Literal::True => write!(f, "true"),
            Literal::False => write!(f, "false"),
            Literal::Null => write!(f, "null"),
            Literal::Int(num) => write!(f, "{}", num),
            Literal::Long(num) => write!(f, "{}L", num),
            Literal::Float(num) => {
                if num.fract() == 0.0 {
                    write!(f, "{}.f", num)
                } else {
                    write!(f, "{}f", num)
                }
            }
            Literal::Double(num) => {
                if num.fract() == 0.0 {
                    write!(f, "{}.", num)
                } else {
                    write!(f, "{}", num)
                }
            }
            Literal::String(ref s) => write!(f, "\'{}\'", s),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Literal {
        if value { Literal::True } else { Literal::False }
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Literal {
        Literal::Int(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Literal {
        Literal::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Literal {
        Literal::Double(value)
    }
}

impl<'a> From<&'a str> for Literal {
    fn from(value: &'a str) -> Literal {
        Literal::String(value.into())
    }
}

impl Literal {
    /// A utility function for determining if the literal is numeric.
    pub fn is_numeric(&self) -> bool {
        match *self {
            Literal::Double(_) |
            Literal::Int(_) |
            Literal::Float(_) |
            Literal::Long(_) => true,
            _ => false,
        }
    }
    /// A utility function for determining if the literal is `null`.
    pub fn is_null(&self) -> bool {
        *self == Literal::Null
    }
    /// A utility function for reading a boolean literal. Returns None for anything else.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Literal::True => Some(true),
            Literal::False => Some(false),
            _ => None,
        }
    }
    /// A utility function for converting to a DOUBLE if possible. If not, returns None.
    pub fn as_double(&self) -> Option<Literal> {
        match *self {
            Literal::Double(d) => Some(Literal::Double(d)),
            Literal::Float(f) => Some(Literal::Double(f as f64)),
            Literal::Int(i) => Some(Literal::Double(i as f64)),
            Literal::Long(l) => Some(Literal::Double(l as f64)),
            _ => None,
        }
    }
    /// A utility function for converting to a FLOAT if possible. If not, returns None.
    pub fn as_float(&self) -> Option<Literal> {
        match *self {
            Literal::Double(d) => Some(Literal::Float(d as f32)),
            Literal::Float(f) => Some(Literal::Float(f)),
            Literal::Int(i) => Some(Literal::Float(i as f32)),
            Literal::Long(l) => Some(Literal::Float(l as f32)),
            _ => None,
        }
    }
    /// A utility function for converting to a LONG if possible. If not, returns None.
    pub fn as_long(&self) -> Option<Literal> {
        match *self {
            Literal::Double(d) => Some(Literal::Long(d as i64)),
            Literal::Float(f) => Some(Literal::Long(f as i64)),
            Literal::Int(i) => Some(Literal::Long(i as i64)),
            Literal::Long(l) => Some(Literal::Long(l)),
            _ => None,
        }
    }
    /// A utility function for converting to an INT if possible. If not, returns None.
    pub fn as_int(&self) -> Option<Literal> {
        match *self {
            Literal::Double(d) => Some(Literal::Int(d as i32)),
            Literal::Float(f) => Some(Literal::Int(f as i32)),
            Literal::Int(i) => Some(Literal::Int(i)),
            Literal::Long(l) => Some(Literal::Int(l as i32)),
            _ => None,
        }
    }
    /// A utility function for converting to a String if possible. If not, returns None.
    pub fn as_string(&self) -> Option<String> {
        match *self {
            Literal::String(ref s) => Some(s.clone()),
            _ => None,
        }
    }

    /// A utility function for converting to the given numeric type, ignoring nullability. Returns
    /// None if the literal or the target type is not numeric.
    pub fn convert_to(&self, target: &Type) -> Option<Literal> {
        match *target.unwrap_nullable() {
            Type::Int => self.as_int(),
            Type::Long => self.as_long(),
            Type::Float => self.as_float(),
            Type::Double => self.as_double(),
            _ => None,
        }
    }

    /// A utility function for getting the natural type of the literal. `null` has no type of its
    /// own, so it is given the root `object` type.
    pub fn get_type(&self) -> Type {
        match *self {
            Literal::Int(_) => Type::Int,
            Literal::Long(_) => Type::Long,
            Literal::Float(_) => Type::Float,
            Literal::Double(_) => Type::Double,
            Literal::String(_) => Type::String,
            Literal::Null => Type::Object,
            Literal::True | Literal::False => Type::Bool,
        }
    }
}
