//! This module contains the type system that expression nodes are typed against.

use std::fmt;

/// The static type of an expression node.
///
/// Types fall into two families. Value types (`bool` and the numeric types) can never hold `NULL`
/// and need a [`Nullable`](enum.Type.html#variant.Nullable) wrapper to do so. Everything else is
/// "nullable-capable": strings, objects, named classes, groupings, and of course nullable types
/// themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A boolean value.
    Bool,
    /// A 4-byte signed integer.
    Int,
    /// An 8-byte signed integer.
    Long,
    /// A 4-byte floating-point number.
    Float,
    /// An 8-byte floating-point number.
    Double,
    /// A character string.
    String,
    /// The root reference type. Untyped `NULL` constants have this type.
    Object,
    /// A named reference type, such as an entity or a DTO class.
    Class(String),
    /// The nullable form of a value type.
    Nullable(Box<Type>),
    /// A grouped sequence, keyed by values of `key`.
    Grouping {
        /// The type of the grouping key.
        key: Box<Type>,
        /// The type of the grouped elements.
        element: Box<Type>,
    },
}

impl Type {
    /// Creates a named class type.
    pub fn class<S: Into<String>>(name: S) -> Type {
        Type::Class(name.into())
    }

    /// Whether a value of this type can be `NULL` without any wrapping.
    pub fn is_nullable(&self) -> bool {
        match *self {
            Type::Bool | Type::Int | Type::Long | Type::Float | Type::Double => false,
            Type::String | Type::Object | Type::Class(_) | Type::Nullable(_) | Type::Grouping { .. } => true,
        }
    }

    /// Returns the nullable form of this type. Types that are already nullable-capable are
    /// returned unchanged, so this never produces `Nullable(Nullable(..))` or a nullable reference
    /// type.
    pub fn make_nullable(&self) -> Type {
        if self.is_nullable() {
            self.clone()
        } else {
            Type::Nullable(Box::new(self.clone()))
        }
    }

    /// Strips a `Nullable` wrapper, if there is one.
    pub fn unwrap_nullable(&self) -> &Type {
        match *self {
            Type::Nullable(ref inner) => inner,
            _ => self,
        }
    }

    /// Whether this is one of the numeric value types, possibly made nullable.
    pub fn is_numeric(&self) -> bool {
        match *self.unwrap_nullable() {
            Type::Int | Type::Long | Type::Float | Type::Double => true,
            _ => false,
        }
    }
}

impl<'a> From<&'a str> for Type {
    fn from(name: &'a str) -> Type {
        if name.len() > 1 && name.ends_with('?') {
            return Type::from(&name[..name.len() - 1]).make_nullable();
        }
        match name {
            "bool" => Type::Bool,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            "string" => Type::String,
            "object" => Type::Object,
            _ => Type::Class(name.into()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::Object => write!(f, "object"),
            Type::Class(ref name) => write!(f, "{}", name),
            Type::Nullable(ref inner) => write!(f, "{}?", inner),
            Type::Grouping { ref key, ref element } => write!(f, "(group {} {})", key, element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn test_nullability() {
        assert!(!Type::Int.is_nullable());
        assert!(!Type::Bool.is_nullable());
        assert!(Type::String.is_nullable());
        assert!(Type::class("Customer").is_nullable());
        assert!(Type::Nullable(Box::new(Type::Int)).is_nullable());

        assert_eq!(Type::Nullable(Box::new(Type::Int)), Type::Int.make_nullable());
        assert_eq!(Type::Nullable(Box::new(Type::Int)), Type::Int.make_nullable().make_nullable());
        assert_eq!(Type::class("Customer"), Type::class("Customer").make_nullable());
        assert_eq!(&Type::Double, Type::Double.make_nullable().unwrap_nullable());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Type::Int, Type::from("int"));
        assert_eq!(Type::Nullable(Box::new(Type::Long)), Type::from("long?"));
        assert_eq!(Type::class("Order"), Type::from("Order"));
        assert_eq!(Type::class("Order"), Type::from("Order?"));
        assert_eq!(Type::class("?"), Type::from("?"));
    }

    #[test]
    fn test_display() {
        assert_eq!("int?", format!("{}", Type::Int.make_nullable()));
        assert_eq!("(group string Order)", format!("{}", Type::Grouping {
            key: Box::new(Type::String),
            element: Box::new(Type::class("Order")),
        }));
    }
}
