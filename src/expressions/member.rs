//! This module contains the identifiers for members and methods referenced by expression nodes,
//! along with the bindings used by member-initialization expressions.

use super::ExprRef;
use ::types::Type;

/// Identifies a field or property of a type.
///
/// Members are plain values: two `MemberInfo`s are equal when they agree on the declaring type,
/// the name and the member type, no matter which compiler pass produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    /// The type that declares the member.
    pub declaring_type: Type,
    /// The name of the member.
    pub name: String,
    /// The type of the value the member holds.
    pub member_type: Type,
}

impl MemberInfo {
    /// Creates a new member identifier.
    pub fn new<S: Into<String>>(declaring_type: Type, name: S, member_type: Type) -> MemberInfo {
        MemberInfo {
            declaring_type: declaring_type,
            name: name.into(),
            member_type: member_type,
        }
    }

    /// Whether the two identifiers name the same member of the same declaring type. Unlike `==`,
    /// this ignores the member type, which may differ between passes that disagree only on
    /// nullability.
    pub fn is_same_as(&self, other: &MemberInfo) -> bool {
        self.declaring_type == other.declaring_type && self.name == other.name
    }
}

impl ::std::fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Identifies a method that a call expression invokes.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// The type that declares the method.
    pub declaring_type: Type,
    /// The name of the method.
    pub name: String,
    /// The type of the value the method returns.
    pub return_type: Type,
}

impl MethodInfo {
    /// Creates a new method identifier.
    pub fn new<S: Into<String>>(declaring_type: Type, name: S, return_type: Type) -> MethodInfo {
        MethodInfo {
            declaring_type: declaring_type,
            name: name.into(),
            return_type: return_type,
        }
    }
}

/// A single binding inside a member-initialization expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberBinding {
    /// `Member = expression`
    Assignment {
        /// The member being assigned.
        member: MemberInfo,
        /// The value assigned to the member.
        expression: ExprRef,
    },
    /// `Member = { Inner = ..., ... }`, initializing the members of a nested object in place.
    Member {
        /// The member whose value is initialized.
        member: MemberInfo,
        /// The bindings applied to the nested object.
        bindings: Vec<MemberBinding>,
    },
    /// `Member = { a, b, ... }`, adding elements to a collection member.
    List {
        /// The collection member.
        member: MemberInfo,
        /// The elements added to the collection.
        initializers: Vec<ExprRef>,
    },
}

impl MemberBinding {
    /// Creates an assignment binding.
    pub fn assign(member: MemberInfo, expression: ExprRef) -> MemberBinding {
        MemberBinding::Assignment {
            member: member,
            expression: expression,
        }
    }

    /// The member this binding initializes.
    pub fn member(&self) -> &MemberInfo {
        match *self {
            MemberBinding::Assignment { ref member, .. } |
            MemberBinding::Member { ref member, .. } |
            MemberBinding::List { ref member, .. } => member,
        }
    }
}

impl ::std::fmt::Display for MemberBinding {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            MemberBinding::Assignment { ref member, ref expression } => {
                write!(f, "({} {})", member.name, expression)
            }
            MemberBinding::Member { ref member, ref bindings } => {
                write!(f, "({} (bind {}", member.name, member.member_type)?;
                for binding in bindings.iter() {
                    write!(f, " {}", binding)?;
                }
                write!(f, "))")
            }
            MemberBinding::List { ref member, ref initializers } => {
                write!(f, "({} (list {}", member.name, member.member_type)?;
                for init in initializers.iter() {
                    write!(f, " {}", init)?;
                }
                write!(f, "))")
            }
        }
    }
}
