//! This module contains the `Expression` tree and its constructors.

use std::sync::Arc;

use super::{ArithmeticType, CompareType, Literal, MemberBinding, MemberInfo, MethodInfo};
use super::helpers;
use ::types::Type;

/// A shared reference to an expression node. Trees are immutable, so subtrees that a rewrite does
/// not touch are shared between the input and the output rather than copied.
pub type ExprRef = Arc<Expression>;

/// The construction of a new object, as used both by [`Expression::New`] and by the constructor
/// half of [`Expression::MemberInit`].
///
/// [`Expression::New`]: enum.Expression.html#variant.New
/// [`Expression::MemberInit`]: enum.Expression.html#variant.MemberInit
#[derive(Debug, Clone, PartialEq)]
pub struct NewObject {
    /// The type being constructed.
    pub ty: Type,
    /// The constructor arguments, in order.
    pub args: Vec<ExprRef>,
    /// For anonymous and DTO types, the member each argument initializes. When present it runs
    /// parallel to `args`.
    pub members: Option<Vec<MemberInfo>>,
}

impl NewObject {
    /// Creates a construction expression with no arguments, as used by member initializers.
    pub fn empty(ty: Type) -> NewObject {
        NewObject {
            ty: ty,
            args: vec![],
            members: None,
        }
    }

    /// Finds the position of the given member in the member list, if there is a member list.
    pub fn index_of_member(&self, member: &MemberInfo) -> Option<usize> {
        self.members.as_ref().and_then(|members| members.iter().position(|m| m == member))
    }

    /// Finds the position of the member with the given name, if there is a member list.
    pub fn index_of_member_named(&self, name: &str) -> Option<usize> {
        self.members.as_ref().and_then(|members| members.iter().position(|m| m.name == name))
    }
}

/// A typed expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant value of the given type.
    Constant {
        /// The value.
        value: Literal,
        /// The static type of the constant. Only `null` constants carry a type other than their
        /// literal's natural type.
        ty: Type,
    },
    /// A named placeholder, bound to a value at evaluation time.
    Parameter {
        /// The parameter name.
        name: String,
        /// The parameter type.
        ty: Type,
    },
    /// A read of a field or property. Static members have no inner expression.
    Member {
        /// The object being accessed.
        inner: Option<ExprRef>,
        /// The member being read.
        member: MemberInfo,
    },
    /// `test ? if_true : if_false`
    Conditional {
        /// The condition.
        test: ExprRef,
        /// The value when the condition holds.
        if_true: ExprRef,
        /// The value when it does not.
        if_false: ExprRef,
        /// The type of the whole conditional.
        ty: Type,
    },
    /// The construction of a new object.
    New(NewObject),
    /// The construction of a new object followed by member bindings.
    MemberInit {
        /// The constructor call.
        new: NewObject,
        /// The member bindings.
        bindings: Vec<MemberBinding>,
    },
    /// A conversion of the operand to another type.
    Convert {
        /// The value being converted.
        operand: ExprRef,
        /// The target type.
        ty: Type,
    },
    /// A boolean NOT.
    Not(ExprRef),
    /// A short-circuiting boolean AND.
    And(ExprRef, ExprRef),
    /// A short-circuiting boolean OR.
    Or(ExprRef, ExprRef),
    /// A comparison.
    Compare(ExprRef, CompareType, ExprRef),
    /// An arithmetic operation.
    Arithmetic(ExprRef, ArithmeticType, ExprRef),
    /// A method call. Static methods have no target object.
    Call {
        /// The object the method is invoked on.
        object: Option<ExprRef>,
        /// The method.
        method: MethodInfo,
        /// The arguments.
        args: Vec<ExprRef>,
    },
    /// The result of grouping a sequence: each group exposes its key as the member `Key`, which is
    /// computed by `key_selector`.
    Grouping {
        /// The computation that produced the key of each group.
        key_selector: ExprRef,
        /// The computation that produces the elements of each group.
        element_selector: ExprRef,
    },
}

impl Expression {
    /// Creates a constant of the literal's natural type.
    pub fn constant<L: Into<Literal>>(value: L) -> ExprRef {
        let value = value.into();
        let ty = value.get_type();
        Arc::new(Expression::Constant { value: value, ty: ty })
    }

    /// Creates a `null` constant of the given type.
    pub fn typed_null(ty: Type) -> ExprRef {
        Arc::new(Expression::Constant { value: Literal::Null, ty: ty })
    }

    /// Creates a parameter.
    pub fn parameter<S: Into<String>>(name: S, ty: Type) -> ExprRef {
        Arc::new(Expression::Parameter { name: name.into(), ty: ty })
    }

    /// Creates a member access.
    pub fn member(inner: Option<ExprRef>, member: MemberInfo) -> ExprRef {
        Arc::new(Expression::Member { inner: inner, member: member })
    }

    /// Creates a member access against `inner`, reading a member declared by `inner`'s type.
    pub fn property<S: Into<String>>(inner: ExprRef, name: S, member_type: Type) -> ExprRef {
        let member = MemberInfo::new(inner.ty(), name, member_type);
        Expression::member(Some(inner), member)
    }

    /// Creates a conditional whose type is that of its branches. When one branch is an untyped
    /// `null` constant the other branch decides the type.
    pub fn conditional(test: ExprRef, if_true: ExprRef, if_false: ExprRef) -> ExprRef {
        let ty = branch_type(&if_true, &if_false);
        Expression::conditional_typed(test, if_true, if_false, ty)
    }

    /// Creates a conditional with an explicit type.
    pub fn conditional_typed(test: ExprRef, if_true: ExprRef, if_false: ExprRef, ty: Type) -> ExprRef {
        Arc::new(Expression::Conditional {
            test: test,
            if_true: if_true,
            if_false: if_false,
            ty: ty,
        })
    }

    /// Creates an object construction. `members`, when given, must be as long as `args`.
    pub fn new_object(ty: Type, args: Vec<ExprRef>, members: Option<Vec<MemberInfo>>) -> ExprRef {
        debug_assert!(members.as_ref().map_or(true, |m| m.len() == args.len()),
                      "member list does not match the constructor arguments");
        Arc::new(Expression::New(NewObject {
            ty: ty,
            args: args,
            members: members,
        }))
    }

    /// Creates an anonymous-type construction, one member per `(name, value)` pair.
    pub fn anonymous<S: Into<String>>(ty: Type, fields: Vec<(S, ExprRef)>) -> ExprRef {
        let mut args = Vec::with_capacity(fields.len());
        let mut members = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            members.push(MemberInfo::new(ty.clone(), name, value.ty()));
            args.push(value);
        }
        Expression::new_object(ty, args, Some(members))
    }

    /// Creates a member initialization.
    pub fn member_init(new: NewObject, bindings: Vec<MemberBinding>) -> ExprRef {
        Arc::new(Expression::MemberInit { new: new, bindings: bindings })
    }

    /// Creates a member initialization of a default-constructed object, assigning one member per
    /// `(name, value)` pair.
    pub fn init<S: Into<String>>(ty: Type, fields: Vec<(S, ExprRef)>) -> ExprRef {
        let bindings = fields.into_iter()
            .map(|(name, value)| {
                MemberBinding::assign(MemberInfo::new(ty.clone(), name, value.ty()), value)
            })
            .collect();
        Expression::member_init(NewObject::empty(ty), bindings)
    }

    /// Creates a type conversion.
    pub fn convert(operand: ExprRef, ty: Type) -> ExprRef {
        Arc::new(Expression::Convert { operand: operand, ty: ty })
    }

    /// Creates a boolean NOT.
    pub fn not(operand: ExprRef) -> ExprRef {
        Arc::new(Expression::Not(operand))
    }

    /// Creates a boolean AND.
    pub fn and(left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Expression::And(left, right))
    }

    /// Creates a boolean OR.
    pub fn or(left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Expression::Or(left, right))
    }

    /// Creates a comparison.
    pub fn compare(left: ExprRef, compare_type: CompareType, right: ExprRef) -> ExprRef {
        Arc::new(Expression::Compare(left, compare_type, right))
    }

    /// Creates an arithmetic operation.
    pub fn arithmetic(left: ExprRef, arith_type: ArithmeticType, right: ExprRef) -> ExprRef {
        Arc::new(Expression::Arithmetic(left, arith_type, right))
    }

    /// Creates a method call.
    pub fn call(object: Option<ExprRef>, method: MethodInfo, args: Vec<ExprRef>) -> ExprRef {
        Arc::new(Expression::Call {
            object: object,
            method: method,
            args: args,
        })
    }

    /// Creates a grouping node.
    pub fn grouping(key_selector: ExprRef, element_selector: ExprRef) -> ExprRef {
        Arc::new(Expression::Grouping {
            key_selector: key_selector,
            element_selector: element_selector,
        })
    }

    /// Returns the static type of the expression.
    pub fn ty(&self) -> Type {
        match *self {
            Expression::Constant { ref ty, .. } |
            Expression::Parameter { ref ty, .. } |
            Expression::Conditional { ref ty, .. } |
            Expression::Convert { ref ty, .. } => ty.clone(),
            Expression::Member { ref member, .. } => member.member_type.clone(),
            Expression::New(ref new) |
            Expression::MemberInit { ref new, .. } => new.ty.clone(),
            Expression::Not(_) |
            Expression::And(_, _) |
            Expression::Or(_, _) |
            Expression::Compare(_, _, _) => Type::Bool,
            Expression::Arithmetic(ref left, _, ref right) => {
                let left_type = left.ty();
                if left_type.is_nullable() || right.ty().is_nullable() {
                    left_type.unwrap_nullable().make_nullable()
                } else {
                    left_type
                }
            }
            Expression::Call { ref method, .. } => method.return_type.clone(),
            Expression::Grouping { ref key_selector, ref element_selector } => {
                Type::Grouping {
                    key: Box::new(key_selector.ty()),
                    element: Box::new(element_selector.ty()),
                }
            }
        }
    }
}

impl ::std::fmt::Display for NewObject {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match self.members {
            Some(ref members) => {
                write!(f, "(anon {}", self.ty)?;
                for (member, arg) in members.iter().zip(self.args.iter()) {
                    write!(f, " ({} {})", member.name, arg)?;
                }
            }
            None => {
                write!(f, "(new {}", self.ty)?;
                for arg in self.args.iter() {
                    write!(f, " {}", arg)?;
                }
            }
        }
        write!(f, ")")
    }
}

/// The type a conditional takes from its branches. An untyped `null` in the first branch defers
/// to the second.
fn branch_type(if_true: &ExprRef, if_false: &ExprRef) -> Type {
    if helpers::is_null_constant(if_true) && if_true.ty() == Type::Object {
        if_false.ty()
    } else {
        if_true.ty()
    }
}

impl ::std::fmt::Display for Expression {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            Expression::Constant { ref value, ref ty } => {
                if value.is_null() && *ty != Type::Object {
                    write!(f, "(null {})", ty)
                } else {
                    write!(f, "{}", value)
                }
            }
            Expression::Parameter { ref name, ref ty } => write!(f, "(param {} {})", name, ty),
            Expression::Member { ref inner, ref member } => {
                match *inner {
                    Some(ref inner) => {
                        write!(f, "(member {} {} {})", inner, member.name, member.member_type)
                    }
                    None => {
                        write!(f, "(static {} {} {})", member.declaring_type, member.name,
                               member.member_type)
                    }
                }
            }
            Expression::Conditional { ref test, ref if_true, ref if_false, ref ty } => {
                if *ty == branch_type(if_true, if_false) {
                    write!(f, "(if {} {} {})", test, if_true, if_false)
                } else {
                    write!(f, "(if {} {} {} {})", test, if_true, if_false, ty)
                }
            }
            Expression::New(ref new) => write!(f, "{}", new),
            Expression::MemberInit { ref new, ref bindings } => {
                if new.args.is_empty() && new.members.is_none() {
                    write!(f, "(init {}", new.ty)?;
                } else {
                    write!(f, "(init {}", new)?;
                }
                for binding in bindings.iter() {
                    write!(f, " {}", binding)?;
                }
                write!(f, ")")
            }
            Expression::Convert { ref operand, ref ty } => write!(f, "(convert {} {})", operand, ty),
            Expression::Not(ref operand) => write!(f, "(not {})", operand),
            Expression::And(ref left, ref right) => write!(f, "(and {} {})", left, right),
            Expression::Or(ref left, ref right) => write!(f, "(or {} {})", left, right),
            Expression::Compare(ref left, ct, ref right) => write!(f, "({} {} {})", ct, left, right),
            Expression::Arithmetic(ref left, at, ref right) => write!(f, "({} {} {})", at, left, right),
            Expression::Call { ref object, ref method, ref args } => {
                if let Some((entity, name)) = helpers::try_get_property_arguments(self) {
                    return write!(f, "(property {} '{}' {})", entity, name, method.return_type);
                }
                match *object {
                    Some(ref object) => {
                        write!(f, "(invoke {} {} {}", object, method.name, method.return_type)?
                    }
                    None => {
                        write!(f, "(call {} {} {}", method.declaring_type, method.name,
                               method.return_type)?
                    }
                }
                for arg in args.iter() {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expression::Grouping { ref key_selector, ref element_selector } => {
                write!(f, "(group {} {})", key_selector, element_selector)
            }
        }
    }
}
