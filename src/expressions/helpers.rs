//! Predicates and constructors for recognizing common expression shapes.

use super::{ExprRef, Expression, Literal, MethodInfo};
use ::types::Type;

/// The name of the member that reads the key of a group.
pub const GROUPING_KEY_MEMBER: &'static str = "Key";

/// The name of the static accessor method, `EF.Property(entity, "Name")`.
pub const PROPERTY_METHOD_NAME: &'static str = "Property";

lazy_static! {
    /// The type that declares the property accessor method.
    pub static ref PROPERTY_DECLARING_TYPE: Type = Type::class("EF");
}

/// Whether the expression is a `null` constant of any type.
pub fn is_null_constant(expr: &Expression) -> bool {
    match *expr {
        Expression::Constant { value: Literal::Null, .. } => true,
        _ => false,
    }
}

/// Strips any number of type conversions from the expression. Returns the innermost operand and,
/// if at least one conversion was removed, the type that operand was converted from.
pub fn unwrap_type_conversion(expr: &ExprRef) -> (&ExprRef, Option<Type>) {
    let mut current = expr;
    let mut converted_from = None;
    while let Expression::Convert { ref operand, .. } = **current {
        converted_from = Some(operand.ty());
        current = operand;
    }
    (current, converted_from)
}

/// Recognizes the two-argument property accessor call `EF.Property(entity, "Name")` and returns
/// the entity expression and the property name. The name has to be a string constant.
pub fn try_get_property_arguments(expr: &Expression) -> Option<(&ExprRef, &str)> {
    if let Expression::Call { object: None, ref method, ref args } = *expr {
        if method.name != PROPERTY_METHOD_NAME || method.declaring_type != *PROPERTY_DECLARING_TYPE ||
           args.len() != 2 {
            return None;
        }
        if let Expression::Constant { value: Literal::String(ref name), .. } = *args[1] {
            return Some((&args[0], name.as_str()));
        }
    }
    None
}

/// Creates a property accessor call reading `name` from `entity` as a value of type `ty`.
pub fn property_call<S: Into<String>>(entity: ExprRef, name: S, ty: Type) -> ExprRef {
    let method = MethodInfo::new(PROPERTY_DECLARING_TYPE.clone(), PROPERTY_METHOD_NAME, ty);
    Expression::call(None, method, vec![entity, Expression::constant(Literal::String(name.into()))])
}
