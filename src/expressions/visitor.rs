//! This module contains utilities for traversing and rewriting expression trees.

use std::sync::Arc;

use stacker;

use super::{ExprRef, Expression, MemberBinding, NewObject};
use ::constants::{STACK_GROWTH, STACK_RED_ZONE};

/// This trait is used to implement transformations of expression trees. Every method returns the
/// node that should take the place of the one being visited: returning the passed-in node (a
/// clone of the `Arc`, not of the tree) leaves that part of the tree as it was.
///
/// The default implementations rewrite children first and rebuild a node only when one of its
/// children actually changed, so an implementation that overrides nothing returns its input.
/// Overrides can call the matching `walk_*` function to fall back to that behaviour.
pub trait ExpressionVisitor: Sized {
    /// Visits any node. This is the entry point of a traversal, and is called again for every
    /// child.
    fn visit(&mut self, node: &ExprRef) -> ExprRef {
        walk_expression(self, node)
    }

    /// Visits a node that may be absent, such as the target of a static member access. Absent
    /// nodes stay absent.
    fn visit_optional(&mut self, node: Option<&ExprRef>) -> Option<ExprRef> {
        node.map(|node| self.visit(node))
    }

    /// Visits a member access node.
    fn visit_member(&mut self, node: &ExprRef) -> ExprRef {
        walk_member(self, node)
    }

    /// Visits a method call node.
    fn visit_call(&mut self, node: &ExprRef) -> ExprRef {
        walk_call(self, node)
    }
}

/// Dispatches on the kind of `node`, handing member accesses and calls to the visitor and
/// rebuilding every other node from its visited children.
pub fn walk_expression<V: ExpressionVisitor>(visitor: &mut V, node: &ExprRef) -> ExprRef {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || walk_children(visitor, node))
}

/// Rebuilds a member access from its visited inner expression.
pub fn walk_member<V: ExpressionVisitor>(visitor: &mut V, node: &ExprRef) -> ExprRef {
    match **node {
        Expression::Member { ref inner, .. } => {
            let inner = visitor.visit_optional(inner.as_ref());
            update_member(node, inner)
        }
        _ => walk_children(visitor, node),
    }
}

/// Rebuilds a call from its visited target object and arguments.
pub fn walk_call<V: ExpressionVisitor>(visitor: &mut V, node: &ExprRef) -> ExprRef {
    match **node {
        Expression::Call { ref object, ref args, .. } => {
            let object = visitor.visit_optional(object.as_ref());
            let args = args.iter().map(|arg| visitor.visit(arg)).collect();
            update_call(node, object, args)
        }
        _ => walk_children(visitor, node),
    }
}

/// Returns `node` if `inner` is the member access's current inner expression, and otherwise a new
/// access of the same member against `inner`.
pub fn update_member(node: &ExprRef, inner: Option<ExprRef>) -> ExprRef {
    match **node {
        Expression::Member { inner: ref old_inner, ref member } => {
            if same_optional(old_inner.as_ref(), inner.as_ref()) {
                node.clone()
            } else {
                Expression::member(inner, member.clone())
            }
        }
        _ => node.clone(),
    }
}

/// Returns `node` if `object` and `args` are the call's current children, and otherwise a new call
/// of the same method.
pub fn update_call(node: &ExprRef, object: Option<ExprRef>, args: Vec<ExprRef>) -> ExprRef {
    match **node {
        Expression::Call { object: ref old_object, ref method, args: ref old_args } => {
            if same_optional(old_object.as_ref(), object.as_ref()) && same_list(old_args, &args) {
                node.clone()
            } else {
                Expression::call(object, method.clone(), args)
            }
        }
        _ => node.clone(),
    }
}

fn walk_children<V: ExpressionVisitor>(visitor: &mut V, node: &ExprRef) -> ExprRef {
    match **node {
        Expression::Constant { .. } |
        Expression::Parameter { .. } => node.clone(),
        Expression::Member { .. } => visitor.visit_member(node),
        Expression::Call { .. } => visitor.visit_call(node),
        Expression::Conditional { ref test, ref if_true, ref if_false, ref ty } => {
            let new_test = visitor.visit(test);
            let new_true = visitor.visit(if_true);
            let new_false = visitor.visit(if_false);
            if same(test, &new_test) && same(if_true, &new_true) && same(if_false, &new_false) {
                node.clone()
            } else {
                Expression::conditional_typed(new_test, new_true, new_false, ty.clone())
            }
        }
        Expression::New(ref new) => {
            match visit_new(visitor, new) {
                Some(new) => Arc::new(Expression::New(new)),
                None => node.clone(),
            }
        }
        Expression::MemberInit { ref new, ref bindings } => {
            let new_new = visit_new(visitor, new);
            let new_bindings = visit_bindings(visitor, bindings);
            if new_new.is_none() && new_bindings.is_none() {
                node.clone()
            } else {
                Expression::member_init(new_new.unwrap_or_else(|| new.clone()),
                                        new_bindings.unwrap_or_else(|| bindings.clone()))
            }
        }
        Expression::Convert { ref operand, ref ty } => {
            let new_operand = visitor.visit(operand);
            if same(operand, &new_operand) {
                node.clone()
            } else {
                Expression::convert(new_operand, ty.clone())
            }
        }
        Expression::Not(ref operand) => {
            let new_operand = visitor.visit(operand);
            if same(operand, &new_operand) {
                node.clone()
            } else {
                Expression::not(new_operand)
            }
        }
        Expression::And(ref left, ref right) => {
            let (new_left, new_right) = (visitor.visit(left), visitor.visit(right));
            if same(left, &new_left) && same(right, &new_right) {
                node.clone()
            } else {
                Expression::and(new_left, new_right)
            }
        }
        Expression::Or(ref left, ref right) => {
            let (new_left, new_right) = (visitor.visit(left), visitor.visit(right));
            if same(left, &new_left) && same(right, &new_right) {
                node.clone()
            } else {
                Expression::or(new_left, new_right)
            }
        }
        Expression::Compare(ref left, compare_type, ref right) => {
            let (new_left, new_right) = (visitor.visit(left), visitor.visit(right));
            if same(left, &new_left) && same(right, &new_right) {
                node.clone()
            } else {
                Expression::compare(new_left, compare_type, new_right)
            }
        }
        Expression::Arithmetic(ref left, arith_type, ref right) => {
            let (new_left, new_right) = (visitor.visit(left), visitor.visit(right));
            if same(left, &new_left) && same(right, &new_right) {
                node.clone()
            } else {
                Expression::arithmetic(new_left, arith_type, new_right)
            }
        }
        Expression::Grouping { ref key_selector, ref element_selector } => {
            let new_key = visitor.visit(key_selector);
            let new_element = visitor.visit(element_selector);
            if same(key_selector, &new_key) && same(element_selector, &new_element) {
                node.clone()
            } else {
                Expression::grouping(new_key, new_element)
            }
        }
    }
}

/// Visits the constructor arguments. Returns `None` if none of them changed.
fn visit_new<V: ExpressionVisitor>(visitor: &mut V, new: &NewObject) -> Option<NewObject> {
    let args: Vec<ExprRef> = new.args.iter().map(|arg| visitor.visit(arg)).collect();
    if same_list(&new.args, &args) {
        None
    } else {
        Some(NewObject {
            ty: new.ty.clone(),
            args: args,
            members: new.members.clone(),
        })
    }
}

/// Visits the expressions held by member bindings. Returns `None` if none of them changed.
fn visit_bindings<V: ExpressionVisitor>(visitor: &mut V,
                                        bindings: &[MemberBinding])
                                        -> Option<Vec<MemberBinding>> {
    let mut changed = false;
    let mut result = Vec::with_capacity(bindings.len());
    for binding in bindings.iter() {
        let new_binding = match *binding {
            MemberBinding::Assignment { ref member, ref expression } => {
                let new_expression = visitor.visit(expression);
                if same(expression, &new_expression) {
                    None
                } else {
                    Some(MemberBinding::assign(member.clone(), new_expression))
                }
            }
            MemberBinding::Member { ref member, ref bindings } => {
                visit_bindings(visitor, bindings).map(|bindings| {
                    MemberBinding::Member {
                        member: member.clone(),
                        bindings: bindings,
                    }
                })
            }
            MemberBinding::List { ref member, ref initializers } => {
                let new_inits: Vec<ExprRef> = initializers.iter().map(|i| visitor.visit(i)).collect();
                if same_list(initializers, &new_inits) {
                    None
                } else {
                    Some(MemberBinding::List {
                        member: member.clone(),
                        initializers: new_inits,
                    })
                }
            }
        };
        match new_binding {
            Some(b) => {
                changed = true;
                result.push(b);
            }
            None => result.push(binding.clone()),
        }
    }
    if changed { Some(result) } else { None }
}

fn same(a: &ExprRef, b: &ExprRef) -> bool {
    Arc::ptr_eq(a, b)
}

fn same_optional(a: Option<&ExprRef>, b: Option<&ExprRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn same_list(a: &[ExprRef], b: &[ExprRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| same(a, b))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use ::expressions::{ArithmeticType, Literal, MemberInfo};
    use ::types::Type;

    /// Replaces every integer constant with its successor.
    struct Increment;

    impl ExpressionVisitor for Increment {
        fn visit(&mut self, node: &ExprRef) -> ExprRef {
            if let Expression::Constant { value: Literal::Int(i), .. } = **node {
                return Expression::constant(i + 1);
            }
            walk_expression(self, node)
        }
    }

    /// Leaves everything alone.
    struct Identity;

    impl ExpressionVisitor for Identity {}

    fn sample() -> ExprRef {
        let c = Expression::parameter("c", Type::class("Customer"));
        let age = Expression::property(c.clone(), "Age", Type::Int);
        let dto = Expression::init(Type::class("Dto"), vec![
            ("Age", Expression::arithmetic(age.clone(), ArithmeticType::Plus, Expression::constant(1))),
            ("Name", Expression::property(c.clone(), "Name", Type::String)),
        ]);
        Expression::conditional(Expression::not(Expression::constant(false)),
                                dto,
                                Expression::constant(Literal::Null))
    }

    #[test]
    fn test_identity_preserves_sharing() {
        let tree = sample();
        let result = Identity.visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_rewrite_rebuilds_changed_path_only() {
        let tree = sample();
        let result = Increment.visit(&tree);
        assert!(!Arc::ptr_eq(&tree, &result));

        let expected_dto = Expression::init(Type::class("Dto"), vec![
            ("Age", Expression::arithmetic(
                Expression::property(Expression::parameter("c", Type::class("Customer")), "Age", Type::Int),
                ArithmeticType::Plus,
                Expression::constant(2))),
            ("Name", Expression::property(Expression::parameter("c", Type::class("Customer")),
                                          "Name", Type::String)),
        ]);
        let expected = Expression::conditional(Expression::not(Expression::constant(false)),
                                               expected_dto,
                                               Expression::constant(Literal::Null));
        assert_eq!(expected, result);

        // The untouched test and null branch are shared with the input.
        match (&*tree, &*result) {
            (&Expression::Conditional { test: ref t1, if_false: ref f1, .. },
             &Expression::Conditional { test: ref t2, if_false: ref f2, .. }) => {
                assert!(Arc::ptr_eq(t1, t2));
                assert!(Arc::ptr_eq(f1, f2));
            }
            _ => panic!("expected conditionals"),
        }
    }

    #[test]
    fn test_static_member_stays_static() {
        let member = MemberInfo::new(Type::class("Config"), "Limit", Type::Int);
        let tree = Expression::member(None, member);
        let result = Increment.visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
        assert_eq!(None, Identity.visit_optional(None));
    }

    #[test]
    fn test_nested_bindings_are_visited() {
        let address = MemberInfo::new(Type::class("Dto"), "Address", Type::class("Address"));
        let zip = MemberInfo::new(Type::class("Address"), "Zip", Type::Int);
        let tags = MemberInfo::new(Type::class("Dto"), "Tags", Type::class("List"));
        let tree = Expression::member_init(NewObject::empty(Type::class("Dto")), vec![
            MemberBinding::Member {
                member: address.clone(),
                bindings: vec![MemberBinding::assign(zip.clone(), Expression::constant(1))],
            },
            MemberBinding::List {
                member: tags.clone(),
                initializers: vec![Expression::constant(10)],
            },
        ]);
        let expected = Expression::member_init(NewObject::empty(Type::class("Dto")), vec![
            MemberBinding::Member {
                member: address,
                bindings: vec![MemberBinding::assign(zip, Expression::constant(2))],
            },
            MemberBinding::List {
                member: tags,
                initializers: vec![Expression::constant(11)],
            },
        ]);
        assert_eq!(expected, Increment.visit(&tree));
    }

    #[test]
    fn test_deep_tree() {
        let mut tree = Expression::constant(0);
        for _ in 0..2000 {
            tree = Expression::not(tree);
        }
        let result = Increment.visit(&tree);
        let mut current = &result;
        let mut depth = 0;
        while let Expression::Not(ref inner) = **current {
            current = inner;
            depth += 1;
        }
        assert_eq!(2000, depth);
        assert_eq!(Expression::constant(1), *current);
    }
}
