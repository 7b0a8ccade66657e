//! This module contains the expression-tree rewriter used to inline values into compiled queries.

use std::sync::Arc;

use ::expressions::{ExprRef, Expression, ExpressionError, ExpressionVisitor, MemberBinding,
                    MemberInfo};
use ::expressions::helpers::{GROUPING_KEY_MEMBER, is_null_constant, try_get_property_arguments,
                             unwrap_type_conversion};
use ::expressions::visitor::{update_call, update_member, walk_call, walk_expression, walk_member};

/// This visitor replaces every occurrence of an original expression with its replacement, and
/// then simplifies the member reads that the replacement made trivial.
///
/// Substitution happens top-down: each visited node is compared structurally against the
/// originals, in order, and the first match is swapped for its replacement without visiting
/// either the matched node's children or the replacement. Simplification happens bottom-up, on
/// member accesses and property accessor calls whose target has already been visited:
///
/// - `Key` read from a grouping is the grouping's key selector;
/// - a member read from an anonymous construction is the matching constructor argument;
/// - a member read from a member initialization is the value assigned to it;
/// - a member read from `test ? new T { ... } : null` is pushed into the non-null branch, with
///   the null branch retyped so that value-typed members become nullable.
///
/// Originals are checked with a linear scan rather than a hash lookup. Hashing a deep tree costs
/// far more than comparing against the one or two originals a rewrite usually registers.
#[derive(Debug, Clone)]
pub struct ReplacingVisitor {
    originals: Vec<ExprRef>,
    replacements: Vec<ExprRef>,
}

impl ReplacingVisitor {
    /// Creates a rewriter that replaces `originals[i]` with `replacements[i]`.
    ///
    /// # Errors
    /// Fails with `MismatchedReplacements` if the two lists have different lengths.
    pub fn new(originals: Vec<ExprRef>,
               replacements: Vec<ExprRef>)
               -> Result<ReplacingVisitor, ExpressionError> {
        if originals.len() != replacements.len() {
            return Err(ExpressionError::MismatchedReplacements {
                originals: originals.len(),
                replacements: replacements.len(),
            });
        }
        Ok(ReplacingVisitor {
            originals: originals,
            replacements: replacements,
        })
    }

    /// Creates a rewriter with no substitutions, which only applies the member simplifications.
    pub fn simplifier() -> ReplacingVisitor {
        ReplacingVisitor {
            originals: vec![],
            replacements: vec![],
        }
    }

    /// The expressions being replaced.
    pub fn originals(&self) -> &[ExprRef] {
        &self.originals
    }

    /// The expressions they are replaced with.
    pub fn replacements(&self) -> &[ExprRef] {
        &self.replacements
    }

    /// Rewrites a whole tree. The input is left untouched.
    pub fn rewrite(&mut self, tree: &ExprRef) -> ExprRef {
        debug!("Rewriting with {} substitution(s): {}", self.originals.len(), tree);
        self.visit(tree)
    }

    /// Applies the member-access rules to `node`, whose inner expression has already been visited
    /// and is now `inner`.
    fn simplify_member(&mut self, node: &ExprRef, inner: Option<ExprRef>, member: &MemberInfo) -> ExprRef {
        if let Some(ref inner) = inner {
            if let Expression::Grouping { ref key_selector, .. } = **inner {
                if member.name == GROUPING_KEY_MEMBER {
                    trace!("Collapsed grouping key read");
                    return key_selector.clone();
                }
            }

            if let Expression::New(ref new) = **inner {
                if let Some(arg) = new.index_of_member(member).and_then(|i| new.args.get(i)) {
                    trace!("Collapsed read of {} from a construction", member);
                    return arg.clone();
                }
            }

            let (unwrapped, _) = unwrap_type_conversion(inner);
            if let Some(value) = single_assignment(unwrapped, |m| m.is_same_as(member)) {
                trace!("Collapsed read of {} from a member initialization", member);
                return value;
            }

            if let Some(rewritten) = self.push_into_conditional(inner, member) {
                return rewritten;
            }
        }

        update_member(node, inner)
    }

    /// Rewrites `(test ? new T { .. } : null).Member` (or with the branches swapped) into
    /// `test ? (T?) new T { .. }.Member : (T?) null`, converted back to the member type if that
    /// type is not nullable. Returns `None` for any other shape.
    fn push_into_conditional(&mut self, inner: &ExprRef, member: &MemberInfo) -> Option<ExprRef> {
        let (test, if_true, if_false) = match **inner {
            Expression::Conditional { ref test, ref if_true, ref if_false, .. } => (test, if_true, if_false),
            _ => return None,
        };
        let live_is_true = if is_null_constant(if_false) && is_member_init(if_true) {
            true
        } else if is_null_constant(if_true) && is_member_init(if_false) {
            false
        } else {
            return None;
        };
        let live = if live_is_true { if_true } else { if_false };

        // A reference-typed member is already nullable, so it gets no wrapper and no conversion.
        let member_type = member.member_type.clone();
        let nullable_type = member_type.make_nullable();

        let access = Expression::member(Some(live.clone()), member.clone());
        let mut rewritten = self.simplify_member(&access, Some(live.clone()), member);
        if rewritten.ty() != nullable_type {
            rewritten = Expression::convert(rewritten, nullable_type.clone());
        }
        let null = Expression::typed_null(nullable_type.clone());

        let (new_true, new_false) = if live_is_true { (rewritten, null) } else { (null, rewritten) };
        let conditional = Expression::conditional_typed(test.clone(), new_true, new_false,
                                                        nullable_type.clone());
        trace!("Pushed read of {} into a conditional construction", member);

        if member_type != nullable_type {
            Some(Expression::convert(conditional, member_type))
        } else {
            Some(conditional)
        }
    }
}

impl ExpressionVisitor for ReplacingVisitor {
    fn visit(&mut self, node: &ExprRef) -> ExprRef {
        for (original, replacement) in self.originals.iter().zip(self.replacements.iter()) {
            if Arc::ptr_eq(original, node) || original == node {
                trace!("Replaced {} with {}", node, replacement);
                return replacement.clone();
            }
        }
        walk_expression(self, node)
    }

    fn visit_member(&mut self, node: &ExprRef) -> ExprRef {
        if let Expression::Member { ref inner, ref member } = **node {
            let inner = self.visit_optional(inner.as_ref());
            return self.simplify_member(node, inner, member);
        }
        walk_member(self, node)
    }

    fn visit_call(&mut self, node: &ExprRef) -> ExprRef {
        if let Some((entity, name)) = try_get_property_arguments(node) {
            let new_entity = self.visit(entity);

            if let Expression::New(ref new) = *new_entity {
                if let Some(arg) = new.index_of_member_named(name).and_then(|i| new.args.get(i)) {
                    trace!("Collapsed accessor read of {} from a construction", name);
                    return arg.clone();
                }
            }

            let (unwrapped, _) = unwrap_type_conversion(&new_entity);
            if let Some(value) = single_assignment(unwrapped, |m| m.name == name) {
                trace!("Collapsed accessor read of {} from a member initialization", name);
                return value;
            }

            // The property name stays as written, even if it matches an original.
            if let Expression::Call { ref object, ref args, .. } = **node {
                return update_call(node, object.clone(), vec![new_entity, args[1].clone()]);
            }
        }
        walk_call(self, node)
    }
}

/// Replaces `original` with `replacement` everywhere in `tree`, simplifying the result.
pub fn replace(original: &ExprRef, replacement: &ExprRef, tree: &ExprRef) -> ExprRef {
    let mut visitor = ReplacingVisitor {
        originals: vec![original.clone()],
        replacements: vec![replacement.clone()],
    };
    visitor.rewrite(tree)
}

fn is_member_init(expr: &Expression) -> bool {
    match *expr {
        Expression::MemberInit { .. } => true,
        _ => false,
    }
}

/// If `expr` is a member initialization with exactly one binding for which `matches` holds, and
/// that binding is an assignment, returns the assigned value.
fn single_assignment<F>(expr: &Expression, matches: F) -> Option<ExprRef>
    where F: Fn(&MemberInfo) -> bool
{
    if let Expression::MemberInit { ref bindings, .. } = *expr {
        let mut found = bindings.iter().filter(|binding| matches(binding.member()));
        if let (Some(binding), None) = (found.next(), found.next()) {
            if let MemberBinding::Assignment { ref expression, .. } = *binding {
                return Some(expression.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use ::expressions::{ArithmeticType, CompareType, Environment, Literal, MethodInfo, NewObject,
                        Value};
    use ::expressions::helpers::property_call;
    use ::types::Type;

    fn customer() -> ExprRef {
        Expression::parameter("c", Type::class("Customer"))
    }

    fn anon_ab() -> ExprRef {
        Expression::anonymous(Type::class("Anon"), vec![
            ("A", Expression::constant("x")),
            ("B", Expression::constant(7)),
        ])
    }

    fn dto(fields: Vec<(&str, ExprRef)>) -> ExprRef {
        Expression::init(Type::class("Dto"), fields)
    }

    fn dto_member(name: &str, ty: Type) -> MemberInfo {
        MemberInfo::new(Type::class("Dto"), name, ty)
    }

    #[test]
    fn test_non_matching_tree_is_unchanged() {
        let c = customer();
        let tree = Expression::and(
            Expression::compare(Expression::property(c.clone(), "Age", Type::Int),
                                CompareType::GreaterThan,
                                Expression::constant(21)),
            Expression::not(Expression::compare(Expression::property(c.clone(), "Name", Type::String),
                                                CompareType::Equals,
                                                Expression::constant(Literal::Null))));
        let original = Expression::parameter("other", Type::class("Customer"));
        let result = replace(&original, &Expression::constant(Literal::Null), &tree);
        assert_eq!(tree, result);
        assert!(Arc::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_single_replacement() {
        let x = Expression::parameter("x", Type::Int);
        let tree = Expression::arithmetic(Expression::arithmetic(x.clone(), ArithmeticType::Multiply,
                                                                 Expression::constant(2)),
                                          ArithmeticType::Plus,
                                          Expression::constant(1));
        let result = replace(&Expression::parameter("x", Type::Int), &Expression::constant(5), &tree);
        let expected = Expression::arithmetic(Expression::arithmetic(Expression::constant(5),
                                                                     ArithmeticType::Multiply,
                                                                     Expression::constant(2)),
                                              ArithmeticType::Plus,
                                              Expression::constant(1));
        assert_eq!(expected, result);
    }

    #[test]
    fn test_replacement_is_not_revisited() {
        let x = Expression::parameter("x", Type::Int);
        let replacement = Expression::arithmetic(x.clone(), ArithmeticType::Plus, Expression::constant(1));
        let tree = Expression::arithmetic(x.clone(), ArithmeticType::Multiply, x.clone());
        let result = replace(&x, &replacement, &tree);
        assert_eq!(Expression::arithmetic(replacement.clone(), ArithmeticType::Multiply, replacement.clone()),
                   result);
    }

    #[test]
    fn test_first_match_wins() {
        let x = Expression::parameter("x", Type::Int);
        let mut visitor = ReplacingVisitor::new(vec![x.clone(), Expression::parameter("x", Type::Int)],
                                                vec![Expression::constant(1), Expression::constant(2)])
            .unwrap();
        assert_eq!(Expression::constant(1), visitor.visit(&x));
        assert_eq!(2, visitor.originals().len());
        assert_eq!(2, visitor.replacements().len());
    }

    #[test]
    fn test_mismatched_lists() {
        let result = ReplacingVisitor::new(vec![customer()], vec![]);
        assert_eq!(Err(ExpressionError::MismatchedReplacements {
            originals: 1,
            replacements: 0,
        }), result.map(|_| ()));
    }

    #[test]
    fn test_matched_subtree_is_replaced_whole() {
        let c = customer();
        let name = Expression::property(c.clone(), "Name", Type::String);
        let mut visitor = ReplacingVisitor::new(vec![name.clone(), c.clone()],
                                                vec![Expression::constant("Ann"), Expression::constant(Literal::Null)])
            .unwrap();
        let tree = Expression::compare(Expression::property(customer(), "Name", Type::String),
                                       CompareType::Equals,
                                       Expression::constant("Bob"));
        let expected = Expression::compare(Expression::constant("Ann"), CompareType::Equals,
                                           Expression::constant("Bob"));
        assert_eq!(expected, visitor.visit(&tree));
    }

    #[test]
    fn test_grouping_key_collapse() {
        let key = Expression::property(customer(), "City", Type::String);
        let group = Expression::grouping(key.clone(), customer());
        let g = Expression::parameter("g", group.ty());
        let tree = Expression::property(g.clone(), "Key", Type::String);
        assert_eq!(key, replace(&g, &group, &tree));

        // Only the key member collapses.
        let other = Expression::property(g.clone(), "Count", Type::Int);
        let expected = Expression::member(Some(group.clone()),
                                          MemberInfo::new(group.ty(), "Count", Type::Int));
        assert_eq!(expected, replace(&g, &group, &other));
    }

    #[test]
    fn test_anonymous_construction_collapse() {
        let anon = anon_ab();
        let p = Expression::parameter("p", Type::class("Anon"));
        let tree = Expression::property(p.clone(), "B", Type::Int);
        assert_eq!(Expression::constant(7), replace(&p, &anon, &tree));

        let missing = Expression::property(p.clone(), "C", Type::Int);
        let result = replace(&p, &anon, &missing);
        assert_eq!(Expression::member(Some(anon.clone()), MemberInfo::new(Type::class("Anon"), "C", Type::Int)),
                   result);
    }

    #[test]
    fn test_construction_without_members_is_not_collapsed() {
        let new = Expression::new_object(Type::class("Point"), vec![Expression::constant(1)], None);
        let tree = Expression::property(new.clone(), "X", Type::Int);
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_member_init_collapse() {
        let init = dto(vec![("Prop", Expression::constant(5)), ("Name", Expression::constant("n"))]);
        let tree = Expression::member(Some(init.clone()), dto_member("Prop", Type::Int));
        assert_eq!(Expression::constant(5), ReplacingVisitor::simplifier().visit(&tree));

        // Through a conversion of the initialized object.
        let converted = Expression::convert(init.clone(), Type::class("Dto"));
        let tree = Expression::member(Some(converted), dto_member("Name", Type::String));
        assert_eq!(Expression::constant("n"), ReplacingVisitor::simplifier().visit(&tree));
    }

    #[test]
    fn test_member_init_without_single_assignment_falls_through() {
        let twice = dto(vec![("Prop", Expression::constant(5)), ("Prop", Expression::constant(6))]);
        let tree = Expression::member(Some(twice), dto_member("Prop", Type::Int));
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));

        let none = dto(vec![("Other", Expression::constant(5))]);
        let tree = Expression::member(Some(none), dto_member("Prop", Type::Int));
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));

        let list = Expression::member_init(NewObject::empty(Type::class("Dto")), vec![
            MemberBinding::List {
                member: dto_member("Tags", Type::class("List")),
                initializers: vec![Expression::constant(1)],
            },
        ]);
        let tree = Expression::member(Some(list), dto_member("Tags", Type::class("List")));
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_conditional_null_guard() {
        let test = Expression::parameter("t", Type::Bool);
        let cond = Expression::conditional(test.clone(),
                                           dto(vec![("Prop", Expression::constant(5))]),
                                           Expression::constant(Literal::Null));
        let tree = Expression::member(Some(cond.clone()), dto_member("Prop", Type::Int));

        let nullable_int = Type::Int.make_nullable();
        let expected_cond = Expression::conditional_typed(
            test.clone(),
            Expression::convert(Expression::constant(5), nullable_int.clone()),
            Expression::typed_null(nullable_int.clone()),
            nullable_int.clone());
        let expected = Expression::convert(expected_cond.clone(), Type::Int);
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert_eq!(expected, result);
        assert_eq!(Type::Int, result.ty());

        // Reading the member directly faults when the null branch is taken; the rewritten
        // tree yields null instead.
        let mut env = Environment::new();
        env.add_parameter("t", Literal::False.into());
        assert_eq!(Err(ExpressionError::NullReference("Prop".into())), tree.evaluate(&env));
        assert_eq!(Ok(Value::Literal(Literal::Null)), result.evaluate(&env));

        env.add_parameter("t", Literal::True.into());
        assert_eq!(Ok(Value::Literal(Literal::Int(5))), result.evaluate(&env));
    }

    #[test]
    fn test_construction_missing_argument_falls_through() {
        let ty = Type::class("Anon");
        let short = Arc::new(Expression::New(NewObject {
            ty: ty.clone(),
            args: vec![Expression::constant(1)],
            members: Some(vec![MemberInfo::new(ty.clone(), "A", Type::Int),
                               MemberInfo::new(ty.clone(), "B", Type::Int)]),
        }));
        let read = Expression::member(Some(short.clone()), MemberInfo::new(ty.clone(), "B", Type::Int));
        assert_eq!(read, ReplacingVisitor::simplifier().visit(&read));

        let accessor = property_call(short, "B", Type::Int);
        assert_eq!(accessor, ReplacingVisitor::simplifier().visit(&accessor));
    }

    #[test]
    fn test_conditional_null_guard_keeps_branch_order() {
        let test = Expression::parameter("t", Type::Bool);
        let cond = Expression::conditional(test.clone(),
                                           Expression::constant(Literal::Null),
                                           dto(vec![("Prop", Expression::constant(5))]));
        let tree = Expression::member(Some(cond), dto_member("Prop", Type::Int));

        let nullable_int = Type::Int.make_nullable();
        let expected = Expression::convert(
            Expression::conditional_typed(test.clone(),
                                          Expression::typed_null(nullable_int.clone()),
                                          Expression::convert(Expression::constant(5), nullable_int.clone()),
                                          nullable_int.clone()),
            Type::Int);
        assert_eq!(expected, ReplacingVisitor::simplifier().visit(&tree));
    }

    #[test]
    fn test_conditional_null_guard_reference_member() {
        let test = Expression::parameter("t", Type::Bool);
        let cond = Expression::conditional(test.clone(),
                                           dto(vec![("Name", Expression::constant("n"))]),
                                           Expression::constant(Literal::Null));
        let tree = Expression::member(Some(cond), dto_member("Name", Type::String));

        // Strings are already nullable: no wrapper and no conversion back.
        let expected = Expression::conditional_typed(test.clone(),
                                                     Expression::constant("n"),
                                                     Expression::typed_null(Type::String),
                                                     Type::String);
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert_eq!(expected, result);

        let mut env = Environment::new();
        env.add_parameter("t", Literal::False.into());
        assert_eq!(Ok(Value::Literal(Literal::Null)), result.evaluate(&env));
    }

    #[test]
    fn test_conditional_without_null_branch_falls_through() {
        let test = Expression::parameter("t", Type::Bool);
        let cond = Expression::conditional(test.clone(),
                                           dto(vec![("Prop", Expression::constant(5))]),
                                           dto(vec![("Prop", Expression::constant(6))]));
        let tree = Expression::member(Some(cond), dto_member("Prop", Type::Int));
        let result = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_accessor_call_collapse() {
        let p = Expression::parameter("p", Type::class("Anon"));
        let tree = property_call(p.clone(), "B", Type::Int);
        assert_eq!(Expression::constant(7), replace(&p, &anon_ab(), &tree));

        let d = Expression::parameter("d", Type::class("Dto"));
        let init = dto(vec![("Prop", Expression::constant(5))]);
        let tree = property_call(d.clone(), "Prop", Type::Int);
        assert_eq!(Expression::constant(5), replace(&d, &init, &tree));
    }

    #[test]
    fn test_accessor_and_member_access_agree() {
        let p = Expression::parameter("p", Type::class("Anon"));
        let by_member = Expression::property(p.clone(), "A", Type::String);
        let by_accessor = property_call(p.clone(), "A", Type::String);
        assert_eq!(replace(&p, &anon_ab(), &by_member), replace(&p, &anon_ab(), &by_accessor));

        let d = Expression::parameter("d", Type::class("Dto"));
        let init = dto(vec![("Prop", Expression::constant(5))]);
        let by_member = Expression::property(d.clone(), "Prop", Type::Int);
        let by_accessor = property_call(d.clone(), "Prop", Type::Int);
        assert_eq!(replace(&d, &init, &by_member), replace(&d, &init, &by_accessor));
    }

    #[test]
    fn test_accessor_call_rebuilt_with_visited_entity() {
        let c = customer();
        let other = Expression::parameter("other", Type::class("Customer"));
        let tree = property_call(c.clone(), "Name", Type::String);

        // The literal property name matches an original, but is never rewritten.
        let mut visitor = ReplacingVisitor::new(vec![c.clone(), Expression::constant("Name")],
                                                vec![other.clone(), Expression::constant("Changed")])
            .unwrap();
        assert_eq!(property_call(other.clone(), "Name", Type::String), visitor.visit(&tree));

        let untouched = ReplacingVisitor::simplifier().visit(&tree);
        assert!(Arc::ptr_eq(&tree, &untouched));
    }

    #[test]
    fn test_other_calls_visit_all_arguments() {
        let x = Expression::parameter("x", Type::Int);
        let method = MethodInfo::new(Type::class("Math"), "Max", Type::Int);
        let tree = Expression::call(None, method.clone(), vec![x.clone(), Expression::constant("x")]);
        let result = replace(&x, &Expression::constant(3), &tree);
        assert_eq!(Expression::call(None, method, vec![Expression::constant(3), Expression::constant("x")]),
                   result);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let p = Expression::parameter("p", Type::class("Anon"));
        let tree = Expression::compare(Expression::property(p.clone(), "B", Type::Int),
                                       CompareType::LessThan,
                                       Expression::constant(10));
        let snapshot = (*tree).clone();
        let result = replace(&p, &anon_ab(), &tree);
        assert_eq!(snapshot, *tree);
        assert_eq!(Expression::compare(Expression::constant(7), CompareType::LessThan, Expression::constant(10)),
                   result);
    }

    #[test]
    fn test_static_member_is_kept() {
        let tree = Expression::member(None, MemberInfo::new(Type::class("Config"), "Limit", Type::Int));
        let result = replace(&customer(), &Expression::constant(Literal::Null), &tree);
        assert!(Arc::ptr_eq(&tree, &result));
    }
}
