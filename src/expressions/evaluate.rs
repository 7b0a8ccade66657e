//! This module contains the evaluator for expression trees.

use std::cmp::Ordering;

use super::{ArithmeticType, CompareType, Environment, ExprRef, Expression, ExpressionError, Literal,
            MemberBinding, NewObject, Value};
use super::helpers::{self, GROUPING_KEY_MEMBER};
use ::types::Type;

impl Expression {
    /// Evaluates the expression against the parameter values in `env`.
    ///
    /// # Errors
    /// Reading a member of `null` fails with `NullReference`. Parameters missing from the
    /// environment, operators applied to unsuitable values, and calls other than the property
    /// accessor fail as well.
    pub fn evaluate(&self, env: &Environment) -> Result<Value, ExpressionError> {
        match *self {
            Expression::Constant { ref value, .. } => Ok(Value::Literal(value.clone())),
            Expression::Parameter { ref name, .. } => env.get_parameter_value(name),
            Expression::Member { ref inner, ref member } => {
                match *inner {
                    Some(ref inner) => read_member(inner.evaluate(env)?, &member.name),
                    None => Err(ExpressionError::CannotEvaluate(format!("{}", self))),
                }
            }
            Expression::Conditional { ref test, ref if_true, ref if_false, .. } => {
                if evaluate_bool(test, env)? {
                    if_true.evaluate(env)
                } else {
                    if_false.evaluate(env)
                }
            }
            Expression::New(ref new) => construct(new, env),
            Expression::MemberInit { ref new, ref bindings } => {
                let mut object = construct(new, env)?;
                apply_bindings(&mut object, bindings, env)?;
                Ok(object)
            }
            Expression::Convert { ref operand, ref ty } => convert(operand.evaluate(env)?, ty),
            Expression::Not(ref operand) => {
                match operand.evaluate(env)? {
                    Value::Literal(Literal::Null) => Ok(Value::Literal(Literal::Null)),
                    Value::Literal(Literal::True) => Ok(Value::Literal(Literal::False)),
                    Value::Literal(Literal::False) => Ok(Value::Literal(Literal::True)),
                    other => Err(ExpressionError::InvalidOperand(format!("NOT {}", other))),
                }
            }
            Expression::And(ref left, ref right) => {
                let result = evaluate_bool(left, env)? && evaluate_bool(right, env)?;
                Ok(Value::Literal(result.into()))
            }
            Expression::Or(ref left, ref right) => {
                let result = evaluate_bool(left, env)? || evaluate_bool(right, env)?;
                Ok(Value::Literal(result.into()))
            }
            Expression::Compare(ref left, compare_type, ref right) => {
                let result = compare(left.evaluate(env)?, compare_type, right.evaluate(env)?)?;
                Ok(Value::Literal(result.into()))
            }
            Expression::Arithmetic(ref left, arith_type, ref right) => {
                arithmetic(left.evaluate(env)?, arith_type, right.evaluate(env)?)
            }
            Expression::Call { .. } => {
                match helpers::try_get_property_arguments(self) {
                    Some((entity, name)) => read_member(entity.evaluate(env)?, name),
                    None => Err(ExpressionError::CannotEvaluate(format!("{}", self))),
                }
            }
            Expression::Grouping { ref key_selector, ref element_selector } => {
                Ok(Value::Grouping {
                    key: Box::new(key_selector.evaluate(env)?),
                    element: Box::new(element_selector.evaluate(env)?),
                })
            }
        }
    }
}

fn evaluate_bool(expr: &ExprRef, env: &Environment) -> Result<bool, ExpressionError> {
    match expr.evaluate(env)? {
        Value::Literal(ref literal) if literal.as_bool().is_some() => {
            Ok(literal.as_bool() == Some(true))
        }
        other => Err(ExpressionError::InvalidOperand(format!("{} is not a boolean", other))),
    }
}

fn read_member(value: Value, name: &str) -> Result<Value, ExpressionError> {
    if value.is_null() {
        return Err(ExpressionError::NullReference(name.into()));
    }
    if let Value::Grouping { key, .. } = value {
        return if name == GROUPING_KEY_MEMBER {
            Ok(*key)
        } else {
            Err(ExpressionError::MissingMember(name.into()))
        };
    }
    value.field(name).cloned().ok_or_else(|| ExpressionError::MissingMember(name.into()))
}

fn construct(new: &NewObject, env: &Environment) -> Result<Value, ExpressionError> {
    let mut fields = Vec::with_capacity(new.args.len());
    for (i, arg) in new.args.iter().enumerate() {
        let name = new.members.as_ref().and_then(|members| members.get(i)).map(|m| m.name.clone());
        fields.push((name, arg.evaluate(env)?));
    }
    Ok(Value::Object {
        ty: new.ty.clone(),
        fields: fields,
    })
}

fn apply_bindings(object: &mut Value,
                  bindings: &[MemberBinding],
                  env: &Environment)
                  -> Result<(), ExpressionError> {
    for binding in bindings.iter() {
        let name = binding.member().name.clone();
        let value = match *binding {
            MemberBinding::Assignment { ref expression, .. } => expression.evaluate(env)?,
            MemberBinding::Member { ref member, ref bindings } => {
                let mut nested = match object.field(&name) {
                    Some(existing) => existing.clone(),
                    None => {
                        Value::Object {
                            ty: member.member_type.clone(),
                            fields: vec![],
                        }
                    }
                };
                apply_bindings(&mut nested, bindings, env)?;
                nested
            }
            MemberBinding::List { ref initializers, .. } => {
                let mut items = match object.field(&name) {
                    Some(&Value::List(ref items)) => items.clone(),
                    _ => vec![],
                };
                for init in initializers.iter() {
                    items.push(init.evaluate(env)?);
                }
                Value::List(items)
            }
        };
        match *object {
            Value::Object { ref mut fields, .. } => fields.push((Some(name), value)),
            ref other => return Err(ExpressionError::InvalidOperand(format!("{} has no members", other))),
        }
    }
    Ok(())
}

fn convert(value: Value, ty: &Type) -> Result<Value, ExpressionError> {
    match value {
        Value::Literal(Literal::Null) => Ok(Value::Literal(Literal::Null)),
        Value::Literal(literal) => {
            if literal.is_numeric() && ty.is_numeric() {
                literal.convert_to(ty)
                    .map(Value::Literal)
                    .ok_or_else(|| ExpressionError::InvalidOperand(format!("cannot convert to {}", ty)))
            } else if literal.get_type() == *ty.unwrap_nullable() || *ty == Type::Object {
                Ok(Value::Literal(literal))
            } else {
                Err(ExpressionError::InvalidOperand(format!("cannot convert {} to {}", literal, ty)))
            }
        }
        other => Ok(other),
    }
}

fn compare(left: Value, compare_type: CompareType, right: Value) -> Result<bool, ExpressionError> {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return Ok(match compare_type {
            CompareType::Equals => both,
            CompareType::NotEquals => !both,
            _ => false,
        });
    }

    let ordering = match (&left, &right) {
        (&Value::Literal(ref l), &Value::Literal(ref r)) if l.is_numeric() && r.is_numeric() => {
            match (l.as_double(), r.as_double()) {
                (Some(Literal::Double(a)), Some(Literal::Double(b))) => a.partial_cmp(&b),
                _ => None,
            }
        }
        (&Value::Literal(Literal::String(ref a)), &Value::Literal(Literal::String(ref b))) => {
            Some(a.cmp(b))
        }
        _ => {
            if left == right { Some(Ordering::Equal) } else { None }
        }
    };

    match compare_type {
        CompareType::Equals => Ok(ordering == Some(Ordering::Equal)),
        CompareType::NotEquals => Ok(ordering != Some(Ordering::Equal)),
        _ => {
            let ordering = ordering.ok_or_else(|| {
                ExpressionError::InvalidOperand(format!("cannot order {} and {}", left, right))
            })?;
            Ok(match compare_type {
                CompareType::LessThan => ordering == Ordering::Less,
                CompareType::LessThanEqual => ordering != Ordering::Greater,
                CompareType::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    }
}

fn arithmetic(left: Value, arith_type: ArithmeticType, right: Value) -> Result<Value, ExpressionError> {
    let (l, r) = match (left, right) {
        (Value::Literal(l), Value::Literal(r)) => (l, r),
        (l, r) => {
            return Err(ExpressionError::InvalidOperand(format!("{} {} {}", l, arith_type, r)));
        }
    };
    if l.is_null() || r.is_null() {
        return Ok(Value::Literal(Literal::Null));
    }
    if let (&Literal::String(ref a), &Literal::String(ref b), ArithmeticType::Plus) = (&l, &r, arith_type) {
        return Ok(Value::Literal(Literal::String(format!("{}{}", a, b))));
    }
    if !l.is_numeric() || !r.is_numeric() {
        return Err(ExpressionError::InvalidOperand(format!("{} {} {}", l, arith_type, r)));
    }

    // Promote both sides to the wider of the two types.
    let target = match (&l, &r) {
        (&Literal::Double(_), _) | (_, &Literal::Double(_)) => Type::Double,
        (&Literal::Float(_), _) | (_, &Literal::Float(_)) => Type::Float,
        (&Literal::Long(_), _) | (_, &Literal::Long(_)) => Type::Long,
        _ => Type::Int,
    };
    let result = match (l.convert_to(&target), r.convert_to(&target)) {
        (Some(Literal::Int(a)), Some(Literal::Int(b))) => {
            check_divisor(b == 0, arith_type)?;
            Literal::Int(match arith_type {
                ArithmeticType::Plus => a.wrapping_add(b),
                ArithmeticType::Minus => a.wrapping_sub(b),
                ArithmeticType::Multiply => a.wrapping_mul(b),
                ArithmeticType::Divide => a.wrapping_div(b),
                ArithmeticType::Remainder => a.wrapping_rem(b),
            })
        }
        (Some(Literal::Long(a)), Some(Literal::Long(b))) => {
            check_divisor(b == 0, arith_type)?;
            Literal::Long(match arith_type {
                ArithmeticType::Plus => a.wrapping_add(b),
                ArithmeticType::Minus => a.wrapping_sub(b),
                ArithmeticType::Multiply => a.wrapping_mul(b),
                ArithmeticType::Divide => a.wrapping_div(b),
                ArithmeticType::Remainder => a.wrapping_rem(b),
            })
        }
        (Some(Literal::Float(a)), Some(Literal::Float(b))) => Literal::Float(float_op(a as f64, arith_type, b as f64) as f32),
        (Some(Literal::Double(a)), Some(Literal::Double(b))) => Literal::Double(float_op(a, arith_type, b)),
        _ => return Err(ExpressionError::InvalidOperand(format!("{} {} {}", l, arith_type, r))),
    };
    Ok(Value::Literal(result))
}

/// Integer division by zero fails. Everything else on integers wraps, `MIN / -1` included.
fn check_divisor(is_zero: bool, arith_type: ArithmeticType) -> Result<(), ExpressionError> {
    match arith_type {
        ArithmeticType::Divide | ArithmeticType::Remainder if is_zero => {
            Err(ExpressionError::DivideByZero)
        }
        _ => Ok(()),
    }
}

fn float_op(a: f64, arith_type: ArithmeticType, b: f64) -> f64 {
    match arith_type {
        ArithmeticType::Plus => a + b,
        ArithmeticType::Minus => a - b,
        ArithmeticType::Multiply => a * b,
        ArithmeticType::Divide => a / b,
        ArithmeticType::Remainder => a % b,
    }
}
