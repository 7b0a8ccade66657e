//! Conversion of s-expressions into expression trees.
//!
//! Every node kind has one form, and the forms are exactly what `Expression`'s `Display` prints, so
//! any printed tree reads back as an equal tree:
//!
//! - `5`, `2.5`, `7L`, `'text'`, `true`, `false`, `null`, `(null int?)`
//! - `(param NAME TYPE)`
//! - `(member EXPR NAME TYPE)`, `(static TYPE NAME TYPE)`
//! - `(if TEST A B)`, optionally followed by the conditional's type
//! - `(anon TYPE (NAME EXPR)...)`, `(new TYPE EXPR...)`
//! - `(init TYPE BINDING...)` or `(init (new ...) BINDING...)`, where a binding is `(NAME EXPR)`,
//!   `(NAME (bind TYPE BINDING...))` or `(NAME (list TYPE EXPR...))`
//! - `(convert EXPR TYPE)`, `(not A)`, `(and A B)`, `(or A B)`
//! - `(== A B)` and the other comparisons, `(+ A B)` and the other arithmetic operators
//! - `(property EXPR 'NAME' TYPE)`, `(invoke EXPR NAME TYPE ARG...)`, `(call TYPE NAME TYPE ARG...)`
//! - `(group KEY ELEMENT)`
//!
//! Types are names such as `int`, `string?` or `Customer`, or `(group KEY ELEMENT)`.

use super::ParseError;
use super::sexp::Sexp;
use ::expressions::{ArithmeticType, CompareType, ExprRef, Expression, Literal, MemberBinding,
                    MemberInfo, MethodInfo, NewObject};
use ::expressions::helpers::property_call;
use ::types::Type;

/// Converts an s-expression into an expression tree.
pub fn expression(sexp: &Sexp) -> Result<ExprRef, ParseError> {
    match *sexp {
        Sexp::Literal(ref literal) => Ok(Expression::constant(literal.clone())),
        Sexp::Symbol(ref s) => {
            match s.as_str() {
                "null" => Ok(Expression::constant(Literal::Null)),
                "true" => Ok(Expression::constant(Literal::True)),
                "false" => Ok(Expression::constant(Literal::False)),
                _ => Err(ParseError::UnknownForm(s.clone())),
            }
        }
        Sexp::List(ref items) => form(items),
    }
}

/// Converts an s-expression into a type.
pub fn type_name(sexp: &Sexp) -> Result<Type, ParseError> {
    match *sexp {
        Sexp::Symbol(ref s) => Ok(Type::from(s.as_str())),
        Sexp::List(ref items) if items.len() == 3 && items[0].as_symbol() == Some("group") => {
            Ok(Type::Grouping {
                key: Box::new(type_name(&items[1])?),
                element: Box::new(type_name(&items[2])?),
            })
        }
        _ => Err(ParseError::InvalidType(format!("{}", sexp))),
    }
}

/// Reads a symbol.
pub fn symbol(sexp: &Sexp) -> Result<&str, ParseError> {
    sexp.as_symbol().ok_or_else(|| ParseError::ExpectedSymbol(format!("{}", sexp)))
}

/// Reads a list.
pub fn list(sexp: &Sexp) -> Result<&[Sexp], ParseError> {
    sexp.as_list().ok_or_else(|| ParseError::ExpectedList(format!("{}", sexp)))
}

/// Checks that a form received exactly `expected` arguments.
pub fn arity(form: &str, args: &[Sexp], expected: usize) -> Result<(), ParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ParseError::WrongArity {
            form: form.into(),
            expected: format!("{}", expected),
            found: args.len(),
        })
    }
}

fn at_least(form: &str, args: &[Sexp], minimum: usize) -> Result<(), ParseError> {
    if args.len() >= minimum {
        Ok(())
    } else {
        Err(ParseError::WrongArity {
            form: form.into(),
            expected: format!("at least {}", minimum),
            found: args.len(),
        })
    }
}

/// A member name, written either bare or quoted.
fn member_name(sexp: &Sexp) -> Result<String, ParseError> {
    match *sexp {
        Sexp::Symbol(ref s) |
        Sexp::Literal(Literal::String(ref s)) => Ok(s.clone()),
        _ => Err(ParseError::ExpectedSymbol(format!("{}", sexp))),
    }
}

fn expressions(items: &[Sexp]) -> Result<Vec<ExprRef>, ParseError> {
    items.iter().map(expression).collect()
}

fn form(items: &[Sexp]) -> Result<ExprRef, ParseError> {
    let (head, args) = match items.split_first() {
        Some((head, args)) => (symbol(head)?, args),
        None => return Err(ParseError::ExpectedSymbol("()".into())),
    };

    match head {
        "null" => {
            if args.is_empty() {
                Ok(Expression::constant(Literal::Null))
            } else {
                arity(head, args, 1)?;
                Ok(Expression::typed_null(type_name(&args[0])?))
            }
        }
        "param" => {
            arity(head, args, 2)?;
            Ok(Expression::parameter(symbol(&args[0])?, type_name(&args[1])?))
        }
        "member" => {
            arity(head, args, 3)?;
            Ok(Expression::property(expression(&args[0])?, member_name(&args[1])?, type_name(&args[2])?))
        }
        "static" => {
            arity(head, args, 3)?;
            let member = MemberInfo::new(type_name(&args[0])?, member_name(&args[1])?, type_name(&args[2])?);
            Ok(Expression::member(None, member))
        }
        "if" => {
            let (test, if_true, if_false) = match args.len() {
                3 | 4 => (expression(&args[0])?, expression(&args[1])?, expression(&args[2])?),
                _ => {
                    return Err(ParseError::WrongArity {
                        form: head.into(),
                        expected: "3 or 4".into(),
                        found: args.len(),
                    })
                }
            };
            match args.get(3) {
                Some(ty) => Ok(Expression::conditional_typed(test, if_true, if_false, type_name(ty)?)),
                None => Ok(Expression::conditional(test, if_true, if_false)),
            }
        }
        "anon" => {
            at_least(head, args, 1)?;
            let ty = type_name(&args[0])?;
            let mut fields = Vec::with_capacity(args.len() - 1);
            for field in args[1..].iter() {
                let field = list(field)?;
                arity("anon field", field, 2)?;
                fields.push((member_name(&field[0])?, expression(&field[1])?));
            }
            Ok(Expression::anonymous(ty, fields))
        }
        "new" => {
            at_least(head, args, 1)?;
            Ok(Expression::new_object(type_name(&args[0])?, expressions(&args[1..])?, None))
        }
        "init" => {
            at_least(head, args, 1)?;
            let new = constructor(&args[0])?;
            let bindings = bindings(&new.ty, &args[1..])?;
            Ok(Expression::member_init(new, bindings))
        }
        "convert" => {
            arity(head, args, 2)?;
            Ok(Expression::convert(expression(&args[0])?, type_name(&args[1])?))
        }
        "not" => {
            arity(head, args, 1)?;
            Ok(Expression::not(expression(&args[0])?))
        }
        "and" | "or" => {
            arity(head, args, 2)?;
            let (left, right) = (expression(&args[0])?, expression(&args[1])?);
            if head == "and" {
                Ok(Expression::and(left, right))
            } else {
                Ok(Expression::or(left, right))
            }
        }
        "==" | "=" | "!=" | "<>" | "<" | "<=" | ">" | ">=" => {
            arity(head, args, 2)?;
            Ok(Expression::compare(expression(&args[0])?,
                                   CompareType::from(head.as_bytes()),
                                   expression(&args[1])?))
        }
        "+" | "-" | "*" | "/" | "%" => {
            arity(head, args, 2)?;
            Ok(Expression::arithmetic(expression(&args[0])?,
                                      ArithmeticType::from(head.as_bytes()),
                                      expression(&args[1])?))
        }
        "property" => {
            arity(head, args, 3)?;
            Ok(property_call(expression(&args[0])?, member_name(&args[1])?, type_name(&args[2])?))
        }
        "invoke" => {
            at_least(head, args, 3)?;
            let object = expression(&args[0])?;
            let method = MethodInfo::new(object.ty(), member_name(&args[1])?, type_name(&args[2])?);
            Ok(Expression::call(Some(object), method, expressions(&args[3..])?))
        }
        "call" => {
            at_least(head, args, 3)?;
            let method = MethodInfo::new(type_name(&args[0])?, member_name(&args[1])?, type_name(&args[2])?);
            Ok(Expression::call(None, method, expressions(&args[3..])?))
        }
        "group" => {
            arity(head, args, 2)?;
            Ok(Expression::grouping(expression(&args[0])?, expression(&args[1])?))
        }
        _ => Err(ParseError::UnknownForm(head.into())),
    }
}

/// The constructor of an `init` form: a bare type, or a `new` or `anon` form.
fn constructor(sexp: &Sexp) -> Result<NewObject, ParseError> {
    let is_construction = sexp.as_list()
        .and_then(|items| items.first())
        .and_then(Sexp::as_symbol)
        .map_or(false, |head| head == "new" || head == "anon");
    if !is_construction {
        return Ok(NewObject::empty(type_name(sexp)?));
    }
    match *expression(sexp)? {
        Expression::New(ref new) => Ok(new.clone()),
        _ => Err(ParseError::InvalidType(format!("{}", sexp))),
    }
}

fn bindings(declaring_type: &Type, items: &[Sexp]) -> Result<Vec<MemberBinding>, ParseError> {
    let mut result = Vec::with_capacity(items.len());
    for item in items.iter() {
        let item = list(item)?;
        arity("binding", item, 2)?;
        let name = member_name(&item[0])?;
        let value = &item[1];
        let nested = value.as_list().and_then(|v| {
            v.first().and_then(Sexp::as_symbol).map(|head| (head, &v[1..]))
        });

        let binding = match nested {
            Some(("bind", rest)) => {
                at_least("bind", rest, 1)?;
                let ty = type_name(&rest[0])?;
                MemberBinding::Member {
                    bindings: bindings(&ty, &rest[1..])?,
                    member: MemberInfo::new(declaring_type.clone(), name, ty),
                }
            }
            Some(("list", rest)) => {
                at_least("list", rest, 1)?;
                MemberBinding::List {
                    member: MemberInfo::new(declaring_type.clone(), name, type_name(&rest[0])?),
                    initializers: expressions(&rest[1..])?,
                }
            }
            _ => {
                let value = expression(value)?;
                MemberBinding::assign(MemberInfo::new(declaring_type.clone(), name, value.ty()), value)
            }
        };
        result.push(binding);
    }
    Ok(result)
}
