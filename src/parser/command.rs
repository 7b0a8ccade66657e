//! Conversion of s-expressions into shell commands.
//!
//! - `(replace ORIGINAL REPLACEMENT TREE)`
//! - `(replace-all ((ORIGINAL REPLACEMENT)...) TREE)`
//! - `(simplify TREE)`
//! - `(eval TREE (NAME VALUE)...)`
//! - `exit` or `quit`

use super::ParseError;
use super::expression::{arity, expression, list, symbol};
use super::sexp::Sexp;
use ::commands::{Command, EvalCommand, ExitCommand, ReplaceCommand, SimplifyCommand};

fn as_boxed_command<C: Command>(c: C) -> Box<Command> {
    Box::new(c) as Box<Command>
}

/// Converts a parsed statement into a command.
pub fn command(sexp: &Sexp) -> Result<Box<Command>, ParseError> {
    if let Some(word) = sexp.as_symbol() {
        return match word.to_lowercase().as_str() {
            "exit" | "quit" => Ok(as_boxed_command(ExitCommand)),
            _ => Err(ParseError::UnknownForm(word.into())),
        };
    }

    let items = list(sexp)?;
    let (head, args) = match items.split_first() {
        Some((head, args)) => (symbol(head)?, args),
        None => return Err(ParseError::ExpectedSymbol("()".into())),
    };
    match head {
        "replace" => {
            arity(head, args, 3)?;
            let original = expression(&args[0])?;
            let replacement = expression(&args[1])?;
            Ok(as_boxed_command(ReplaceCommand::new(vec![original], vec![replacement],
                                                    expression(&args[2])?)))
        }
        "replace-all" => {
            arity(head, args, 2)?;
            let pairs = list(&args[0])?;
            let mut originals = Vec::with_capacity(pairs.len());
            let mut replacements = Vec::with_capacity(pairs.len());
            for pair in pairs.iter() {
                let pair = list(pair)?;
                arity("replacement pair", pair, 2)?;
                originals.push(expression(&pair[0])?);
                replacements.push(expression(&pair[1])?);
            }
            Ok(as_boxed_command(ReplaceCommand::new(originals, replacements, expression(&args[1])?)))
        }
        "simplify" => {
            arity(head, args, 1)?;
            Ok(as_boxed_command(SimplifyCommand::new(expression(&args[0])?)))
        }
        "eval" => {
            if args.is_empty() {
                arity(head, args, 1)?;
            }
            let tree = expression(&args[0])?;
            let mut bindings = Vec::with_capacity(args.len() - 1);
            for binding in args[1..].iter() {
                let binding = list(binding)?;
                arity("parameter binding", binding, 2)?;
                bindings.push((symbol(&binding[0])?.to_string(), expression(&binding[1])?));
            }
            Ok(as_boxed_command(EvalCommand::new(tree, bindings)))
        }
        _ => Err(ParseError::UnknownForm(head.into())),
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::super::parse_commands;
    use super::*;
    use ::expressions::{Expression, Literal};
    use ::types::Type;

    #[test]
    fn test_replace_all() {
        let parsed = parse_commands("(replace-all (((param x int) 1) ((param y int) 2)) (+ (param x int) (param y int)))");
        let commands = match parsed {
            Ok(commands) => commands,
            Err(e) => panic!("{}", e),
        };
        let x = Expression::parameter("x", Type::Int);
        let y = Expression::parameter("y", Type::Int);
        let expected = ReplaceCommand::new(vec![x.clone(), y.clone()],
                                           vec![Expression::constant(1), Expression::constant(2)],
                                           Expression::arithmetic(x, ::expressions::ArithmeticType::Plus, y));
        assert_eq!(Some(&expected), Any::downcast_ref::<ReplaceCommand>(commands[0].as_any()));
    }

    #[test]
    fn test_eval() {
        let parsed = parse_commands("(eval (param t bool) (t true))");
        let commands = match parsed {
            Ok(commands) => commands,
            Err(e) => panic!("{}", e),
        };
        let expected = EvalCommand::new(Expression::parameter("t", Type::Bool),
                                        vec![("t".into(), Expression::constant(Literal::True))]);
        assert_eq!(Some(&expected), Any::downcast_ref::<EvalCommand>(commands[0].as_any()));
    }

    #[test]
    fn test_exit() {
        let commands = match parse_commands("QUIT") {
            Ok(commands) => commands,
            Err(e) => panic!("{}", e),
        };
        assert!(Any::downcast_ref::<ExitCommand>(commands[0].as_any()).is_some());
    }

    #[test]
    fn test_errors() {
        assert_eq!(Some(ParseError::WrongArity {
                       form: "eval".into(),
                       expected: "1".into(),
                       found: 0,
                   }),
                   parse_commands("(eval)").err());
        assert_eq!(Some(ParseError::UnknownForm("frob".into())), parse_commands("(frob 1)").err());
        assert_eq!(Some(ParseError::ExpectedList("x".into())),
                   parse_commands("(replace-all x (param x int))").err());
    }
}
