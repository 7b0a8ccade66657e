use super::{Command, CommandResult, ExecutionError, Output};
use ::expressions::{Environment, ExprRef};

#[derive(Debug, Clone, PartialEq)]
/// A command for evaluating a tree against parameter values.
pub struct EvalCommand {
    /// The tree being evaluated.
    tree: ExprRef,
    /// The parameter values, each an expression evaluated against the bindings before it.
    bindings: Vec<(String, ExprRef)>,
}

impl EvalCommand {
    /// Creates a new eval command.
    pub fn new(tree: ExprRef, bindings: Vec<(String, ExprRef)>) -> EvalCommand {
        EvalCommand {
            tree: tree,
            bindings: bindings,
        }
    }
}

impl Command for EvalCommand {
    fn execute(&mut self) -> CommandResult {
        let mut env = Environment::new();
        for &(ref name, ref value) in self.bindings.iter() {
            if env.get_parameter_value(name).is_ok() {
                return Err(ExecutionError::DuplicateParameter(name.clone()));
            }
            let value = value.evaluate(&env)?;
            debug!("Bound {} to {}", name, value);
            env.add_parameter(name.as_str(), value);
        }
        Ok(Output::Value(self.tree.evaluate(&env)?))
    }

    fn as_any(&self) -> &::std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::commands::SimplifyCommand;
    use ::expressions::{ExpressionError, Literal, Value};
    use ::parser::parse_expression;

    fn eval(tree: &str, bindings: Vec<(&str, &str)>) -> CommandResult {
        let bindings = bindings.into_iter()
            .map(|(name, value)| (name.to_string(), parse_expression(value).unwrap()))
            .collect();
        EvalCommand::new(parse_expression(tree).unwrap(), bindings).execute()
    }

    #[test]
    fn test_eval_command() {
        assert_eq!(Ok(Output::Value(Value::Literal(Literal::Int(7)))),
                   eval("(+ (param x int) (member (param p P) A int))",
                        vec![("x", "3"), ("p", "(anon P (A 4))")]));
        assert_eq!(Ok(Output::Value(Value::Literal(Literal::Int(6)))),
                   eval("(param y int)", vec![("x", "3"), ("y", "(* (param x int) 2)")]));
    }

    #[test]
    fn test_eval_errors() {
        assert_eq!(Err(ExecutionError::DuplicateParameter("x".into())),
                   eval("(param x int)", vec![("x", "1"), ("x", "2")]));
        assert_eq!(Err(ExecutionError::ExpressionError(ExpressionError::NullReference("Prop".into()))),
                   eval("(member (if (param t bool) (init Dto (Prop 5)) null) Prop int)",
                        vec![("t", "false")]));
        assert_eq!(Err(ExecutionError::ExpressionError(ExpressionError::UnboundParameter("z".into()))),
                   eval("(param z int)", vec![]));
    }

    #[test]
    fn test_eval_simplified_null_guard() {
        let guarded = "(member (if (param t bool) (init Dto (Prop 5)) null) Prop int)";
        let simplified = match SimplifyCommand::new(parse_expression(guarded).unwrap()).execute() {
            Ok(Output::Tree(tree)) => format!("{}", tree),
            other => panic!("{:?}", other),
        };
        assert_eq!(Ok(Output::Value(Value::Literal(Literal::Null))),
                   eval(&simplified, vec![("t", "false")]));
        assert_eq!(Ok(Output::Value(Value::Literal(Literal::Int(5)))),
                   eval(&simplified, vec![("t", "true")]));
    }
}
