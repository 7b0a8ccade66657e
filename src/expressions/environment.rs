//! This module contains classes and utilities for storing the parameter values that expressions
//! are evaluated against.

use super::{ExpressionError, Value};

/// This class holds the environment for evaluating expressions that include parameters. For
/// example, in the tree
///
/// ```text
/// (> (member (param c Customer) Age int) 21)
/// ```
///
/// the parameter `c` has to be bound to a customer object before the comparison can be
/// evaluated. This is the role that the environment class serves.
///
/// Environments can refer to parent environments, for cases where an expression is evaluated
/// inside the scope of another, such as a correlated subquery. Matching a parameter name goes
/// from child to parent: it is only if the child environment *doesn't* bind a name that the
/// parent environments are consulted.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Environment {
    bindings: Vec<(String, Value)>,
    parent_envs: Vec<Environment>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new() -> Environment {
        Default::default()
    }

    /// Reset the environment's own bindings. Parent environments are kept.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Add a parent environment.
    ///
    /// # Arguments
    /// * env - The environment to add as a parent.
    pub fn add_parent_env(&mut self, env: Environment) {
        self.parent_envs.push(env);
    }

    /// Binds a parameter to a value, replacing any earlier binding of the same name.
    ///
    /// # Arguments
    /// * name - the parameter name
    /// * value - the value of the parameter
    pub fn add_parameter<S: Into<String>>(&mut self, name: S, value: Value) {
        let name = name.into();
        self.bindings.retain(|&(ref n, _)| *n != name);
        self.bindings.push((name, value));
    }

    /// Get the value bound to the named parameter.
    ///
    /// # Arguments
    /// * name - the name of the parameter.
    pub fn get_parameter_value(&self, name: &str) -> Result<Value, ExpressionError> {
        if let Some(&(_, ref value)) = self.bindings.iter().find(|&&(ref n, _)| n == name) {
            return Ok(value.clone());
        }

        // If that doesn't work, try the parents.
        for parent in self.parent_envs.iter() {
            if let Ok(value) = parent.get_parameter_value(name) {
                return Ok(value);
            }
        }

        Err(ExpressionError::UnboundParameter(name.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::expressions::Literal;

    #[test]
    fn test_lookup() {
        let mut parent = Environment::new();
        parent.add_parameter("a", Literal::Int(1).into());
        parent.add_parameter("b", Literal::Int(2).into());

        let mut env = Environment::new();
        env.add_parameter("a", Literal::Int(10).into());
        env.add_parent_env(parent);

        assert_eq!(Ok(Value::Literal(Literal::Int(10))), env.get_parameter_value("a"));
        assert_eq!(Ok(Value::Literal(Literal::Int(2))), env.get_parameter_value("b"));
        assert_eq!(Err(ExpressionError::UnboundParameter("c".into())), env.get_parameter_value("c"));

        env.add_parameter("a", Literal::Int(11).into());
        assert_eq!(Ok(Value::Literal(Literal::Int(11))), env.get_parameter_value("a"));

        env.clear();
        assert_eq!(Ok(Value::Literal(Literal::Int(1))), env.get_parameter_value("a"));
    }
}
