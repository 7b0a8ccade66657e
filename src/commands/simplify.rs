use super::{Command, CommandResult, Output};
use ::expressions::ExprRef;
use ::queries::ReplacingVisitor;

#[derive(Debug, Clone, PartialEq)]
/// A command for simplifying the member reads of a tree without replacing anything.
pub struct SimplifyCommand {
    tree: ExprRef,
}

impl SimplifyCommand {
    /// Creates a new simplify command.
    pub fn new(tree: ExprRef) -> SimplifyCommand {
        SimplifyCommand { tree: tree }
    }
}

impl Command for SimplifyCommand {
    fn execute(&mut self) -> CommandResult {
        Ok(Output::Tree(ReplacingVisitor::simplifier().rewrite(&self.tree)))
    }

    fn as_any(&self) -> &::std::any::Any {
        self
    }
}
