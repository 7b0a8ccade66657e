use super::{Command, CommandResult, Output};
use ::expressions::ExprRef;
use ::queries::ReplacingVisitor;

#[derive(Debug, Clone, PartialEq)]
/// A command for replacing expressions inside a tree and simplifying the member reads that the
/// replacements make trivial.
pub struct ReplaceCommand {
    /// The expressions to look for.
    originals: Vec<ExprRef>,
    /// What each original is replaced with.
    replacements: Vec<ExprRef>,
    /// The tree being rewritten.
    tree: ExprRef,
}

impl ReplaceCommand {
    /// Creates a new replace command.
    ///
    /// # Arguments
    /// * originals - The expressions to replace, in priority order.
    /// * replacements - The replacement for each original.
    /// * tree - The tree to rewrite.
    pub fn new(originals: Vec<ExprRef>, replacements: Vec<ExprRef>, tree: ExprRef) -> ReplaceCommand {
        ReplaceCommand {
            originals: originals,
            replacements: replacements,
            tree: tree,
        }
    }
}

impl Command for ReplaceCommand {
    fn execute(&mut self) -> CommandResult {
        let mut visitor = ReplacingVisitor::new(self.originals.clone(), self.replacements.clone())?;
        Ok(Output::Tree(visitor.rewrite(&self.tree)))
    }

    fn as_any(&self) -> &::std::any::Any {
        self
    }
}
