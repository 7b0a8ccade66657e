//! This package contains the query rewriting passes that run over expression trees before they are
//! translated or evaluated.

mod replacing_visitor;

pub use self::replacing_visitor::{ReplacingVisitor, replace};
