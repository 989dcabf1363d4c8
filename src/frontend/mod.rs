// src/frontend/mod.rs
//! Boundary with the (out-of-scope) parsing stage: syntax-tree node types,
//! source spans, and the string interner the parser hands to the typer.

pub mod ast;
pub mod intern;
pub mod span;

pub use ast::{NodeId, Symbol};
pub use intern::Interner;
pub use span::Span;
