// src/lib.rs
//! Semantic-analysis core of the Sable compiler front end.
//!
//! The crate consumes a syntax tree produced by a separate parsing stage
//! (`frontend::ast`), builds a symbol table, resolves every declaration to a
//! concrete type, checks expression type-compatibility, computes struct
//! memory layout, and folds compile-time-constant expressions. Code
//! generation is an explicit non-goal.

pub mod errors;
pub mod frontend;
pub mod sema;

pub use errors::SemanticError;
pub use sema::{TypeError, Typer};
