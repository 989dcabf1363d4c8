// src/errors/mod.rs
//! Structured error reporting for the Sable compiler.
//!
//! This module provides error types using miette for fancy diagnostics.

pub mod report;
pub mod sema;

pub use report::{render_to_stderr, render_to_string, render_to_writer};
pub use sema::SemanticError;
