// src/sema/typer/errors.rs
//! Error reporting helpers for the typer.

use super::{ModuleCx, TypeError, Typer};
use crate::errors::SemanticError;
use crate::frontend::Span;
use crate::sema::type_arena::TypeId;

impl Typer {
    /// Record a semantic error; resolution continues best-effort.
    pub(super) fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    /// Human-readable type name for diagnostics.
    pub(super) fn type_display(&self, ty: TypeId, cx: &ModuleCx) -> String {
        self.types.display(ty, &self.defs, cx.interner)
    }

    /// Report an "expected X, found Y" mismatch.
    pub(super) fn type_mismatch(&mut self, expected: TypeId, found: TypeId, span: Span, cx: &ModuleCx) {
        let error = SemanticError::TypeMismatch {
            expected: self.type_display(expected, cx),
            found: self.type_display(found, cx),
            span: span.into(),
        };
        self.add_error(error, span);
    }

    /// Report invalid binary operands, naming both types and the operator.
    pub(super) fn invalid_operands(
        &mut self,
        op: &str,
        lhs: TypeId,
        rhs: TypeId,
        span: Span,
        cx: &ModuleCx,
    ) {
        let error = SemanticError::InvalidOperands {
            op: op.to_string(),
            lhs: self.type_display(lhs, cx),
            rhs: self.type_display(rhs, cx),
            span: span.into(),
        };
        self.add_error(error, span);
    }

    pub(super) fn not_implemented(&mut self, what: &str, span: Span) {
        self.add_error(
            SemanticError::NotImplemented {
                what: what.to_string(),
                span: span.into(),
            },
            span,
        );
    }
}
