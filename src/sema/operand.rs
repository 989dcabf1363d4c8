// src/sema/operand.rs
//! Transient result of resolving one expression.

use crate::frontend::ast::NodeId;
use crate::sema::type_arena::TypeId;
use crate::sema::value::Value;

/// How an expression result may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Assignable place
    LValue,
    /// Plain result
    RValue,
    /// A type name used as a value (static access)
    TypeAccess,
    /// A function name
    FunctionAccess,
    /// The `self` receiver
    SelfAccess,
}

/// The result of one expression-resolution step. Never persisted; the typer
/// records the resolved type per node separately. Exactly one of
/// {`ty.is_some()`, `error`} holds after resolution.
#[derive(Debug, Clone, Copy)]
pub struct Operand {
    pub ty: Option<TypeId>,
    pub expr: NodeId,
    pub access: AccessKind,
    pub value: Value,
    pub error: bool,
}

impl Operand {
    pub fn new(expr: NodeId, ty: TypeId, access: AccessKind) -> Self {
        Self {
            ty: Some(ty),
            expr,
            access,
            value: Value::None,
            error: false,
        }
    }

    pub fn with_value(expr: NodeId, ty: TypeId, access: AccessKind, value: Value) -> Self {
        Self {
            ty: Some(ty),
            expr,
            access,
            value,
            error: false,
        }
    }

    /// Error sentinel: callers must propagate it instead of continuing with
    /// a missing type.
    pub fn error(expr: NodeId) -> Self {
        Self {
            ty: None,
            expr,
            access: AccessKind::RValue,
            value: Value::None,
            error: true,
        }
    }

    pub fn is_const(&self) -> bool {
        self.value.is_const()
    }

    pub fn is_lvalue(&self) -> bool {
        matches!(self.access, AccessKind::LValue | AccessKind::SelfAccess)
    }
}
