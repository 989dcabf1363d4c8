// src/sema/typer/expr.rs
//! Expression resolution: literals, names, operators, tuples, blocks and
//! `self`, with constant folding through the operator evaluator.

use super::{ModuleCx, Typer};
use crate::errors::SemanticError;
use crate::frontend::ast::{
    BinaryExpr, BinaryOp, Block, Expr, ExprKind, LetStmt, Stmt, Symbol, UnaryExpr, UnaryOp,
};
use crate::sema::entity::{AddressKind, EntityKind, LocalEntity};
use crate::sema::eval::{eval_binary, eval_unary};
use crate::sema::operand::{AccessKind, Operand};
use crate::sema::scope::ScopeKind;
use crate::sema::type_arena::{TypeId, TypeIdVec, TypeKind};
use crate::sema::types::PrimitiveKind;
use crate::sema::value::Value;

impl Typer {
    /// Central expression-resolution entry. Dispatches on expression kind,
    /// then checks the result against `expected` (exact equivalence, no
    /// implicit conversions) and memoizes the operand on the node.
    pub(super) fn resolve_expr(
        &mut self,
        expr: &Expr,
        expected: Option<TypeId>,
        cx: &mut ModuleCx,
    ) -> Operand {
        if let Some(cached) = self.operands.get(&expr.id) {
            return *cached;
        }

        let operand = match &expr.kind {
            ExprKind::Int(v) => self.resolve_int(expr, *v, expected),
            ExprKind::Float(v) => self.resolve_float(expr, *v, expected),
            ExprKind::Bool(v) => Operand::with_value(
                expr.id,
                TypeId::BOOL,
                AccessKind::RValue,
                Value::Bool(*v),
            ),
            ExprKind::Char(v) => Operand::with_value(
                expr.id,
                TypeId::CHAR,
                AccessKind::RValue,
                Value::Char(*v),
            ),
            ExprKind::Unit => Operand::new(expr.id, self.types.unit(), AccessKind::RValue),
            ExprKind::Name(name) => self.resolve_name(expr, *name, cx),
            ExprKind::SelfValue => self.resolve_self(expr, cx),
            ExprKind::Unary(unary) => self.resolve_unary(expr, unary, cx),
            ExprKind::Binary(binary) => self.resolve_binary(expr, binary, cx),
            ExprKind::Tuple(elems) => self.resolve_tuple(expr, elems, cx),
            ExprKind::StructLiteral(lit) => self.resolve_struct_literal(expr, lit, cx),
            ExprKind::Access(access) => self.resolve_access(expr, access, cx),
            ExprKind::TupleAccess(access) => self.resolve_tuple_access(expr, access, cx),
            ExprKind::Call(call) => self.resolve_call(expr, call, cx),
            ExprKind::MethodCall(call) => self.resolve_method_call(expr, call, cx),
            ExprKind::Block(block) => self.resolve_block(expr, block, expected, cx),
        };

        let operand = if operand.error {
            operand
        } else if let Some(expected) = expected {
            match operand.ty {
                Some(ty) if self.equivalent(ty, expected) => operand,
                Some(ty) => {
                    self.type_mismatch(expected, ty, expr.span, cx);
                    Operand::error(expr.id)
                }
                None => Operand::error(expr.id),
            }
        } else {
            operand
        };

        self.operands.insert(expr.id, operand);
        operand
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// Integer literals default to i64; an expected arithmetic kind is
    /// adopted when the value fits it.
    fn resolve_int(&mut self, expr: &Expr, v: i64, expected: Option<TypeId>) -> Operand {
        if let Some(kind) = expected
            .and_then(|t| self.types.primitive_kind(t))
            .filter(|k| k.is_arithmetic())
        {
            let value = Value::I64(v).cast(kind);
            if value.is_const() {
                let ty = self.types.primitive(kind);
                return Operand::with_value(expr.id, ty, AccessKind::RValue, value);
            }
        }
        Operand::with_value(expr.id, TypeId::I64, AccessKind::RValue, Value::I64(v))
    }

    fn resolve_float(&mut self, expr: &Expr, v: f64, expected: Option<TypeId>) -> Operand {
        if let Some(kind) = expected
            .and_then(|t| self.types.primitive_kind(t))
            .filter(|k| k.is_float())
        {
            let ty = self.types.primitive(kind);
            return Operand::with_value(expr.id, ty, AccessKind::RValue, Value::F64(v).cast(kind));
        }
        Operand::with_value(expr.id, TypeId::F64, AccessKind::RValue, Value::F64(v))
    }

    // ========================================================================
    // Names and self
    // ========================================================================

    fn resolve_name(&mut self, expr: &Expr, name: Symbol, cx: &mut ModuleCx) -> Operand {
        let Some(entity) = self.lookup(name, expr.span, cx) else {
            return Operand::error(expr.id);
        };
        let Some(entity) = self.resolve_entity(entity, cx) else {
            return Operand::error(expr.id);
        };
        let data = self.entities.get(entity);
        let Some(ty) = data.ty else {
            return Operand::error(expr.id);
        };
        let operand = match &data.kind {
            EntityKind::Local(local) => {
                let access = if local.is_self {
                    AccessKind::SelfAccess
                } else {
                    AccessKind::LValue
                };
                if let EntityKind::Local(local) = &mut self.entities.get_mut(entity).kind {
                    local.used = true;
                }
                Operand::new(expr.id, ty, access)
            }
            EntityKind::Global(_) => Operand::new(expr.id, ty, AccessKind::LValue),
            EntityKind::Constant(value) => {
                Operand::with_value(expr.id, ty, AccessKind::RValue, *value)
            }
            EntityKind::Function(_) => Operand::new(expr.id, ty, AccessKind::FunctionAccess),
            EntityKind::Alias | EntityKind::Type(_) | EntityKind::Module(_) => {
                Operand::new(expr.id, ty, AccessKind::TypeAccess)
            }
        };
        operand
    }

    fn resolve_self(&mut self, expr: &Expr, _cx: &mut ModuleCx) -> Operand {
        let Some(entity) = self.self_local else {
            self.add_error(
                SemanticError::SelfOutsideMethod {
                    span: expr.span.into(),
                },
                expr.span,
            );
            return Operand::error(expr.id);
        };
        match self.entities.get(entity).ty {
            Some(ty) => Operand::new(expr.id, ty, AccessKind::SelfAccess),
            None => Operand::error(expr.id),
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn resolve_unary(&mut self, expr: &Expr, unary: &UnaryExpr, cx: &mut ModuleCx) -> Operand {
        let operand = self.resolve_expr(&unary.operand, None, cx);
        if operand.error {
            return Operand::error(expr.id);
        }
        let Some(ty) = operand.ty else {
            return Operand::error(expr.id);
        };

        match unary.op {
            UnaryOp::Neg => match self.types.primitive_kind(ty).filter(|k| k.is_arithmetic()) {
                Some(kind) => {
                    let value = eval_unary(UnaryOp::Neg, kind, operand.value);
                    Operand::with_value(expr.id, ty, AccessKind::RValue, value)
                }
                None => self.unary_error(expr, unary, ty, cx),
            },
            UnaryOp::BitNot => match self.types.primitive_kind(ty).filter(|k| k.is_integer()) {
                Some(kind) => {
                    let value = eval_unary(UnaryOp::BitNot, kind, operand.value);
                    Operand::with_value(expr.id, ty, AccessKind::RValue, value)
                }
                None => self.unary_error(expr, unary, ty, cx),
            },
            UnaryOp::Not => {
                // Null test on pointers, logical not on bool
                if self.types.is_pointer(ty) {
                    Operand::new(expr.id, TypeId::BOOL, AccessKind::RValue)
                } else if self.types.is_bool(ty) {
                    let value = eval_unary(UnaryOp::Not, PrimitiveKind::Bool, operand.value);
                    Operand::with_value(expr.id, TypeId::BOOL, AccessKind::RValue, value)
                } else {
                    self.unary_error(expr, unary, ty, cx)
                }
            }
            UnaryOp::AddrOf => {
                if unary.operand.is_literal() {
                    self.add_error(
                        SemanticError::AddressOfLiteral {
                            span: expr.span.into(),
                        },
                        expr.span,
                    );
                    return Operand::error(expr.id);
                }
                let pointer = self.types.pointer(ty);
                Operand::new(expr.id, pointer, AccessKind::LValue)
            }
            UnaryOp::Deref => match self.types.get(ty) {
                TypeKind::Pointer(base) => Operand::new(expr.id, *base, AccessKind::LValue),
                _ => {
                    let found = self.type_display(ty, cx);
                    self.add_error(
                        SemanticError::DerefNonPointer {
                            found,
                            span: expr.span.into(),
                        },
                        expr.span,
                    );
                    Operand::error(expr.id)
                }
            },
        }
    }

    fn unary_error(
        &mut self,
        expr: &Expr,
        unary: &UnaryExpr,
        ty: TypeId,
        cx: &ModuleCx,
    ) -> Operand {
        let operand = self.type_display(ty, cx);
        self.add_error(
            SemanticError::InvalidUnaryOperand {
                op: unary.op.symbol().to_string(),
                operand,
                span: expr.span.into(),
            },
            expr.span,
        );
        Operand::error(expr.id)
    }

    /// Binary resolution classifies operands by capability (arithmetic,
    /// integer, pointer, bool) rather than concrete type. Mixed-width
    /// promotion is never performed; only a bare untyped literal operand
    /// is re-targeted onto the other side's kind when its value fits.
    fn resolve_binary(&mut self, expr: &Expr, binary: &BinaryExpr, cx: &mut ModuleCx) -> Operand {
        let lhs = self.resolve_expr(&binary.lhs, None, cx);
        let rhs = self.resolve_expr(&binary.rhs, None, cx);
        if lhs.error || rhs.error {
            return Operand::error(expr.id);
        }
        let (Some(lt), Some(rt)) = (lhs.ty, rhs.ty) else {
            return Operand::error(expr.id);
        };
        let op = binary.op;

        // Pointer arithmetic: pointer + integer yields the pointer type
        if matches!(op, BinaryOp::Add | BinaryOp::Sub)
            && self.types.is_pointer(lt)
            && self.types.primitive_kind(rt).is_some_and(|k| k.is_integer())
        {
            return Operand::new(expr.id, lt, AccessKind::RValue);
        }

        if op.is_logical() {
            if self.types.is_bool(lt) && self.types.is_bool(rt) {
                let value = self.fold(op, PrimitiveKind::Bool, lhs, rhs);
                return Operand::with_value(expr.id, TypeId::BOOL, AccessKind::RValue, value);
            }
            return self.binary_error(expr, binary, lt, rt, cx);
        }

        let (lhs, rhs) = self.harmonize_literals(binary, lhs, rhs);
        let (Some(lt), Some(rt)) = (lhs.ty, rhs.ty) else {
            return Operand::error(expr.id);
        };
        let (lk, rk) = (self.types.primitive_kind(lt), self.types.primitive_kind(rt));
        let Some(kind) = lk.filter(|k| Some(*k) == rk) else {
            return self.binary_error(expr, binary, lt, rt, cx);
        };

        if op.is_arithmetic() && kind.is_arithmetic()
            || op.is_bitwise() && kind.is_integer()
        {
            let value = self.fold(op, kind, lhs, rhs);
            return Operand::with_value(expr.id, lt, AccessKind::RValue, value);
        }
        if op.is_comparison() {
            let value = self.fold(op, kind, lhs, rhs);
            return Operand::with_value(expr.id, TypeId::BOOL, AccessKind::RValue, value);
        }
        self.binary_error(expr, binary, lt, rt, cx)
    }

    /// When exactly one operand is a bare untyped literal and the other has
    /// a different arithmetic kind, re-target the literal if its value fits.
    /// Named values never convert; a kind mismatch between them is reported
    /// by the caller as invalid operands.
    fn harmonize_literals(
        &mut self,
        binary: &BinaryExpr,
        lhs: Operand,
        rhs: Operand,
    ) -> (Operand, Operand) {
        let (lk, rk) = (
            lhs.ty.and_then(|t| self.types.primitive_kind(t)),
            rhs.ty.and_then(|t| self.types.primitive_kind(t)),
        );
        let (Some(lk), Some(rk)) = (lk, rk) else {
            return (lhs, rhs);
        };
        if lk == rk || !lk.is_arithmetic() || !rk.is_arithmetic() {
            return (lhs, rhs);
        }
        if binary.lhs.is_literal() && !binary.rhs.is_literal() {
            let cast = lhs.value.cast(rk);
            if cast.is_const() {
                let ty = self.types.primitive(rk);
                return (Operand::with_value(lhs.expr, ty, lhs.access, cast), rhs);
            }
        } else if binary.rhs.is_literal() && !binary.lhs.is_literal() {
            let cast = rhs.value.cast(lk);
            if cast.is_const() {
                let ty = self.types.primitive(lk);
                return (lhs, Operand::with_value(rhs.expr, ty, rhs.access, cast));
            }
        }
        (lhs, rhs)
    }

    /// Fold when both operands carry compile-time values; otherwise the
    /// result is a plain runtime operand.
    fn fold(&self, op: BinaryOp, kind: PrimitiveKind, lhs: Operand, rhs: Operand) -> Value {
        if lhs.is_const() && rhs.is_const() {
            eval_binary(op, kind, lhs.value, rhs.value)
        } else {
            Value::None
        }
    }

    fn binary_error(
        &mut self,
        expr: &Expr,
        binary: &BinaryExpr,
        lt: TypeId,
        rt: TypeId,
        cx: &ModuleCx,
    ) -> Operand {
        self.invalid_operands(binary.op.symbol(), lt, rt, expr.span, cx);
        Operand::error(expr.id)
    }

    // ========================================================================
    // Tuples and blocks
    // ========================================================================

    fn resolve_tuple(&mut self, expr: &Expr, elems: &[Expr], cx: &mut ModuleCx) -> Operand {
        let mut ids = TypeIdVec::new();
        let mut failed = false;
        for elem in elems {
            let operand = self.resolve_expr(elem, None, cx);
            match operand.ty {
                Some(ty) => ids.push(ty),
                None => failed = true,
            }
        }
        if failed {
            return Operand::error(expr.id);
        }
        let ty = self.types.tuple(ids);
        Operand::new(expr.id, ty, AccessKind::RValue)
    }

    fn resolve_block(
        &mut self,
        expr: &Expr,
        block: &Block,
        expected: Option<TypeId>,
        cx: &mut ModuleCx,
    ) -> Operand {
        let scope = self
            .scopes
            .alloc(ScopeKind::Block, None, Some(self.scope()));
        self.push_scope(scope);

        for stmt in &block.stmts {
            match stmt {
                Stmt::Let(stmt) => self.resolve_let(stmt, cx),
                Stmt::Expr(inner) => {
                    self.resolve_expr(inner, None, cx);
                }
                Stmt::Defer(inner) => {
                    let defer = self
                        .scopes
                        .alloc(ScopeKind::Defer, None, Some(self.scope()));
                    self.push_scope(defer);
                    self.resolve_expr(inner, None, cx);
                    self.pop_scope();
                }
            }
        }

        let operand = match &block.result {
            Some(result) => {
                let inner = self.resolve_expr(result, expected, cx);
                if inner.error {
                    Operand::error(expr.id)
                } else {
                    Operand {
                        expr: expr.id,
                        access: AccessKind::RValue,
                        ..inner
                    }
                }
            }
            None => Operand::new(expr.id, self.types.unit(), AccessKind::RValue),
        };

        self.pop_scope();
        operand
    }

    /// Locals are typed here, at their declaration; entity resolution for a
    /// local is a pass-through.
    fn resolve_let(&mut self, stmt: &LetStmt, cx: &mut ModuleCx) {
        let annotation = self.resolve_annotation_or_none(&stmt.ty, cx);
        let operand = self.resolve_expr(&stmt.init, annotation, cx);

        let scope = self.scope();
        if let Some(previous) = self.scopes.find(scope, stmt.name) {
            let previous_span = self.entities.get(previous).span;
            self.add_error(
                SemanticError::Redeclaration {
                    name: cx.interner.resolve(stmt.name).to_string(),
                    span: stmt.span.into(),
                    previous: previous_span.into(),
                },
                stmt.span,
            );
            return;
        }
        let Some(ty) = annotation.or(operand.ty) else {
            return;
        };
        let address = if self.types.is_reference_like(ty) {
            AddressKind::Reference
        } else {
            AddressKind::Value
        };
        let local = LocalEntity {
            address,
            initialized: true,
            ..LocalEntity::plain(stmt.mutable)
        };
        let entity =
            self.entities
                .alloc_resolved(stmt.name, EntityKind::Local(local), ty, scope, stmt.span);
        self.scopes.insert(scope, stmt.name, entity);
    }

    fn resolve_annotation_or_none(
        &mut self,
        spec: &Option<crate::frontend::ast::TypeSpec>,
        cx: &mut ModuleCx,
    ) -> Option<TypeId> {
        match spec {
            Some(spec) if !spec.is_infer() => self.resolve_spec(spec, cx),
            _ => None,
        }
    }
}
