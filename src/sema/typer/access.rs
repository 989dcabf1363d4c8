// src/sema/typer/access.rs
//! Member access, tuple indexing and method calls.

use super::{ModuleCx, Typer};
use crate::errors::SemanticError;
use crate::frontend::ast::{AccessExpr, Expr, MethodCallExpr, TupleAccessExpr};
use crate::sema::entity::EntityKind;
use crate::sema::operand::{AccessKind, Operand};
use crate::sema::type_arena::{TypeId, TypeKind};
use crate::sema::type_defs::TypeDefId;

impl Typer {
    /// `base.field` over a struct value or type. One level of pointer or
    /// reference indirection on the base is looked through.
    pub(super) fn resolve_access(
        &mut self,
        expr: &Expr,
        access: &AccessExpr,
        cx: &mut ModuleCx,
    ) -> Operand {
        let base = self.resolve_expr(&access.base, None, cx);
        if base.error {
            return Operand::error(expr.id);
        }
        let Some(base_ty) = base.ty else {
            return Operand::error(expr.id);
        };

        let Some(def) = self.member_target(expr, base_ty, cx) else {
            return Operand::error(expr.id);
        };

        let scope = self.defs.get(def).scope;
        let Some(member) = self.scopes.find(scope, access.field) else {
            let ty = self.type_display(base_ty, cx);
            self.add_error(
                SemanticError::UnknownMember {
                    ty,
                    name: cx.interner.resolve(access.field).to_string(),
                    span: access.field_span.into(),
                },
                access.field_span,
            );
            return Operand::error(expr.id);
        };
        let Some(member) = self.resolve_entity(member, cx) else {
            return Operand::error(expr.id);
        };

        let data = self.entities.get(member);
        let Some(member_ty) = data.ty else {
            return Operand::error(expr.id);
        };
        match &data.kind {
            EntityKind::Local(local) => {
                if base.access == AccessKind::TypeAccess {
                    self.add_error(
                        SemanticError::StaticFieldAccess {
                            name: cx.interner.resolve(access.field).to_string(),
                            span: access.field_span.into(),
                        },
                        access.field_span,
                    );
                    return Operand::error(expr.id);
                }
                if !local.public && base.access != AccessKind::SelfAccess {
                    self.add_error(
                        SemanticError::PrivateField {
                            name: cx.interner.resolve(access.field).to_string(),
                            span: access.field_span.into(),
                        },
                        access.field_span,
                    );
                    return Operand::error(expr.id);
                }
                Operand::new(expr.id, member_ty, AccessKind::LValue)
            }
            EntityKind::Constant(value) => {
                Operand::with_value(expr.id, member_ty, AccessKind::RValue, *value)
            }
            EntityKind::Function(_) => Operand::new(expr.id, member_ty, AccessKind::FunctionAccess),
            _ => {
                let ty = self.type_display(base_ty, cx);
                self.add_error(
                    SemanticError::UnknownMember {
                        ty,
                        name: cx.interner.resolve(access.field).to_string(),
                        span: access.field_span.into(),
                    },
                    access.field_span,
                );
                Operand::error(expr.id)
            }
        }
    }

    /// The struct definition whose member scope an access resolves through,
    /// or `None` with a diagnostic.
    fn member_target(&mut self, expr: &Expr, base_ty: TypeId, cx: &ModuleCx) -> Option<TypeDefId> {
        let stripped = self.types.strip_indirection(base_ty);
        let stripped = self.types.strip_mutable(stripped);
        match self.types.get(stripped) {
            TypeKind::Struct(def) => Some(*def),
            TypeKind::Sum(_) => {
                self.not_implemented("sum type member access", expr.span);
                None
            }
            TypeKind::Trait(_) => {
                self.not_implemented("trait member access", expr.span);
                None
            }
            _ => {
                let found = self.type_display(base_ty, cx);
                self.add_error(
                    SemanticError::AccessNonStruct {
                        found,
                        span: expr.span.into(),
                    },
                    expr.span,
                );
                None
            }
        }
    }

    /// `base.N` over a tuple value.
    pub(super) fn resolve_tuple_access(
        &mut self,
        expr: &Expr,
        access: &TupleAccessExpr,
        cx: &mut ModuleCx,
    ) -> Operand {
        let base = self.resolve_expr(&access.base, None, cx);
        if base.error {
            return Operand::error(expr.id);
        }
        let Some(base_ty) = base.ty else {
            return Operand::error(expr.id);
        };

        let stripped = self.types.strip_indirection(base_ty);
        let TypeKind::Tuple(elems) = self.types.get(stripped) else {
            let found = self.type_display(base_ty, cx);
            self.add_error(
                SemanticError::AccessNonStruct {
                    found,
                    span: expr.span.into(),
                },
                expr.span,
            );
            return Operand::error(expr.id);
        };
        let Some(elem) = elems.get(access.index).copied() else {
            let ty = self.type_display(base_ty, cx);
            self.add_error(
                SemanticError::TupleIndexOutOfBounds {
                    index: access.index,
                    ty,
                    span: access.index_span.into(),
                },
                access.index_span,
            );
            return Operand::error(expr.id);
        };

        let access_kind = match base.access {
            AccessKind::LValue | AccessKind::SelfAccess => AccessKind::LValue,
            _ => AccessKind::RValue,
        };
        Operand::new(expr.id, elem, access_kind)
    }

    /// `recv.method(args)`. Only the static form - a type name as the
    /// receiver - is bound here; dispatch on a value receiver is an explicit
    /// gap.
    pub(super) fn resolve_method_call(
        &mut self,
        expr: &Expr,
        call: &MethodCallExpr,
        cx: &mut ModuleCx,
    ) -> Operand {
        let receiver = self.resolve_expr(&call.receiver, None, cx);
        if receiver.error {
            return Operand::error(expr.id);
        }
        let Some(receiver_ty) = receiver.ty else {
            return Operand::error(expr.id);
        };

        if receiver.access != AccessKind::TypeAccess {
            self.not_implemented("received method dispatch", expr.span);
            return Operand::error(expr.id);
        }

        let Some(def) = self.member_target(expr, receiver_ty, cx) else {
            return Operand::error(expr.id);
        };
        let scope = self.defs.get(def).scope;
        let Some(member) = self.scopes.find(scope, call.method) else {
            let ty = self.type_display(receiver_ty, cx);
            self.add_error(
                SemanticError::UnknownMember {
                    ty,
                    name: cx.interner.resolve(call.method).to_string(),
                    span: call.method_span.into(),
                },
                call.method_span,
            );
            return Operand::error(expr.id);
        };
        let Some(member) = self.resolve_entity(member, cx) else {
            return Operand::error(expr.id);
        };

        match &self.entities.get(member).kind {
            EntityKind::Function(func) if func.is_static => {
                self.bind_call_actuals(expr, member, &call.args, cx)
            }
            EntityKind::Function(_) => {
                self.add_error(
                    SemanticError::NotStaticMethod {
                        name: cx.interner.resolve(call.method).to_string(),
                        span: call.method_span.into(),
                    },
                    call.method_span,
                );
                Operand::error(expr.id)
            }
            _ => {
                self.add_error(
                    SemanticError::StaticFieldAccess {
                        name: cx.interner.resolve(call.method).to_string(),
                        span: call.method_span.into(),
                    },
                    call.method_span,
                );
                Operand::error(expr.id)
            }
        }
    }
}
