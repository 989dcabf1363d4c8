// src/sema/typer/call_args.rs
//! Actual-argument binding for calls and struct literals.
//!
//! Both sites share one binder: a list of named slots (parameters or data
//! members), actuals bound positionally in order or by name in any order,
//! defaults filling the gaps, every slot bound exactly once.

use super::{ModuleCx, Typer};
use crate::errors::SemanticError;
use crate::frontend::ast::{Argument, CallExpr, Expr, ExprKind, StructLiteralExpr, Symbol};
use crate::frontend::Span;
use crate::sema::entity::{EntityId, EntityKind, VariadicKind};
use crate::sema::ice;
use crate::sema::operand::{AccessKind, Operand};
use crate::sema::type_arena::{TypeId, TypeKind};
use crate::sema::type_defs::TypeDefKind;

/// One bindable slot at a call or struct-literal site.
struct BindSlot {
    name: Symbol,
    ty: Option<TypeId>,
    /// Carries a default; binding may omit it
    initialized: bool,
}

impl Typer {
    /// `callee(args...)`. A plain name naming a function entity gets the
    /// full positional/named binder; any other callee is resolved as a value
    /// and must carry a function type.
    pub(super) fn resolve_call(&mut self, expr: &Expr, call: &CallExpr, cx: &mut ModuleCx) -> Operand {
        if let ExprKind::Name(name) = call.callee.kind {
            let Some(entity) = self.lookup(name, call.callee.span, cx) else {
                return Operand::error(expr.id);
            };
            let Some(entity) = self.resolve_entity(entity, cx) else {
                return Operand::error(expr.id);
            };
            if matches!(self.entities.get(entity).kind, EntityKind::Function(_)) {
                return self.bind_call_actuals(expr, entity, &call.args, cx);
            }
        }

        let callee = self.resolve_expr(&call.callee, None, cx);
        if callee.error {
            return Operand::error(expr.id);
        }
        let Some(callee_ty) = callee.ty else {
            return Operand::error(expr.id);
        };
        match self.types.get(callee_ty) {
            TypeKind::Function { params, ret } => {
                let params: Vec<TypeId> = params.to_vec();
                let ret = *ret;
                self.bind_fn_value(expr, &params, ret, &call.args, cx)
            }
            _ => {
                let ty = self.type_display(callee_ty, cx);
                self.add_error(
                    SemanticError::NotCallable {
                        ty,
                        span: expr.span.into(),
                    },
                    expr.span,
                );
                Operand::error(expr.id)
            }
        }
    }

    /// Bind actuals against a known function entity's parameter list.
    /// Defaults and a trailing variadic are honored; binding failures are
    /// diagnosed but the call still carries the return type.
    pub(super) fn bind_call_actuals(
        &mut self,
        expr: &Expr,
        entity: EntityId,
        args: &[Argument],
        cx: &mut ModuleCx,
    ) -> Operand {
        let data = self.entities.get(entity);
        let EntityKind::Function(func) = &data.kind else {
            ice!("call binder reached a non-function entity");
        };
        let variadic = func.variadic;
        let slots: Vec<BindSlot> = func
            .params
            .iter()
            .filter(|p| !p.is_self)
            .map(|p| BindSlot {
                name: p.name,
                ty: p.ty,
                initialized: p.initialized,
            })
            .collect();
        let owner = cx.interner.resolve(data.name).to_string();
        let Some(ret) = data.ty.map(|ty| match self.types.get(ty) {
            TypeKind::Function { ret, .. } => *ret,
            _ => ice!("function entity without a function type"),
        }) else {
            return Operand::error(expr.id);
        };

        self.bind_slots(&owner, &slots, args, variadic, expr.span, cx);
        Operand::new(expr.id, ret, AccessKind::RValue)
    }

    /// Positional-only binding through a function-typed value: exact arity,
    /// no names, no defaults.
    fn bind_fn_value(
        &mut self,
        expr: &Expr,
        params: &[TypeId],
        ret: TypeId,
        args: &[Argument],
        cx: &mut ModuleCx,
    ) -> Operand {
        if args.iter().any(|arg| arg.name.is_some()) {
            self.not_implemented("named argument binding through a function value", expr.span);
            return Operand::error(expr.id);
        }
        if args.len() != params.len() {
            self.add_error(
                SemanticError::WrongArgumentCount {
                    expected: params.len(),
                    found: args.len(),
                    span: expr.span.into(),
                },
                expr.span,
            );
            for arg in args {
                self.resolve_expr(&arg.value, None, cx);
            }
            return Operand::error(expr.id);
        }
        for (arg, &ty) in args.iter().zip(params) {
            self.resolve_expr(&arg.value, Some(ty), cx);
        }
        Operand::new(expr.id, ret, AccessKind::RValue)
    }

    /// `Name { args... }`. Binds over the definition's data members with the
    /// same binder as calls; synthesized padding members are not bindable.
    pub(super) fn resolve_struct_literal(
        &mut self,
        expr: &Expr,
        lit: &StructLiteralExpr,
        cx: &mut ModuleCx,
    ) -> Operand {
        let Some(entity) = self.lookup(lit.name, expr.span, cx) else {
            return Operand::error(expr.id);
        };
        let Some(entity) = self.resolve_entity(entity, cx) else {
            return Operand::error(expr.id);
        };
        let data = self.entities.get(entity);
        let EntityKind::Type(def) = data.kind else {
            self.add_error(
                SemanticError::UnknownType {
                    name: cx.interner.resolve(lit.name).to_string(),
                    span: expr.span.into(),
                },
                expr.span,
            );
            return Operand::error(expr.id);
        };
        let Some(ty) = data.ty else {
            return Operand::error(expr.id);
        };

        let def_data = self.defs.get(def);
        if def_data.polymorphic {
            self.not_implemented("generic type instantiation", expr.span);
            return Operand::error(expr.id);
        }
        match def_data.kind {
            TypeDefKind::Struct => {}
            TypeDefKind::Sum => {
                self.not_implemented("sum type construction", expr.span);
                return Operand::error(expr.id);
            }
            TypeDefKind::Trait => {
                self.not_implemented("trait construction", expr.span);
                return Operand::error(expr.id);
            }
        }

        let mut slots = Vec::new();
        for &member in &self.defs.get(def).members {
            let member = self.entities.get(member);
            if let EntityKind::Local(local) = &member.kind {
                if !local.synthetic {
                    slots.push(BindSlot {
                        name: member.name,
                        ty: member.ty,
                        initialized: local.initialized,
                    });
                }
            }
        }

        let owner = cx.interner.resolve(lit.name).to_string();
        self.bind_slots(&owner, &slots, &lit.args, None, expr.span, cx);
        Operand::new(expr.id, ty, AccessKind::RValue)
    }

    /// The shared binder. Positional actuals fill slots in order; named
    /// actuals bind their slot directly; a slot bound twice is diagnosed at
    /// both sites. Unbound slots must carry a default. Actuals beyond the
    /// slot list feed the variadic when one exists.
    fn bind_slots(
        &mut self,
        owner: &str,
        slots: &[BindSlot],
        args: &[Argument],
        variadic: Option<VariadicKind>,
        site: Span,
        cx: &mut ModuleCx,
    ) {
        let mut bound: Vec<Option<Span>> = vec![None; slots.len()];
        let mut positional = 0usize;
        let mut extra = 0usize;

        for arg in args {
            let slot = match arg.name {
                Some(name) => match slots.iter().position(|s| s.name == name) {
                    Some(slot) => slot,
                    None => {
                        self.add_error(
                            SemanticError::UnknownMember {
                                ty: owner.to_string(),
                                name: cx.interner.resolve(name).to_string(),
                                span: arg.span.into(),
                            },
                            arg.span,
                        );
                        self.resolve_expr(&arg.value, None, cx);
                        continue;
                    }
                },
                None => {
                    if positional < slots.len() {
                        let slot = positional;
                        positional += 1;
                        slot
                    } else {
                        extra += 1;
                        let expected = match variadic {
                            Some(VariadicKind::Typed(elem)) => Some(elem),
                            Some(VariadicKind::C) | None => None,
                        };
                        self.resolve_expr(&arg.value, expected, cx);
                        continue;
                    }
                }
            };

            if let Some(first) = bound[slot] {
                self.add_error(
                    SemanticError::ParameterRebound {
                        name: cx.interner.resolve(slots[slot].name).to_string(),
                        span: arg.span.into(),
                        first: first.into(),
                    },
                    arg.span,
                );
                self.resolve_expr(&arg.value, None, cx);
                continue;
            }
            bound[slot] = Some(arg.span);
            self.resolve_expr(&arg.value, slots[slot].ty, cx);
        }

        if extra > 0 && variadic.is_none() {
            self.add_error(
                SemanticError::WrongArgumentCount {
                    expected: slots.len(),
                    found: slots.len() + extra,
                    span: site.into(),
                },
                site,
            );
        }
        for (slot, bound) in slots.iter().zip(&bound) {
            if bound.is_none() && !slot.initialized {
                self.add_error(
                    SemanticError::FieldNotInitialized {
                        name: cx.interner.resolve(slot.name).to_string(),
                        span: site.into(),
                    },
                    site,
                );
            }
        }
    }
}
