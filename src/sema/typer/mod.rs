// src/sema/typer/mod.rs
//! The resolution engine: walks declarations and expressions, creates
//! entities, pushes and pops scopes, performs struct layout, resolves calls
//! and operators, and folds constants.

mod access;
mod call_args;
mod declarations;
mod errors;
mod expr;
mod layout;
#[cfg(test)]
mod tests;

use crate::errors::SemanticError;
use crate::frontend::ast::{Decl, ImplementDecl, Module, NodeId, Symbol};
use crate::frontend::{Interner, Span};
use crate::sema::entity::{EntityArena, EntityId, EntityKind, ResolveState};
use crate::sema::ice;
use crate::sema::operand::Operand;
use crate::sema::scope::{ScopeArena, ScopeId, ScopeKind};
use crate::sema::type_arena::{TypeArena, TypeId, TypeKind};
use crate::sema::type_defs::{TypeDefId, TypeDefKind, TypeDefs};
use crate::sema::types::PrimitiveKind;
use rustc_hash::FxHashMap;

/// A semantic error with the span it was reported at.
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    /// Create a new type error
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// Everything the typer produced for one module, for downstream consumers.
pub struct Resolved<'t> {
    pub scopes: &'t ScopeArena,
    pub entities: &'t EntityArena,
    pub types: &'t TypeArena,
    pub defs: &'t TypeDefs,
}

/// Per-module resolution context: the syntax tree, the declaration back-links
/// for entities created from it, grouped implementation blocks, and the
/// interner (mutable so layout can name synthesized padding members).
pub(super) struct ModuleCx<'m> {
    pub module: &'m Module,
    pub decls: FxHashMap<EntityId, &'m Decl>,
    pub impls: FxHashMap<Symbol, Vec<&'m ImplementDecl>>,
    pub interner: &'m mut Interner,
}

/// The resolution engine. One instance resolves one module tree; all scopes,
/// entities and types it creates live until it is dropped.
pub struct Typer {
    pub(super) scopes: ScopeArena,
    pub(super) entities: EntityArena,
    pub(super) types: TypeArena,
    pub(super) defs: TypeDefs,
    /// Well-known scope holding the primitive type entities; consulted as a
    /// fallback when the active-scope chain is exhausted
    prelude: Option<ScopeId>,
    /// Currently active lexical scope
    current: Option<ScopeId>,
    /// Implementation/trait target while resolving its members
    pub(super) self_def: Option<TypeDefId>,
    /// The `self` local of the method currently being resolved
    pub(super) self_local: Option<EntityId>,
    pub(super) errors: Vec<TypeError>,
    /// Per-pass operand memoization keyed by expression node
    pub(super) operands: FxHashMap<NodeId, Operand>,
}

impl Default for Typer {
    fn default() -> Self {
        Self::new()
    }
}

impl Typer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeArena::new(),
            entities: EntityArena::new(),
            types: TypeArena::new(),
            defs: TypeDefs::new(),
            prelude: None,
            current: None,
            self_def: None,
            self_local: None,
            errors: Vec::new(),
            operands: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Public surface
    // ========================================================================

    /// Resolve one top-level module tree. Resolution continues best-effort
    /// past errors; the module failed if any error was reported.
    #[tracing::instrument(skip_all)]
    pub fn resolve_module(
        &mut self,
        module: &Module,
        interner: &mut Interner,
    ) -> Result<EntityId, Vec<TypeError>> {
        let mut cx = ModuleCx {
            module,
            decls: FxHashMap::default(),
            impls: FxHashMap::default(),
            interner,
        };
        self.install_prelude(&mut cx);

        let scope = self
            .scopes
            .alloc(ScopeKind::Module, Some(module.name), None);
        let module_entity = self.entities.alloc(
            module.name,
            EntityKind::Module(scope),
            scope,
            module.span,
        );

        self.push_scope(scope);
        let mut top_level = Vec::new();
        for decl in &module.decls {
            if let Some(id) = self.collect_decl(decl, &mut cx) {
                top_level.push(id);
            }
        }
        for id in top_level {
            self.resolve_entity(id, &mut cx);
        }
        self.diagnose_orphan_impls(scope, &mut cx);
        self.pop_scope();

        let module_ty = self.types.intern(TypeKind::Module(scope));
        let data = self.entities.get_mut(module_entity);
        data.ty = Some(module_ty);
        data.status = ResolveState::Resolved;

        if self.errors.is_empty() {
            Ok(module_entity)
        } else {
            tracing::warn!(count = self.errors.len(), "module resolution failed");
            Err(self.errors.clone())
        }
    }

    /// Struct resolution consumes the implementation blocks attached to its
    /// target; anything left over has no struct to attach to.
    fn diagnose_orphan_impls(&mut self, scope: ScopeId, cx: &mut ModuleCx) {
        let mut orphans: Vec<&ImplementDecl> =
            cx.impls.drain().flat_map(|(_, blocks)| blocks).collect();
        orphans.sort_by_key(|imp| imp.span.start);
        for imp in orphans {
            let Some(target) = self.scopes.find(scope, imp.target) else {
                self.add_error(
                    SemanticError::UndeclaredIdentifier {
                        name: cx.interner.resolve(imp.target).to_string(),
                        span: imp.span.into(),
                    },
                    imp.span,
                );
                continue;
            };
            let what = match self.entities.get(target).kind {
                EntityKind::Type(def) => match self.defs.get(def).kind {
                    TypeDefKind::Sum => "implementing a sum type",
                    TypeDefKind::Trait => "implementing a trait",
                    TypeDefKind::Struct => "implementing a generic struct",
                },
                _ => {
                    self.add_error(
                        SemanticError::UnknownType {
                            name: cx.interner.resolve(imp.target).to_string(),
                            span: imp.span.into(),
                        },
                        imp.span,
                    );
                    continue;
                }
            };
            self.not_implemented(what, imp.span);
        }
    }

    /// The resolved program, for downstream consumers and tests.
    pub fn resolved(&self) -> Resolved<'_> {
        Resolved {
            scopes: &self.scopes,
            entities: &self.entities,
            types: &self.types,
            defs: &self.defs,
        }
    }

    pub fn types(&self) -> &TypeArena {
        &self.types
    }

    pub fn entities(&self) -> &EntityArena {
        &self.entities
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn defs(&self) -> &TypeDefs {
        &self.defs
    }

    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    /// The memoized operand for an expression node, if it was resolved.
    pub fn operand(&self, id: NodeId) -> Option<&Operand> {
        self.operands.get(&id)
    }

    // ========================================================================
    // Scope discipline
    // ========================================================================

    /// The active scope. Only valid while resolving.
    pub(super) fn scope(&self) -> ScopeId {
        match self.current {
            Some(scope) => scope,
            None => ice!("no active scope"),
        }
    }

    /// Enter a scope. Its parent must be the scope that was active when it
    /// was created; anything else is a compiler bug, not a recoverable error.
    pub(super) fn push_scope(&mut self, scope: ScopeId) {
        if self.scopes.get(scope).parent != self.current {
            ice!("scope pushed with a parent that is not the active scope");
        }
        self.current = Some(scope);
    }

    pub(super) fn pop_scope(&mut self) {
        match self.current {
            Some(scope) => self.current = self.scopes.get(scope).parent,
            None => ice!("scope popped with no active scope"),
        }
    }

    /// Chained lookup: active scope outward, then the prelude. The only
    /// place plain identifier lookup fails.
    pub(super) fn lookup(&mut self, name: Symbol, span: Span, cx: &mut ModuleCx) -> Option<EntityId> {
        if let Some(entity) = self.scopes.search_chain(self.scope(), name) {
            return Some(entity);
        }
        if let Some(prelude) = self.prelude {
            if let Some(entity) = self.scopes.find(prelude, name) {
                return Some(entity);
            }
        }
        self.add_error(
            SemanticError::UndeclaredIdentifier {
                name: cx.interner.resolve(name).to_string(),
                span: span.into(),
            },
            span,
        );
        None
    }

    // ========================================================================
    // Entity resolution dispatcher
    // ========================================================================

    /// Resolve an entity, memoized. Returns the resolved entity (normally
    /// the input itself; global resolution may substitute a constant) or
    /// `None` when it could not be typed - callers must propagate that
    /// instead of continuing with a missing type.
    pub(super) fn resolve_entity(&mut self, id: EntityId, cx: &mut ModuleCx) -> Option<EntityId> {
        match self.entities.get(id).status {
            ResolveState::Resolved => return Some(id),
            ResolveState::Resolving => {
                // A mid-resolution entity that already has its type is usable;
                // this is how member function bodies name their own type
                if self.entities.get(id).ty.is_some() {
                    return Some(id);
                }
                let data = self.entities.get(id);
                let (name, span) = (data.name, data.span);
                self.add_error(
                    SemanticError::CyclicDependency {
                        name: cx.interner.resolve(name).to_string(),
                        span: span.into(),
                    },
                    span,
                );
                return None;
            }
            ResolveState::Incomplete => {}
        }

        self.entities.get_mut(id).status = ResolveState::Resolving;
        let result = self.dispatch_entity(id, cx);
        // Resolved even on failure: "failed but terminated" is a valid state
        self.entities.get_mut(id).status = ResolveState::Resolved;
        result
    }

    fn dispatch_entity(&mut self, id: EntityId, cx: &mut ModuleCx) -> Option<EntityId> {
        if let Some(decl) = cx.decls.get(&id).copied() {
            return match decl {
                Decl::Global(global) => self.resolve_global(id, global, cx),
                Decl::Function(func) => self.resolve_function(id, func, cx),
                Decl::Struct(decl) => self.resolve_struct(id, decl, cx),
                Decl::Sum(decl) => self.resolve_sum(id, decl, cx),
                Decl::Trait(decl) => self.resolve_trait(id, decl, cx),
                Decl::Alias(decl) => self.resolve_alias(id, decl, cx),
                Decl::Implement(_) | Decl::Use(_) => {
                    ice!("declaration kind cannot own an entity")
                }
            };
        }
        match &self.entities.get(id).kind {
            // Locals are typed when created; resolution is a pass-through
            EntityKind::Local(_) => Some(id),
            kind => ice!("{} entity has no originating declaration", kind.describe()),
        }
    }

    // ========================================================================
    // Top-level collection
    // ========================================================================

    /// Create an (unresolved) entity for one top-level declaration and bind
    /// its name in the module scope. Implementation blocks attach to their
    /// target instead of owning an entity.
    fn collect_decl<'m>(&mut self, decl: &'m Decl, cx: &mut ModuleCx<'m>) -> Option<EntityId> {
        let (name, kind, span) = match decl {
            Decl::Global(g) => (g.name, EntityKind::Global(Default::default()), g.span),
            Decl::Function(f) => (f.name, EntityKind::Function(self.function_shell()), f.span),
            Decl::Struct(s) => {
                let def = self.alloc_def(
                    crate::sema::type_defs::TypeDefKind::Struct,
                    s.name,
                    !s.generics.is_empty(),
                );
                (s.name, EntityKind::Type(def), s.span)
            }
            Decl::Sum(s) => {
                let def = self.alloc_def(
                    crate::sema::type_defs::TypeDefKind::Sum,
                    s.name,
                    !s.generics.is_empty(),
                );
                (s.name, EntityKind::Type(def), s.span)
            }
            Decl::Trait(t) => {
                let def = self.alloc_def(
                    crate::sema::type_defs::TypeDefKind::Trait,
                    t.name,
                    !t.generics.is_empty(),
                );
                (t.name, EntityKind::Type(def), t.span)
            }
            Decl::Alias(a) => (a.name, EntityKind::Alias, a.span),
            Decl::Implement(imp) => {
                cx.impls.entry(imp.target).or_default().push(imp);
                return None;
            }
            // Declared by the parser but unimplemented in this core
            Decl::Use(_) => ice!("use declarations are not implemented"),
        };

        let scope = self.scope();
        if let Some(previous) = self.scopes.find(scope, name) {
            let previous_span = self.entities.get(previous).span;
            self.add_error(
                SemanticError::Redeclaration {
                    name: cx.interner.resolve(name).to_string(),
                    span: span.into(),
                    previous: previous_span.into(),
                },
                span,
            );
            return None;
        }

        let id = self.entities.alloc(name, kind, scope, span);
        self.scopes.insert(scope, name, id);
        cx.decls.insert(id, decl);
        Some(id)
    }

    fn alloc_def(
        &mut self,
        kind: crate::sema::type_defs::TypeDefKind,
        name: Symbol,
        polymorphic: bool,
    ) -> TypeDefId {
        // The declaration path is the named-scope chain at declaration time;
        // the member scope is attached during resolution.
        let path = self.scopes.path(self.scope());
        self.defs.alloc(kind, name, path, self.scope(), polymorphic)
    }

    // ========================================================================
    // Prelude
    // ========================================================================

    /// Install the well-known prelude scope holding one pre-resolved entity
    /// per primitive type.
    fn install_prelude(&mut self, cx: &mut ModuleCx) {
        if self.prelude.is_some() {
            return;
        }
        let prelude = self.scopes.alloc(ScopeKind::Module, None, None);
        for kind in PrimitiveKind::ALL {
            let name = cx.interner.intern(kind.name());
            let ty = self.types.primitive(kind);
            let entity =
                self.entities
                    .alloc_resolved(name, EntityKind::Alias, ty, prelude, Span::default());
            self.scopes.insert(prelude, name, entity);
        }
        self.prelude = Some(prelude);
    }

    // ========================================================================
    // Equivalence shorthand
    // ========================================================================

    pub(super) fn equivalent(&self, a: TypeId, b: TypeId) -> bool {
        self.types.equivalent(a, b, &self.defs)
    }
}
