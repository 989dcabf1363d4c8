// src/sema/typer/declarations.rs
//! Declaration resolvers: globals, functions, structs, sum types, traits
//! and aliases, plus type-annotation ("spec") resolution.

use super::{ModuleCx, Typer};
use crate::errors::SemanticError;
use crate::frontend::ast::{
    AliasDecl, FieldDecl, FunctionDecl, GlobalDecl, ParamDecl, StructDecl, SumDecl, TraitDecl,
    TypeSpec,
};
use crate::sema::entity::{
    AddressKind, EntityId, EntityKind, FunctionEntity, LocalEntity, ParamInfo, ResolveState,
    VariadicKind,
};
use crate::sema::ice;
use crate::sema::scope::{ScopeId, ScopeKind};
use crate::sema::type_arena::{TypeId, TypeIdVec, TypeKind};
use crate::sema::type_defs::{TypeDefId, TypeDefKind, VariantDef};

impl Typer {
    // ========================================================================
    // Type annotations
    // ========================================================================

    /// Resolve a type annotation to an interned type. `None` means the
    /// annotation could not be resolved (already diagnosed) or was the
    /// explicit `Infer` marker.
    pub(super) fn resolve_spec(&mut self, spec: &TypeSpec, cx: &mut ModuleCx) -> Option<TypeId> {
        self.resolve_spec_in(spec, cx, false)
    }

    /// `indirect` is true once the annotation passed through a pointer,
    /// reference or dynamic-array layer: behind indirection a nominal type's
    /// identity suffices, so a mid-resolution struct may name itself.
    fn resolve_spec_in(
        &mut self,
        spec: &TypeSpec,
        cx: &mut ModuleCx,
        indirect: bool,
    ) -> Option<TypeId> {
        match spec {
            TypeSpec::Named { name, span } => {
                let entity = self.lookup(*name, *span, cx)?;
                if indirect {
                    if let EntityKind::Type(def) = self.entities.get(entity).kind {
                        return Some(self.def_type(def));
                    }
                }
                let entity = self.resolve_entity(entity, cx)?;
                let data = self.entities.get(entity);
                match &data.kind {
                    EntityKind::Alias | EntityKind::Type(_) => data.ty,
                    _ => {
                        self.add_error(
                            SemanticError::UnknownType {
                                name: cx.interner.resolve(*name).to_string(),
                                span: (*span).into(),
                            },
                            *span,
                        );
                        None
                    }
                }
            }
            TypeSpec::NamedGeneric { span, .. } => {
                self.not_implemented("polymorphic type application", *span);
                None
            }
            TypeSpec::Tuple { elems, span: _ } => {
                let mut ids = TypeIdVec::new();
                for elem in elems {
                    // Tuples contain their elements by value
                    ids.push(self.resolve_spec_in(elem, cx, indirect)?);
                }
                Some(self.types.tuple(ids))
            }
            TypeSpec::FixedList { elem, len, .. } => {
                let elem = self.resolve_spec_in(elem, cx, indirect)?;
                Some(self.types.fixed_array(elem, *len))
            }
            TypeSpec::DynList { elem, .. } => {
                let elem = self.resolve_spec_in(elem, cx, true)?;
                Some(self.types.dyn_array(elem))
            }
            TypeSpec::Pointer { base, .. } => {
                let base = self.resolve_spec_in(base, cx, true)?;
                Some(self.types.pointer(base))
            }
            TypeSpec::Reference { base, .. } => {
                let base = self.resolve_spec_in(base, cx, true)?;
                Some(self.types.reference(base))
            }
            TypeSpec::Mutable { base, .. } => {
                let base = self.resolve_spec_in(base, cx, indirect)?;
                Some(self.types.mutable(base))
            }
            TypeSpec::SelfType { span } => match self.self_def {
                Some(def) => Some(self.def_type(def)),
                None => {
                    self.add_error(
                        SemanticError::SelfOutsideMethod { span: (*span).into() },
                        *span,
                    );
                    None
                }
            },
            TypeSpec::Proc { params, ret, .. } => {
                // Function values reference their signature types, never
                // embed them
                let mut ids = TypeIdVec::new();
                for param in params {
                    ids.push(self.resolve_spec_in(param, cx, true)?);
                }
                let ret = match ret {
                    Some(ret) => self.resolve_spec_in(ret, cx, true)?,
                    None => self.types.unit(),
                };
                Some(self.types.function(ids, ret))
            }
            // Absence of an annotation; the caller decides what that means
            TypeSpec::Infer { .. } => None,
            TypeSpec::Unit { .. } => Some(self.types.unit()),
        }
    }

    /// Resolve an optional annotation, distinguishing "absent" from
    /// "present but failed" (the failure is already diagnosed).
    fn resolve_annotation(
        &mut self,
        spec: &Option<TypeSpec>,
        cx: &mut ModuleCx,
    ) -> Result<Option<TypeId>, ()> {
        match spec {
            Some(spec) if !spec.is_infer() => match self.resolve_spec(spec, cx) {
                Some(ty) => Ok(Some(ty)),
                None => Err(()),
            },
            _ => Ok(None),
        }
    }

    /// The interned type for a nominal definition.
    pub(super) fn def_type(&mut self, def: TypeDefId) -> TypeId {
        let data = self.defs.get(def);
        let kind = match (data.kind, data.polymorphic) {
            (TypeDefKind::Struct, false) => TypeKind::Struct(def),
            (TypeDefKind::Struct, true) => TypeKind::PolyStruct(def),
            (TypeDefKind::Sum, false) => TypeKind::Sum(def),
            (TypeDefKind::Sum, true) => TypeKind::PolySum(def),
            (TypeDefKind::Trait, false) => TypeKind::Trait(def),
            (TypeDefKind::Trait, true) => TypeKind::PolyTrait(def),
        };
        self.types.intern(kind)
    }

    // ========================================================================
    // Globals
    // ========================================================================

    /// Resolve a module-level binding. An immutable global whose initializer
    /// folds to a compile-time value is replaced in its scope by a fresh
    /// constant entity - the engine's only entity-kind lowering.
    pub(super) fn resolve_global(
        &mut self,
        id: EntityId,
        global: &GlobalDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        let annotation = match self.resolve_annotation(&global.ty, cx) {
            Ok(ty) => ty,
            Err(()) => {
                // Best-effort continuation: the initializer's errors should
                // still surface in the same pass
                if let Some(expr) = &global.init {
                    self.resolve_expr(expr, None, cx);
                }
                return None;
            }
        };

        if global.init.is_none() {
            if annotation.is_none() {
                self.add_error(
                    SemanticError::MissingAnnotation {
                        name: cx.interner.resolve(global.name).to_string(),
                        span: global.span.into(),
                    },
                    global.span,
                );
                return None;
            }
            // Mutable globals may omit the initializer when annotated
            if !global.mutable {
                self.add_error(
                    SemanticError::MissingInitializer {
                        name: cx.interner.resolve(global.name).to_string(),
                        span: global.span.into(),
                    },
                    global.span,
                );
                return None;
            }
        }

        let init = global
            .init
            .as_ref()
            .map(|expr| self.resolve_expr(expr, annotation, cx));
        if let Some(op) = &init {
            if op.error {
                return None;
            }
        }

        let ty = annotation.or_else(|| init.as_ref().and_then(|op| op.ty))?;

        if let Some(op) = init {
            if !global.mutable && op.is_const() {
                let scope = self.entities.get(id).scope;
                let constant = self.entities.alloc_resolved(
                    global.name,
                    EntityKind::Constant(op.value),
                    ty,
                    scope,
                    global.span,
                );
                self.scopes.rebind(scope, global.name, constant);
                tracing::trace!(name = cx.interner.resolve(global.name), "global promoted to constant");
                return Some(constant);
            }
        }

        let address = if self.types.is_reference_like(ty) {
            AddressKind::Reference
        } else {
            AddressKind::Value
        };
        let data = self.entities.get_mut(id);
        data.ty = Some(ty);
        match &mut data.kind {
            EntityKind::Global(g) => {
                g.mutable = global.mutable;
                g.initialized = global.init.is_some();
                g.address = address;
            }
            kind => ice!("global resolver reached a {} entity", kind.describe()),
        }
        Some(id)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub(super) fn function_shell(&self) -> FunctionEntity {
        FunctionEntity {
            params: Vec::new(),
            scope: self.scope(),
            is_static: false,
            is_method: false,
            is_foreign: false,
            has_body: false,
            variadic: None,
        }
    }

    pub(super) fn resolve_function(
        &mut self,
        id: EntityId,
        func: &FunctionDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        self.resolve_function_in(id, func, cx, false, false)
    }

    /// Resolve a function declaration. `in_impl` marks members of
    /// implementation blocks (enabling `self` and static classification);
    /// `allow_bodyless` marks trait members, whose bodies may be absent.
    pub(super) fn resolve_function_in(
        &mut self,
        id: EntityId,
        func: &FunctionDecl,
        cx: &mut ModuleCx,
        in_impl: bool,
        allow_bodyless: bool,
    ) -> Option<EntityId> {
        let param_scope = self
            .scopes
            .alloc(ScopeKind::Parameter, Some(func.name), Some(self.scope()));
        self.push_scope(param_scope);

        let mut params: Vec<ParamInfo> = Vec::new();
        let mut param_types = TypeIdVec::new();
        let mut variadic: Option<(VariadicKind, crate::frontend::Span)> = None;
        let mut is_method = false;
        let mut self_entity: Option<EntityId> = None;

        for (index, param) in func.params.iter().enumerate() {
            // Both variadic forms must be syntactically last
            if let Some((_, span)) = variadic {
                self.add_error(SemanticError::VariadicNotLast { span: span.into() }, span);
                variadic = None;
            }
            match param {
                ParamDecl::Named {
                    name,
                    ty,
                    default,
                    span,
                } => {
                    if ty.as_ref().map_or(true, |t| t.is_infer()) && default.is_none() {
                        self.add_error(
                            SemanticError::ParameterUntyped {
                                name: cx.interner.resolve(*name).to_string(),
                                span: (*span).into(),
                            },
                            *span,
                        );
                        continue;
                    }
                    if let Some(previous) = self.scopes.find(param_scope, *name) {
                        let previous_span = self.entities.get(previous).span;
                        self.add_error(
                            SemanticError::Redeclaration {
                                name: cx.interner.resolve(*name).to_string(),
                                span: (*span).into(),
                                previous: previous_span.into(),
                            },
                            *span,
                        );
                        continue;
                    }
                    let annotation = match self.resolve_annotation(ty, cx) {
                        Ok(ann) => ann,
                        Err(()) => continue,
                    };
                    let default_op = default
                        .as_ref()
                        .map(|expr| self.resolve_expr(expr, annotation, cx));
                    let Some(param_ty) =
                        annotation.or_else(|| default_op.as_ref().and_then(|op| op.ty))
                    else {
                        continue;
                    };
                    let local = LocalEntity {
                        is_parameter: true,
                        initialized: default.is_some(),
                        ..LocalEntity::plain(false)
                    };
                    let entity = self.entities.alloc_resolved(
                        *name,
                        EntityKind::Local(local),
                        param_ty,
                        param_scope,
                        *span,
                    );
                    self.scopes.insert(param_scope, *name, entity);
                    param_types.push(param_ty);
                    params.push(ParamInfo {
                        name: *name,
                        entity,
                        ty: Some(param_ty),
                        initialized: default.is_some(),
                        is_self: false,
                        span: *span,
                    });
                }
                ParamDecl::SelfParam { mutable, span } => {
                    if index != 0 {
                        self.add_error(SemanticError::SelfNotFirst { span: (*span).into() }, *span);
                        continue;
                    }
                    let Some(def) = self.self_def else {
                        self.add_error(
                            SemanticError::SelfOutsideMethod { span: (*span).into() },
                            *span,
                        );
                        continue;
                    };
                    is_method = true;
                    let owner = self.def_type(def);
                    let inner = if *mutable {
                        self.types.mutable(owner)
                    } else {
                        owner
                    };
                    let self_ty = self.types.reference(inner);
                    let name = cx.interner.intern("self");
                    let local = LocalEntity {
                        address: AddressKind::Reference,
                        is_parameter: true,
                        is_self: true,
                        initialized: true,
                        ..LocalEntity::plain(*mutable)
                    };
                    let entity = self.entities.alloc_resolved(
                        name,
                        EntityKind::Local(local),
                        self_ty,
                        param_scope,
                        *span,
                    );
                    self.scopes.insert(param_scope, name, entity);
                    self_entity = Some(entity);
                    param_types.push(self_ty);
                    params.push(ParamInfo {
                        name,
                        entity,
                        ty: Some(self_ty),
                        initialized: true,
                        is_self: true,
                        span: *span,
                    });
                }
                ParamDecl::CVariadic { span } => {
                    variadic = Some((VariadicKind::C, *span));
                }
                ParamDecl::Variadic { name, ty, span } => {
                    if let Some(previous) = self.scopes.find(param_scope, *name) {
                        let previous_span = self.entities.get(previous).span;
                        self.add_error(
                            SemanticError::Redeclaration {
                                name: cx.interner.resolve(*name).to_string(),
                                span: (*span).into(),
                                previous: previous_span.into(),
                            },
                            *span,
                        );
                        continue;
                    }
                    let elem = match self.resolve_annotation(ty, cx) {
                        Ok(Some(elem)) => elem,
                        Ok(None) => {
                            // Element-type inference for typed variadics is
                            // unspecified
                            self.not_implemented("variadic element type inference", *span);
                            continue;
                        }
                        Err(()) => continue,
                    };
                    let array_ty = self.types.dyn_array(elem);
                    let local = LocalEntity {
                        address: AddressKind::Reference,
                        is_parameter: true,
                        is_variadic: true,
                        initialized: true,
                        ..LocalEntity::plain(false)
                    };
                    let entity = self.entities.alloc_resolved(
                        *name,
                        EntityKind::Local(local),
                        array_ty,
                        param_scope,
                        *span,
                    );
                    self.scopes.insert(param_scope, *name, entity);
                    variadic = Some((VariadicKind::Typed(elem), *span));
                }
            }
        }

        let return_ty = match self.resolve_annotation(&func.return_type, cx) {
            Ok(Some(ty)) => ty,
            _ => self.types.unit(),
        };
        let fn_ty = self.types.function(param_types, return_ty);

        if let Some(body) = &func.body {
            let previous_self = self.self_local.take();
            if is_method {
                self.self_local = self_entity;
            }
            self.resolve_expr(body, Some(return_ty), cx);
            self.self_local = previous_self;
        } else if !func.is_foreign && !allow_bodyless {
            self.add_error(
                SemanticError::MissingBody {
                    name: cx.interner.resolve(func.name).to_string(),
                    span: func.span.into(),
                },
                func.span,
            );
        }

        self.pop_scope();

        let data = self.entities.get_mut(id);
        data.ty = Some(fn_ty);
        match &mut data.kind {
            EntityKind::Function(f) => {
                f.params = params;
                f.scope = param_scope;
                f.is_method = is_method;
                f.is_static = in_impl && !is_method;
                f.is_foreign = func.is_foreign;
                f.has_body = func.body.is_some();
                f.variadic = variadic.map(|(kind, _)| kind);
            }
            kind => ice!("function resolver reached a {} entity", kind.describe()),
        }
        Some(id)
    }

    // ========================================================================
    // Structs
    // ========================================================================

    pub(super) fn resolve_struct(
        &mut self,
        id: EntityId,
        decl: &StructDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        let EntityKind::Type(def) = self.entities.get(id).kind else {
            ice!("struct resolver reached a non-type entity");
        };

        // Polymorphic declarations stay shells: no member resolution
        if self.defs.get(def).polymorphic {
            let ty = self.def_type(def);
            self.entities.get_mut(id).ty = Some(ty);
            return Some(id);
        }

        let member_scope = self
            .scopes
            .alloc(ScopeKind::Member, Some(decl.name), Some(self.scope()));
        self.defs.get_mut(def).scope = member_scope;

        self.push_scope(member_scope);
        let mut members = Vec::new();
        for field in &decl.members {
            if let Some(entity) = self.resolve_field(field, member_scope, cx) {
                members.push(entity);
            }
        }
        self.pop_scope();

        let ty = self.def_type(def);
        self.entities.get_mut(id).ty = Some(ty);

        // Layout over the data members; padding entities are spliced in
        let members = self.layout_struct(def, members, member_scope, cx);
        self.defs.get_mut(def).members = members;

        // Attach implementation-block members after layout (functions are
        // excluded from layout)
        if let Some(impls) = cx.impls.remove(&decl.name) {
            self.push_scope(member_scope);
            let previous_def = self.self_def.replace(def);
            for imp in impls {
                for func in &imp.functions {
                    if let Some(entity) = self.attach_member_function(func, member_scope, cx, false)
                    {
                        self.defs.get_mut(def).members.push(entity);
                    }
                }
            }
            self.self_def = previous_def;
            self.pop_scope();
        }

        Some(id)
    }

    /// Resolve one member variable of a struct (or sum variant) into the
    /// active member scope.
    fn resolve_field(
        &mut self,
        field: &FieldDecl,
        scope: ScopeId,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        if let Some(previous) = self.scopes.find(scope, field.name) {
            let previous_span = self.entities.get(previous).span;
            self.add_error(
                SemanticError::Redeclaration {
                    name: cx.interner.resolve(field.name).to_string(),
                    span: field.span.into(),
                    previous: previous_span.into(),
                },
                field.span,
            );
            return None;
        }
        let annotation = self.resolve_annotation(&field.ty, cx).ok()?;
        let default_op = field
            .default
            .as_ref()
            .map(|expr| self.resolve_expr(expr, annotation, cx));
        let Some(ty) = annotation.or_else(|| default_op.as_ref().and_then(|op| op.ty)) else {
            if field.ty.as_ref().map_or(true, |t| t.is_infer()) && field.default.is_none() {
                self.add_error(
                    SemanticError::FieldUntyped {
                        name: cx.interner.resolve(field.name).to_string(),
                        span: field.span.into(),
                    },
                    field.span,
                );
            }
            return None;
        };
        let local = LocalEntity {
            public: field.public,
            initialized: field.default.is_some(),
            ..LocalEntity::plain(true)
        };
        let entity =
            self.entities
                .alloc_resolved(field.name, EntityKind::Local(local), ty, scope, field.span);
        self.scopes.insert(scope, field.name, entity);
        Some(entity)
    }

    /// Create and resolve a member function entity inside a member scope.
    fn attach_member_function(
        &mut self,
        func: &FunctionDecl,
        scope: ScopeId,
        cx: &mut ModuleCx,
        allow_bodyless: bool,
    ) -> Option<EntityId> {
        if let Some(previous) = self.scopes.find(scope, func.name) {
            let previous_span = self.entities.get(previous).span;
            self.add_error(
                SemanticError::Redeclaration {
                    name: cx.interner.resolve(func.name).to_string(),
                    span: func.span.into(),
                    previous: previous_span.into(),
                },
                func.span,
            );
            return None;
        }
        let entity = self.entities.alloc(
            func.name,
            EntityKind::Function(self.function_shell()),
            scope,
            func.span,
        );
        self.scopes.insert(scope, func.name, entity);

        self.entities.get_mut(entity).status = ResolveState::Resolving;
        self.resolve_function_in(entity, func, cx, true, allow_bodyless);
        self.entities.get_mut(entity).status = ResolveState::Resolved;
        Some(entity)
    }

    // ========================================================================
    // Sum types and traits
    // ========================================================================

    pub(super) fn resolve_sum(
        &mut self,
        id: EntityId,
        decl: &SumDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        let EntityKind::Type(def) = self.entities.get(id).kind else {
            ice!("sum resolver reached a non-type entity");
        };
        if self.defs.get(def).polymorphic {
            let ty = self.def_type(def);
            self.entities.get_mut(id).ty = Some(ty);
            return Some(id);
        }

        let member_scope = self
            .scopes
            .alloc(ScopeKind::Member, Some(decl.name), Some(self.scope()));
        self.defs.get_mut(def).scope = member_scope;

        self.push_scope(member_scope);
        let mut variants = Vec::new();
        for variant in &decl.variants {
            // Each variant gets its own member scope so field names may
            // repeat across variants
            let variant_scope =
                self.scopes
                    .alloc(ScopeKind::Member, Some(variant.name), Some(member_scope));
            self.push_scope(variant_scope);
            let mut fields = Vec::new();
            for field in &variant.fields {
                if let Some(entity) = self.resolve_field(field, variant_scope, cx) {
                    fields.push(entity);
                }
            }
            self.pop_scope();
            variants.push(VariantDef {
                name: variant.name,
                fields,
            });
        }
        self.pop_scope();

        self.defs.get_mut(def).variants = variants;
        let ty = self.def_type(def);
        self.entities.get_mut(id).ty = Some(ty);
        Some(id)
    }

    pub(super) fn resolve_trait(
        &mut self,
        id: EntityId,
        decl: &TraitDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        let EntityKind::Type(def) = self.entities.get(id).kind else {
            ice!("trait resolver reached a non-type entity");
        };
        if self.defs.get(def).polymorphic {
            let ty = self.def_type(def);
            self.entities.get_mut(id).ty = Some(ty);
            return Some(id);
        }

        let member_scope = self
            .scopes
            .alloc(ScopeKind::Member, Some(decl.name), Some(self.scope()));
        self.defs.get_mut(def).scope = member_scope;
        let ty = self.def_type(def);
        self.entities.get_mut(id).ty = Some(ty);

        self.push_scope(member_scope);
        let previous_def = self.self_def.replace(def);
        let mut members = Vec::new();
        for func in &decl.members {
            // Declared-but-undefined members are valid for traits
            if let Some(entity) = self.attach_member_function(func, member_scope, cx, true) {
                members.push(entity);
            }
        }
        self.self_def = previous_def;
        self.pop_scope();

        self.defs.get_mut(def).members = members;
        Some(id)
    }

    // ========================================================================
    // Aliases
    // ========================================================================

    pub(super) fn resolve_alias(
        &mut self,
        id: EntityId,
        decl: &AliasDecl,
        cx: &mut ModuleCx,
    ) -> Option<EntityId> {
        let ty = self.resolve_spec(&decl.ty, cx)?;
        self.entities.get_mut(id).ty = Some(ty);
        Some(id)
    }
}
