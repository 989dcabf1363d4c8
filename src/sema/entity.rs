// src/sema/entity.rs
//! The entity model: the resolved, persistent representation of every
//! declared name.

use crate::frontend::ast::Symbol;
use crate::frontend::Span;
use crate::sema::scope::ScopeId;
use crate::sema::type_arena::TypeId;
use crate::sema::type_defs::TypeDefId;
use crate::sema::value::Value;

/// Handle into the [`EntityArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Tri-state guarding re-entrant resolution. `Resolved` with an absent type
/// is the valid "failed but terminated" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Incomplete,
    Resolving,
    Resolved,
}

/// Whether a resolved name denotes a value slot or a reference slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressKind {
    #[default]
    Value,
    Reference,
}

#[derive(Debug, Clone)]
pub struct LocalEntity {
    pub address: AddressKind,
    pub mutable: bool,
    pub initialized: bool,
    pub used: bool,
    pub is_parameter: bool,
    pub is_self: bool,
    pub is_variadic: bool,
    pub public: bool,
    /// Synthesized padding member; addressable but never bindable
    pub synthetic: bool,
    /// Byte offset when the local is a struct member
    pub offset: Option<usize>,
}

impl LocalEntity {
    pub fn plain(mutable: bool) -> Self {
        Self {
            address: AddressKind::Value,
            mutable,
            initialized: false,
            used: false,
            is_parameter: false,
            is_self: false,
            is_variadic: false,
            public: false,
            synthetic: false,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalEntity {
    pub address: AddressKind,
    pub mutable: bool,
    pub initialized: bool,
}

/// Variadic classification of a function's last parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariadicKind {
    /// `...` - untyped, trailing arguments are unconstrained
    C,
    /// `name ...T` - trailing arguments must be equivalent to the element type
    Typed(TypeId),
}

/// One resolved parameter of a function, in declaration order.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: Symbol,
    pub entity: EntityId,
    pub ty: Option<TypeId>,
    /// Declared with a default value; call binding may omit it
    pub initialized: bool,
    pub is_self: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionEntity {
    pub params: Vec<ParamInfo>,
    pub scope: ScopeId,
    pub is_static: bool,
    pub is_method: bool,
    pub is_foreign: bool,
    pub has_body: bool,
    pub variadic: Option<VariadicKind>,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Local(LocalEntity),
    Global(GlobalEntity),
    /// Compile-time constant; no address kind
    Constant(Value),
    Function(FunctionEntity),
    /// Name-to-type indirection
    Alias,
    /// Declared struct/sum/trait plus attached implementation blocks
    Type(TypeDefId),
    /// Wraps an exported scope
    Module(ScopeId),
}

impl EntityKind {
    pub fn describe(&self) -> &'static str {
        match self {
            EntityKind::Local(_) => "local",
            EntityKind::Global(_) => "global",
            EntityKind::Constant(_) => "constant",
            EntityKind::Function(_) => "function",
            EntityKind::Alias => "alias",
            EntityKind::Type(_) => "type",
            EntityKind::Module(_) => "module",
        }
    }
}

#[derive(Debug)]
pub struct EntityData {
    pub name: Symbol,
    pub kind: EntityKind,
    /// Set at most once per successful resolution
    pub ty: Option<TypeId>,
    /// Enclosing scope at declaration time
    pub scope: ScopeId,
    /// Position of the originating declaration
    pub span: Span,
    pub status: ResolveState,
}

/// Owning storage for every entity of one compilation.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: Vec<EntityData>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, name: Symbol, kind: EntityKind, scope: ScopeId, span: Span) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(EntityData {
            name,
            kind,
            ty: None,
            scope,
            span,
            status: ResolveState::Incomplete,
        });
        id
    }

    /// Allocate an entity that needs no resolution pass of its own.
    pub fn alloc_resolved(
        &mut self,
        name: Symbol,
        kind: EntityKind,
        ty: TypeId,
        scope: ScopeId,
        span: Span,
    ) -> EntityId {
        let id = self.alloc(name, kind, scope, span);
        let data = self.get_mut(id);
        data.ty = Some(ty);
        data.status = ResolveState::Resolved;
        id
    }

    pub fn get(&self, id: EntityId) -> &EntityData {
        &self.entities[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut EntityData {
        &mut self.entities[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
