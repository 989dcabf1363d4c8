// src/sema/type_defs.rs
//! Nominal type definitions (struct, sum type, trait).
//!
//! A `TypeDefId` identifies one *declaration*; the interned `TypeKind` for a
//! nominal type carries the id, so type identity follows declaration
//! identity. Layout results (size, alignment, member order) are recorded
//! here once the typer computes them.

use crate::frontend::ast::Symbol;
use crate::sema::entity::EntityId;
use crate::sema::scope::ScopeId;

/// Handle into the [`TypeDefs`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDefId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefKind {
    Struct,
    Sum,
    Trait,
}

/// One tagged variant of a sum type.
#[derive(Debug, Clone)]
pub struct VariantDef {
    pub name: Symbol,
    pub fields: Vec<EntityId>,
}

#[derive(Debug)]
pub struct TypeDef {
    pub kind: TypeDefKind,
    pub name: Symbol,
    /// Named ancestor scope names from the module root down to (excluding)
    /// the declaration; disambiguates same-named nominal types.
    pub path: Vec<Symbol>,
    /// Member scope declaring fields (struct), variants (sum) or required
    /// members (trait)
    pub scope: ScopeId,
    /// Ordered member entities. For structs this includes synthesized
    /// padding members after layout.
    pub members: Vec<EntityId>,
    pub variants: Vec<VariantDef>,
    /// True for declarations carrying generic parameters; their resolution
    /// is a declared shell only.
    pub polymorphic: bool,
    pub size: usize,
    pub align: usize,
}

/// Registry of nominal definitions for one compilation.
#[derive(Debug, Default)]
pub struct TypeDefs {
    defs: Vec<TypeDef>,
}

impl TypeDefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(
        &mut self,
        kind: TypeDefKind,
        name: Symbol,
        path: Vec<Symbol>,
        scope: ScopeId,
        polymorphic: bool,
    ) -> TypeDefId {
        let id = TypeDefId(self.defs.len() as u32);
        self.defs.push(TypeDef {
            kind,
            name,
            path,
            scope,
            members: Vec::new(),
            variants: Vec::new(),
            polymorphic,
            size: 0,
            align: 1,
        });
        id
    }

    pub fn get(&self, id: TypeDefId) -> &TypeDef {
        &self.defs[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: TypeDefId) -> &mut TypeDef {
        &mut self.defs[id.0 as usize]
    }

    /// Nominal equivalence: same declared name and every ancestor name along
    /// the declaration path matches.
    pub fn same_nominal(&self, a: TypeDefId, b: TypeDefId) -> bool {
        if a == b {
            return true;
        }
        let (da, db) = (self.get(a), self.get(b));
        da.name == db.name && da.path == db.path
    }
}
