// src/sema/scope.rs
//! Lexical scopes and the symbol table.
//!
//! Scopes form a tree owned by a single arena; entities hold `ScopeId`
//! back-links instead of pointers, so parent links never own their parent.
//! Scopes are retained for the lifetime of the whole resolved program since
//! later lookups (accessor resolution) reach back into them.

use crate::frontend::ast::Symbol;
use crate::sema::entity::EntityId;
use rustc_hash::FxHashMap;

/// Handle into the [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Block,
    ConstBlock,
    Parameter,
    Member,
    Module,
    Defer,
}

impl ScopeKind {
    /// Anonymous block-like scopes are skipped when building a qualified path.
    pub fn contributes_to_path(self) -> bool {
        !matches!(self, ScopeKind::Block | ScopeKind::Defer)
    }
}

#[derive(Debug)]
pub struct ScopeData {
    pub kind: ScopeKind,
    /// Only named scopes can be addressed by a qualified path
    pub name: Option<Symbol>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    names: FxHashMap<Symbol, EntityId>,
}

/// Owning storage for every scope of one compilation.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<ScopeData>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope and record it as a child of `parent`.
    pub fn alloc(
        &mut self,
        kind: ScopeKind,
        name: Option<Symbol>,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            kind,
            name,
            parent,
            children: Vec::new(),
            names: FxHashMap::default(),
        });
        if let Some(parent) = parent {
            self.add_child(parent, id);
        }
        id
    }

    pub fn get(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id.0 as usize]
    }

    /// Record scope ownership.
    pub fn add_child(&mut self, parent: ScopeId, child: ScopeId) {
        self.scopes[parent.0 as usize].children.push(child);
    }

    /// Lookup in this scope only.
    pub fn find(&self, scope: ScopeId, name: Symbol) -> Option<EntityId> {
        self.get(scope).names.get(&name).copied()
    }

    /// Bind a name. Fails silently when the name already exists; duplicate
    /// detection is the caller's job, done via `find` before `insert`.
    pub fn insert(&mut self, scope: ScopeId, name: Symbol, entity: EntityId) {
        self.scopes[scope.0 as usize]
            .names
            .entry(name)
            .or_insert(entity);
    }

    /// Rebind an existing name to a different entity (used to mutate a
    /// global into a constant after constant folding).
    pub fn rebind(&mut self, scope: ScopeId, name: Symbol, entity: EntityId) {
        self.scopes[scope.0 as usize].names.insert(name, entity);
    }

    /// Walk parent links until a match or the root.
    pub fn search_chain(&self, from: ScopeId, name: Symbol) -> Option<EntityId> {
        let mut current = Some(from);
        while let Some(scope) = current {
            if let Some(entity) = self.find(scope, name) {
                return Some(entity);
            }
            current = self.get(scope).parent;
        }
        None
    }

    /// Ordered sequence of named ancestor scope names from the module root
    /// down to and including `scope`. Anonymous block/defer scopes are
    /// skipped.
    pub fn path(&self, scope: ScopeId) -> Vec<Symbol> {
        let mut segments = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.get(id);
            if data.kind.contributes_to_path() {
                if let Some(name) = data.name {
                    segments.push(name);
                }
            }
            current = data.parent;
        }
        segments.reverse();
        segments
    }
}
