// src/sema/mod.rs
//! The semantic-analysis core: scopes, entities, types, and the typer that
//! ties them together.

pub mod entity;
pub mod eval;
pub mod operand;
pub mod scope;
pub mod type_arena;
pub mod type_defs;
pub mod typer;
pub mod types;
pub mod value;

pub use entity::{AddressKind, EntityArena, EntityId, EntityKind, ResolveState};
pub use operand::{AccessKind, Operand};
pub use scope::{ScopeArena, ScopeId, ScopeKind};
pub use type_arena::{TypeArena, TypeId, TypeKind};
pub use type_defs::{TypeDefId, TypeDefKind, TypeDefs};
pub use typer::{Resolved, TypeError, Typer};
pub use types::PrimitiveKind;
pub use value::Value;

/// Internal invariant violation: a compiler bug, never reachable from
/// well-formed input. Aborts the whole compilation.
macro_rules! ice {
    ($($arg:tt)*) => {
        panic!("internal compiler error: {}", format_args!($($arg)*))
    };
}
pub(crate) use ice;
