// src/sema/type_arena.rs
//
// Interned type system using TypeId handles for O(1) identity checks and
// minimal allocations.
//
// This module provides the canonical type representation for Sable's
// semantic analysis:
// - TypeId: u32 handle to an interned type (Copy, trivial Eq/Hash)
// - TypeArena: per-compilation storage with automatic deduplication
// - TypeKind: the canonical type representation using TypeId for child types

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::frontend::Interner;
use crate::sema::scope::ScopeId;
use crate::sema::type_defs::{TypeDefId, TypeDefs};
use crate::sema::types::PrimitiveKind;

/// Machine pointer width of the compilation target.
pub const POINTER_SIZE: usize = 8;

/// Concrete type identity in the TypeArena.
///
/// Unlike `TypeDefId` (which identifies a type *definition* like
/// `struct Point`), `TypeId` identifies one interned type instance. Nominal
/// kinds carry their TypeDefId, so one declaration interns to one TypeId.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    // Reserved TypeIds, guaranteed to be interned at these indices by
    // TypeArena::new(). Order follows PrimitiveKind::ALL.
    pub const I8: TypeId = TypeId(0);
    pub const I16: TypeId = TypeId(1);
    pub const I32: TypeId = TypeId(2);
    pub const I64: TypeId = TypeId(3);
    pub const U8: TypeId = TypeId(4);
    pub const U16: TypeId = TypeId(5);
    pub const U32: TypeId = TypeId(6);
    pub const U64: TypeId = TypeId(7);
    pub const F32: TypeId = TypeId(8);
    pub const F64: TypeId = TypeId(9);
    pub const BOOL: TypeId = TypeId(10);
    pub const CHAR: TypeId = TypeId(11);
    pub const UNIT: TypeId = TypeId(12);

    /// First non-reserved TypeId index
    pub const FIRST_DYNAMIC: u32 = 13;

    /// Get the raw index (for debugging/serialization)
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// SmallVec for type children - inline up to 4 (covers most tuples, params)
pub type TypeIdVec = SmallVec<[TypeId; 4]>;

/// The canonical type representation in Sable.
///
/// Interned in the TypeArena; use TypeId handles for identity and
/// pass-by-copy. Access the TypeKind via arena.get(id).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Unit,

    // Wrappers
    Pointer(TypeId),
    Reference(TypeId),
    Mutable(TypeId),

    // Aggregates
    FixedArray { elem: TypeId, len: usize },
    DynArray(TypeId),
    Tuple(TypeIdVec),

    // Nominal types
    Struct(TypeDefId),
    Sum(TypeDefId),
    Trait(TypeDefId),

    // Function type
    Function { params: TypeIdVec, ret: TypeId },

    // Polymorphic shells: declared but unresolved in this core
    PolyStruct(TypeDefId),
    PolySum(TypeDefId),
    PolyTrait(TypeDefId),
    PolyFunction { params: TypeIdVec, ret: TypeId },

    // Module type - wraps the exported scope
    Module(ScopeId),
}

/// Per-compilation type arena with automatic interning/deduplication.
pub struct TypeArena {
    /// Interned types, indexed by TypeId
    types: Vec<TypeKind>,
    /// Deduplication map - hashbrown for better perf
    intern_map: HashMap<TypeKind, TypeId>,
}

impl std::fmt::Debug for TypeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeArena")
            .field("types_count", &self.types.len())
            .finish_non_exhaustive()
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    /// Create a new TypeArena with pre-interned primitive types
    pub fn new() -> Self {
        let mut arena = Self {
            types: Vec::new(),
            intern_map: HashMap::new(),
        };

        // Pre-intern primitives in the order defined by the TypeId constants.
        // The debug_asserts verify the constants match the interned indices.
        for kind in PrimitiveKind::ALL {
            arena.intern(TypeKind::Primitive(kind));
        }
        debug_assert_eq!(arena.primitive(PrimitiveKind::I8), TypeId::I8);
        debug_assert_eq!(arena.primitive(PrimitiveKind::Char), TypeId::CHAR);

        let unit = arena.intern(TypeKind::Unit);
        debug_assert_eq!(unit, TypeId::UNIT);

        arena
    }

    /// Intern a type, returning the existing TypeId if already interned
    pub fn intern(&mut self, ty: TypeKind) -> TypeId {
        let next_id = TypeId(self.types.len() as u32);
        *self.intern_map.entry(ty.clone()).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    /// Get the TypeKind for a TypeId
    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.types[id.0 as usize]
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        // Reserved ids follow PrimitiveKind::ALL ordering
        let index = PrimitiveKind::ALL.iter().position(|&k| k == kind);
        TypeId(index.unwrap_or(0) as u32)
    }

    pub fn unit(&self) -> TypeId {
        TypeId::UNIT
    }

    pub fn pointer(&mut self, base: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer(base))
    }

    pub fn reference(&mut self, base: TypeId) -> TypeId {
        self.intern(TypeKind::Reference(base))
    }

    pub fn mutable(&mut self, base: TypeId) -> TypeId {
        self.intern(TypeKind::Mutable(base))
    }

    pub fn fixed_array(&mut self, elem: TypeId, len: usize) -> TypeId {
        self.intern(TypeKind::FixedArray { elem, len })
    }

    pub fn dyn_array(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::DynArray(elem))
    }

    pub fn tuple(&mut self, elems: TypeIdVec) -> TypeId {
        self.intern(TypeKind::Tuple(elems))
    }

    pub fn function(&mut self, params: TypeIdVec, ret: TypeId) -> TypeId {
        self.intern(TypeKind::Function { params, ret })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_primitive(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeKind::Primitive(_))
    }

    pub fn primitive_kind(&self, id: TypeId) -> Option<PrimitiveKind> {
        match self.get(id) {
            TypeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeKind::Pointer(_))
    }

    pub fn is_bool(&self, id: TypeId) -> bool {
        id == TypeId::BOOL
    }

    /// Strip one level of pointer/reference indirection, if present.
    pub fn strip_indirection(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeKind::Pointer(base) | TypeKind::Reference(base) => *base,
            _ => id,
        }
    }

    /// See through `mut T` to the wrapped type.
    pub fn strip_mutable(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeKind::Mutable(base) => *base,
            _ => id,
        }
    }

    /// Types stored by reference rather than by value when bound to a name.
    pub fn is_reference_like(&self, id: TypeId) -> bool {
        matches!(
            self.get(id),
            TypeKind::Pointer(_)
                | TypeKind::Reference(_)
                | TypeKind::FixedArray { .. }
                | TypeKind::DynArray(_)
                | TypeKind::Function { .. }
        )
    }

    // ========================================================================
    // Size and alignment
    // ========================================================================

    /// Byte size of a type. Nominal sizes come from their definitions;
    /// tuples use C-style sequential layout with trailing padding.
    pub fn size_of(&self, id: TypeId, defs: &TypeDefs) -> usize {
        match self.get(id) {
            TypeKind::Primitive(kind) => kind.size(),
            TypeKind::Unit => 0,
            TypeKind::Pointer(_) | TypeKind::Reference(_) => POINTER_SIZE,
            TypeKind::Mutable(base) => self.size_of(*base, defs),
            TypeKind::FixedArray { elem, len } => self.size_of(*elem, defs) * len,
            // Pointer + length pair
            TypeKind::DynArray(_) => POINTER_SIZE * 2,
            TypeKind::Tuple(elems) => {
                let mut offset = 0usize;
                let mut max_align = 1usize;
                for &elem in elems {
                    let align = self.align_of(elem, defs).max(1);
                    max_align = max_align.max(align);
                    offset = next_multiple(offset, align);
                    offset += self.size_of(elem, defs);
                }
                next_multiple(offset, max_align)
            }
            TypeKind::Struct(def) | TypeKind::Sum(def) | TypeKind::Trait(def) => {
                defs.get(*def).size
            }
            TypeKind::Function { .. } => POINTER_SIZE,
            TypeKind::PolyStruct(_)
            | TypeKind::PolySum(_)
            | TypeKind::PolyTrait(_)
            | TypeKind::PolyFunction { .. } => 0,
            TypeKind::Module(_) => 0,
        }
    }

    /// Byte alignment of a type.
    pub fn align_of(&self, id: TypeId, defs: &TypeDefs) -> usize {
        match self.get(id) {
            TypeKind::Primitive(kind) => kind.align(),
            TypeKind::Unit => 1,
            TypeKind::Pointer(_) | TypeKind::Reference(_) => POINTER_SIZE,
            TypeKind::Mutable(base) => self.align_of(*base, defs),
            TypeKind::FixedArray { elem, .. } => self.align_of(*elem, defs),
            TypeKind::DynArray(_) => POINTER_SIZE,
            TypeKind::Tuple(elems) => elems
                .iter()
                .map(|&e| self.align_of(e, defs))
                .max()
                .unwrap_or(1),
            TypeKind::Struct(def) | TypeKind::Sum(def) | TypeKind::Trait(def) => {
                defs.get(*def).align
            }
            TypeKind::Function { .. } => POINTER_SIZE,
            TypeKind::PolyStruct(_)
            | TypeKind::PolySum(_)
            | TypeKind::PolyTrait(_)
            | TypeKind::PolyFunction { .. } => 1,
            TypeKind::Module(_) => 1,
        }
    }

    // ========================================================================
    // Equivalence
    // ========================================================================

    /// Two-phase equivalence: identity short-circuit, then kind-family
    /// match, then structural (functions, tuples, wrappers) or
    /// nominal-by-path (struct, trait). Sum types report not-equivalent
    /// (nominal sum identity is unspecified).
    pub fn equivalent(&self, a: TypeId, b: TypeId, defs: &TypeDefs) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (TypeKind::Primitive(ka), TypeKind::Primitive(kb)) => ka == kb,
            (TypeKind::Unit, TypeKind::Unit) => true,
            (TypeKind::Pointer(ba), TypeKind::Pointer(bb))
            | (TypeKind::Reference(ba), TypeKind::Reference(bb))
            | (TypeKind::Mutable(ba), TypeKind::Mutable(bb)) => self.equivalent(*ba, *bb, defs),
            (
                TypeKind::FixedArray { elem: ea, len: la },
                TypeKind::FixedArray { elem: eb, len: lb },
            ) => la == lb && self.equivalent(*ea, *eb, defs),
            (TypeKind::DynArray(ea), TypeKind::DynArray(eb)) => self.equivalent(*ea, *eb, defs),
            (TypeKind::Tuple(ea), TypeKind::Tuple(eb)) => {
                ea.len() == eb.len()
                    && ea
                        .iter()
                        .zip(eb.iter())
                        .all(|(&x, &y)| self.equivalent(x, y, defs))
            }
            (
                TypeKind::Function {
                    params: pa,
                    ret: ra,
                },
                TypeKind::Function {
                    params: pb,
                    ret: rb,
                },
            ) => {
                pa.len() == pb.len()
                    && pa
                        .iter()
                        .zip(pb.iter())
                        .all(|(&x, &y)| self.equivalent(x, y, defs))
                    && self.equivalent(*ra, *rb, defs)
            }
            (TypeKind::Struct(da), TypeKind::Struct(db))
            | (TypeKind::Trait(da), TypeKind::Trait(db)) => defs.same_nominal(*da, *db),
            // Sum-type equivalence is feature-incomplete: report false
            (TypeKind::Sum(_), TypeKind::Sum(_)) => false,
            _ => false,
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Human-readable type name for diagnostics.
    pub fn display(&self, id: TypeId, defs: &TypeDefs, interner: &Interner) -> String {
        match self.get(id) {
            TypeKind::Primitive(kind) => kind.name().to_string(),
            TypeKind::Unit => "()".to_string(),
            TypeKind::Pointer(base) => format!("*{}", self.display(*base, defs, interner)),
            TypeKind::Reference(base) => format!("&{}", self.display(*base, defs, interner)),
            TypeKind::Mutable(base) => format!("mut {}", self.display(*base, defs, interner)),
            TypeKind::FixedArray { elem, len } => {
                format!("[{}]{}", len, self.display(*elem, defs, interner))
            }
            TypeKind::DynArray(elem) => format!("[]{}", self.display(*elem, defs, interner)),
            TypeKind::Tuple(elems) => {
                let parts: Vec<String> = elems
                    .iter()
                    .map(|&e| self.display(e, defs, interner))
                    .collect();
                format!("({})", parts.join(", "))
            }
            TypeKind::Struct(def)
            | TypeKind::Sum(def)
            | TypeKind::Trait(def)
            | TypeKind::PolyStruct(def)
            | TypeKind::PolySum(def)
            | TypeKind::PolyTrait(def) => interner.resolve(defs.get(*def).name).to_string(),
            TypeKind::Function { params, ret } | TypeKind::PolyFunction { params, ret } => {
                let parts: Vec<String> = params
                    .iter()
                    .map(|&p| self.display(p, defs, interner))
                    .collect();
                format!("proc({}) {}", parts.join(", "), self.display(*ret, defs, interner))
            }
            TypeKind::Module(_) => "module".to_string(),
        }
    }
}

/// Round `offset` up to the next multiple of `align`; a multiple produces no
/// padding.
pub fn next_multiple(offset: usize, align: usize) -> usize {
    if align == 0 || offset % align == 0 {
        offset
    } else {
        offset + align - (offset % align)
    }
}
