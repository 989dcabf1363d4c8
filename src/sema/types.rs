// src/sema/types.rs
//! Primitive type kinds and their machine properties.

/// Primitive scalar kinds. `bool` and `char` are distinct 1-byte kinds, not
/// aliases of `u8`, so cross-kind equivalence stays false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
}

impl PrimitiveKind {
    /// Byte size; natural alignment equals size for every primitive.
    pub fn size(self) -> usize {
        match self {
            PrimitiveKind::I8 | PrimitiveKind::U8 | PrimitiveKind::Bool | PrimitiveKind::Char => 1,
            PrimitiveKind::I16 | PrimitiveKind::U16 => 2,
            PrimitiveKind::I32 | PrimitiveKind::U32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::I64 | PrimitiveKind::U64 | PrimitiveKind::F64 => 8,
        }
    }

    pub fn align(self) -> usize {
        self.size()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8 | PrimitiveKind::I16 | PrimitiveKind::I32 | PrimitiveKind::I64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveKind::U8 | PrimitiveKind::U16 | PrimitiveKind::U32 | PrimitiveKind::U64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    /// Arithmetic capability: numeric kinds only, not bool/char.
    pub fn is_arithmetic(self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
        }
    }

    /// All kinds, in prelude registration order.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
    ];
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
