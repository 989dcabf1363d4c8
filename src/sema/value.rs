// src/sema/value.rs
//! Compile-time-known scalar values.
//!
//! A `Value` is either one concrete scalar of a primitive kind or `None`
//! ("not a constant"). Constant folding and global-to-constant promotion
//! both operate on this representation.

use crate::sema::types::PrimitiveKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Not known at compile time
    None,
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
}

impl Eq for Value {}

// Manual Hash implementation because floats don't implement Hash
impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::I8(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::U8(v) => v.hash(state),
            Value::U16(v) => v.hash(state),
            Value::U32(v) => v.hash(state),
            Value::U64(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Char(v) => v.hash(state),
        }
    }
}

impl Value {
    /// True when the value is known at compile time.
    pub fn is_const(self) -> bool {
        !matches!(self, Value::None)
    }

    /// The primitive kind carrying this scalar, if any.
    pub fn kind(self) -> Option<PrimitiveKind> {
        match self {
            Value::None => None,
            Value::I8(_) => Some(PrimitiveKind::I8),
            Value::I16(_) => Some(PrimitiveKind::I16),
            Value::I32(_) => Some(PrimitiveKind::I32),
            Value::I64(_) => Some(PrimitiveKind::I64),
            Value::U8(_) => Some(PrimitiveKind::U8),
            Value::U16(_) => Some(PrimitiveKind::U16),
            Value::U32(_) => Some(PrimitiveKind::U32),
            Value::U64(_) => Some(PrimitiveKind::U64),
            Value::F32(_) => Some(PrimitiveKind::F32),
            Value::F64(_) => Some(PrimitiveKind::F64),
            Value::Bool(_) => Some(PrimitiveKind::Bool),
            Value::Char(_) => Some(PrimitiveKind::Char),
        }
    }

    /// Widened integer view, for kind-directed casts. `None` for floats,
    /// bool and char.
    fn as_i128(self) -> Option<i128> {
        match self {
            Value::I8(v) => Some(v as i128),
            Value::I16(v) => Some(v as i128),
            Value::I32(v) => Some(v as i128),
            Value::I64(v) => Some(v as i128),
            Value::U8(v) => Some(v as i128),
            Value::U16(v) => Some(v as i128),
            Value::U32(v) => Some(v as i128),
            Value::U64(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Widened float view.
    fn as_f64(self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Kind-directed cast. Integer values re-target any integer or float
    /// kind; float values re-target float kinds. Anything else (including a
    /// lossy integer cast) yields `Value::None`.
    pub fn cast(self, to: PrimitiveKind) -> Value {
        if self.kind() == Some(to) {
            return self;
        }
        if let Some(v) = self.as_i128() {
            return match to {
                PrimitiveKind::I8 => i8::try_from(v).map_or(Value::None, Value::I8),
                PrimitiveKind::I16 => i16::try_from(v).map_or(Value::None, Value::I16),
                PrimitiveKind::I32 => i32::try_from(v).map_or(Value::None, Value::I32),
                PrimitiveKind::I64 => i64::try_from(v).map_or(Value::None, Value::I64),
                PrimitiveKind::U8 => u8::try_from(v).map_or(Value::None, Value::U8),
                PrimitiveKind::U16 => u16::try_from(v).map_or(Value::None, Value::U16),
                PrimitiveKind::U32 => u32::try_from(v).map_or(Value::None, Value::U32),
                PrimitiveKind::U64 => u64::try_from(v).map_or(Value::None, Value::U64),
                PrimitiveKind::F32 => Value::F32(v as f32),
                PrimitiveKind::F64 => Value::F64(v as f64),
                _ => Value::None,
            };
        }
        if let Some(v) = self.as_f64() {
            return match to {
                PrimitiveKind::F32 => Value::F32(v as f32),
                PrimitiveKind::F64 => Value::F64(v),
                _ => Value::None,
            };
        }
        Value::None
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => write!(f, "<not a constant>"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
        }
    }
}
