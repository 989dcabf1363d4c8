// src/sema/eval.rs
//! Kind-dispatched constant evaluation for the typer.
//!
//! Both operands are first cast onto the result's primitive kind, then the
//! operator is applied on that concrete scalar representation. Arithmetic is
//! checked: overflow, division by zero and out-of-range shifts decline to
//! fold and yield `Value::None`, leaving the operand a runtime value.

use crate::frontend::ast::{BinaryOp, UnaryOp};
use crate::sema::types::PrimitiveKind;
use crate::sema::value::Value;

macro_rules! int_binary {
    ($op:expr, $lhs:expr, $rhs:expr, $variant:ident) => {{
        let (a, b) = ($lhs, $rhs);
        match $op {
            BinaryOp::Add => a.checked_add(b).map_or(Value::None, Value::$variant),
            BinaryOp::Sub => a.checked_sub(b).map_or(Value::None, Value::$variant),
            BinaryOp::Mul => a.checked_mul(b).map_or(Value::None, Value::$variant),
            BinaryOp::Div => a.checked_div(b).map_or(Value::None, Value::$variant),
            BinaryOp::Rem => a.checked_rem(b).map_or(Value::None, Value::$variant),
            BinaryOp::BitAnd => Value::$variant(a & b),
            BinaryOp::BitOr => Value::$variant(a | b),
            BinaryOp::BitXor => Value::$variant(a ^ b),
            BinaryOp::Shl => u32::try_from(b)
                .ok()
                .and_then(|s| a.checked_shl(s))
                .map_or(Value::None, Value::$variant),
            BinaryOp::Shr => u32::try_from(b)
                .ok()
                .and_then(|s| a.checked_shr(s))
                .map_or(Value::None, Value::$variant),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::Ne => Value::Bool(a != b),
            BinaryOp::Lt => Value::Bool(a < b),
            BinaryOp::Le => Value::Bool(a <= b),
            BinaryOp::Gt => Value::Bool(a > b),
            BinaryOp::Ge => Value::Bool(a >= b),
            BinaryOp::And | BinaryOp::Or => Value::None,
        }
    }};
}

macro_rules! float_binary {
    ($op:expr, $lhs:expr, $rhs:expr, $variant:ident) => {{
        let (a, b) = ($lhs, $rhs);
        match $op {
            BinaryOp::Add => Value::$variant(a + b),
            BinaryOp::Sub => Value::$variant(a - b),
            BinaryOp::Mul => Value::$variant(a * b),
            BinaryOp::Div => Value::$variant(a / b),
            BinaryOp::Rem => Value::$variant(a % b),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::Ne => Value::Bool(a != b),
            BinaryOp::Lt => Value::Bool(a < b),
            BinaryOp::Le => Value::Bool(a <= b),
            BinaryOp::Gt => Value::Bool(a > b),
            BinaryOp::Ge => Value::Bool(a >= b),
            _ => Value::None,
        }
    }};
}

/// Fold a binary operator over two compile-time values. `kind` is the
/// primitive kind of the operands (comparison results are bool regardless).
pub fn eval_binary(op: BinaryOp, kind: PrimitiveKind, lhs: Value, rhs: Value) -> Value {
    let (lhs, rhs) = (lhs.cast(kind), rhs.cast(kind));
    match (lhs, rhs) {
        (Value::I8(a), Value::I8(b)) => int_binary!(op, a, b, I8),
        (Value::I16(a), Value::I16(b)) => int_binary!(op, a, b, I16),
        (Value::I32(a), Value::I32(b)) => int_binary!(op, a, b, I32),
        (Value::I64(a), Value::I64(b)) => int_binary!(op, a, b, I64),
        (Value::U8(a), Value::U8(b)) => int_binary!(op, a, b, U8),
        (Value::U16(a), Value::U16(b)) => int_binary!(op, a, b, U16),
        (Value::U32(a), Value::U32(b)) => int_binary!(op, a, b, U32),
        (Value::U64(a), Value::U64(b)) => int_binary!(op, a, b, U64),
        (Value::F32(a), Value::F32(b)) => float_binary!(op, a, b, F32),
        (Value::F64(a), Value::F64(b)) => float_binary!(op, a, b, F64),
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinaryOp::And => Value::Bool(a && b),
            BinaryOp::Or => Value::Bool(a || b),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::Ne => Value::Bool(a != b),
            _ => Value::None,
        },
        _ => Value::None,
    }
}

/// Fold a unary operator over a compile-time value.
pub fn eval_unary(op: UnaryOp, kind: PrimitiveKind, operand: Value) -> Value {
    let operand = operand.cast(kind);
    match (op, operand) {
        (UnaryOp::Neg, Value::I8(v)) => v.checked_neg().map_or(Value::None, Value::I8),
        (UnaryOp::Neg, Value::I16(v)) => v.checked_neg().map_or(Value::None, Value::I16),
        (UnaryOp::Neg, Value::I32(v)) => v.checked_neg().map_or(Value::None, Value::I32),
        (UnaryOp::Neg, Value::I64(v)) => v.checked_neg().map_or(Value::None, Value::I64),
        (UnaryOp::Neg, Value::F32(v)) => Value::F32(-v),
        (UnaryOp::Neg, Value::F64(v)) => Value::F64(-v),
        (UnaryOp::Not, Value::Bool(v)) => Value::Bool(!v),
        (UnaryOp::BitNot, Value::I8(v)) => Value::I8(!v),
        (UnaryOp::BitNot, Value::I16(v)) => Value::I16(!v),
        (UnaryOp::BitNot, Value::I32(v)) => Value::I32(!v),
        (UnaryOp::BitNot, Value::I64(v)) => Value::I64(!v),
        (UnaryOp::BitNot, Value::U8(v)) => Value::U8(!v),
        (UnaryOp::BitNot, Value::U16(v)) => Value::U16(!v),
        (UnaryOp::BitNot, Value::U32(v)) => Value::U32(!v),
        (UnaryOp::BitNot, Value::U64(v)) => Value::U64(!v),
        _ => Value::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_integer_arithmetic() {
        let v = eval_binary(
            BinaryOp::Add,
            PrimitiveKind::I32,
            Value::I32(1),
            Value::I32(2),
        );
        assert_eq!(v, Value::I32(3));
    }

    #[test]
    fn division_by_zero_declines_to_fold() {
        let v = eval_binary(
            BinaryOp::Div,
            PrimitiveKind::I64,
            Value::I64(1),
            Value::I64(0),
        );
        assert_eq!(v, Value::None);
    }

    #[test]
    fn overflow_declines_to_fold() {
        let v = eval_binary(
            BinaryOp::Add,
            PrimitiveKind::U8,
            Value::U8(200),
            Value::U8(100),
        );
        assert_eq!(v, Value::None);
    }

    #[test]
    fn comparison_yields_bool() {
        let v = eval_binary(
            BinaryOp::Lt,
            PrimitiveKind::U16,
            Value::U16(3),
            Value::U16(4),
        );
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn unary_negation_and_bitnot() {
        assert_eq!(
            eval_unary(UnaryOp::Neg, PrimitiveKind::I32, Value::I32(5)),
            Value::I32(-5)
        );
        assert_eq!(
            eval_unary(UnaryOp::BitNot, PrimitiveKind::U8, Value::U8(0)),
            Value::U8(255)
        );
        assert_eq!(
            eval_unary(UnaryOp::Not, PrimitiveKind::Bool, Value::Bool(false)),
            Value::Bool(true)
        );
    }

    #[test]
    fn logical_ops_fold_bools() {
        let v = eval_binary(
            BinaryOp::And,
            PrimitiveKind::Bool,
            Value::Bool(true),
            Value::Bool(false),
        );
        assert_eq!(v, Value::Bool(false));
    }
}
