//! Compile-time constant payloads ("compile-time exact values").
//!
//! These are handed to the core by the frontend's checker; the core
//! never evaluates constants, only materializes them.

use alloc::{boxed::Box, format, string::String, vec::Vec};

use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum ExactValue {
    Invalid,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Pointer(u64),
    Slice(Box<[ExactValue]>),
}

impl ExactValue {
    pub fn slice(values: Vec<ExactValue>) -> Self {
        ExactValue::Slice(values.into_boxed_slice())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExactValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            ExactValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Render the way the dump format requires: booleans as `[true|false]`,
    /// integers as `%llu`/`%lld` per `ty`'s signedness, floats by their bit
    /// pattern in hex, strings literal, pointers in hex.
    pub fn format(&self, ty: &Type) -> String {
        match self {
            ExactValue::Invalid => "invalid".into(),
            ExactValue::Bool(b) => format!("[{b}]"),
            ExactValue::Integer(i) => {
                if ty.is_type_unsigned() {
                    format!("{}", *i as u64)
                } else {
                    format!("{}", *i as i64)
                }
            }
            ExactValue::Float(f) => match ty {
                Type::F32 => format!("0x{:08x}", (*f as f32).to_bits()),
                _ => format!("0x{:016x}", f.to_bits()),
            },
            ExactValue::String(s) => format!("{s:?}"),
            ExactValue::Pointer(p) => format!("0x{p:x}"),
            ExactValue::Slice(elems) => {
                let elem_ty = match ty {
                    Type::Slice(inner) => inner.as_ref(),
                    other => other,
                };
                let rendered: Vec<String> = elems.iter().map(|e| e.format(elem_ty)).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_bool_only_matches_bool_variant() {
        assert_eq!(ExactValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ExactValue::Integer(1).as_bool(), None);
    }
}
