//! The language type system shared by the IR and its frontend collaborator.
//!
//! This is conventionally part of the frontend's delivery (`base_type`,
//! `type_size_of`, `are_types_identical`, `type_deref`, `make_type_pointer`,
//! and the `is_type_*` predicate family); it lives here because both
//! `ssa-ir` (opcode selection, the printer, SSA-ability) and
//! `ssa-frontend` (the AST/checker stand-in) need the identical vocabulary,
//! and this crate is the lower one in the dependency graph.

use alloc::{boxed::Box, string::String, vec::Vec};

/// `build_context.word_size`: the only configuration input this core
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSize {
    W32,
    W64,
}

impl WordSize {
    pub fn bytes(self) -> usize {
        match self {
            WordSize::W32 => 4,
            WordSize::W64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    pub word_size: WordSize,
}

impl BuildContext {
    pub fn new(word_size: WordSize) -> Self {
        Self { word_size }
    }
}

/// A named aggregate field, used by `Struct` and as the element path for
/// `Union`/`Tuple` members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

/// A procedure's parameter/return shape, also used for `Type::Proc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
}

impl Signature {
    pub fn new(params: Vec<Type>, returns: Vec<Type>) -> Self {
        Self { params, returns }
    }

    pub fn empty() -> Self {
        Self {
            params: Vec::new(),
            returns: Vec::new(),
        }
    }
}

/// The language's type system, reduced to what the core needs: enough to
/// select opcodes by width/signedness (§4.2.1), decide SSA-ability (§4.2.4),
/// and project aggregate fields (§4.2.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    /// Platform-dependent signed integer; canonicalized away by `proper_type`.
    Int,
    /// Platform-dependent unsigned integer; canonicalized away by `proper_type`.
    Uint,
    F32,
    F64,
    String,
    Any,
    Pointer(Box<Type>),
    Slice(Box<Type>),
    Array(usize, Box<Type>),
    Vector(usize, Box<Type>),
    DynamicArray(Box<Type>),
    DynamicMap(Box<Type>, Box<Type>),
    Struct(Vec<Field>),
    Tuple(Vec<Type>),
    Union(Vec<Type>),
    Proc(Box<Signature>),
    /// An alias; `base_type`/`core_type` peel this away.
    Named(String, Box<Type>),
    /// Sentinel for the untyped-nil constant and for unrecoverable type
    /// errors the frontend stand-in refuses to model further.
    Invalid,
}

impl Type {
    pub fn pointer(to: Type) -> Type {
        Type::Pointer(Box::new(to))
    }

    /// Peel a single layer of `Named` aliasing; conventionally called
    /// `base_type`.
    pub fn base_type(&self) -> &Type {
        match self {
            Type::Named(_, inner) => inner.base_type(),
            other => other,
        }
    }

    /// `core_type`: like `base_type`, but also unwraps the
    /// platform-dependent `int`/`uint` aliasing handled by `proper_type`.
    /// In this minimal stand-in the two coincide once `Int`/`Uint` are
    /// resolved, so `core_type` is `base_type` applied after `proper_type`.
    pub fn core_type(&self, ctx: BuildContext) -> Type {
        self.proper_type(ctx).base_type().clone()
    }

    /// Replace the platform-dependent `int`/`uint` with the concrete
    /// `i32`/`i64`/`u32`/`u64` selected by `ctx.word_size`.
    pub fn proper_type(&self, ctx: BuildContext) -> Type {
        match self.base_type() {
            Type::Int => match ctx.word_size {
                WordSize::W32 => Type::I32,
                WordSize::W64 => Type::I64,
            },
            Type::Uint => match ctx.word_size {
                WordSize::W32 => Type::U32,
                WordSize::W64 => Type::U64,
            },
            other => other.clone(),
        }
    }

    pub fn type_deref(&self) -> Option<&Type> {
        match self.base_type() {
            Type::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn are_types_identical(a: &Type, b: &Type) -> bool {
        a.base_type() == b.base_type()
    }

    pub fn is_type_integer(&self) -> bool {
        matches!(
            self.base_type(),
            Type::I8
                | Type::I16
                | Type::I32
                | Type::I64
                | Type::U8
                | Type::U16
                | Type::U32
                | Type::U64
                | Type::Int
                | Type::Uint
        )
    }

    pub fn is_type_unsigned(&self) -> bool {
        matches!(
            self.base_type(),
            Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::Uint
        )
    }

    pub fn is_type_float(&self) -> bool {
        matches!(self.base_type(), Type::F32 | Type::F64)
    }

    pub fn is_type_pointer(&self) -> bool {
        matches!(self.base_type(), Type::Pointer(_))
    }

    pub fn is_type_vector(&self) -> bool {
        matches!(self.base_type(), Type::Vector(_, _))
    }

    pub fn is_type_slice(&self) -> bool {
        matches!(self.base_type(), Type::Slice(_))
    }

    pub fn is_type_string(&self) -> bool {
        matches!(self.base_type(), Type::String)
    }

    pub fn is_type_any(&self) -> bool {
        matches!(self.base_type(), Type::Any)
    }

    pub fn is_type_struct(&self) -> bool {
        matches!(self.base_type(), Type::Struct(_))
    }

    pub fn is_type_union(&self) -> bool {
        matches!(self.base_type(), Type::Union(_))
    }

    pub fn is_type_tuple(&self) -> bool {
        matches!(self.base_type(), Type::Tuple(_))
    }

    pub fn is_type_dynamic_array(&self) -> bool {
        matches!(self.base_type(), Type::DynamicArray(_))
    }

    pub fn is_type_dynamic_map(&self) -> bool {
        matches!(self.base_type(), Type::DynamicMap(_, _))
    }

    pub fn is_type_array(&self) -> bool {
        matches!(self.base_type(), Type::Array(_, _))
    }

    pub fn is_type_bool(&self) -> bool {
        matches!(self.base_type(), Type::Bool)
    }

    /// `type_size_of`: byte size under `ctx.word_size`. Aggregate sizes use
    /// a naive sequential layout (sum of field sizes, no alignment padding);
    /// sufficient for the SSA-ability predicate and union offset
    /// computation this core needs, but not a claim of target ABI fidelity
    /// (see DESIGN.md).
    pub fn type_size_of(&self, ctx: BuildContext) -> usize {
        match self.proper_type(ctx).base_type() {
            Type::Bool => 1,
            Type::I8 | Type::U8 => 1,
            Type::I16 | Type::U16 => 2,
            Type::I32 | Type::U32 | Type::F32 => 4,
            Type::I64 | Type::U64 | Type::F64 => 8,
            Type::Int | Type::Uint => ctx.word_size.bytes(),
            Type::String => 2 * ctx.word_size.bytes(),
            Type::Any => 2 * ctx.word_size.bytes(),
            Type::Pointer(_) | Type::Proc(_) => ctx.word_size.bytes(),
            Type::Slice(_) => 3 * ctx.word_size.bytes(),
            Type::DynamicArray(_) => 4 * ctx.word_size.bytes(),
            Type::DynamicMap(_, _) => 4 * ctx.word_size.bytes(),
            Type::Array(len, elem) => len * elem.type_size_of(ctx),
            Type::Vector(len, elem) => len * elem.type_size_of(ctx),
            Type::Struct(fields) => fields.iter().map(|f| f.ty.type_size_of(ctx)).sum(),
            Type::Tuple(elems) => elems.iter().map(|t| t.type_size_of(ctx)).sum(),
            Type::Union(variants) => variants
                .iter()
                .map(|t| t.type_size_of(ctx))
                .max()
                .unwrap_or(0)
                + ctx.word_size.bytes(), // tag word
            Type::Named(_, _) => unreachable!("base_type already peeled Named"),
            Type::Invalid => 0,
        }
    }

    /// Byte offset of each field under the same naive sequential layout
    /// `type_size_of` uses. Used by union field projection (§4.2.4).
    pub fn type_set_offsets(&self, ctx: BuildContext) -> Vec<usize> {
        let mut offset = 0usize;
        let mut offsets = Vec::new();
        match self.base_type() {
            Type::Struct(fields) => {
                for f in fields {
                    offsets.push(offset);
                    offset += f.ty.type_size_of(ctx);
                }
            }
            Type::Tuple(elems) => {
                for t in elems {
                    offsets.push(offset);
                    offset += t.type_size_of(ctx);
                }
            }
            _ => {}
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx64() -> BuildContext {
        BuildContext::new(WordSize::W64)
    }

    #[test]
    fn proper_type_canonicalizes_platform_width() {
        assert_eq!(Type::Int.proper_type(ctx64()), Type::I64);
        assert_eq!(
            Type::Int.proper_type(BuildContext::new(WordSize::W32)),
            Type::I32
        );
    }

    #[test]
    fn predicates_see_through_named_aliases() {
        let named = Type::Named("MyInt".into(), Box::new(Type::I32));
        assert!(named.is_type_integer());
        assert!(!named.is_type_float());
    }

    #[test]
    fn struct_size_is_sum_of_field_sizes() {
        let s = Type::Struct(alloc::vec![
            Field { name: "a".into(), ty: Type::I32 },
            Field { name: "b".into(), ty: Type::I32 },
        ]);
        assert_eq!(s.type_size_of(ctx64()), 8);
        assert_eq!(s.type_set_offsets(ctx64()), alloc::vec![0, 4]);
    }

    #[test]
    fn slice_size_is_three_words() {
        let s = Type::Slice(Box::new(Type::I32));
        assert_eq!(s.type_size_of(ctx64()), 24);
    }

    #[test]
    fn are_types_identical_ignores_aliasing() {
        let named = Type::Named("MyInt".into(), Box::new(Type::I32));
        assert!(Type::are_types_identical(&named, &Type::I32));
    }
}
