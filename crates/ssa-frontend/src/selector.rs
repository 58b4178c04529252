//! Field lookup ("selectors for field lookup... returning an index
//! path").

use ssa_ir::Type;

/// Resolve a named field to its position in `ty`'s aggregate layout, or
/// `None` if the base type has no such field. Positional (numeric) tuple
/// selectors are parsed by the caller and don't go through name lookup.
pub fn lookup_field(ty: &Type, field: &str) -> Option<usize> {
    match ty.base_type() {
        Type::Struct(fields) => fields.iter().position(|f| f.name == field),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssa_ir::Field;

    #[test]
    fn finds_field_by_name() {
        let ty = Type::Struct(alloc::vec![
            Field { name: "x".into(), ty: Type::I32 },
            Field { name: "y".into(), ty: Type::I32 },
        ]);
        assert_eq!(lookup_field(&ty, "y"), Some(1));
        assert_eq!(lookup_field(&ty, "z"), None);
    }
}
