//! Deterministic schema hashing.
//!
//! Only wire-relevant properties are hashed: type ids, field order, field
//! kinds and frame tracking. Names, native layouts and scheduling keys can
//! change without breaking compatibility.

use blake3::Hasher;

use crate::{FieldKind, Schema};

/// Computes a deterministic hash for schema validation.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, schema.components.len() as u32);

    for component in &schema.components {
        write_u16(&mut hasher, component.type_id);
        write_u32(&mut hasher, component.fields.len() as u32);

        for field in &component.fields {
            write_kind(&mut hasher, field.kind);
            write_u8(&mut hasher, u8::from(field.frame_tracked));
        }
    }

    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn write_kind(hasher: &mut Hasher, kind: FieldKind) {
    match kind {
        FieldKind::Bool => {
            write_u8(hasher, 0);
        }
        FieldKind::IntegerRange { bits, min } => {
            write_u8(hasher, 1);
            write_u8(hasher, bits);
            write_i64(hasher, min);
        }
        FieldKind::UInt { bits } => {
            write_u8(hasher, 2);
            write_u8(hasher, bits);
        }
        FieldKind::SInt { bits } => {
            write_u8(hasher, 3);
            write_u8(hasher, bits);
        }
        FieldKind::Float32 => {
            write_u8(hasher, 4);
        }
        FieldKind::EntityRef => {
            write_u8(hasher, 5);
        }
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_i64(hasher: &mut Hasher, value: i64) {
    hasher.update(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentDescriptor, FieldDef, NativeSlot, NativeType};

    fn component(type_id: u16, fields: &[(&str, FieldKind, NativeType)]) -> ComponentDescriptor {
        let mut builder = ComponentDescriptor::builder(type_id, format!("C{type_id}"));
        let mut offset = 0;
        for (name, kind, ty) in fields {
            builder = builder.field(FieldDef::new(*name, *kind, NativeSlot::new(offset, *ty)));
            offset += ty.size();
        }
        builder.build().unwrap()
    }

    #[test]
    fn schema_hash_is_stable() {
        let schema = Schema::new(vec![component(
            1,
            &[
                ("a", FieldKind::bool(), NativeType::Bool8),
                ("b", FieldKind::uint(8), NativeType::U8),
            ],
        )])
        .unwrap();

        assert_eq!(schema_hash(&schema), schema_hash(&schema.clone()));
    }

    #[test]
    fn schema_hash_ignores_names_and_layout() {
        let a = component(1, &[("a", FieldKind::short(), NativeType::I16)]);
        let mut b = a.clone();
        b.name = "Renamed".to_owned();
        b.fields[0].name = "renamed".to_owned();
        b.native_size = 4;
        b.fields[0].native = NativeSlot::new(2, NativeType::I16);
        b.priority = 7;

        let schema_a = Schema::new(vec![a]).unwrap();
        let schema_b = Schema::new(vec![b]).unwrap();
        assert_eq!(schema_hash(&schema_a), schema_hash(&schema_b));
    }

    #[test]
    fn schema_hash_changes_with_tracking() {
        let a = component(1, &[("a", FieldKind::short(), NativeType::I16)]);
        let mut b = a.clone();
        b.fields[0].frame_tracked = true;

        let schema_a = Schema::new(vec![a]).unwrap();
        let schema_b = Schema::new(vec![b]).unwrap();
        assert_ne!(schema_hash(&schema_a), schema_hash(&schema_b));
    }

    #[test]
    fn schema_hash_changes_with_component_order() {
        let c1 = component(1, &[("a", FieldKind::bool(), NativeType::Bool8)]);
        let c2 = component(2, &[("a", FieldKind::uint(8), NativeType::U8)]);

        let schema_a = Schema::new(vec![c1.clone(), c2.clone()]).unwrap();
        let schema_b = Schema::new(vec![c2, c1]).unwrap();

        assert_ne!(schema_hash(&schema_a), schema_hash(&schema_b));
    }

    #[test]
    fn schema_hash_changes_with_range_min() {
        let a = component(1, &[("a", FieldKind::integer_range(8, 0), NativeType::I32)]);
        let b = component(1, &[("a", FieldKind::integer_range(8, -1), NativeType::I32)]);
        let schema_a = Schema::new(vec![a]).unwrap();
        let schema_b = Schema::new(vec![b]).unwrap();
        assert_ne!(schema_hash(&schema_a), schema_hash(&schema_b));
    }
}
