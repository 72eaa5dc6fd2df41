//! Merging partial updates into accumulated component state.

use crate::error::{CodecError, CodecResult};
use crate::record::DeltaRecord;

/// Merges `incoming` into `base` in place.
///
/// Driven by `incoming`'s fields mask:
/// 1. every field `incoming` presents becomes present in `base`;
/// 2. re-presented fields lose their stopped bit;
/// 3. their values and frames are copied, last writer wins;
/// 4. `incoming`'s stopped bits are added.
///
/// Merging the same `incoming` twice yields the same result as merging it
/// once. Records of different types are rejected and `base` is left
/// untouched.
pub fn merge(base: &mut DeltaRecord, incoming: &DeltaRecord) -> CodecResult<()> {
    if base.type_id != incoming.type_id {
        log::debug!(
            "rejecting merge of component {} into {}",
            incoming.type_id,
            base.type_id
        );
        return Err(CodecError::TypeMismatch {
            expected: base.type_id,
            found: incoming.type_id,
        });
    }
    if base.field_count() != incoming.field_count() {
        log::debug!(
            "rejecting merge for component {}: {} fields vs {}",
            base.type_id,
            base.field_count(),
            incoming.field_count()
        );
        return Err(CodecError::FieldCountMismatch {
            type_id: base.type_id,
            expected: base.field_count(),
            actual: incoming.field_count(),
        });
    }

    let mask = incoming.fields_mask;
    base.fields_mask |= mask;
    base.stopped_mask &= !mask;
    for index in mask.iter() {
        base.values[index] = incoming.values[index];
        base.frames[index] = incoming.frames[index];
    }
    base.stopped_mask |= incoming.stopped_mask;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimulationFrame;
    use crate::value::FieldValue;
    use schema::{ComponentDescriptor, FieldDef, FieldKind, FieldMask, NativeSlot, NativeType};

    fn pair() -> ComponentDescriptor {
        ComponentDescriptor::builder(9, "Pair")
            .field(FieldDef::new(
                "a",
                FieldKind::int32(),
                NativeSlot::new(0, NativeType::I32),
            ))
            .field(FieldDef::new(
                "b",
                FieldKind::bool(),
                NativeSlot::new(4, NativeType::Bool8),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn merge_after_partial_update() {
        let desc = pair();
        let mut base = DeltaRecord::empty(&desc);
        base.set(&desc, 0, FieldValue::Int(1), None).unwrap();
        base.set(&desc, 1, FieldValue::Bool(true), None).unwrap();

        let mut incoming = DeltaRecord::empty(&desc);
        incoming.set(&desc, 0, FieldValue::Int(2), None).unwrap();
        incoming.stop(1).unwrap();

        merge(&mut base, &incoming).unwrap();
        assert_eq!(base.value(0), Some(FieldValue::Int(2)));
        assert_eq!(base.value(1), Some(FieldValue::Bool(true)));
        assert_eq!(base.fields_mask().raw(), 0b11);
        assert_eq!(base.stopped_mask().raw(), 0b10);
    }

    #[test]
    fn represented_field_is_unstopped() {
        let desc = pair();
        let mut base = DeltaRecord::empty(&desc);
        base.stop(0).unwrap();

        let mut incoming = DeltaRecord::empty(&desc);
        incoming.set(&desc, 0, FieldValue::Int(3), None).unwrap();

        merge(&mut base, &incoming).unwrap();
        assert!(base.stopped_mask().is_empty());
        assert_eq!(base.value(0), Some(FieldValue::Int(3)));
    }

    #[test]
    fn incoming_stop_wins_over_its_own_presence() {
        let desc = pair();
        let mut base = DeltaRecord::empty(&desc);
        let mut incoming = DeltaRecord::empty(&desc);
        incoming.set(&desc, 0, FieldValue::Int(3), None).unwrap();
        incoming.stop(0).unwrap();

        merge(&mut base, &incoming).unwrap();
        assert_eq!(base.stopped_mask(), FieldMask::bit(0));
    }

    #[test]
    fn last_writer_wins_without_frame_comparison() {
        let desc = ComponentDescriptor::builder(2, "Tracked")
            .field(
                FieldDef::new("n", FieldKind::short(), NativeSlot::new(0, NativeType::I16))
                    .tracked(),
            )
            .build()
            .unwrap();
        let mut base = DeltaRecord::empty(&desc);
        base.set(&desc, 0, FieldValue::Int(10), Some(SimulationFrame::new(100)))
            .unwrap();
        let mut older = DeltaRecord::empty(&desc);
        older
            .set(&desc, 0, FieldValue::Int(5), Some(SimulationFrame::new(50)))
            .unwrap();

        merge(&mut base, &older).unwrap();
        assert_eq!(base.value(0), Some(FieldValue::Int(5)));
        assert_eq!(base.frame(0), Some(SimulationFrame::new(50)));
    }

    #[test]
    fn merge_is_idempotent() {
        let desc = pair();
        let mut base = DeltaRecord::empty(&desc);
        base.set(&desc, 1, FieldValue::Bool(false), None).unwrap();
        let mut incoming = DeltaRecord::empty(&desc);
        incoming.set(&desc, 0, FieldValue::Int(-1), None).unwrap();
        incoming.stop(1).unwrap();

        merge(&mut base, &incoming).unwrap();
        let once = base.clone();
        merge(&mut base, &incoming).unwrap();
        assert_eq!(base, once);
    }

    #[test]
    fn type_mismatch_leaves_base_untouched() {
        let desc = pair();
        let other = ComponentDescriptor::builder(10, "Other")
            .field(FieldDef::new(
                "a",
                FieldKind::int32(),
                NativeSlot::new(0, NativeType::I32),
            ))
            .field(FieldDef::new(
                "b",
                FieldKind::bool(),
                NativeSlot::new(4, NativeType::Bool8),
            ))
            .build()
            .unwrap();
        let mut base = DeltaRecord::empty(&desc);
        base.set(&desc, 0, FieldValue::Int(1), None).unwrap();
        let before = base.clone();

        let mut incoming = DeltaRecord::empty(&other);
        incoming.set(&other, 0, FieldValue::Int(2), None).unwrap();

        assert_eq!(
            merge(&mut base, &incoming),
            Err(CodecError::TypeMismatch {
                expected: 9,
                found: 10
            })
        );
        assert_eq!(base, before);
    }
}
