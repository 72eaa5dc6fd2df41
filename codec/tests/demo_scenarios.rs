use codec::{
    decode_message, decode_record_from_slice, encode_message, encode_record_to_vec,
    export_native, import_native, merge, CodecError, CodecLimits, DeltaRecord, EntityId,
    EntityMapper, FailureKind, FieldValue, MapError, ReferenceFrame, SimulationFrame,
};
use demo_schema::{ASSET_ID, CONNECTED_ENTITY, GENERIC_FIELD_SHORT3};
use schema::{FieldMask, Schema};

fn schema() -> Schema {
    demo_schema::demo_schema().unwrap()
}

#[test]
fn asset_id_value_only_bytes() {
    let schema = schema();
    let desc = schema.get(ASSET_ID).unwrap();
    let mut record = DeltaRecord::empty(desc);
    record.set(desc, 0, FieldValue::Int(-5), None).unwrap();

    let reference = ReferenceFrame::valid(SimulationFrame::new(77));
    let bytes = encode_record_to_vec(desc, &record, reference).unwrap();
    assert_eq!(bytes, [0x5F, 0xFF, 0xFF, 0xFE, 0xC0]);

    let decoded = decode_record_from_slice(desc, reference.frame, &bytes).unwrap();
    assert_eq!(decoded.value(0), Some(FieldValue::Int(-5)));
    assert_eq!(decoded.value(1), None);
    assert_eq!(decoded.fields_mask(), FieldMask::bit(0));
    assert_eq!(
        decoded.display(desc).to_string(),
        "AssetId( value: -5 isFromGroup: - Mask: 0b01, Stopped: 0b00)"
    );
}

#[test]
fn merge_after_partial_updates() {
    let schema = schema();
    let desc = schema.get(ASSET_ID).unwrap();

    let mut native = 1i32.to_le_bytes().to_vec();
    native.push(1);
    let mut base = import_native(desc, &native, &[]).unwrap();

    let mut incoming = DeltaRecord::empty(desc);
    incoming.set(desc, 0, FieldValue::Int(2), None).unwrap();
    incoming.stop(1).unwrap();

    // Through the wire, as a receiver would see it.
    let reference = ReferenceFrame::invalid(SimulationFrame::new(0));
    let bytes = encode_record_to_vec(desc, &incoming, reference).unwrap();
    let incoming = decode_record_from_slice(desc, reference.frame, &bytes).unwrap();

    merge(&mut base, &incoming).unwrap();
    assert_eq!(base.value(0), Some(FieldValue::Int(2)));
    assert_eq!(base.value(1), Some(FieldValue::Bool(true)));
    assert_eq!(base.fields_mask().raw(), 0b11);
    assert_eq!(base.stopped_mask().raw(), 0b10);

    let mut out = [0u8; 5];
    export_native(desc, &base, &mut out).unwrap();
    assert_eq!(out, [2, 0, 0, 0, 1]);
}

#[test]
fn tracked_field_pipeline() {
    let schema = schema();
    let desc = schema.get(GENERIC_FIELD_SHORT3).unwrap();
    let reference = ReferenceFrame::valid(SimulationFrame::new(5_000));

    let fresh = import_native(desc, &(-12i16).to_le_bytes(), &[SimulationFrame::new(5_010)])
        .unwrap();
    let stale = import_native(desc, &9i16.to_le_bytes(), &[SimulationFrame::new(9_000)])
        .unwrap();

    let decoded_fresh = decode_record_from_slice(
        desc,
        reference.frame,
        &encode_record_to_vec(desc, &fresh, reference).unwrap(),
    )
    .unwrap();
    assert_eq!(decoded_fresh.frame(0), Some(SimulationFrame::new(5_010)));
    assert_eq!(decoded_fresh.min_simulation_frame(), Some(SimulationFrame::new(5_010)));

    let decoded_stale = decode_record_from_slice(
        desc,
        reference.frame,
        &encode_record_to_vec(desc, &stale, reference).unwrap(),
    )
    .unwrap();
    assert_eq!(decoded_stale.frame(0), Some(SimulationFrame::new(5_255)));
    assert_eq!(decoded_stale.value(0), Some(FieldValue::Int(9)));
}

#[test]
fn importer_rejects_mismatched_inputs() {
    let schema = schema();
    let short = schema.get(GENERIC_FIELD_SHORT3).unwrap();
    let err = import_native(short, &[0; 3], &[SimulationFrame::new(0)]).unwrap_err();
    assert_eq!(err.kind(), FailureKind::SchemaViolation);
    assert!(matches!(err, CodecError::SizeMismatch { expected: 2, actual: 3, .. }));

    let err = import_native(short, &[0; 2], &[]).unwrap_err();
    assert!(matches!(
        err,
        CodecError::FrameCountMismatch { expected: 1, actual: 0, .. }
    ));
}

#[test]
fn truncated_records_never_default() {
    let schema = schema();
    let desc = schema.get(GENERIC_FIELD_SHORT3).unwrap();
    let mut record = DeltaRecord::empty(desc);
    record.reset_frame(desc, SimulationFrame::new(3)).unwrap();
    record.stop(0).unwrap();
    let reference = ReferenceFrame::valid(SimulationFrame::new(0));
    let bytes = encode_record_to_vec(desc, &record, reference).unwrap();

    for len in 0..bytes.len() {
        let result = decode_record_from_slice(desc, reference.frame, &bytes[..len]);
        assert!(
            matches!(result, Err(CodecError::StreamExhausted { .. })),
            "len {len}: {result:?}"
        );
    }
}

struct Offset(u32);

impl EntityMapper for Offset {
    fn to_absolute(&mut self, relative: EntityId) -> Result<EntityId, MapError> {
        relative
            .raw()
            .checked_add(self.0)
            .map(EntityId::new)
            .ok_or(MapError::Unknown(relative))
    }

    fn to_relative(&mut self, absolute: EntityId) -> Result<EntityId, MapError> {
        absolute
            .raw()
            .checked_sub(self.0)
            .map(EntityId::new)
            .ok_or(MapError::Rejected(absolute))
    }
}

#[test]
fn message_with_entity_mapping() {
    let schema = schema();
    let connected = schema.get(CONNECTED_ENTITY).unwrap();
    let asset = schema.get(ASSET_ID).unwrap();
    let mut mapper = Offset(1_000);

    let mut link = import_native(connected, &1_042u32.to_le_bytes(), &[]).unwrap();
    link.ref_fields(connected)
        .unwrap()
        .map_to_relative(&mut mapper)
        .unwrap();
    assert_eq!(link.value(0), Some(FieldValue::Entity(Some(EntityId::new(42)))));

    let mut tag = DeltaRecord::empty(asset);
    tag.set(asset, 1, FieldValue::Bool(true), None).unwrap();

    let reference = ReferenceFrame::valid(SimulationFrame::new(10));
    let records = vec![link, tag];
    let bytes = encode_message(&schema, reference, &records, &CodecLimits::default()).unwrap();
    let mut decoded = decode_message(&schema, &bytes, &CodecLimits::default()).unwrap();
    assert_eq!(decoded.records, records);

    let link = &mut decoded.records[0];
    let mut refs = link.ref_fields(connected).unwrap();
    refs.map_to_absolute(&mut mapper).unwrap();
    assert_eq!(
        refs.entity_refs().into_iter().collect::<Vec<_>>(),
        vec![EntityId::new(1_042)]
    );
    assert!(decoded.records[1].ref_fields(asset).is_none());
}

#[test]
fn message_rejects_foreign_schema() {
    let schema = schema();
    let asset = schema.get(ASSET_ID).unwrap();
    let record = DeltaRecord::empty(asset);
    let bytes = encode_message(
        &schema,
        ReferenceFrame::default(),
        &[record],
        &CodecLimits::default(),
    )
    .unwrap();

    let smaller = Schema::builder()
        .component(demo_schema::asset_id().unwrap())
        .build()
        .unwrap();
    assert!(matches!(
        decode_message(&smaller, &bytes, &CodecLimits::default()),
        Err(CodecError::SchemaMismatch { .. })
    ));
}

#[test]
fn scheduling_keys_roundtrip_untouched() {
    let schema = schema();
    for desc in &schema.components {
        assert_eq!(desc.priority, schema::DEFAULT_PRIORITY);
        assert_eq!(desc.order, 0);
        assert!(!desc.send_ordered);
    }
    let hash = schema::schema_hash(&schema);
    let mut reprioritized = schema.clone();
    reprioritized.components[0].priority = 5;
    assert_eq!(schema::schema_hash(&reprioritized), hash);
}
