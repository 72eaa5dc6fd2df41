//! Multi-record messages: one header, then `[16-bit type id][record]` per
//! component, bit packed and zero padded to a byte.

use bitstream::{BitReader, BitWriter};
use schema::{schema_hash, ComponentTypeId, Schema};
use wire::{MessageHeader, HEADER_SIZE};

use crate::encode::{decode_record, encode_record, encoded_bit_len};
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;
use crate::record::DeltaRecord;
use crate::types::{ReferenceFrame, SimulationFrame};

const TYPE_ID_BITS: u8 = 16;

/// A decoded message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Reference frame carried by the header, whether or not it is valid.
    pub reference: ReferenceFrame,
    /// Records in the order they were sent.
    pub records: Vec<DeltaRecord>,
}

/// Encodes `records` behind a single header.
///
/// Records are written in the given order; every record's type must be
/// registered in `schema`.
pub fn encode_message(
    schema: &Schema,
    reference: ReferenceFrame,
    records: &[DeltaRecord],
    limits: &CodecLimits,
) -> CodecResult<Vec<u8>> {
    if records.len() > limits.max_components_per_message {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::ComponentsPerMessage,
            limit: limits.max_components_per_message,
            actual: records.len(),
        });
    }
    let component_count =
        u16::try_from(records.len()).map_err(|_| CodecError::LimitsExceeded {
            kind: LimitKind::ComponentsPerMessage,
            limit: usize::from(u16::MAX),
            actual: records.len(),
        })?;

    let mut payload_bits = 0;
    for record in records {
        let descriptor = descriptor_for(schema, record.type_id())?;
        payload_bits += usize::from(TYPE_ID_BITS) + encoded_bit_len(descriptor, record)?;
    }
    let message_len = HEADER_SIZE + payload_bits.div_ceil(8);
    if message_len > limits.max_message_bytes {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::MessageBytes,
            limit: limits.max_message_bytes,
            actual: message_len,
        });
    }

    let mut writer = BitWriter::with_capacity(payload_bits.div_ceil(8));
    for record in records {
        let descriptor = descriptor_for(schema, record.type_id())?;
        writer.write_bits(u64::from(record.type_id()), TYPE_ID_BITS)?;
        encode_record(descriptor, record, reference, &mut writer)?;
    }
    let payload = writer.finish();

    let header = MessageHeader::new(
        schema_hash(schema),
        reference.frame.raw(),
        reference.valid,
        component_count,
        0,
    );
    let mut out = Vec::with_capacity(message_len);
    wire::encode_message(header, &payload, &mut out)?;
    log::debug!(
        "encoded message with {} records, {} bytes",
        records.len(),
        out.len()
    );
    Ok(out)
}

/// Decodes a message produced by [`encode_message`].
///
/// The header must carry `schema`'s hash; each record's decoder is chosen by
/// its type id. Unknown type ids and non-padding bits after the last record
/// are errors.
pub fn decode_message(
    schema: &Schema,
    bytes: &[u8],
    limits: &CodecLimits,
) -> CodecResult<DecodedMessage> {
    let result = decode_message_inner(schema, bytes, limits);
    if let Err(err) = &result {
        log::debug!("rejected {}-byte message: {err}", bytes.len());
    }
    result
}

fn decode_message_inner(
    schema: &Schema,
    bytes: &[u8],
    limits: &CodecLimits,
) -> CodecResult<DecodedMessage> {
    let message = wire::decode_message(bytes, &limits.wire_limits())?;
    let header = message.header;
    let expected = schema_hash(schema);
    if header.schema_hash != expected {
        return Err(CodecError::SchemaMismatch {
            expected,
            found: header.schema_hash,
        });
    }

    let reference_frame = SimulationFrame::new(header.reference_frame);
    let reference = ReferenceFrame {
        frame: reference_frame,
        valid: header.flags.is_ref_frame_valid(),
    };
    let mut reader = BitReader::new(message.payload);
    let mut records = Vec::with_capacity(usize::from(header.component_count));
    for _ in 0..header.component_count {
        // 16 bits always fit.
        let type_id = reader.read_bits(TYPE_ID_BITS)? as ComponentTypeId;
        let descriptor = descriptor_for(schema, type_id)?;
        records.push(decode_record(descriptor, reference_frame, &mut reader)?);
    }
    if !reader.only_padding_remains() {
        return Err(CodecError::TrailingData {
            remaining_bits: reader.bits_remaining(),
        });
    }
    Ok(DecodedMessage { reference, records })
}

fn descriptor_for(
    schema: &Schema,
    type_id: ComponentTypeId,
) -> CodecResult<&schema::ComponentDescriptor> {
    schema
        .get(type_id)
        .ok_or(CodecError::UnknownComponentType { type_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::value::FieldValue;
    use schema::{ComponentDescriptor, FieldDef, FieldKind, NativeSlot, NativeType};

    fn schema() -> Schema {
        Schema::builder()
            .component(
                ComponentDescriptor::builder(16, "AssetId")
                    .field(FieldDef::new(
                        "value",
                        FieldKind::int32(),
                        NativeSlot::new(0, NativeType::I32),
                    ))
                    .field(FieldDef::new(
                        "isFromGroup",
                        FieldKind::bool(),
                        NativeSlot::new(4, NativeType::Bool8),
                    ))
                    .build()
                    .unwrap(),
            )
            .component(
                ComponentDescriptor::builder(116, "GenericFieldShort3")
                    .field(
                        FieldDef::new(
                            "number",
                            FieldKind::short(),
                            NativeSlot::new(0, NativeType::I16),
                        )
                        .tracked(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn records(schema: &Schema) -> Vec<DeltaRecord> {
        let asset = schema.get(16).unwrap();
        let short = schema.get(116).unwrap();
        let mut a = DeltaRecord::empty(asset);
        a.set(asset, 0, FieldValue::Int(-5), None).unwrap();
        let mut b = DeltaRecord::empty(short);
        b.set(short, 0, FieldValue::Int(12), Some(SimulationFrame::new(505)))
            .unwrap();
        b.stop(0).unwrap();
        vec![b, a]
    }

    fn reference() -> ReferenceFrame {
        ReferenceFrame::valid(SimulationFrame::new(500))
    }

    #[test]
    fn message_roundtrip_keeps_order() {
        let schema = schema();
        let records = records(&schema);
        let bytes =
            encode_message(&schema, reference(), &records, &CodecLimits::default()).unwrap();
        let decoded = decode_message(&schema, &bytes, &CodecLimits::default()).unwrap();
        assert_eq!(decoded.reference, reference());
        assert_eq!(decoded.records, records);
    }

    #[test]
    fn empty_message() {
        let schema = schema();
        let bytes = encode_message(&schema, reference(), &[], &CodecLimits::default()).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let decoded = decode_message(&schema, &bytes, &CodecLimits::default()).unwrap();
        assert!(decoded.records.is_empty());
    }

    #[test]
    fn schema_hash_mismatch_rejected() {
        let schema = schema();
        let bytes = encode_message(&schema, reference(), &records(&schema), &CodecLimits::default())
            .unwrap();
        let other = Schema::builder()
            .component(ComponentDescriptor::builder(16, "AssetId").build().unwrap())
            .build()
            .unwrap();
        assert!(matches!(
            decode_message(&other, &bytes, &CodecLimits::default()),
            Err(CodecError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn unknown_type_id_rejected() {
        let schema = schema();
        let stray = ComponentDescriptor::builder(99, "Stray").build().unwrap();
        let record = DeltaRecord::empty(&stray);
        assert_eq!(
            encode_message(&schema, reference(), &[record], &CodecLimits::default()),
            Err(CodecError::UnknownComponentType { type_id: 99 })
        );

        // Hand-built payload naming type 99.
        let mut writer = BitWriter::new();
        writer.write_bits(99, 16).unwrap();
        writer.write_bool(false);
        let payload = writer.finish();
        let header = MessageHeader::new(schema_hash(&schema), 0, false, 1, 0);
        let mut bytes = Vec::new();
        wire::encode_message(header, &payload, &mut bytes).unwrap();
        assert_eq!(
            decode_message(&schema, &bytes, &CodecLimits::default()),
            Err(CodecError::UnknownComponentType { type_id: 99 })
        );
    }

    #[test]
    fn component_count_larger_than_payload_is_exhaustion() {
        let schema = schema();
        let header = MessageHeader::new(schema_hash(&schema), 0, false, 2, 0);
        let mut writer = BitWriter::new();
        writer.write_bits(16, 16).unwrap();
        writer.write_bits(0, 3).unwrap();
        let mut bytes = Vec::new();
        wire::encode_message(header, &writer.finish(), &mut bytes).unwrap();
        let err = decode_message(&schema, &bytes, &CodecLimits::default()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::StreamExhaustion);
    }

    #[test]
    fn limits_enforced() {
        let schema = schema();
        let many: Vec<_> = (0..17)
            .map(|_| DeltaRecord::empty(schema.get(16).unwrap()))
            .collect();
        assert!(matches!(
            encode_message(&schema, reference(), &many, &CodecLimits::for_testing()),
            Err(CodecError::LimitsExceeded {
                kind: LimitKind::ComponentsPerMessage,
                ..
            })
        ));

        let bytes =
            encode_message(&schema, reference(), &many, &CodecLimits::default()).unwrap();
        assert!(matches!(
            decode_message(&schema, &bytes, &CodecLimits::for_testing()),
            Err(CodecError::Wire(wire::DecodeError::LimitsExceeded { .. }))
        ));
    }
}
