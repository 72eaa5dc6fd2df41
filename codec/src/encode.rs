//! Record encoding and decoding.
//!
//! Layout of one record with `N` fields:
//!
//! ```text
//! [1: has-stopped] [N: stopped mask, only if has-stopped]
//! { [1: present] [8: frame delta, tracked only] [value bits] } x N
//! ```
//!
//! Absent fields cost their presence bit only.

use bitstream::{BitReader, BitWriter};
use schema::{ComponentDescriptor, FieldMask, SchemaError, MAX_FIELDS};

use crate::error::{CodecError, CodecResult};
use crate::field::{read_field, value_bits, write_field};
use crate::record::DeltaRecord;
use crate::types::{ReferenceFrame, SimulationFrame};

/// Encodes `record` into `writer`.
///
/// The record is validated against `descriptor` before anything is written,
/// so a failed encode leaves `writer` unchanged.
pub fn encode_record(
    descriptor: &ComponentDescriptor,
    record: &DeltaRecord,
    reference: ReferenceFrame,
    writer: &mut BitWriter,
) -> CodecResult<()> {
    validate_record(descriptor, record)?;
    let start = writer.bits_written();
    let field_count = descriptor.field_count();

    if writer.write_mask(!record.stopped_mask.is_empty()) {
        // Validated above: at most 32 fields.
        writer.write_mask_bits(record.stopped_mask.raw(), field_count as u8)?;
    }
    for (index, def) in descriptor.fields.iter().enumerate() {
        let value = record.values[index];
        if writer.write_mask(value.is_some()) {
            if let Some(value) = value {
                write_field(
                    writer,
                    descriptor.type_id,
                    index,
                    def,
                    &value,
                    record.frames[index],
                    reference,
                )?;
            }
        }
    }

    log::trace!(
        "encoded component {} mask 0b{:b} stopped 0b{:b} in {} bits",
        descriptor.type_id,
        record.fields_mask,
        record.stopped_mask,
        writer.bits_written() - start
    );
    Ok(())
}

/// Encodes `record` into a fresh, zero-padded byte buffer.
pub fn encode_record_to_vec(
    descriptor: &ComponentDescriptor,
    record: &DeltaRecord,
    reference: ReferenceFrame,
) -> CodecResult<Vec<u8>> {
    let bits = encoded_bit_len(descriptor, record)?;
    let mut writer = BitWriter::with_capacity(bits.div_ceil(8));
    encode_record(descriptor, record, reference, &mut writer)?;
    Ok(writer.finish())
}

/// Decodes one record, reconstructing tracked frames from `reference`.
///
/// Running out of input is reported as [`CodecError::StreamExhausted`];
/// fields are never defaulted.
pub fn decode_record(
    descriptor: &ComponentDescriptor,
    reference: SimulationFrame,
    reader: &mut BitReader<'_>,
) -> CodecResult<DeltaRecord> {
    check_field_count(descriptor)?;
    let start = reader.bit_position();
    let field_count = descriptor.field_count();
    let mut record = DeltaRecord::empty(descriptor);

    if reader.read_mask()? {
        // Checked above: at most 32 fields.
        let stopped = reader.read_mask_bits(field_count as u8)?;
        record.stopped_mask = FieldMask::from_raw(stopped);
    }
    for (index, def) in descriptor.fields.iter().enumerate() {
        if reader.read_mask()? {
            let (value, frame) = read_field(reader, def, reference)?;
            record.insert(index, value, frame);
        }
    }

    log::trace!(
        "decoded component {} mask 0b{:b} stopped 0b{:b} from {} bits",
        descriptor.type_id,
        record.fields_mask,
        record.stopped_mask,
        reader.bit_position() - start
    );
    Ok(record)
}

/// Decodes a buffer holding exactly one record plus zero padding.
pub fn decode_record_from_slice(
    descriptor: &ComponentDescriptor,
    reference: SimulationFrame,
    bytes: &[u8],
) -> CodecResult<DeltaRecord> {
    let mut reader = BitReader::new(bytes);
    let record = decode_record(descriptor, reference, &mut reader)?;
    if !reader.only_padding_remains() {
        return Err(CodecError::TrailingData {
            remaining_bits: reader.bits_remaining(),
        });
    }
    Ok(record)
}

/// Exact number of bits [`encode_record`] writes for `record`.
pub fn encoded_bit_len(descriptor: &ComponentDescriptor, record: &DeltaRecord) -> CodecResult<usize> {
    record.check_descriptor(descriptor)?;
    let mut bits = 1;
    if !record.stopped_mask.is_empty() {
        bits += descriptor.field_count();
    }
    for (index, def) in descriptor.fields.iter().enumerate() {
        bits += 1;
        if let Some(value) = &record.values[index] {
            if def.frame_tracked {
                bits += usize::from(schema::FRAME_DELTA_BITS);
            }
            bits += value_bits(def.kind, value);
        }
    }
    Ok(bits)
}

/// Upper bound on the encoded size of any record of this type: every field
/// present and the stopped mask written.
#[must_use]
pub fn max_encoded_bits(descriptor: &ComponentDescriptor) -> usize {
    let fields: usize = descriptor
        .fields
        .iter()
        .map(|def| 1 + def.payload_bits())
        .sum();
    1 + descriptor.field_count() + fields
}

fn check_field_count(descriptor: &ComponentDescriptor) -> CodecResult<()> {
    if descriptor.field_count() > MAX_FIELDS {
        return Err(CodecError::Schema(SchemaError::TooManyFields {
            type_id: descriptor.type_id,
            count: descriptor.field_count(),
            max: MAX_FIELDS,
        }));
    }
    Ok(())
}

fn validate_record(descriptor: &ComponentDescriptor, record: &DeltaRecord) -> CodecResult<()> {
    check_field_count(descriptor)?;
    record.check_descriptor(descriptor)?;
    if !record
        .initial_fields_mask()
        .is_superset_of(record.stopped_mask)
    {
        return Err(CodecError::InvalidStoppedMask {
            type_id: record.type_id,
            mask: record.stopped_mask.raw(),
            field_count: record.field_count(),
        });
    }
    for (index, value, _) in record.present() {
        value
            .check(descriptor.fields[index].kind)
            .map_err(|reason| CodecError::InvalidValue {
                type_id: descriptor.type_id,
                field: index,
                reason,
            })?;
    }
    Ok(())
}
