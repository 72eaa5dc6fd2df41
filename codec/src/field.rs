//! Per-field encoding: simulation-frame deltas and value payloads.
//!
//! A present field is written as `[8-bit frame delta, tracked only][value]`.
//! The presence bit itself belongs to the record layout.

use bitstream::{BitReader, BitWriter};
use schema::{ComponentTypeId, FieldDef, FieldKind, FRAME_DELTA_BITS};

use crate::error::{CodecError, CodecResult};
use crate::types::{EntityId, ReferenceFrame, SimulationFrame};
use crate::value::FieldValue;

/// Computes the 8-bit frame delta for a tracked field.
///
/// With a valid reference the delta is `field - reference` clamped to
/// `[0, 255]`; fields newer than the reference clamp to zero. Without a
/// valid reference the delta is always zero.
#[must_use]
pub fn frame_delta(field: SimulationFrame, reference: ReferenceFrame) -> u8 {
    if !reference.valid {
        return 0;
    }
    let delta = i128::from(field.raw()) - i128::from(reference.frame.raw());
    // Clamped into u8 range.
    delta.clamp(0, i128::from(u8::MAX)) as u8
}

/// Reconstructs a field frame from the reference and its decoded delta.
#[must_use]
pub const fn apply_frame_delta(reference: SimulationFrame, delta: u8) -> SimulationFrame {
    reference.offset(delta)
}

/// Writes one present field of component `type_id`: frame delta if tracked,
/// then its value.
pub fn write_field(
    writer: &mut BitWriter,
    type_id: ComponentTypeId,
    index: usize,
    def: &FieldDef,
    value: &FieldValue,
    frame: Option<SimulationFrame>,
    reference: ReferenceFrame,
) -> CodecResult<()> {
    value
        .check(def.kind)
        .map_err(|reason| CodecError::InvalidValue {
            type_id,
            field: index,
            reason,
        })?;
    if def.frame_tracked {
        let delta = frame.map_or(0, |frame| frame_delta(frame, reference));
        writer.write_bits(u64::from(delta), FRAME_DELTA_BITS)?;
    }
    write_value(writer, def.kind, *value)
}

/// Reads one present field, returning its value and, if tracked, its frame.
pub fn read_field(
    reader: &mut BitReader<'_>,
    def: &FieldDef,
    reference: SimulationFrame,
) -> CodecResult<(FieldValue, Option<SimulationFrame>)> {
    let frame = if def.frame_tracked {
        let delta = reader.read_byte()?;
        Some(apply_frame_delta(reference, delta))
    } else {
        None
    };
    let value = read_value(reader, def.kind)?;
    Ok((value, frame))
}

fn write_value(writer: &mut BitWriter, kind: FieldKind, value: FieldValue) -> CodecResult<()> {
    match (kind, value) {
        (FieldKind::Bool, FieldValue::Bool(v)) => writer.write_bool(v),
        (FieldKind::IntegerRange { bits, min }, FieldValue::Int(v)) => {
            writer.write_integer_range(v, bits, min)?;
        }
        (FieldKind::SInt { bits }, FieldValue::Int(v)) => writer.write_int(v, bits)?,
        (FieldKind::UInt { bits }, FieldValue::UInt(v)) => writer.write_uint(v, bits)?,
        (FieldKind::Float32, FieldValue::Float(v)) => writer.write_float(v),
        (FieldKind::EntityRef, FieldValue::Entity(id)) => {
            if let Some(id) = id {
                writer.write_mask(true);
                writer.write_bits(u64::from(id.raw()), 32)?;
            } else {
                writer.write_mask(false);
            }
        }
        // `write_field` checks the variant before getting here.
        _ => {}
    }
    Ok(())
}

/// Reads a value payload for `kind`.
pub fn read_value(reader: &mut BitReader<'_>, kind: FieldKind) -> CodecResult<FieldValue> {
    let value = match kind {
        FieldKind::Bool => FieldValue::Bool(reader.read_bool()?),
        FieldKind::IntegerRange { bits, min } => {
            FieldValue::Int(reader.read_integer_range(bits, min)?)
        }
        FieldKind::SInt { bits } => FieldValue::Int(reader.read_int(bits)?),
        FieldKind::UInt { bits } => FieldValue::UInt(reader.read_uint(bits)?),
        FieldKind::Float32 => FieldValue::Float(reader.read_float()?),
        FieldKind::EntityRef => {
            if reader.read_mask()? {
                // 32 bits always fit in u32.
                let raw = reader.read_bits(32)? as u32;
                FieldValue::Entity(Some(EntityId::new(raw)))
            } else {
                FieldValue::Entity(None)
            }
        }
    };
    Ok(value)
}

/// Bits a present value costs on the wire, excluding the frame delta.
///
/// Unset entity references cost one bit.
#[must_use]
pub fn value_bits(kind: FieldKind, value: &FieldValue) -> usize {
    match (kind, value) {
        (FieldKind::EntityRef, FieldValue::Entity(None)) => 1,
        _ => kind.bit_width() as usize,
    }
}
