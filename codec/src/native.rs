//! Conversion between fixed-layout native blocks and records.
//!
//! Every field owns an explicit `(offset, native type)` slot. Reads and
//! writes are bounds-checked and little-endian.

use schema::{ComponentDescriptor, FieldDef, FieldKind, NativeType, SchemaError};

use crate::error::{CodecError, CodecResult, ValueReason};
use crate::record::DeltaRecord;
use crate::types::{EntityId, SimulationFrame};
use crate::value::FieldValue;

/// Builds a record from a native block and one frame per tracked field.
///
/// Every field of the result is present; tracked fields take their frames
/// from `frames` in declaration order. A native value outside its field's
/// encodable range fails with [`CodecError::InvalidValue`].
pub fn import_native(
    descriptor: &ComponentDescriptor,
    block: &[u8],
    frames: &[SimulationFrame],
) -> CodecResult<DeltaRecord> {
    let type_id = descriptor.type_id;
    if block.len() != descriptor.native_size {
        return Err(CodecError::SizeMismatch {
            type_id,
            expected: descriptor.native_size,
            actual: block.len(),
        });
    }
    let tracked = descriptor.tracked_field_count();
    if frames.len() != tracked {
        return Err(CodecError::FrameCountMismatch {
            type_id,
            expected: tracked,
            actual: frames.len(),
        });
    }

    let mut record = DeltaRecord::empty(descriptor);
    let mut frames = frames.iter().copied();
    for (index, def) in descriptor.fields.iter().enumerate() {
        let bytes = slot(descriptor, index, def, block.len())
            .map(|range| &block[range])?;
        let value = to_value(descriptor, index, def, read_native(def.native.ty, bytes))?;
        value
            .check(def.kind)
            .map_err(|reason| CodecError::InvalidValue {
                type_id,
                field: index,
                reason,
            })?;
        let frame = if def.frame_tracked { frames.next() } else { None };
        record.insert(index, value, frame);
    }
    log::trace!(
        "imported component {type_id} from {} native bytes",
        block.len()
    );
    Ok(record)
}

/// Writes the present fields of `record` into a native block.
///
/// Fields absent from the record keep their existing bytes.
pub fn export_native(
    descriptor: &ComponentDescriptor,
    record: &DeltaRecord,
    block: &mut [u8],
) -> CodecResult<()> {
    record.check_descriptor(descriptor)?;
    let type_id = descriptor.type_id;
    if block.len() != descriptor.native_size {
        return Err(CodecError::SizeMismatch {
            type_id,
            expected: descriptor.native_size,
            actual: block.len(),
        });
    }
    for (index, value, _) in record.present() {
        let def = &descriptor.fields[index];
        let range = slot(descriptor, index, def, block.len())?;
        let ty = def.native.ty;
        let out = &mut block[range];
        match (value, ty) {
            (FieldValue::Bool(v), NativeType::Bool8) => out[0] = u8::from(v),
            (FieldValue::Float(v), NativeType::F32) => out.copy_from_slice(&v.to_le_bytes()),
            (FieldValue::Entity(id), NativeType::Entity32) => {
                let raw = match id {
                    None => 0,
                    Some(id) if id.raw() != 0 => id.raw(),
                    Some(_) => {
                        return Err(CodecError::InvalidValue {
                            type_id,
                            field: index,
                            reason: ValueReason::OutOfRange {
                                value: 0,
                                min: 1,
                                max: i128::from(u32::MAX),
                            },
                        })
                    }
                };
                out.copy_from_slice(&raw.to_le_bytes());
            }
            (FieldValue::Int(_) | FieldValue::UInt(_), _) => {
                let wide = match value {
                    FieldValue::Int(v) => i128::from(v),
                    FieldValue::UInt(v) => i128::from(v),
                    _ => 0,
                };
                let Some((min, max)) = integer_bounds(ty) else {
                    return Err(incompatible(descriptor, index, def));
                };
                if wide < min || wide > max {
                    return Err(CodecError::InvalidValue {
                        type_id,
                        field: index,
                        reason: ValueReason::OutOfRange {
                            value: wide,
                            min,
                            max,
                        },
                    });
                }
                // Two's complement truncation is exact for in-range values.
                out.copy_from_slice(&wide.to_le_bytes()[..ty.size()]);
            }
            _ => return Err(incompatible(descriptor, index, def)),
        }
    }
    Ok(())
}

/// Raw scalar read from a native slot.
#[derive(Debug, Clone, Copy)]
enum Native {
    Signed(i64),
    Unsigned(u64),
    Float(f32),
}

fn slot(
    descriptor: &ComponentDescriptor,
    index: usize,
    def: &FieldDef,
    len: usize,
) -> CodecResult<std::ops::Range<usize>> {
    let start = def.native.offset;
    let end = def.native.end();
    if end > len {
        return Err(CodecError::NativeSlotOutOfBounds {
            type_id: descriptor.type_id,
            field: index,
            end,
            len,
        });
    }
    Ok(start..end)
}

fn read_native(ty: NativeType, bytes: &[u8]) -> Native {
    match ty {
        NativeType::Bool8 | NativeType::U8 => Native::Unsigned(u64::from(bytes[0])),
        NativeType::I8 => Native::Signed(i64::from(i8::from_le_bytes(le(bytes)))),
        NativeType::I16 => Native::Signed(i64::from(i16::from_le_bytes(le(bytes)))),
        NativeType::U16 => Native::Unsigned(u64::from(u16::from_le_bytes(le(bytes)))),
        NativeType::I32 => Native::Signed(i64::from(i32::from_le_bytes(le(bytes)))),
        NativeType::U32 | NativeType::Entity32 => {
            Native::Unsigned(u64::from(u32::from_le_bytes(le(bytes))))
        }
        NativeType::I64 => Native::Signed(i64::from_le_bytes(le(bytes))),
        NativeType::U64 => Native::Unsigned(u64::from_le_bytes(le(bytes))),
        NativeType::F32 => Native::Float(f32::from_le_bytes(le(bytes))),
    }
}

fn to_value(
    descriptor: &ComponentDescriptor,
    index: usize,
    def: &FieldDef,
    native: Native,
) -> CodecResult<FieldValue> {
    let value = match (def.kind, def.native.ty, native) {
        (FieldKind::Bool, NativeType::Bool8, Native::Unsigned(raw)) => FieldValue::Bool(raw != 0),
        (FieldKind::EntityRef, NativeType::Entity32, Native::Unsigned(raw)) => {
            // Read from a 4-byte slot.
            let raw = raw as u32;
            FieldValue::Entity((raw != 0).then(|| EntityId::new(raw)))
        }
        (FieldKind::Float32, NativeType::F32, Native::Float(v)) => FieldValue::Float(v),
        (FieldKind::IntegerRange { .. } | FieldKind::SInt { .. }, _, Native::Signed(v)) => {
            FieldValue::Int(v)
        }
        (FieldKind::IntegerRange { .. } | FieldKind::SInt { .. }, ty, Native::Unsigned(v))
            if matches!(ty, NativeType::U8 | NativeType::U16 | NativeType::U32) =>
        {
            // At most 32 bits wide.
            FieldValue::Int(v as i64)
        }
        (FieldKind::UInt { .. }, ty, Native::Unsigned(v))
            if !matches!(ty, NativeType::Bool8 | NativeType::Entity32) =>
        {
            FieldValue::UInt(v)
        }
        _ => return Err(incompatible(descriptor, index, def)),
    };
    Ok(value)
}

const fn integer_bounds(ty: NativeType) -> Option<(i128, i128)> {
    let bounds = match ty {
        NativeType::I8 => (i8::MIN as i128, i8::MAX as i128),
        NativeType::U8 => (0, u8::MAX as i128),
        NativeType::I16 => (i16::MIN as i128, i16::MAX as i128),
        NativeType::U16 => (0, u16::MAX as i128),
        NativeType::I32 => (i32::MIN as i128, i32::MAX as i128),
        NativeType::U32 => (0, u32::MAX as i128),
        NativeType::I64 => (i64::MIN as i128, i64::MAX as i128),
        NativeType::U64 => (0, u64::MAX as i128),
        NativeType::Bool8 | NativeType::F32 | NativeType::Entity32 => return None,
    };
    Some(bounds)
}

fn incompatible(descriptor: &ComponentDescriptor, index: usize, def: &FieldDef) -> CodecError {
    CodecError::Schema(SchemaError::IncompatibleNativeType {
        type_id: descriptor.type_id,
        field: index,
        kind: def.kind.name(),
        native: def.native.ty,
    })
}

fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}
