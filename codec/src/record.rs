//! The delta-state record: one component's field values, presence and
//! freshness.

use std::fmt;

use schema::{ComponentDescriptor, ComponentTypeId, FieldMask};

use crate::error::{CodecError, CodecResult, ValueReason};
use crate::types::SimulationFrame;
use crate::value::FieldValue;

/// Runtime state of one component on one entity.
///
/// Invariants, kept by every mutating method:
/// - bit `i` of the fields mask is set exactly when `values[i]` is `Some`;
/// - `frames[i]` is `Some` exactly when field `i` is present and frame-tracked;
/// - the stopped mask only names existing fields, independent of presence.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    pub(crate) type_id: ComponentTypeId,
    pub(crate) values: Vec<Option<FieldValue>>,
    pub(crate) frames: Vec<Option<SimulationFrame>>,
    pub(crate) fields_mask: FieldMask,
    pub(crate) stopped_mask: FieldMask,
}

impl DeltaRecord {
    /// Creates a record with no fields present and nothing stopped.
    #[must_use]
    pub fn empty(descriptor: &ComponentDescriptor) -> Self {
        let count = descriptor.field_count();
        Self {
            type_id: descriptor.type_id,
            values: vec![None; count],
            frames: vec![None; count],
            fields_mask: FieldMask::EMPTY,
            stopped_mask: FieldMask::EMPTY,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the type declares at least one field.
    #[must_use]
    pub fn has_fields(&self) -> bool {
        !self.values.is_empty()
    }

    /// Mask with one bit per declared field.
    #[must_use]
    pub fn initial_fields_mask(&self) -> FieldMask {
        FieldMask::first(self.field_count())
    }

    #[must_use]
    pub const fn fields_mask(&self) -> FieldMask {
        self.fields_mask
    }

    #[must_use]
    pub const fn stopped_mask(&self) -> FieldMask {
        self.stopped_mask
    }

    /// Returns `true` if nothing is present and nothing is stopped.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields_mask.is_empty() && self.stopped_mask.is_empty()
    }

    /// Value of field `index`, if present.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<FieldValue> {
        self.values.get(index).copied().flatten()
    }

    /// Last-update frame of field `index`, if present and tracked.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<SimulationFrame> {
        self.frames.get(index).copied().flatten()
    }

    /// Present fields in ascending index order.
    pub fn present(&self) -> impl Iterator<Item = (usize, FieldValue, Option<SimulationFrame>)> + '_ {
        self.fields_mask.iter().filter_map(move |index| {
            self.values[index].map(|value| (index, value, self.frames[index]))
        })
    }

    /// Sets field `index`, marking it present.
    ///
    /// `frame` must be `Some` for frame-tracked fields and `None` otherwise.
    pub fn set(
        &mut self,
        descriptor: &ComponentDescriptor,
        index: usize,
        value: FieldValue,
        frame: Option<SimulationFrame>,
    ) -> CodecResult<()> {
        self.check_descriptor(descriptor)?;
        let def = descriptor
            .fields
            .get(index)
            .ok_or(CodecError::FieldIndexOutOfRange {
                type_id: self.type_id,
                field: index,
                field_count: self.field_count(),
            })?;
        let invalid = |reason| CodecError::InvalidValue {
            type_id: descriptor.type_id,
            field: index,
            reason,
        };
        value.check(def.kind).map_err(invalid)?;
        if def.frame_tracked != frame.is_some() {
            return Err(invalid(ValueReason::FrameMismatch {
                tracked: def.frame_tracked,
            }));
        }
        self.insert(index, value, frame);
        Ok(())
    }

    /// Marks field `index` as stopped.
    pub fn stop(&mut self, index: usize) -> CodecResult<()> {
        if index >= self.field_count() {
            return Err(CodecError::FieldIndexOutOfRange {
                type_id: self.type_id,
                field: index,
                field_count: self.field_count(),
            });
        }
        self.stopped_mask.insert(index);
        Ok(())
    }

    /// Replaces the stopped mask.
    pub fn set_stopped_mask(&mut self, mask: FieldMask) -> CodecResult<()> {
        if !self.initial_fields_mask().is_superset_of(mask) {
            return Err(CodecError::InvalidStoppedMask {
                type_id: self.type_id,
                mask: mask.raw(),
                field_count: self.field_count(),
            });
        }
        self.stopped_mask = mask;
        Ok(())
    }

    /// Marks every field present and stamps every tracked field with `frame`.
    ///
    /// Absent fields take their kind's default value.
    pub fn reset_frame(
        &mut self,
        descriptor: &ComponentDescriptor,
        frame: SimulationFrame,
    ) -> CodecResult<()> {
        self.check_descriptor(descriptor)?;
        for (index, def) in descriptor.fields.iter().enumerate() {
            let value = self.values[index].unwrap_or_else(|| FieldValue::default_for(def.kind));
            let frame = def.frame_tracked.then_some(frame);
            self.insert(index, value, frame);
        }
        Ok(())
    }

    /// Oldest frame among present tracked fields.
    #[must_use]
    pub fn min_simulation_frame(&self) -> Option<SimulationFrame> {
        self.frames.iter().flatten().copied().min()
    }

    /// Frames of the tracked fields in declaration order; absent fields
    /// yield `None`.
    pub fn simulation_frames(
        &self,
        descriptor: &ComponentDescriptor,
    ) -> CodecResult<Vec<Option<SimulationFrame>>> {
        self.check_descriptor(descriptor)?;
        Ok(descriptor
            .fields
            .iter()
            .zip(&self.frames)
            .filter(|(def, _)| def.frame_tracked)
            .map(|(_, frame)| *frame)
            .collect())
    }

    /// Human-readable rendering using the descriptor's names.
    #[must_use]
    pub const fn display<'a>(&'a self, descriptor: &'a ComponentDescriptor) -> RecordDisplay<'a> {
        RecordDisplay {
            record: self,
            descriptor,
        }
    }

    /// Fails unless `descriptor` describes this record's type and shape.
    pub fn check_descriptor(&self, descriptor: &ComponentDescriptor) -> CodecResult<()> {
        if descriptor.type_id != self.type_id {
            return Err(CodecError::TypeMismatch {
                expected: descriptor.type_id,
                found: self.type_id,
            });
        }
        if descriptor.field_count() != self.field_count() {
            return Err(CodecError::FieldCountMismatch {
                type_id: self.type_id,
                expected: descriptor.field_count(),
                actual: self.field_count(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert(
        &mut self,
        index: usize,
        value: FieldValue,
        frame: Option<SimulationFrame>,
    ) {
        self.values[index] = Some(value);
        self.frames[index] = frame;
        self.fields_mask.insert(index);
    }
}

/// Display adapter returned by [`DeltaRecord::display`].
///
/// Renders as `Name( field: value, fieldSimFrame: f ... Mask: 0b.., Stopped: 0b..)`
/// with masks padded to the field count. Absent fields show `-`.
pub struct RecordDisplay<'a> {
    record: &'a DeltaRecord,
    descriptor: &'a ComponentDescriptor,
}

impl fmt::Display for RecordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        write!(f, "{}(", self.descriptor.name)?;
        for (index, def) in self.descriptor.fields.iter().enumerate() {
            match record.value(index) {
                Some(value) => write!(f, " {}: {value}", def.name)?,
                None => write!(f, " {}: -", def.name)?,
            }
            if def.frame_tracked {
                match record.frame(index) {
                    Some(frame) => write!(f, ", {}SimFrame: {frame}", def.name)?,
                    None => write!(f, ", {}SimFrame: -", def.name)?,
                }
            }
        }
        let width = record.field_count();
        write!(
            f,
            " Mask: 0b{}, Stopped: 0b{})",
            record.fields_mask.to_binary(width),
            record.stopped_mask.to_binary(width)
        )
    }
}
