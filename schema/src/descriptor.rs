//! Component descriptors.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldDef, FieldKind};
use crate::mask::{FieldMask, MAX_FIELDS};
use crate::ComponentTypeId;

/// Priority assigned when none is declared.
pub const DEFAULT_PRIORITY: i32 = 100;

#[cfg(feature = "serde")]
const fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// Static description of one replicated component type.
///
/// Field `i` owns mask bit `1 << i`. `priority`, `order` and `send_ordered`
/// are consumed by the external scheduler and never affect encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentDescriptor {
    pub type_id: ComponentTypeId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    pub priority: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub send_ordered: bool,
    /// Byte size of the native block.
    pub native_size: usize,
    pub fields: Vec<FieldDef>,
}

impl ComponentDescriptor {
    /// Starts a descriptor with no fields and default scheduling keys.
    #[must_use]
    pub fn builder(type_id: ComponentTypeId, name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            descriptor: Self {
                type_id,
                name: name.into(),
                priority: DEFAULT_PRIORITY,
                order: 0,
                send_ordered: false,
                native_size: 0,
                fields: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Mask bit reserved for field `index`.
    #[must_use]
    pub const fn field_mask(&self, index: usize) -> FieldMask {
        FieldMask::bit(index)
    }

    /// Mask of a fully-present record.
    #[must_use]
    pub fn initial_fields_mask(&self) -> FieldMask {
        FieldMask::first(self.fields.len())
    }

    #[must_use]
    pub fn has_ref_fields(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.kind, FieldKind::EntityRef))
    }

    /// Number of fields that carry a simulation frame.
    #[must_use]
    pub fn tracked_field_count(&self) -> usize {
        self.fields.iter().filter(|field| field.frame_tracked).count()
    }

    /// Index of the field called `name`.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Validates descriptor invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let type_id = self.type_id;
        if self.fields.len() > MAX_FIELDS {
            return Err(SchemaError::TooManyFields {
                type_id,
                count: self.fields.len(),
                max: MAX_FIELDS,
            });
        }

        let mut names = HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateFieldName {
                    type_id,
                    name: field.name.clone(),
                });
            }
            validate_kind(type_id, index, field.kind)?;
            validate_native(self, index, field)?;
        }

        for (first, a) in self.fields.iter().enumerate() {
            for (offset, b) in self.fields[first + 1..].iter().enumerate() {
                if a.native.overlaps(b.native) {
                    return Err(SchemaError::OverlappingNativeSlots {
                        type_id,
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_kind(type_id: ComponentTypeId, field: usize, kind: FieldKind) -> SchemaResult<()> {
    match kind {
        FieldKind::UInt { bits } | FieldKind::SInt { bits } => {
            if bits == 0 || bits > 64 {
                return Err(SchemaError::InvalidBitWidth {
                    type_id,
                    field,
                    bits,
                });
            }
        }
        FieldKind::IntegerRange { bits, min } => {
            if bits == 0 || bits > 64 {
                return Err(SchemaError::InvalidBitWidth {
                    type_id,
                    field,
                    bits,
                });
            }
            let max = i128::from(min) + (1i128 << bits) - 1;
            if max > i128::from(i64::MAX) {
                return Err(SchemaError::InvalidIntegerRange {
                    type_id,
                    field,
                    bits,
                    min,
                });
            }
        }
        FieldKind::Bool | FieldKind::Float32 | FieldKind::EntityRef => {}
    }
    Ok(())
}

fn validate_native(
    descriptor: &ComponentDescriptor,
    index: usize,
    field: &FieldDef,
) -> SchemaResult<()> {
    if !field.kind.accepts_native(field.native.ty) {
        return Err(SchemaError::IncompatibleNativeType {
            type_id: descriptor.type_id,
            field: index,
            kind: field.kind.name(),
            native: field.native.ty,
        });
    }
    let end = field.native.end();
    if end > descriptor.native_size {
        return Err(SchemaError::NativeSlotOutOfBounds {
            type_id: descriptor.type_id,
            field: index,
            end,
            native_size: descriptor.native_size,
        });
    }
    Ok(())
}

/// Builder for [`ComponentDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    descriptor: ComponentDescriptor,
}

impl DescriptorBuilder {
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.descriptor.priority = priority;
        self
    }

    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.descriptor.order = order;
        self
    }

    #[must_use]
    pub fn send_ordered(mut self, send_ordered: bool) -> Self {
        self.descriptor.send_ordered = send_ordered;
        self
    }

    /// Sets the byte size of the native block.
    ///
    /// When not set, the size is the end of the furthest slot.
    #[must_use]
    pub fn native_size(mut self, size: usize) -> Self {
        self.descriptor.native_size = size;
        self
    }

    /// Appends a field; it receives the next mask bit.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.descriptor.fields.push(field);
        self
    }

    /// Builds the descriptor after validation.
    pub fn build(mut self) -> SchemaResult<ComponentDescriptor> {
        if self.descriptor.native_size == 0 {
            self.descriptor.native_size = self
                .descriptor
                .fields
                .iter()
                .map(|field| field.native.end())
                .max()
                .unwrap_or(0);
        }
        self.descriptor.validate()?;
        Ok(self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeSlot, NativeType};

    fn asset_id() -> ComponentDescriptor {
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
            .unwrap()
    }

    #[test]
    fn builder_defaults() {
        let desc = asset_id();
        assert_eq!(desc.priority, DEFAULT_PRIORITY);
        assert_eq!(desc.order, 0);
        assert!(!desc.send_ordered);
        assert_eq!(desc.native_size, 5);
        assert_eq!(desc.field_count(), 2);
        assert!(desc.has_fields());
        assert!(!desc.has_ref_fields());
        assert_eq!(desc.tracked_field_count(), 0);
    }

    #[test]
    fn masks_follow_declaration_order() {
        let desc = asset_id();
        assert_eq!(desc.field_mask(0).raw(), 0b01);
        assert_eq!(desc.field_mask(1).raw(), 0b10);
        assert_eq!(desc.initial_fields_mask().raw(), 0b11);
        assert_eq!(desc.field_index("isFromGroup"), Some(1));
        assert_eq!(desc.field_index("missing"), None);
    }

    #[test]
    fn explicit_native_size_is_kept() {
        let desc = ComponentDescriptor::builder(1, "Padded")
            .native_size(8)
            .field(FieldDef::new(
                "n",
                FieldKind::short(),
                NativeSlot::new(0, NativeType::I16),
            ))
            .build()
            .unwrap();
        assert_eq!(desc.native_size, 8);
    }

    #[test]
    fn rejects_too_many_fields() {
        let mut builder = ComponentDescriptor::builder(1, "Wide");
        for index in 0..33 {
            builder = builder.field(FieldDef::new(
                format!("f{index}"),
                FieldKind::bool(),
                NativeSlot::new(index, NativeType::Bool8),
            ));
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaError::TooManyFields { count: 33, .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ComponentDescriptor::builder(1, "Dup")
            .field(FieldDef::new(
                "a",
                FieldKind::bool(),
                NativeSlot::new(0, NativeType::Bool8),
            ))
            .field(FieldDef::new(
                "a",
                FieldKind::bool(),
                NativeSlot::new(1, NativeType::Bool8),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName { .. }));
    }

    #[test]
    fn rejects_invalid_widths_and_ranges() {
        let err = ComponentDescriptor::builder(1, "Bad")
            .field(FieldDef::new(
                "a",
                FieldKind::uint(0),
                NativeSlot::new(0, NativeType::U8),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBitWidth { bits: 0, .. }));

        let err = ComponentDescriptor::builder(1, "Bad")
            .field(FieldDef::new(
                "a",
                FieldKind::integer_range(8, i64::MAX - 10),
                NativeSlot::new(0, NativeType::I64),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidIntegerRange { .. }));
    }

    #[test]
    fn rejects_bad_native_layouts() {
        let err = ComponentDescriptor::builder(1, "Overlap")
            .field(FieldDef::new(
                "a",
                FieldKind::int32(),
                NativeSlot::new(0, NativeType::I32),
            ))
            .field(FieldDef::new(
                "b",
                FieldKind::short(),
                NativeSlot::new(2, NativeType::I16),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::OverlappingNativeSlots {
                type_id: 1,
                first: 0,
                second: 1
            }
        );

        let err = ComponentDescriptor::builder(1, "Short")
            .native_size(3)
            .field(FieldDef::new(
                "a",
                FieldKind::int32(),
                NativeSlot::new(0, NativeType::I32),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::NativeSlotOutOfBounds { end: 4, .. }));

        let err = ComponentDescriptor::builder(1, "Mismatch")
            .field(FieldDef::new(
                "a",
                FieldKind::float32(),
                NativeSlot::new(0, NativeType::I32),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleNativeType { .. }));
    }

    #[test]
    fn empty_component_is_valid() {
        let desc = ComponentDescriptor::builder(2, "Tag").build().unwrap();
        assert!(!desc.has_fields());
        assert_eq!(desc.initial_fields_mask(), FieldMask::EMPTY);
        assert_eq!(desc.native_size, 0);
    }
}
