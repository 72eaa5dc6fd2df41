//! Schema validation errors.

use std::fmt;

use crate::native::NativeType;
use crate::ComponentTypeId;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a descriptor or schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Duplicate component type id in a schema.
    DuplicateTypeId { type_id: ComponentTypeId },

    /// Two fields of one component share a name.
    DuplicateFieldName {
        type_id: ComponentTypeId,
        name: String,
    },

    /// More fields than a 32-bit mask can address.
    TooManyFields {
        type_id: ComponentTypeId,
        count: usize,
        max: usize,
    },

    /// Invalid bit width for an integer field.
    InvalidBitWidth {
        type_id: ComponentTypeId,
        field: usize,
        bits: u8,
    },

    /// `min + 2^bits - 1` does not fit in an `i64`.
    InvalidIntegerRange {
        type_id: ComponentTypeId,
        field: usize,
        bits: u8,
        min: i64,
    },

    /// Native slot ends past the declared native size.
    NativeSlotOutOfBounds {
        type_id: ComponentTypeId,
        field: usize,
        end: usize,
        native_size: usize,
    },

    /// Two native slots share bytes.
    OverlappingNativeSlots {
        type_id: ComponentTypeId,
        first: usize,
        second: usize,
    },

    /// Native scalar type cannot hold the field kind.
    IncompatibleNativeType {
        type_id: ComponentTypeId,
        field: usize,
        kind: &'static str,
        native: NativeType,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTypeId { type_id } => {
                write!(f, "duplicate component type id {type_id}")
            }
            Self::DuplicateFieldName { type_id, name } => {
                write!(f, "component {type_id} declares field {name:?} twice")
            }
            Self::TooManyFields {
                type_id,
                count,
                max,
            } => {
                write!(
                    f,
                    "component {type_id} declares {count} fields, maximum is {max}"
                )
            }
            Self::InvalidBitWidth {
                type_id,
                field,
                bits,
            } => {
                write!(
                    f,
                    "invalid bit width {bits} for field {field} of component {type_id}"
                )
            }
            Self::InvalidIntegerRange {
                type_id,
                field,
                bits,
                min,
            } => {
                write!(
                    f,
                    "range of {bits} bits from {min} overflows i64 for field {field} of component {type_id}"
                )
            }
            Self::NativeSlotOutOfBounds {
                type_id,
                field,
                end,
                native_size,
            } => {
                write!(
                    f,
                    "native slot of field {field} ends at byte {end}, past size {native_size} of component {type_id}"
                )
            }
            Self::OverlappingNativeSlots {
                type_id,
                first,
                second,
            } => {
                write!(
                    f,
                    "native slots of fields {first} and {second} overlap in component {type_id}"
                )
            }
            Self::IncompatibleNativeType {
                type_id,
                field,
                kind,
                native,
            } => {
                write!(
                    f,
                    "field {field} of component {type_id}: {kind} cannot be stored as {}",
                    native.name()
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
