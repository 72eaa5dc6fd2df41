//! Field kinds and field definitions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::native::{NativeSlot, NativeType};

/// Bits used by an encoded entity reference: one presence bit plus the id.
pub const ENTITY_REF_BITS: u8 = 33;

/// Width of an encoded per-field simulation frame delta.
pub const FRAME_DELTA_BITS: u8 = 8;

/// The wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum FieldKind {
    /// Boolean (1 bit).
    Bool,

    /// Signed integer written as `value - min` in `bits` bits.
    IntegerRange { bits: u8, min: i64 },

    /// Unsigned integer with fixed bit width.
    UInt { bits: u8 },

    /// Two's complement signed integer with fixed bit width.
    SInt { bits: u8 },

    /// IEEE-754 single precision, raw 32 bits.
    Float32,

    /// Optional reference to another entity.
    EntityRef,
}

impl FieldKind {
    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool
    }

    #[must_use]
    pub const fn integer_range(bits: u8, min: i64) -> Self {
        Self::IntegerRange { bits, min }
    }

    /// A full-range `i32` written as a 32-bit ranged integer.
    #[must_use]
    pub const fn int32() -> Self {
        Self::IntegerRange {
            bits: 32,
            min: i32::MIN as i64,
        }
    }

    #[must_use]
    pub const fn uint(bits: u8) -> Self {
        Self::UInt { bits }
    }

    #[must_use]
    pub const fn sint(bits: u8) -> Self {
        Self::SInt { bits }
    }

    /// A 16-bit two's complement integer.
    #[must_use]
    pub const fn short() -> Self {
        Self::SInt { bits: 16 }
    }

    #[must_use]
    pub const fn float32() -> Self {
        Self::Float32
    }

    #[must_use]
    pub const fn entity_ref() -> Self {
        Self::EntityRef
    }

    /// Number of value bits this kind occupies on the wire.
    #[must_use]
    pub const fn bit_width(self) -> u8 {
        match self {
            Self::Bool => 1,
            Self::IntegerRange { bits, .. } | Self::UInt { bits } | Self::SInt { bits } => bits,
            Self::Float32 => 32,
            Self::EntityRef => ENTITY_REF_BITS,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::IntegerRange { .. } => "integer-range",
            Self::UInt { .. } => "uint",
            Self::SInt { .. } => "sint",
            Self::Float32 => "float32",
            Self::EntityRef => "entity-ref",
        }
    }

    /// Returns `true` if a native slot of type `ty` can hold this kind.
    #[must_use]
    pub const fn accepts_native(self, ty: NativeType) -> bool {
        match self {
            Self::Bool => matches!(ty, NativeType::Bool8),
            Self::IntegerRange { .. } | Self::SInt { .. } => matches!(
                ty,
                NativeType::I8
                    | NativeType::U8
                    | NativeType::I16
                    | NativeType::U16
                    | NativeType::I32
                    | NativeType::U32
                    | NativeType::I64
            ),
            Self::UInt { .. } => matches!(
                ty,
                NativeType::U8 | NativeType::U16 | NativeType::U32 | NativeType::U64
            ),
            Self::Float32 => matches!(ty, NativeType::F32),
            Self::EntityRef => matches!(ty, NativeType::Entity32),
        }
    }
}

/// Field definition within a component descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Whether the field carries its own simulation frame.
    #[cfg_attr(feature = "serde", serde(default))]
    pub frame_tracked: bool,
    pub native: NativeSlot,
}

impl FieldDef {
    /// Creates an untracked field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, native: NativeSlot) -> Self {
        Self {
            name: name.into(),
            kind,
            frame_tracked: false,
            native,
        }
    }

    /// Marks the field as frame-tracked.
    #[must_use]
    pub fn tracked(mut self) -> Self {
        self.frame_tracked = true;
        self
    }

    /// Bits a present field costs after its presence bit.
    #[must_use]
    pub const fn payload_bits(&self) -> usize {
        let frame = if self.frame_tracked {
            FRAME_DELTA_BITS as usize
        } else {
            0
        };
        frame + self.kind.bit_width() as usize
    }
}
