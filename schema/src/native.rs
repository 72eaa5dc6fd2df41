//! Native memory layout description.
//!
//! A component's native form is a fixed-size block of little-endian scalars.
//! Each field owns one slot: a byte offset and the scalar type stored there.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar type stored in a native slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NativeType {
    /// One byte, non-zero means `true`.
    Bool8,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    /// 32-bit entity id, `0` means no entity.
    Entity32,
}

impl NativeType {
    /// Size of the scalar in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Bool8 | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 | Self::Entity32 => 4,
            Self::I64 | Self::U64 => 8,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool8 => "bool8",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::Entity32 => "entity32",
        }
    }
}

/// Location of one field inside the native block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NativeSlot {
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// Scalar type stored at `offset`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: NativeType,
}

impl NativeSlot {
    #[must_use]
    pub const fn new(offset: usize, ty: NativeType) -> Self {
        Self { offset, ty }
    }

    /// One past the last byte of the slot.
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.ty.size()
    }

    /// Returns `true` if the two slots share at least one byte.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}
