//! Per-field bit masks.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Maximum number of fields a component can declare.
pub const MAX_FIELDS: usize = 32;

/// A set of field indices, one bit per field in declaration order.
///
/// Bit `i` corresponds to the field at index `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldMask(u32);

impl FieldMask {
    /// The empty mask.
    pub const EMPTY: Self = Self(0);

    /// Creates a mask from its raw bits.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Mask with only field `index` set.
    ///
    /// Indices at or beyond [`MAX_FIELDS`] yield the empty mask.
    #[must_use]
    pub const fn bit(index: usize) -> Self {
        if index >= MAX_FIELDS {
            return Self::EMPTY;
        }
        Self(1 << index)
    }

    /// Mask with the first `count` fields set.
    #[must_use]
    pub const fn first(count: usize) -> Self {
        if count >= MAX_FIELDS {
            Self(u32::MAX)
        } else {
            Self((1 << count) - 1)
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < MAX_FIELDS && self.0 & (1 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        *self |= Self::bit(index);
    }

    pub fn remove(&mut self, index: usize) {
        *self &= !Self::bit(index);
    }

    /// Number of set bits.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if every bit of `other` is also set in `self`.
    #[must_use]
    pub const fn is_superset_of(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Iterates over set field indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_FIELDS).filter(move |index| self.contains(*index))
    }

    /// Binary rendering left-padded with zeros to `width` digits.
    #[must_use]
    pub fn to_binary(self, width: usize) -> String {
        format!("{:0width$b}", self.0)
    }
}

impl BitOr for FieldMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FieldMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for FieldMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for FieldMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl From<u32> for FieldMask {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<FieldMask> for u32 {
    fn from(mask: FieldMask) -> Self {
        mask.0
    }
}

impl fmt::Binary for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}
