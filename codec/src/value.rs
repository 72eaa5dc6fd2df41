//! Typed field values.

use std::fmt;

use schema::FieldKind;

use crate::error::ValueReason;
use crate::types::EntityId;

/// A single field value.
///
/// The variant a field accepts is fixed by its [`FieldKind`]:
///
/// | kind | value |
/// |------|-------|
/// | `Bool` | `Bool` |
/// | `IntegerRange`, `SInt` | `Int` |
/// | `UInt` | `UInt` |
/// | `Float32` | `Float` |
/// | `EntityRef` | `Entity` |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    /// `None` means the reference is unset.
    Entity(Option<EntityId>),
}

impl FieldValue {
    /// The zero value a freshly created record holds for `kind`.
    ///
    /// Ranged integers whose range excludes zero default to their minimum.
    #[must_use]
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool(false),
            FieldKind::IntegerRange { bits, min } => {
                let max = i128::from(min) + (1i128 << bits.min(64)) - 1;
                if min <= 0 && max >= 0 {
                    Self::Int(0)
                } else {
                    Self::Int(min)
                }
            }
            FieldKind::SInt { .. } => Self::Int(0),
            FieldKind::UInt { .. } => Self::UInt(0),
            FieldKind::Float32 => Self::Float(0.0),
            FieldKind::EntityRef => Self::Entity(None),
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Entity(_) => "entity",
        }
    }

    /// Checks that this value has the right variant for `kind` and fits its
    /// encodable range.
    pub fn check(&self, kind: FieldKind) -> Result<(), ValueReason> {
        match (kind, self) {
            (FieldKind::Bool, Self::Bool(_))
            | (FieldKind::Float32, Self::Float(_))
            | (FieldKind::EntityRef, Self::Entity(_)) => Ok(()),
            (FieldKind::IntegerRange { bits, min }, Self::Int(value)) => {
                let lo = i128::from(min);
                let hi = lo + (1i128 << bits.min(64)) - 1;
                in_range(i128::from(*value), lo, hi)
            }
            (FieldKind::SInt { bits }, Self::Int(value)) => {
                let half = 1i128 << bits.clamp(1, 64).saturating_sub(1);
                in_range(i128::from(*value), -half, half - 1)
            }
            (FieldKind::UInt { bits }, Self::UInt(value)) => {
                in_range(i128::from(*value), 0, (1i128 << bits.min(64)) - 1)
            }
            _ => Err(ValueReason::KindMismatch {
                expected: expected_variant(kind),
                found: self.variant_name(),
            }),
        }
    }
}

fn expected_variant(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool => "bool",
        FieldKind::IntegerRange { .. } | FieldKind::SInt { .. } => "int",
        FieldKind::UInt { .. } => "uint",
        FieldKind::Float32 => "float",
        FieldKind::EntityRef => "entity",
    }
}

const fn in_range(value: i128, min: i128, max: i128) -> Result<(), ValueReason> {
    if value < min || value > max {
        Err(ValueReason::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Entity(Some(id)) => write!(f, "{id}"),
            Self::Entity(None) => write!(f, "none"),
        }
    }
}
