//! Error types for codec operations.

use std::fmt;

use schema::ComponentTypeId;

use crate::refs::MapError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while importing, merging, encoding or decoding
/// delta-state records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Wire framing error.
    Wire(wire::DecodeError),

    /// Wire framing error while encoding.
    WireEncode(wire::EncodeError),

    /// Bitstream error other than running out of input.
    Bitstream(bitstream::BitError),

    /// Input ended before a complete record was read.
    StreamExhausted { requested: usize, available: usize },

    /// Schema construction or validation error.
    Schema(schema::SchemaError),

    /// Native block length differs from the descriptor's native size.
    SizeMismatch {
        type_id: ComponentTypeId,
        expected: usize,
        actual: usize,
    },

    /// Frame array length differs from the number of frame-tracked fields.
    FrameCountMismatch {
        type_id: ComponentTypeId,
        expected: usize,
        actual: usize,
    },

    /// A native slot lies outside the native block.
    NativeSlotOutOfBounds {
        type_id: ComponentTypeId,
        field: usize,
        end: usize,
        len: usize,
    },

    /// Record and descriptor (or two records) describe different types.
    TypeMismatch {
        expected: ComponentTypeId,
        found: ComponentTypeId,
    },

    /// Record field count differs from the descriptor's.
    FieldCountMismatch {
        type_id: ComponentTypeId,
        expected: usize,
        actual: usize,
    },

    /// Field index outside the descriptor.
    FieldIndexOutOfRange {
        type_id: ComponentTypeId,
        field: usize,
        field_count: usize,
    },

    /// A stopped mask names fields the type does not have.
    InvalidStoppedMask {
        type_id: ComponentTypeId,
        mask: u32,
        field_count: usize,
    },

    /// Invalid field value for the descriptor.
    InvalidValue {
        type_id: ComponentTypeId,
        field: usize,
        reason: ValueReason,
    },

    /// A message names a component type the schema does not know.
    UnknownComponentType { type_id: ComponentTypeId },

    /// Message schema hash differs from the local schema.
    SchemaMismatch { expected: u64, found: u64 },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Non-padding bits remain after the last record.
    TrailingData { remaining_bits: usize },

    /// An entity mapper rejected a reference.
    EntityMapping {
        type_id: ComponentTypeId,
        field: usize,
        error: MapError,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    ComponentsPerMessage,
    MessageBytes,
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    /// Integer outside the field's encodable (or native) range.
    OutOfRange { value: i128, min: i128, max: i128 },
    /// Value variant does not match the field kind.
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A frame was given for an untracked field, or omitted for a tracked one.
    FrameMismatch { tracked: bool },
}

/// Coarse failure classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Record or input shape disagrees with the component schema.
    SchemaViolation,
    /// Input ended early.
    StreamExhaustion,
    /// A value does not fit its field.
    RangeViolation,
    /// Malformed framing or anything else.
    Malformed,
}

impl CodecError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::StreamExhausted { .. } => FailureKind::StreamExhaustion,
            Self::InvalidValue {
                reason: ValueReason::OutOfRange { .. },
                ..
            }
            | Self::Bitstream(
                bitstream::BitError::IntegerOutOfRange { .. }
                | bitstream::BitError::ValueOutOfRange { .. },
            ) => FailureKind::RangeViolation,
            Self::Schema(_)
            | Self::SizeMismatch { .. }
            | Self::FrameCountMismatch { .. }
            | Self::NativeSlotOutOfBounds { .. }
            | Self::TypeMismatch { .. }
            | Self::FieldCountMismatch { .. }
            | Self::FieldIndexOutOfRange { .. }
            | Self::InvalidStoppedMask { .. }
            | Self::InvalidValue { .. }
            | Self::UnknownComponentType { .. }
            | Self::SchemaMismatch { .. } => FailureKind::SchemaViolation,
            Self::Wire(_)
            | Self::WireEncode(_)
            | Self::Bitstream(_)
            | Self::LimitsExceeded { .. }
            | Self::TrailingData { .. }
            | Self::EntityMapping { .. } => FailureKind::Malformed,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::WireEncode(e) => write!(f, "wire encode error: {e}"),
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::StreamExhausted {
                requested,
                available,
            } => {
                write!(
                    f,
                    "stream exhausted: requested {requested} bits, {available} available"
                )
            }
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::SizeMismatch {
                type_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "native block size {actual} != {expected} for component {type_id}"
                )
            }
            Self::FrameCountMismatch {
                type_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "frame count {actual} != {expected} for component {type_id}"
                )
            }
            Self::NativeSlotOutOfBounds {
                type_id,
                field,
                end,
                len,
            } => {
                write!(
                    f,
                    "native slot of field {field} in component {type_id} ends at {end}, block is {len} bytes"
                )
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "component type mismatch: expected {expected}, found {found}")
            }
            Self::FieldCountMismatch {
                type_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "component {type_id} has {expected} fields, record has {actual}"
                )
            }
            Self::FieldIndexOutOfRange {
                type_id,
                field,
                field_count,
            } => {
                write!(
                    f,
                    "field index {field} out of range for component {type_id} ({field_count} fields)"
                )
            }
            Self::InvalidStoppedMask {
                type_id,
                mask,
                field_count,
            } => {
                write!(
                    f,
                    "stopped mask 0b{mask:b} exceeds {field_count} fields of component {type_id}"
                )
            }
            Self::InvalidValue {
                type_id,
                field,
                reason,
            } => {
                write!(f, "invalid value for {type_id}:{field}: {reason}")
            }
            Self::UnknownComponentType { type_id } => {
                write!(f, "unknown component type {type_id}")
            }
            Self::SchemaMismatch { expected, found } => {
                write!(
                    f,
                    "schema hash mismatch: expected 0x{expected:016X}, found 0x{found:016X}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::TrailingData { remaining_bits } => {
                write!(f, "trailing data after last record: {remaining_bits} bits")
            }
            Self::EntityMapping {
                type_id,
                field,
                error,
            } => {
                write!(f, "entity mapping failed for {type_id}:{field}: {error}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ComponentsPerMessage => "components per message",
            Self::MessageBytes => "message bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} outside [{min}, {max}]")
            }
            Self::KindMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}")
            }
            Self::FrameMismatch { tracked: true } => {
                write!(f, "frame-tracked field needs a simulation frame")
            }
            Self::FrameMismatch { tracked: false } => {
                write!(f, "untracked field cannot carry a simulation frame")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::WireEncode(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::EntityMapping { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::WireEncode(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        match err {
            bitstream::BitError::UnexpectedEof {
                requested,
                available,
            } => Self::StreamExhausted {
                requested,
                available,
            },
            other => Self::Bitstream(other),
        }
    }
}

impl From<schema::SchemaError> for CodecError {
    fn from(err: schema::SchemaError) -> Self {
        Self::Schema(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_size_mismatch() {
        let err = CodecError::SizeMismatch {
            type_id: 16,
            expected: 5,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("16"), "should mention component");
        assert!(msg.contains('5'), "should mention expected size");
    }

    #[test]
    fn error_display_invalid_value() {
        let err = CodecError::InvalidValue {
            type_id: 16,
            field: 0,
            reason: ValueReason::OutOfRange {
                value: 300,
                min: 0,
                max: 255,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("255"));
    }

    #[test]
    fn eof_becomes_stream_exhausted() {
        let bit_err = bitstream::BitError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let codec_err: CodecError = bit_err.into();
        assert_eq!(
            codec_err,
            CodecError::StreamExhausted {
                requested: 8,
                available: 3
            }
        );
        assert_eq!(codec_err.kind(), FailureKind::StreamExhaustion);
    }

    #[test]
    fn other_bit_errors_stay_bitstream() {
        let bit_err = bitstream::BitError::InvalidBitCount {
            bits: 70,
            max_bits: 64,
        };
        let codec_err: CodecError = bit_err.into();
        assert!(matches!(codec_err, CodecError::Bitstream(_)));
    }

    #[test]
    fn error_from_wire_error() {
        let wire_err = wire::DecodeError::InvalidMagic { found: 0x1234 };
        let codec_err: CodecError = wire_err.into();
        assert!(matches!(codec_err, CodecError::Wire(_)));
        assert!(std::error::Error::source(&codec_err).is_some());
    }

    #[test]
    fn failure_kinds() {
        let size = CodecError::FrameCountMismatch {
            type_id: 1,
            expected: 1,
            actual: 0,
        };
        assert_eq!(size.kind(), FailureKind::SchemaViolation);

        let range = CodecError::InvalidValue {
            type_id: 1,
            field: 0,
            reason: ValueReason::OutOfRange {
                value: -1,
                min: 0,
                max: 1,
            },
        };
        assert_eq!(range.kind(), FailureKind::RangeViolation);

        let trailing = CodecError::TrailingData { remaining_bits: 9 };
        assert_eq!(trailing.kind(), FailureKind::Malformed);
    }

    #[test]
    fn error_source_none_for_others() {
        let err = CodecError::UnknownComponentType { type_id: 7 };
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<CodecError>();
    }
}
