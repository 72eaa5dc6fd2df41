//! Error types for wire format decoding and encoding.

use std::fmt;

/// Result type for wire decoding operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors that can occur during wire decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Message is too small to contain the header.
    MessageTooSmall { actual: usize, required: usize },

    /// Invalid magic number.
    InvalidMagic { found: u32 },

    /// Unsupported protocol version.
    UnsupportedVersion { found: u16 },

    /// Reserved flag bits are set.
    InvalidFlags { flags: u16 },

    /// Header payload length does not match the bytes that follow it.
    PayloadLengthMismatch { header_len: usize, actual_len: usize },

    /// A configured limit was exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Errors that can occur during wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Output buffer is too small.
    BufferTooSmall { needed: usize, available: usize },

    /// A length does not fit the header field reserved for it.
    LengthOverflow { length: usize },
}

/// Kind of wire limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    MessageBytes,
    ComponentCount,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageTooSmall { actual, required } => {
                write!(
                    f,
                    "message too small: {actual} bytes, need at least {required}"
                )
            }
            Self::InvalidMagic { found } => {
                write!(f, "invalid magic number: 0x{found:08X}")
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported version: {found}")
            }
            Self::InvalidFlags { flags } => {
                write!(f, "invalid flags: 0x{flags:04X}")
            }
            Self::PayloadLengthMismatch {
                header_len,
                actual_len,
            } => {
                write!(
                    f,
                    "payload length mismatch: header says {header_len}, actual {actual_len}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MessageBytes => "message bytes",
            Self::ComponentCount => "component count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
