//! Message header types and constants.
//!
//! Layout (little-endian):
//!
//! | bytes | field |
//! |-------|-------|
//! | 4 | magic |
//! | 2 | version |
//! | 2 | flags |
//! | 8 | schema hash |
//! | 8 | reference simulation frame |
//! | 2 | component count |
//! | 4 | payload length |

use crate::error::{DecodeError, EncodeError, WireResult};

/// Magic number identifying dsync messages.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = 0x4453_594E; // "DSYN" in ASCII

/// Current wire format version.
pub const VERSION: u16 = 1;

/// Header size in bytes (30 total).
pub const HEADER_SIZE: usize = 4 + 2 + 2 + 8 + 8 + 2 + 4;

/// Message flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MessageFlags(u16);

impl MessageFlags {
    /// The reference frame may be used to compute per-field frame deltas.
    pub const REF_FRAME_VALID: u16 = 1 << 0;

    /// Reserved bits mask (must be zero in version 1).
    const RESERVED_MASK: u16 = !0b1;

    /// Creates new flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Creates flags with the reference-frame bit set as given.
    #[must_use]
    pub const fn with_ref_frame_valid(valid: bool) -> Self {
        if valid {
            Self(Self::REF_FRAME_VALID)
        } else {
            Self(0)
        }
    }

    #[must_use]
    pub const fn is_ref_frame_valid(self) -> bool {
        self.0 & Self::REF_FRAME_VALID != 0
    }

    /// Returns `true` if no reserved bits are set.
    #[must_use]
    pub const fn is_valid_v1(self) -> bool {
        self.0 & Self::RESERVED_MASK == 0
    }
}

/// Message header.
///
/// The magic number is validated during decoding and is not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Wire format version.
    pub version: u16,
    pub flags: MessageFlags,
    /// Schema hash for compatibility checking.
    pub schema_hash: u64,
    /// Frame every per-field delta in the payload is relative to.
    pub reference_frame: i64,
    /// Number of component records in the payload.
    pub component_count: u16,
    /// Payload length in bytes.
    pub payload_len: u32,
}

impl MessageHeader {
    /// Creates a header for the current version.
    #[must_use]
    pub const fn new(
        schema_hash: u64,
        reference_frame: i64,
        ref_frame_valid: bool,
        component_count: u16,
        payload_len: u32,
    ) -> Self {
        Self {
            version: VERSION,
            flags: MessageFlags::with_ref_frame_valid(ref_frame_valid),
            schema_hash,
            reference_frame,
            component_count,
            payload_len,
        }
    }
}

/// Encodes `header` into the first [`HEADER_SIZE`] bytes of `out`.
pub fn encode_header(header: &MessageHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if out.len() < HEADER_SIZE {
        return Err(EncodeError::BufferTooSmall {
            needed: HEADER_SIZE,
            available: out.len(),
        });
    }
    out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    out[4..6].copy_from_slice(&header.version.to_le_bytes());
    out[6..8].copy_from_slice(&header.flags.raw().to_le_bytes());
    out[8..16].copy_from_slice(&header.schema_hash.to_le_bytes());
    out[16..24].copy_from_slice(&header.reference_frame.to_le_bytes());
    out[24..26].copy_from_slice(&header.component_count.to_le_bytes());
    out[26..30].copy_from_slice(&header.payload_len.to_le_bytes());
    Ok(HEADER_SIZE)
}

/// Decodes and validates a header from the start of `bytes`.
pub fn decode_header(bytes: &[u8]) -> WireResult<MessageHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::MessageTooSmall {
            actual: bytes.len(),
            required: HEADER_SIZE,
        });
    }
    let magic = u32::from_le_bytes(array(&bytes[0..4]));
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }
    let version = u16::from_le_bytes(array(&bytes[4..6]));
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }
    let flags = MessageFlags::from_raw(u16::from_le_bytes(array(&bytes[6..8])));
    if !flags.is_valid_v1() {
        return Err(DecodeError::InvalidFlags { flags: flags.raw() });
    }

    Ok(MessageHeader {
        version,
        flags,
        schema_hash: u64::from_le_bytes(array(&bytes[8..16])),
        reference_frame: i64::from_le_bytes(array(&bytes[16..24])),
        component_count: u16::from_le_bytes(array(&bytes[24..26])),
        payload_len: u32::from_le_bytes(array(&bytes[26..30])),
    })
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
