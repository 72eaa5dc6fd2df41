//! Limits for codec-level message decoding.

/// Codec-specific limits enforced while encoding and decoding messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum number of component records in one message.
    pub max_components_per_message: usize,
    /// Maximum total message size in bytes, header included.
    pub max_message_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_components_per_message: 1024,
            max_message_bytes: 64 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_components_per_message: 16,
            max_message_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions beyond what the header can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_components_per_message: u16::MAX as usize,
            max_message_bytes: usize::MAX,
        }
    }

    /// The framing limits handed to the wire layer.
    #[must_use]
    pub const fn wire_limits(&self) -> wire::Limits {
        wire::Limits {
            max_message_bytes: self.max_message_bytes,
            max_components: self.max_components_per_message,
        }
    }
}
