//! Limits enforced while decoding message framing.

/// Upper bounds applied to untrusted message headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total message size in bytes, header included.
    pub max_message_bytes: usize,
    /// Maximum number of component records per message.
    pub max_components: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_bytes: 64 * 1024,
            max_components: 4096,
        }
    }
}

impl Limits {
    /// Small limits for tests that exercise the rejection paths.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_message_bytes: 4096,
            max_components: 64,
        }
    }

    /// Limits that accept anything the header fields can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_message_bytes: usize::MAX,
            max_components: u16::MAX as usize,
        }
    }
}
