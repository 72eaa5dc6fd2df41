//! Append-only bit writer.

use crate::error::{BitError, BitResult};

/// A bit-level writer for encoding packed binary data.
///
/// Bits are packed MSB-first within each byte. Writes are accumulated in an
/// internal buffer; call [`finish`](Self::finish) to get the final bytes.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// The accumulated bytes.
    bytes: Vec<u8>,
    /// Current byte being written (not yet pushed to bytes).
    current_byte: u8,
    /// Number of bits written to `current_byte` (0-7).
    bit_count: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BitWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Writes a single bit.
    pub fn write_bool(&mut self, value: bool) {
        self.push_chunk(u8::from(value), 1);
    }

    /// Writes up to 64 bits from an unsigned integer, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    /// Nothing is written on error.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount {
                bits: usize::from(bits),
                max_bits: 64,
            });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange {
                value,
                bits: usize::from(bits),
            });
        }
        self.push_bits(value, bits);
        Ok(())
    }

    /// Appends the low `bits` bits of `value` (`bits <= 64`).
    ///
    /// Fills the pending byte first, then moves whole bytes at a time.
    pub(crate) fn push_bits(&mut self, value: u64, bits: u8) {
        let mut remaining = bits.min(64);
        while remaining > 0 {
            let take = (8 - self.bit_count).min(remaining);
            remaining -= take;
            let chunk = (value >> remaining) & ((1u64 << take) - 1);
            // `take <= 8`, so the chunk fits in a byte.
            self.push_chunk(chunk as u8, take);
        }
    }

    /// Appends `width` bits (`1..=8`, never crossing the pending byte).
    fn push_chunk(&mut self, chunk: u8, width: u8) {
        self.current_byte = self
            .current_byte
            .checked_shl(u32::from(width))
            .unwrap_or(0)
            | chunk;
        self.bit_count += width;
        if self.bit_count == 8 {
            self.bytes.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// The final partial byte is zero-padded on the right.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.pad_to_byte();
        self.bytes
    }

    /// Finishes writing and appends the padded bytes to `buf`.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        self.pad_to_byte();
        buf.append(&mut self.bytes);
    }

    fn pad_to_byte(&mut self) {
        if self.bit_count > 0 {
            self.push_chunk(0, 8 - self.bit_count);
        }
    }
}
