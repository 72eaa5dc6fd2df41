//! Bit-level reader with bounded operations.

use crate::error::{BitError, BitResult};

/// A cursor-based bit reader over a borrowed byte slice.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input. The cursor only moves
/// forward; [`reset`](Self::reset) rewinds to the start.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Rewinds the cursor to the first bit.
    pub fn reset(&mut self) {
        self.bit_pos = 0;
    }

    /// Reads a single bit as a boolean.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        if self.bits_remaining() == 0 {
            return Err(BitError::UnexpectedEof {
                requested: 1,
                available: 0,
            });
        }
        let byte_idx = self.bit_pos / 8;
        let bit_idx = self.bit_pos % 8;
        let bit = (self.data[byte_idx] >> (7 - bit_idx)) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Reads up to 64 bits as an unsigned integer.
    ///
    /// The cursor does not move when the read fails.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount {
                bits: bits as usize,
                max_bits: 64,
            });
        }
        if bits == 0 {
            return Ok(0);
        }
        if bits as usize > self.bits_remaining() {
            return Err(BitError::UnexpectedEof {
                requested: bits as usize,
                available: self.bits_remaining(),
            });
        }

        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Returns `true` if every remaining bit is zero padding within the
    /// current byte.
    #[must_use]
    pub fn only_padding_remains(&self) -> bool {
        let remaining = self.bits_remaining();
        if remaining >= 8 {
            return false;
        }
        if remaining == 0 {
            return true;
        }
        let last = self.data[self.data.len() - 1];
        let mask = (1u16 << remaining) - 1;
        u16::from(last) & mask == 0
    }
}
