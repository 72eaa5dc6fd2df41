//! Protocol-level stream operations: presence masks, ranged integers and
//! fixed-width scalars.
//!
//! Every optional payload is guarded by exactly one mask bit:
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! if writer.write_mask(true) {
//!     writer.write_short(-12);
//! }
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_mask().unwrap());
//! assert_eq!(reader.read_short().unwrap(), -12);
//! ```

use crate::error::{BitError, BitResult};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Maximum width of a multi-bit mask.
pub const MAX_MASK_BITS: u8 = 32;

/// Width of an encoded `short`.
pub const SHORT_BITS: u8 = 16;

/// Width of an encoded `f32`.
pub const FLOAT_BITS: u8 = 32;

fn check_width(bits: u8, max_bits: u8) -> BitResult<()> {
    if bits > max_bits {
        return Err(BitError::InvalidBitCount {
            bits: bits as usize,
            max_bits: max_bits as usize,
        });
    }
    Ok(())
}

/// Inclusive value range of a `bits`-wide field offset by `min`.
fn ranged_bounds(bits: u8, min: i64) -> (i128, i128) {
    let span = (1i128 << bits) - 1;
    (i128::from(min), i128::from(min) + span)
}

/// Inclusive value range of a `bits`-wide two's complement field.
fn signed_bounds(bits: u8) -> (i128, i128) {
    let half = 1i128 << (bits - 1);
    (-half, half - 1)
}

impl BitWriter {
    /// Writes one presence bit and returns it, so callers can gate the payload.
    pub fn write_mask(&mut self, present: bool) -> bool {
        self.write_bool(present);
        present
    }

    /// Writes the low `bits` bits of `mask`.
    pub fn write_mask_bits(&mut self, mask: u32, bits: u8) -> BitResult<()> {
        check_width(bits, MAX_MASK_BITS)?;
        let low = if bits == 32 {
            mask
        } else {
            mask & ((1u32 << bits) - 1)
        };
        self.write_bits(u64::from(low), bits)
    }

    /// Writes `value - min` in `bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::IntegerOutOfRange`] if `value` is outside
    /// `[min, min + 2^bits - 1]`. Nothing is written in that case.
    pub fn write_integer_range(&mut self, value: i64, bits: u8, min: i64) -> BitResult<()> {
        check_width(bits, 64)?;
        if bits == 0 {
            return Ok(());
        }
        let (lo, hi) = ranged_bounds(bits, min);
        let wide = i128::from(value);
        if wide < lo || wide > hi {
            return Err(BitError::IntegerOutOfRange {
                value: wide,
                min: lo,
                max: hi,
            });
        }
        // Offset is in [0, 2^bits - 1] so it fits in u64.
        let offset = (wide - lo) as u64;
        self.write_bits(offset, bits)
    }

    /// Writes an unsigned integer in `bits` bits.
    pub fn write_uint(&mut self, value: u64, bits: u8) -> BitResult<()> {
        self.write_bits(value, bits)
    }

    /// Writes a two's complement signed integer in `bits` bits.
    pub fn write_int(&mut self, value: i64, bits: u8) -> BitResult<()> {
        check_width(bits, 64)?;
        if bits == 0 {
            return Ok(());
        }
        let (lo, hi) = signed_bounds(bits);
        let wide = i128::from(value);
        if wide < lo || wide > hi {
            return Err(BitError::IntegerOutOfRange {
                value: wide,
                min: lo,
                max: hi,
            });
        }
        let raw = value as u64;
        let encoded = if bits == 64 {
            raw
        } else {
            raw & ((1u64 << bits) - 1)
        };
        self.write_bits(encoded, bits)
    }

    /// Writes a 16-bit signed integer.
    pub fn write_short(&mut self, value: i16) {
        self.push_bits(u64::from(value as u16), SHORT_BITS);
    }

    /// Writes an unsigned byte.
    pub fn write_byte(&mut self, value: u8) {
        self.push_bits(u64::from(value), 8);
    }

    /// Writes the raw IEEE-754 bits of an `f32`.
    pub fn write_float(&mut self, value: f32) {
        self.push_bits(u64::from(value.to_bits()), FLOAT_BITS);
    }
}

impl BitReader<'_> {
    /// Reads one presence bit.
    pub fn read_mask(&mut self) -> BitResult<bool> {
        self.read_bit()
    }

    /// Reads a boolean.
    pub fn read_bool(&mut self) -> BitResult<bool> {
        self.read_bit()
    }

    /// Reads a `bits`-wide mask.
    pub fn read_mask_bits(&mut self, bits: u8) -> BitResult<u32> {
        check_width(bits, MAX_MASK_BITS)?;
        // At most 32 bits were read.
        Ok(self.read_bits(bits)? as u32)
    }

    /// Reads a ranged integer written by [`BitWriter::write_integer_range`].
    pub fn read_integer_range(&mut self, bits: u8, min: i64) -> BitResult<i64> {
        check_width(bits, 64)?;
        let offset = self.read_bits(bits)?;
        let wide = i128::from(min) + i128::from(offset);
        i64::try_from(wide).map_err(|_| {
            let (lo, hi) = ranged_bounds(bits.max(1), min);
            BitError::IntegerOutOfRange {
                value: wide,
                min: lo,
                max: hi.min(i128::from(i64::MAX)),
            }
        })
    }

    /// Reads an unsigned integer of `bits` bits.
    pub fn read_uint(&mut self, bits: u8) -> BitResult<u64> {
        self.read_bits(bits)
    }

    /// Reads a two's complement signed integer of `bits` bits.
    pub fn read_int(&mut self, bits: u8) -> BitResult<i64> {
        check_width(bits, 64)?;
        if bits == 0 {
            return Ok(0);
        }
        let raw = self.read_bits(bits)?;
        if bits == 64 {
            return Ok(raw as i64);
        }
        let sign = 1u64 << (bits - 1);
        let extended = if raw & sign != 0 {
            raw | !((1u64 << bits) - 1)
        } else {
            raw
        };
        Ok(extended as i64)
    }

    /// Reads a 16-bit signed integer.
    pub fn read_short(&mut self) -> BitResult<i16> {
        Ok(self.read_bits(SHORT_BITS)? as u16 as i16)
    }

    /// Reads an unsigned byte.
    pub fn read_byte(&mut self) -> BitResult<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads an `f32` from its raw IEEE-754 bits.
    pub fn read_float(&mut self) -> BitResult<f32> {
        Ok(f32::from_bits(self.read_bits(FLOAT_BITS)? as u32))
    }
}
