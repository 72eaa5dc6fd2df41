//! Bit-level stream primitives for the dsync component codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for bit-level encoding
//! and decoding, plus the protocol operations the component codec is built
//! from: presence masks, multi-bit masks, ranged integers, and fixed-width
//! scalars.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about components,
//!   fields, or simulation frames.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bool(true);
//! writer.write_bits(42, 7).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bool().unwrap(), true);
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! ```

mod error;
mod protocol;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use protocol::{FLOAT_BITS, MAX_MASK_BITS, SHORT_BITS};
pub use reader::BitReader;
pub use writer::BitWriter;
