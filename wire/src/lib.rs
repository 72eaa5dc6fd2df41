//! Message framing for dsync: a fixed 30-byte header followed by packed
//! component records.
//!
//! This crate only frames bytes. Record bit layout lives in `codec`.

mod error;
mod header;
mod limits;
mod message;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use header::{
    decode_header, encode_header, MessageFlags, MessageHeader, HEADER_SIZE, MAGIC, VERSION,
};
pub use limits::Limits;
pub use message::{decode_message, encode_message, WireMessage};
