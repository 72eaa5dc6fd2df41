//! Delta-state component codec for dsync.
//!
//! This is the main codec crate that ties together bitstream, wire, and schema
//! to encode a component's changed fields compactly, track field freshness by
//! simulation frame, and merge partial updates deterministically.
//!
//! # Features
//!
//! - Per-field presence and stop masks
//! - 8-bit simulation-frame deltas for frame-tracked fields
//! - Last-writer-wins merging of partial records
//! - Native fixed-layout import and export
//! - Multi-record messages behind one header
//! - Optional entity-reference remapping
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Fail fast** - Truncated input is an error, never a defaulted field.
//! - **Deterministic** - Same inputs produce same outputs.
//!
//! # Example
//!
//! ```
//! use codec::{decode_record_from_slice, encode_record_to_vec, merge, DeltaRecord, FieldValue,
//!     ReferenceFrame, SimulationFrame};
//! use schema::{ComponentDescriptor, FieldDef, FieldKind, NativeSlot, NativeType};
//!
//! let desc = ComponentDescriptor::builder(16, "AssetId")
//!     .field(FieldDef::new("value", FieldKind::int32(), NativeSlot::new(0, NativeType::I32)))
//!     .field(FieldDef::new("isFromGroup", FieldKind::bool(), NativeSlot::new(4, NativeType::Bool8)))
//!     .build()
//!     .unwrap();
//!
//! let mut update = DeltaRecord::empty(&desc);
//! update.set(&desc, 0, FieldValue::Int(-5), None).unwrap();
//!
//! let reference = ReferenceFrame::invalid(SimulationFrame::new(0));
//! let bytes = encode_record_to_vec(&desc, &update, reference).unwrap();
//! assert_eq!(bytes, [0x5F, 0xFF, 0xFF, 0xFE, 0xC0]);
//!
//! let decoded = decode_record_from_slice(&desc, reference.frame, &bytes).unwrap();
//! let mut state = DeltaRecord::empty(&desc);
//! merge(&mut state, &decoded).unwrap();
//! assert_eq!(state.value(0), Some(FieldValue::Int(-5)));
//! ```

mod encode;
mod error;
mod field;
mod limits;
mod merge;
mod message;
mod native;
mod record;
mod refs;
mod types;
mod value;

pub use encode::{
    decode_record, decode_record_from_slice, encode_record, encode_record_to_vec,
    encoded_bit_len, max_encoded_bits,
};
pub use error::{CodecError, CodecResult, FailureKind, LimitKind, ValueReason};
pub use field::{apply_frame_delta, frame_delta, read_field, read_value, write_field};
pub use limits::CodecLimits;
pub use merge::merge;
pub use message::{decode_message, encode_message, DecodedMessage};
pub use native::{export_native, import_native};
pub use record::{DeltaRecord, RecordDisplay};
pub use refs::{EntityMapper, MapError, RefFields};
pub use types::{EntityId, ReferenceFrame, SimulationFrame};
pub use value::FieldValue;
pub use wire::Limits as WireLimits;
