//! Component descriptors and field kinds for the dsync codec.
//!
//! This crate defines how a replicated component type is described:
//! - Component descriptors (type id, ordered fields, scheduling keys)
//! - Field kinds (bool, ranged and fixed-width integers, floats, entity refs)
//! - Per-field mask bits
//! - Explicit native memory layouts (offset + scalar type per field)
//! - A schema registry with deterministic hashing
//!
//! # Design Principles
//!
//! - **Runtime descriptors** - One generic engine drives every component type.
//! - **Explicit layouts** - Native blocks are described by an offset table.
//! - **Deterministic hashing** - Schema hash is stable given the same definition.

mod descriptor;
mod error;
mod field;
mod hash;
mod mask;
mod native;
mod schema;

pub use descriptor::{ComponentDescriptor, DescriptorBuilder, DEFAULT_PRIORITY};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDef, FieldKind, ENTITY_REF_BITS, FRAME_DELTA_BITS};
pub use hash::schema_hash;
pub use mask::{FieldMask, MAX_FIELDS};
pub use native::{NativeSlot, NativeType};
pub use schema::{Schema, SchemaBuilder};

/// A component type id, globally unique within a schema.
pub type ComponentTypeId = u16;
