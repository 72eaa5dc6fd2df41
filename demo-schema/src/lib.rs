//! Sample component descriptors used by tests, benches and the CLI.

use schema::{
    ComponentDescriptor, FieldDef, FieldKind, NativeSlot, NativeType, Schema, SchemaResult,
};

pub const ASSET_ID: u16 = 16;
pub const CONNECTED_ENTITY: u16 = 17;
pub const GENERIC_FIELD_SHORT3: u16 = 116;

/// `AssetId`: a full-range `i32` and a group flag, neither frame-tracked.
///
/// Native layout: `i32` at 0, `u8` bool at 4, 5 bytes total.
pub fn asset_id() -> SchemaResult<ComponentDescriptor> {
    ComponentDescriptor::builder(ASSET_ID, "AssetId")
        .field(FieldDef::new(
            "value",
            FieldKind::int32(),
            NativeSlot::new(0, NativeType::I32),
        ))
        .field(FieldDef::new(
            "isFromGroup",
            FieldKind::bool(),
            NativeSlot::new(4, NativeType::Bool8),
        ))
        .build()
}

/// `ConnectedEntity`: a single entity reference.
///
/// Native layout: entity id at 0, 4 bytes total; `0` is no entity.
pub fn connected_entity() -> SchemaResult<ComponentDescriptor> {
    ComponentDescriptor::builder(CONNECTED_ENTITY, "ConnectedEntity")
        .field(FieldDef::new(
            "value",
            FieldKind::entity_ref(),
            NativeSlot::new(0, NativeType::Entity32),
        ))
        .build()
}

/// `GenericFieldShort3`: one frame-tracked 16-bit integer.
///
/// Native layout: `i16` at 0, 2 bytes total.
pub fn generic_field_short3() -> SchemaResult<ComponentDescriptor> {
    ComponentDescriptor::builder(GENERIC_FIELD_SHORT3, "GenericFieldShort3")
        .field(
            FieldDef::new(
                "number",
                FieldKind::short(),
                NativeSlot::new(0, NativeType::I16),
            )
            .tracked(),
        )
        .build()
}

/// Schema holding every sample component.
pub fn demo_schema() -> SchemaResult<Schema> {
    Schema::builder()
        .component(asset_id()?)
        .component(connected_entity()?)
        .component(generic_field_short3()?)
        .build()
}
