#![cfg(feature = "serde")]

use schema::{ComponentDescriptor, FieldKind, NativeType, Schema, DEFAULT_PRIORITY};

const SCHEMA_JSON: &str = r#"{
  "components": [
    {
      "type_id": 116,
      "name": "GenericFieldShort3",
      "native_size": 2,
      "fields": [
        {
          "name": "number",
          "kind": { "type": "s_int", "bits": 16 },
          "frame_tracked": true,
          "native": { "offset": 0, "type": "i16" }
        }
      ]
    },
    {
      "type_id": 16,
      "name": "AssetId",
      "priority": 100,
      "native_size": 5,
      "fields": [
        {
          "name": "value",
          "kind": { "type": "integer_range", "bits": 32, "min": -2147483648 },
          "native": { "offset": 0, "type": "i32" }
        },
        {
          "name": "isFromGroup",
          "kind": { "type": "bool" },
          "native": { "offset": 4, "type": "bool8" }
        }
      ]
    }
  ]
}"#;

#[test]
fn schema_loads_from_json() {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON).unwrap();
    schema.validate().unwrap();

    let short = schema.get(116).unwrap();
    assert_eq!(short.priority, DEFAULT_PRIORITY);
    assert_eq!(short.fields[0].kind, FieldKind::short());
    assert!(short.fields[0].frame_tracked);
    assert_eq!(short.fields[0].native.ty, NativeType::I16);

    let asset = schema.get(16).unwrap();
    assert_eq!(asset.fields[0].kind, FieldKind::int32());
    assert!(!asset.fields[1].frame_tracked);
}

#[test]
fn descriptor_json_roundtrip() {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON).unwrap();
    let json = serde_json::to_string(&schema.components[1]).unwrap();
    let back: ComponentDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema.components[1]);
}
