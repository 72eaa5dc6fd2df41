//! Introspection and debugging tools for the dsync component codec.
//!
//! This crate provides utilities for inspecting encoded messages:
//!
//! - Decode a message into structured JSON or a readable listing
//! - Explain message size per record
//! - Produce sample messages from the demo schema
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use bitstream::BitReader;
use codec::{CodecLimits, DeltaRecord, FieldValue, ReferenceFrame, SimulationFrame};
use schema::{ComponentTypeId, Schema};
use serde::Serialize;
use wire::MessageHeader;

/// Decoded message in a serializable shape.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeOutput {
    pub header: HeaderOutput,
    pub records: Vec<RecordOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderOutput {
    pub version: u16,
    pub flags: u16,
    pub schema_hash: String,
    pub reference_frame: i64,
    pub ref_frame_valid: bool,
    pub component_count: u16,
    pub payload_len: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordOutput {
    pub type_id: ComponentTypeId,
    pub name: String,
    pub fields_mask: u32,
    pub stopped_mask: u32,
    pub fields: Vec<FieldOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldOutput {
    pub index: usize,
    pub name: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<i64>,
    pub stopped: bool,
}

/// Size breakdown of a message.
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub header: MessageHeader,
    /// Per-record sizes; `None` without a schema to decode against.
    pub records: Option<Vec<RecordSize>>,
}

#[derive(Debug, Clone)]
pub struct RecordSize {
    pub type_id: ComponentTypeId,
    pub name: String,
    /// Bits including the 16-bit type id.
    pub bits: usize,
    pub present_fields: usize,
    pub stopped_fields: usize,
}

/// Decodes a message into [`DecodeOutput`].
pub fn decode_message_json(
    bytes: &[u8],
    schema: &Schema,
    limits: &CodecLimits,
) -> Result<DecodeOutput> {
    let header = wire::decode_header(bytes).context("decode header")?;
    let message = codec::decode_message(schema, bytes, limits).context("decode message")?;
    let records = message
        .records
        .iter()
        .map(|record| record_output(schema, record))
        .collect::<Result<Vec<_>>>()?;
    Ok(DecodeOutput {
        header: header_output(&header),
        records,
    })
}

/// Walks a message and measures every record.
///
/// Without a schema only the header is reported.
pub fn inspect_message(
    bytes: &[u8],
    schema: Option<&Schema>,
    limits: &CodecLimits,
) -> Result<InspectReport> {
    let message = wire::decode_message(bytes, &limits.wire_limits()).context("decode framing")?;
    let header = message.header;
    let Some(schema) = schema else {
        return Ok(InspectReport {
            header,
            records: None,
        });
    };
    if header.schema_hash != schema::schema_hash(schema) {
        anyhow::bail!(
            "schema hash mismatch: message 0x{:016x}, schema 0x{:016x}",
            header.schema_hash,
            schema::schema_hash(schema)
        );
    }

    let reference = SimulationFrame::new(header.reference_frame);
    let mut reader = BitReader::new(message.payload);
    let mut records = Vec::with_capacity(usize::from(header.component_count));
    for index in 0..header.component_count {
        let start = reader.bit_position();
        // 16 bits always fit.
        let type_id = reader
            .read_bits(16)
            .with_context(|| format!("read type id of record {index}"))?
            as ComponentTypeId;
        let descriptor = schema
            .get(type_id)
            .with_context(|| format!("unknown component type {type_id}"))?;
        let record = codec::decode_record(descriptor, reference, &mut reader)
            .with_context(|| format!("decode record {index} ({})", descriptor.name))?;
        records.push(RecordSize {
            type_id,
            name: descriptor.name.clone(),
            bits: reader.bit_position() - start,
            present_fields: record.fields_mask().len(),
            stopped_fields: record.stopped_mask().len(),
        });
    }
    Ok(InspectReport {
        header,
        records: Some(records),
    })
}

/// Renders a decoded message as indented text, one record per block.
#[must_use]
pub fn format_decode_pretty(output: &DecodeOutput) -> String {
    let mut out = String::new();
    let header = &output.header;
    let _ = writeln!(
        out,
        "version {} schema {} reference frame {}{}",
        header.version,
        header.schema_hash,
        header.reference_frame,
        if header.ref_frame_valid { "" } else { " (invalid)" }
    );
    let _ = writeln!(
        out,
        "{} records, {} payload bytes",
        header.component_count, header.payload_len
    );
    for record in &output.records {
        let _ = writeln!(
            out,
            "{} [{}] mask 0b{:b} stopped 0b{:b}",
            record.name, record.type_id, record.fields_mask, record.stopped_mask
        );
        for field in &record.fields {
            let _ = write!(out, "  {}: {}", field.name, field.value);
            if let Some(frame) = field.frame {
                let _ = write!(out, " @{frame}");
            }
            if field.stopped {
                let _ = write!(out, " (stopped)");
            }
            out.push('\n');
        }
    }
    out
}

/// Builds a small message over the demo schema, for trying the tools out.
pub fn sample_message() -> Result<(Schema, Vec<u8>)> {
    let schema = demo_schema::demo_schema().context("build demo schema")?;
    let descriptor = |type_id| {
        schema
            .get(type_id)
            .with_context(|| format!("demo component {type_id} missing"))
    };
    let asset = descriptor(demo_schema::ASSET_ID)?;
    let short = descriptor(demo_schema::GENERIC_FIELD_SHORT3)?;
    let connected = descriptor(demo_schema::CONNECTED_ENTITY)?;

    let reference = ReferenceFrame::valid(SimulationFrame::new(1_000));
    let mut asset_record = DeltaRecord::empty(asset);
    asset_record.set(asset, 0, FieldValue::Int(-5), None)?;

    let block = 321i16.to_le_bytes();
    let mut short_record =
        codec::import_native(short, &block, &[SimulationFrame::new(1_004)])?;
    short_record.stop(0)?;

    let mut connected_record = DeltaRecord::empty(connected);
    connected_record.set(
        connected,
        0,
        FieldValue::Entity(Some(codec::EntityId::new(42))),
        None,
    )?;

    let bytes = codec::encode_message(
        &schema,
        reference,
        &[asset_record, short_record, connected_record],
        &CodecLimits::default(),
    )?;
    Ok((schema, bytes))
}

fn header_output(header: &MessageHeader) -> HeaderOutput {
    HeaderOutput {
        version: header.version,
        flags: header.flags.raw(),
        schema_hash: format!("0x{:016x}", header.schema_hash),
        reference_frame: header.reference_frame,
        ref_frame_valid: header.flags.is_ref_frame_valid(),
        component_count: header.component_count,
        payload_len: header.payload_len,
    }
}

fn record_output(schema: &Schema, record: &DeltaRecord) -> Result<RecordOutput> {
    let descriptor = schema
        .get(record.type_id())
        .with_context(|| format!("unknown component type {}", record.type_id()))?;
    let fields = record
        .present()
        .map(|(index, value, frame)| FieldOutput {
            index,
            name: descriptor.fields[index].name.clone(),
            value: value_json(value),
            frame: frame.map(SimulationFrame::raw),
            stopped: record.stopped_mask().contains(index),
        })
        .collect();
    Ok(RecordOutput {
        type_id: record.type_id(),
        name: descriptor.name.clone(),
        fields_mask: record.fields_mask().raw(),
        stopped_mask: record.stopped_mask().raw(),
        fields,
    })
}

fn value_json(value: FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Bool(v) => serde_json::Value::Bool(v),
        FieldValue::Int(v) => serde_json::Value::from(v),
        FieldValue::UInt(v) => serde_json::Value::from(v),
        FieldValue::Float(v) => serde_json::Number::from_f64(f64::from(v))
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        FieldValue::Entity(id) => id.map_or(serde_json::Value::Null, |id| {
            serde_json::Value::from(id.raw())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_sample_message() {
        let (schema, bytes) = sample_message().unwrap();
        let output = decode_message_json(&bytes, &schema, &CodecLimits::default()).unwrap();
        assert_eq!(output.header.component_count, 3);
        assert!(output.header.ref_frame_valid);
        assert_eq!(output.records.len(), 3);

        let asset = &output.records[0];
        assert_eq!(asset.name, "AssetId");
        assert_eq!(asset.fields.len(), 1);
        assert_eq!(asset.fields[0].value, serde_json::json!(-5));

        let short = &output.records[1];
        assert_eq!(short.fields[0].frame, Some(1_004));
        assert!(short.fields[0].stopped);

        let connected = &output.records[2];
        assert_eq!(connected.fields[0].value, serde_json::json!(42));
    }

    #[test]
    fn json_output_shape() {
        let (schema, bytes) = sample_message().unwrap();
        let output = decode_message_json(&bytes, &schema, &CodecLimits::default()).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["records"][0]["fields"][0]["name"], "value");
        assert!(json["records"][0]["fields"][0].get("frame").is_none());
        assert_eq!(json["header"]["reference_frame"], 1_000);
    }

    #[test]
    fn pretty_output_lists_fields() {
        let (schema, bytes) = sample_message().unwrap();
        let output = decode_message_json(&bytes, &schema, &CodecLimits::default()).unwrap();
        let text = format_decode_pretty(&output);
        assert!(text.contains("AssetId [16]"));
        assert!(text.contains("  number: 321 @1004 (stopped)"));
        assert!(text.contains("3 records"));
    }

    #[test]
    fn inspect_measures_records() {
        let (schema, bytes) = sample_message().unwrap();
        let report = inspect_message(&bytes, Some(&schema), &CodecLimits::default()).unwrap();
        let records = report.records.unwrap();
        assert_eq!(records.len(), 3);
        // type id + has-stopped + value (present, 32 bits) + flag (absent)
        assert_eq!(records[0].bits, 16 + 1 + 33 + 1);
        assert_eq!(records[1].stopped_fields, 1);
        let total: usize = records.iter().map(|record| record.bits).sum();
        assert_eq!(total.div_ceil(8), report.header.payload_len as usize);
    }

    #[test]
    fn inspect_without_schema_reports_header_only() {
        let (_, bytes) = sample_message().unwrap();
        let report = inspect_message(&bytes, None, &CodecLimits::default()).unwrap();
        assert!(report.records.is_none());
        assert_eq!(report.header.component_count, 3);
    }

    #[test]
    fn corrupted_message_fails() {
        let (schema, mut bytes) = sample_message().unwrap();
        bytes.pop();
        assert!(decode_message_json(&bytes, &schema, &CodecLimits::default()).is_err());
    }
}
