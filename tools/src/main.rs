use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::CodecLimits;
use dsync_tools::{
    decode_message_json, format_decode_pretty, inspect_message, sample_message, InspectReport,
};
use glob::Pattern;

#[derive(Parser)]
#[command(
    name = "dsync-tools",
    version,
    about = "dsync message inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect message structure and per-record sizes.
    Inspect {
        /// Path to a message file or a directory of message files.
        message_path: PathBuf,
        /// Schema JSON for per-record sizes (defaults to the demo schema).
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Report the header only.
        #[arg(long)]
        header_only: bool,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected messages.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected messages (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode message records into structured output.
    Decode {
        /// Path to the message bytes.
        message_file: PathBuf,
        /// Schema JSON describing the message contents (defaults to the demo schema).
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Write a sample message and its schema JSON.
    Sample {
        /// Where to write the message bytes.
        out: PathBuf,
        /// Where to write the schema JSON.
        #[arg(long)]
        schema_out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let limits = CodecLimits::default();
    match cli.command {
        Command::Inspect {
            message_path,
            schema,
            header_only,
            glob,
            sort,
            limit,
        } => {
            let schema = if header_only {
                None
            } else {
                Some(resolve_schema(schema.as_deref()).context("load schema")?)
            };
            if message_path.is_dir() {
                let entries = collect_message_entries(&message_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    log::debug!("inspecting {}", entry.path.display());
                    let bytes = fs::read(&entry.path)
                        .with_context(|| format!("read message {}", entry.path.display()))?;
                    let report = inspect_message(&bytes, schema.as_ref(), &limits)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_inspect_report(&report);
                }
            } else {
                let bytes = fs::read(&message_path)
                    .with_context(|| format!("read message {}", message_path.display()))?;
                let report = inspect_message(&bytes, schema.as_ref(), &limits)?;
                print_inspect_report(&report);
            }
        }
        Command::Decode {
            message_file,
            schema,
            format,
        } => {
            let bytes = fs::read(&message_file)
                .with_context(|| format!("read message {}", message_file.display()))?;
            let schema = resolve_schema(schema.as_deref()).context("load schema")?;
            let output = decode_message_json(&bytes, &schema, &limits)?;
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&output));
                }
            }
        }
        Command::Sample { out, schema_out } => {
            let (schema, bytes) = sample_message()?;
            fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            log::info!("wrote {} byte sample message to {}", bytes.len(), out.display());
            if let Some(path) = schema_out {
                let json = serde_json::to_string_pretty(&schema).context("serialize schema")?;
                fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
            }
        }
    }
    Ok(())
}

fn resolve_schema(path: Option<&Path>) -> Result<schema::Schema> {
    match path {
        Some(path) => load_schema(path),
        None => demo_schema::demo_schema().context("build demo schema"),
    }
}

fn load_schema(path: &Path) -> Result<schema::Schema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    let schema: schema::Schema = serde_json::from_str(&contents).context("parse schema json")?;
    schema
        .validate()
        .map_err(|err| anyhow::anyhow!("schema validation failed: {err}"))?;
    Ok(schema)
}

struct MessageEntry {
    path: PathBuf,
    size: u64,
}

fn collect_message_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<MessageEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(MessageEntry { path, size });
    }
    Ok(entries)
}

fn maybe_sort_entries(
    mut entries: Vec<MessageEntry>,
    sort: Option<InspectSort>,
) -> Vec<MessageEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}

fn print_inspect_report(report: &InspectReport) {
    let header = report.header;
    println!(
        "version: {} flags: 0x{:04x} schema_hash: 0x{:016x}",
        header.version,
        header.flags.raw(),
        header.schema_hash
    );
    println!(
        "reference_frame: {}{} components: {} payload_len: {} bytes",
        header.reference_frame,
        if header.flags.is_ref_frame_valid() {
            ""
        } else {
            " (invalid)"
        },
        header.component_count,
        header.payload_len
    );
    let Some(records) = &report.records else {
        return;
    };
    println!("records:");
    for record in records {
        println!(
            "  {} [{}]: {} bits, {} present, {} stopped",
            record.name, record.type_id, record.bits, record.present_fields, record.stopped_fields
        );
    }
}
