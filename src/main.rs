//! filebox CLI - Command line interface for filebox
//!
//! Inspect and convert YAML/JSON documents, pack them into binary records,
//! create directory trees, and move images through base64.

use clap::{Parser, Subcommand};
use filebox::{codec, ConfigTree, LogConfig, StoreOptions, StructuredFileStore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "filebox")]
#[command(about = "Structured file I/O: YAML/JSON config trees and binary records")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Directory for the running log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    no_log_file: bool,

    /// Do not echo log lines to stderr
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a YAML or JSON document
    Show {
        /// Document path (.yaml/.yml are read as YAML, anything else as JSON)
        path: PathBuf,
        /// Dotted path of a single field to print
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Convert a YAML or JSON document to indented JSON
    Convert {
        /// Source document
        source: PathBuf,
        /// Destination JSON file
        destination: PathBuf,
    },

    /// Report a file's size in kilobytes
    Size {
        /// File path
        path: PathBuf,
    },

    /// Create directories and their missing parents
    Mkdir {
        /// Directories to create
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Do not log each directory
        #[arg(long)]
        silent: bool,
    },

    /// Pack a YAML or JSON document into a binary record
    Pack {
        /// Source document
        source: PathBuf,
        /// Destination record file
        destination: PathBuf,
        /// zstd-compress the payload
        #[arg(short, long)]
        compress: bool,
    },

    /// Unpack a binary record back into indented JSON
    Unpack {
        /// Record file
        source: PathBuf,
        /// Destination JSON file
        destination: PathBuf,
    },

    /// Show a binary record's header
    Inspect {
        /// Record file
        path: PathBuf,
    },

    /// Print a file's contents as base64
    EncodeImage {
        /// Image path
        path: PathBuf,
    },

    /// Decode base64 into a file
    DecodeImage {
        /// Destination file
        destination: PathBuf,
        /// Base64 text
        #[arg(short, long, conflicts_with = "input", required_unless_present = "input")]
        data: Option<String>,
        /// File holding the base64 text
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logger = filebox::logging::init(&LogConfig {
        directory: cli.log_dir.clone(),
        log_to_file: !cli.no_log_file,
        echo: !cli.quiet,
        ..LogConfig::default()
    })?;

    let store = StructuredFileStore::new();

    match cli.command {
        Commands::Show { path, key } => {
            let tree = load_document(&store, &path)?;
            let value = match key {
                Some(key) => tree
                    .get_path(&key)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))?,
                None => tree.into_value(),
            };
            output(&cli.format, &value);
        }

        Commands::Convert {
            source,
            destination,
        } => {
            let tree = load_document(&store, &source)?;
            store.save_json(&destination, &tree)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "source": source.display().to_string(),
                    "destination": destination.display().to_string(),
                    "keys": tree.len()
                }),
            );
        }

        Commands::Size { path } => {
            let report = store.file_size(&path)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path.display().to_string(),
                    "bytes": report.bytes(),
                    "size": report.to_string()
                }),
            );
        }

        Commands::Mkdir { paths, silent } => {
            store.ensure_directories(&paths, !silent)?;
            let created: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "directories": created
                }),
            );
        }

        Commands::Pack {
            source,
            destination,
            compress,
        } => {
            let tree = load_document(&store, &source)?;
            let store = if compress {
                store.with_options(StoreOptions::default().with_compression(3))
            } else {
                store
            };
            store.save_opaque(&destination, &tree)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "destination": destination.display().to_string(),
                    "size": store.file_size_report(&destination)?
                }),
            );
        }

        Commands::Unpack {
            source,
            destination,
        } => {
            let tree: ConfigTree = store.load_opaque(&source)?;
            store.save_json(&destination, &tree)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "destination": destination.display().to_string(),
                    "keys": tree.len()
                }),
            );
        }

        Commands::Inspect { path } => {
            let header = store.read_opaque_header(&path)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path.display().to_string(),
                    "version": header.version,
                    "compressed": header.compressed,
                    "payload_bytes": header.payload_len,
                    "checksum": header.checksum.to_hex()
                }),
            );
        }

        Commands::EncodeImage { path } => {
            let encoded = codec::encode_image_into_base64(&path)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path.display().to_string(),
                    "base64": encoded
                }),
            );
        }

        Commands::DecodeImage {
            destination,
            data,
            input,
        } => {
            let encoded = match (data, input) {
                (Some(data), _) => data,
                (None, Some(input)) => std::fs::read_to_string(&input)
                    .map_err(|e| filebox::Error::io(&input, e))?,
                (None, None) => anyhow::bail!("Either --data or --input is required"),
            };
            codec::decode_image(&encoded, &destination)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "destination": destination.display().to_string(),
                    "size": store.file_size_report(&destination)?
                }),
            );
        }
    }

    Ok(())
}

fn load_document(store: &StructuredFileStore, path: &Path) -> filebox::Result<ConfigTree> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => store.load_yaml(path),
        _ => store.load_json(path),
    }
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    println!("{}", text.unwrap_or_default());
}
