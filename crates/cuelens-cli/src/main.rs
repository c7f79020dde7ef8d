use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use cuelens_core::{CueRecord, Encoding, decode_payload, parse_splice_info_section, summarize};

/// Report schema version for `scan --json` output.
const REPORT_VERSION: u32 = 1;

#[derive(Parser, Debug)]
#[command(name = "cuelens")]
#[command(version)]
#[command(
    about = "Decode SCTE-35 cue messages from HLS manifests.",
    long_about = None,
    after_help = "Examples:\n  cuelens scan playlist.m3u8\n  cuelens scan playlist.m3u8 --json --pretty -o report.json\n  cuelens decode 0xFC302500000000000000FFF015050000000100E081006DEE818005265C00006401020000DEADBEEF\n  cuelens decode /DAlAAAAAAAAAP/wFQUAAAABAOCBAG3ugYAFJlwAAGQBAgAA3q2+7w=="
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan an HLS manifest file for SCTE-35 cues.
    Scan {
        /// Path to a .m3u8 manifest file
        input: PathBuf,

        /// Emit a JSON report instead of one summary line per cue
        #[arg(long)]
        json: bool,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long)]
        report: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any cue failed to decode
        #[arg(long)]
        strict: bool,
    },
    /// Decode a single base64 or hex cue payload.
    Decode {
        /// Encoded payload; a 0x prefix selects hex, anything else base64
        payload: String,

        /// Force hexadecimal decoding
        #[arg(long, conflicts_with = "base64")]
        hex: bool,

        /// Force base64 decoding
        #[arg(long)]
        base64: bool,

        /// Emit the decoded message as JSON instead of a summary line
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            input,
            json,
            report,
            pretty,
            compact,
            quiet,
            strict,
        } => cmd_scan(input, json, report, pretty, compact, quiet, strict),
        Commands::Decode {
            payload,
            hex,
            base64,
            json,
            pretty,
            compact,
        } => cmd_decode(payload, hex, base64, json, pretty, compact),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

#[derive(Debug, Serialize)]
struct ScanReport {
    report_version: u32,
    tool: ToolInfo,
    input: InputInfo,
    cues: Vec<CueRecord>,
}

#[derive(Debug, Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct InputInfo {
    path: String,
    bytes: u64,
}

fn cmd_scan(
    input: PathBuf,
    json: bool,
    report: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .m3u8 manifest file".to_string()),
        ));
    }
    let text = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read manifest: {}", input.display()))?;
    let cues = cuelens_core::scan_manifest(&text);
    let total = cues.len();
    let invalid = cues.iter().filter(|cue| !cue.message.is_valid()).count();

    let output = if json {
        let scan = ScanReport {
            report_version: REPORT_VERSION,
            tool: ToolInfo {
                name: "cuelens".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            input: InputInfo {
                path: input.display().to_string(),
                bytes: text.len() as u64,
            },
            cues,
        };
        let mut rendered = serialize_json(&scan, pretty, compact)?;
        rendered.push('\n');
        rendered
    } else {
        let mut rendered = String::new();
        for cue in &cues {
            rendered.push_str(&format!("line {}: {}\n", cue.line, cue.summary));
        }
        rendered
    };

    match report {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, output)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
        None => {
            print!("{output}");
            if !quiet && !json {
                eprintln!("OK: {total} cue(s) found, {invalid} invalid");
            }
        }
    }

    if strict && invalid > 0 {
        return Err(CliError::new(
            format!("{invalid} cue(s) failed to decode"),
            Some("use --json to inspect the error fields".to_string()),
        ));
    }
    Ok(())
}

fn cmd_decode(
    payload: String,
    hex: bool,
    base64: bool,
    json: bool,
    pretty: bool,
    compact: bool,
) -> Result<(), CliError> {
    let trimmed = payload.trim();
    let (encoded, encoding) = if hex {
        (
            trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed),
            Encoding::Hex,
        )
    } else if base64 {
        (trimmed, Encoding::Base64)
    } else if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        (digits, Encoding::Hex)
    } else {
        (trimmed, Encoding::Base64)
    };

    let bytes = decode_payload(encoded, encoding).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("pass --hex or --base64 to force the encoding".to_string()),
        )
    })?;
    let message = parse_splice_info_section(&bytes);

    if json {
        println!("{}", serialize_json(&message, pretty, compact)?);
    } else {
        println!("{}", summarize(&message));
    }

    if let Some(error) = &message.error {
        return Err(CliError::new(
            format!("cue decode failed: {error}"),
            Some("the payload may be truncated or not SCTE-35".to_string()),
        ));
    }
    Ok(())
}

fn serialize_json<T: Serialize>(value: &T, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}
