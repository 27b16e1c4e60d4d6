/// SSE command-line tool: parse, encode, and summarise Server-Sent-Events
/// streams.
///
/// # Command overview
///
/// ```text
/// sse <COMMAND> [OPTIONS]
///
/// Commands:
///   parse    Decode an SSE stream into JSON lines, one per message
///   encode   Build an SSE stream from JSON-lines records
///   stats    Print message, frame, and byte counts for a stream
///   help     Print help information
///
/// Global options:
///   -v, --verbose    Set the default log level to debug (stderr)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// Every `<INPUT>` may be `-` for stdin. `parse` streams: messages are
/// printed as soon as their blank line arrives, so it can sit at the end
/// of `curl -N ... |`.
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, invalid UTF-8, bad JSON) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
///
/// # Logging
///
/// `RUST_LOG` selects the log filter (default `warn`). `-v` then sets the
/// default level to `debug`; target directives from `RUST_LOG`, such as
/// `sse_decoder=trace`, still apply.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use sse_decoder::TransformConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod cmd_encode;
mod cmd_parse;
mod cmd_stats;
mod input;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The SSE stream framing tool.
#[derive(Parser)]
#[command(name = "sse", version, about = "Server-Sent-Events stream framer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (frames dropped, discarded tails) on stderr.
    /// Overrides the default level from `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode an SSE stream and print one JSON object per message.
    Parse(ParseArgs),
    /// Build an SSE stream from JSON-lines records.
    Encode(EncodeArgs),
    /// Print message, frame, and byte counts for an SSE stream.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Transform options shared by `parse` and `stats`.
///
/// ```text
/// ┌─────────────────┬──────────────────────────────────────────────────┐
/// │ Flag            │ Effect                                           │
/// ├─────────────────┼──────────────────────────────────────────────────┤
/// │ --join-newlines │ Join repeated `data` lines with `\n`             │
/// │ --flush         │ Emit the trailing unterminated frame at EOF      │
/// │ --crlf          │ Accept `\r\n` / `\r` line endings                │
/// │ --chunk-size N  │ Feed the input in N-byte chunks                  │
/// └─────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct TransformArgs {
    /// Join repeated `data` lines with a newline instead of concatenating.
    #[arg(long)]
    pub join_newlines: bool,

    /// Emit the trailing frame at end of input even without a blank line.
    #[arg(long)]
    pub flush: bool,

    /// Normalise CRLF and CR line endings to LF before framing.
    #[arg(long)]
    pub crlf: bool,

    /// Read the whole input, then feed it to the transform in chunks of
    /// this many bytes. Output is the same for every chunk size.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,
}

impl TransformArgs {
    pub fn config(&self) -> TransformConfig {
        TransformConfig {
            join_data_newlines: self.join_newlines,
            flush_on_close: self.flush,
            normalize_newlines: self.crlf,
        }
    }

    /// Chunk size as `usize`, saturating on narrow targets.
    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
    }
}

/// Arguments for `sse parse`.
///
/// Output is one compact JSON object per message, keys sorted:
///
/// ```text
/// {"data":"hello","event":"greeting","id":"1"}
/// ```
#[derive(clap::Args)]
pub struct ParseArgs {
    /// SSE input file, or `-` for stdin.
    pub input: PathBuf,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Write JSON lines to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `sse encode`.
///
/// Each non-blank input line is a JSON object mapping field names to
/// values. String values are written as-is; numbers and booleans use their
/// JSON text. A multi-line `data` string becomes several `data:` lines.
///
/// ```json
/// {"event": "update", "id": "7", "data": "line 1\nline 2"}
/// {"data": "{\"nested\": true}", "retry": 3000}
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// JSON-lines input file, or `-` for stdin.
    pub input: PathBuf,

    /// Write the SSE stream to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `sse stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// SSE input file, or `-` for stdin.
    pub input: PathBuf,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Build the log filter from `RUST_LOG` (or `warn`), with `-v` setting
/// the default level to debug.
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

fn init_logging(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse(args) => cmd_parse::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_without_env_or_flag() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn env_directive_used_without_flag() {
        assert_eq!(
            log_filter(false, Some("info")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn unparsable_env_falls_back_to_warn() {
        assert_eq!(
            log_filter(false, Some("sse=loud")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn verbose_overrides_env_default_level() {
        assert_eq!(
            log_filter(true, Some("error")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn verbose_keeps_env_target_directives() {
        assert_eq!(
            log_filter(true, Some("warn,sse_decoder=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
