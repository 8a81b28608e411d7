//! Dump Reader CLI Application
//!
//! Command-line front end for the dump-decoder library: opens a
//! trajectory dump file (text or binary), streams its frames, and either
//! prints a per-frame summary or emits JSON lines for downstream tools.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use dump_decoder::{parse_field_spec, DumpReader};

mod config;
mod output;

use config::{AppConfig, InputConfig, OutputConfig, OutputFormat};
use output::{JsonSink, SummarySink};

/// Dump Reader - Decode molecular-dynamics trajectory dump files
#[derive(Parser, Debug)]
#[command(name = "dump-cli")]
#[command(about = "Decode trajectory dump files (text or binary)", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the dump file to decode
    #[arg(short, long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Parse the packed binary format instead of text
    #[arg(short, long)]
    binary: bool,

    /// Field-spec: whitespace-separated canonical identifiers
    #[arg(short, long, value_name = "SPEC", default_value = "id type x y z")]
    fields: String,

    /// Maximum number of frames to decode
    #[arg(long, value_name = "COUNT")]
    max_frames: Option<usize>,

    /// Output file for JSON mode (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Path to a TOML configuration file (alternative to the flags above)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Dump Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", dump_decoder::VERSION);

    let config = if let Some(config_path) = &args.config {
        log::info!("Loading configuration from: {:?}", config_path);
        config::load_config(config_path)?
    } else if let Some(dump) = &args.dump {
        AppConfig {
            input: InputConfig {
                file: dump.clone(),
                binary: args.binary,
                fields: args.fields.clone(),
                max_frames: args.max_frames.unwrap_or(0),
            },
            output: OutputConfig {
                format: args.format,
                path: args.output.clone(),
            },
        }
    } else {
        println!("Dump Reader - No input specified");
        println!("\nQuick Start:");
        println!("  dump-cli --dump trajectory.dump");
        println!("  dump-cli --dump atoms.bin --binary --fields \"id type x y z\"");
        println!("  dump-cli --dump trajectory.dump --format json --output atoms.jsonl");
        println!("\nUse --help for more options");
        return Ok(());
    };

    run(&config)
}

/// Open the dump and stream frames into the configured sink.
fn run(config: &AppConfig) -> Result<()> {
    let input = &config.input;

    let mut reader = DumpReader::new();
    reader
        .open(&input.file, input.binary)
        .with_context(|| format!("Failed to open dump file: {:?}", input.file))?;

    match config.output.format {
        OutputFormat::Summary => {
            let mut sink = SummarySink::default();
            let frames = decode_loop(&mut reader, input, &mut sink, true)?;
            log::debug!("decoded {} frames", frames);
            sink.print_summary();
        }
        OutputFormat::Json => {
            let fields = parse_field_spec(&input.fields)?;
            let writer: Box<dyn Write> = match &config.output.path {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create output file: {:?}", path))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            let mut sink = JsonSink::new(writer, fields);
            decode_loop(&mut reader, input, &mut sink, false)?;
            sink.finish().context("Failed to flush output")?;
        }
    }

    Ok(())
}

/// Read frames until the stream is exhausted or the frame limit is hit.
fn decode_loop(
    reader: &mut DumpReader,
    input: &InputConfig,
    sink: &mut impl dump_decoder::FrameSink,
    print_frames: bool,
) -> Result<usize> {
    let mut frames = 0;
    while reader
        .read_frame(&input.fields, sink)
        .with_context(|| format!("Decode failed in {:?}", input.file))?
    {
        frames += 1;
        if print_frames {
            println!(
                "frame {}: timestep {}, {} atoms declared",
                frames,
                reader.last_timestep(),
                reader.atom_count()
            );
        }
        if input.max_frames > 0 && frames >= input.max_frames {
            log::info!("frame limit reached ({})", input.max_frames);
            break;
        }
    }
    Ok(frames)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
