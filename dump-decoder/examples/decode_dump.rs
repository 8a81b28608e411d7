//! Standalone dump decoding tool
//!
//! Streams every frame of a dump file and prints per-frame information
//! plus an end-of-run summary.
//!
//! Usage:
//!   decode_dump <file.dump> [--binary] [--fields "<spec>"] [--limit <frames>]
//!
//! Example:
//!   decode_dump trajectory.dump --fields "id type x y z" --limit 10

use dump_decoder::{AtomData, BoxBounds, DumpReader, FrameSink};
use std::env;

struct DecodeStats {
    frames: usize,
    atoms: usize,
    min_x: f64,
    max_x: f64,
}

impl DecodeStats {
    fn new() -> Self {
        Self {
            frames: 0,
            atoms: 0,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
        }
    }

    fn print_summary(&self) {
        println!("\n=== DECODING SUMMARY ===");
        println!("Frames decoded: {}", self.frames);
        println!("Atoms streamed: {}", self.atoms);
        if self.atoms > 0 {
            println!("x range: [{}, {}]", self.min_x, self.max_x);
        }
    }
}

impl FrameSink for DecodeStats {
    fn box_bounds(&mut self, bounds: &BoxBounds) {
        println!(
            "  box: x [{}, {}] y [{}, {}] z [{}, {}]",
            bounds.lo[0], bounds.hi[0], bounds.lo[1], bounds.hi[1], bounds.lo[2], bounds.hi[2]
        );
    }

    fn atom_line(&mut self, atom: &AtomData) {
        self.atoms += 1;
        self.min_x = self.min_x.min(atom.x);
        self.max_x = self.max_x.max(atom.x);
    }

    fn end_of_timestep(&mut self) {
        self.frames += 1;
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: decode_dump <file.dump> [--binary] [--fields \"<spec>\"] [--limit <frames>]");
        std::process::exit(1);
    }

    let path = &args[1];
    let mut binary = false;
    let mut fields = String::from("id type x y z");
    let mut limit: Option<usize> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--binary" => binary = true,
            "--fields" if i + 1 < args.len() => {
                fields = args[i + 1].clone();
                i += 1;
            }
            "--limit" if i + 1 < args.len() => {
                limit = args[i + 1].parse().ok();
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut reader = DumpReader::new();
    if let Err(e) = reader.open(path, binary) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut stats = DecodeStats::new();
    loop {
        match reader.read_frame(&fields, &mut stats) {
            Ok(true) => {
                println!(
                    "frame {}: timestep {}, {} atoms declared",
                    stats.frames,
                    reader.last_timestep(),
                    reader.atom_count()
                );
                if limit.is_some_and(|n| stats.frames >= n) {
                    break;
                }
            }
            Ok(false) => break,
            Err(e) => {
                eprintln!("Decode error: {}", e);
                break;
            }
        }
    }

    stats.print_summary();
}
