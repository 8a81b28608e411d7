//! Dump Decoder Library
//!
//! A small, synchronous library for decoding molecular-dynamics trajectory
//! dump files, in both the self-describing text format and the packed
//! binary format, streaming per-atom records to a caller-supplied sink.
//!
//! # Architecture
//!
//! The library is intentionally minimal and focused on decoding:
//! - Parses one frame per `read_frame` call and fires sink hooks in order
//! - Resolves the closed set of canonical per-atom field identifiers
//! - Applies periodic-boundary correction to wrapped coordinate fields
//!
//! The library does NOT:
//! - Accumulate histograms, statistics, or any downstream analysis
//! - Support triclinic (non-orthogonal) simulation boxes
//! - Convert byte order (binary dumps are read in native byte order)
//!
//! All higher-level functionality lives in the application layer
//! (dump-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use dump_decoder::{AtomData, DumpReader, FrameSink};
//!
//! struct Counter {
//!     atoms: usize,
//! }
//!
//! impl FrameSink for Counter {
//!     fn atom_line(&mut self, _atom: &AtomData) {
//!         self.atoms += 1;
//!     }
//! }
//!
//! let mut reader = DumpReader::new();
//! reader.open("trajectory.dump", false).unwrap();
//!
//! let mut sink = Counter { atoms: 0 };
//! while reader.read_frame("id type x y z", &mut sink).unwrap() {
//!     println!(
//!         "timestep {}: {} atoms declared",
//!         reader.last_timestep(),
//!         reader.atom_count()
//!     );
//! }
//! println!("{} atoms streamed in total", sink.atoms);
//! ```

// Public modules
pub mod pbc;
pub mod property;
pub mod reader;
pub mod sink;
pub mod types;

// Re-export main types for convenience
pub use property::{parse_field_spec, FieldValue, NumericKind, Property, WrapPolicy};
pub use reader::DumpReader;
pub use sink::FrameSink;
pub use types::{AtomData, Boundary, BoxBounds, DumpError, Result};

// Internal modules (not exposed in public API)
mod formats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
