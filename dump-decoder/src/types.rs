//! Core types for the dump decoder library
//!
//! This module defines the data model the decoders emit while streaming a
//! dump file: per-atom records, per-frame box geometry, and the error type
//! shared by every decoding operation.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// A single atom record emitted by the decoders.
///
/// Only the fields named in the caller's field-spec are populated for a
/// given read; every other field stays at its zero default. The record is
/// transient: it is passed to the sink by reference and not retained by
/// the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AtomData {
    /// Atom identifier
    pub id: i64,
    /// Atom type index
    #[serde(rename = "type")]
    pub atom_type: i64,
    /// Molecule identifier
    pub mol: i64,
    /// Atom mass
    pub mass: f64,
    /// Unscaled coordinate, x axis
    pub x: f64,
    /// Unscaled coordinate, y axis
    pub y: f64,
    /// Unscaled coordinate, z axis
    pub z: f64,
    /// Scaled coordinate (fraction of the box dimension), x axis
    pub xs: f64,
    /// Scaled coordinate, y axis
    pub ys: f64,
    /// Scaled coordinate, z axis
    pub zs: f64,
    /// Unwrapped coordinate (never periodic-corrected), x axis
    pub xu: f64,
    /// Unwrapped coordinate, y axis
    pub yu: f64,
    /// Unwrapped coordinate, z axis
    pub zu: f64,
    /// Scaled unwrapped coordinate (never periodic-corrected), x axis
    pub xsu: f64,
    /// Scaled unwrapped coordinate, y axis
    pub ysu: f64,
    /// Scaled unwrapped coordinate, z axis
    pub zsu: f64,
    /// Periodic image flag, x axis
    pub ix: i64,
    /// Periodic image flag, y axis
    pub iy: i64,
    /// Periodic image flag, z axis
    pub iz: i64,
    /// Velocity, x component
    pub vx: f64,
    /// Velocity, y component
    pub vy: f64,
    /// Velocity, z component
    pub vz: f64,
    /// Force, x component
    pub fx: f64,
    /// Force, y component
    pub fy: f64,
    /// Force, z component
    pub fz: f64,
    /// Charge
    pub q: f64,
    /// Dipole moment, x component
    pub mux: f64,
    /// Dipole moment, y component
    pub muy: f64,
    /// Dipole moment, z component
    pub muz: f64,
    /// Dipole moment magnitude
    pub mu: f64,
}

/// Classification of one side of a simulation box axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Boundary {
    /// Particles leaving this side reappear on the opposite side
    Periodic,
    /// Fixed (non-periodic) boundary
    Fixed,
    /// Boundary that shrink-wraps to the atoms
    ShrinkWrapped,
    /// Shrink-wrapped boundary with a minimum extent
    MinimumImage,
}

impl Boundary {
    /// Map a binary-format boundary code (0..=3) to its classification.
    pub fn from_code(code: i32) -> Option<Boundary> {
        match code {
            0 => Some(Boundary::Periodic),
            1 => Some(Boundary::Fixed),
            2 => Some(Boundary::ShrinkWrapped),
            3 => Some(Boundary::MinimumImage),
            _ => None,
        }
    }

    /// Map a text-format boundary letter (`p`, `f`, `s`, `m`) to its
    /// classification.
    pub fn from_letter(letter: char) -> Option<Boundary> {
        match letter {
            'p' => Some(Boundary::Periodic),
            'f' => Some(Boundary::Fixed),
            's' => Some(Boundary::ShrinkWrapped),
            'm' => Some(Boundary::MinimumImage),
            _ => None,
        }
    }

    /// The single-letter form used on `ITEM: BOX BOUNDS` tag lines.
    pub fn letter(self) -> char {
        match self {
            Boundary::Periodic => 'p',
            Boundary::Fixed => 'f',
            Boundary::ShrinkWrapped => 's',
            Boundary::MinimumImage => 'm',
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Orthogonal simulation box geometry for one frame.
///
/// Produced once per frame by the decoders and handed to the sink as an
/// immutable value; no box state is shared between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxBounds {
    /// Lower bound per axis (x, y, z)
    pub lo: [f64; 3],
    /// Upper bound per axis (x, y, z)
    pub hi: [f64; 3],
    /// Boundary classification per axis, `[lower, upper]`
    pub boundaries: [[Boundary; 2]; 3],
}

impl BoxBounds {
    /// Box extent along one axis.
    pub fn extent(&self, axis: usize) -> f64 {
        self.hi[axis] - self.lo[axis]
    }
}

/// Metadata of the frame a decoder just produced.
///
/// A text frame may omit the `BOX BOUNDS` section, in which case `bounds`
/// is `None` and the reader facade keeps whatever box it saw last.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FrameMeta {
    pub timestep: i64,
    pub n_atoms: i64,
    pub bounds: Option<BoxBounds>,
}

/// Errors that can occur while opening or decoding a dump file
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("failed to open dump file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read_frame called while no dump file is open")]
    NoOpenFile,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' was requested but this frame only declares: {available}")]
    MissingColumn { field: String, available: String },

    #[error("malformed atom line: {0}")]
    MalformedAtomLine(String),

    #[error("field spec lists {requested} fields per atom but the file declares {declared}")]
    FieldCountMismatch { requested: usize, declared: usize },

    #[error("triclinic boxes are not supported")]
    UnsupportedGeometry,

    #[error("processor blocks contained {streamed} atoms but the header declared {declared}")]
    AtomCountMismatch { declared: i64, streamed: i64 },

    #[error("unexpected end of stream while reading {0}")]
    PrematureEof(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
