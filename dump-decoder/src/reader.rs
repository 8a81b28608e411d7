//! Reader facade
//!
//! [`DumpReader`] owns the open dump stream and its parse mode, dispatches
//! each `read_frame` call to the matching decoder, and keeps the metadata
//! of the last frame it produced.

use crate::formats;
use crate::property;
use crate::sink::FrameSink;
use crate::types::{BoxBounds, DumpError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads dump files one frame at a time.
///
/// The reader exclusively owns at most one open stream; `open` replaces
/// any previous one and the handle is released on [`close`](Self::close)
/// or drop. `read_frame` is synchronous and decodes exactly one
/// timestep's worth of data per call.
pub struct DumpReader {
    stream: Option<BufReader<File>>,
    path: PathBuf,
    binary: bool,
    last_timestep: i64,
    n_atoms: i64,
    bounds: Option<BoxBounds>,
}

impl DumpReader {
    /// Create a reader with nothing open.
    pub fn new() -> Self {
        Self {
            stream: None,
            path: PathBuf::new(),
            binary: false,
            last_timestep: -1,
            n_atoms: 0,
            bounds: None,
        }
    }

    /// Open a dump file, closing any previously open one first.
    ///
    /// `binary` selects the packed binary decoder; otherwise the file is
    /// parsed as the self-describing text format.
    pub fn open(&mut self, path: impl AsRef<Path>, binary: bool) -> Result<()> {
        let path = path.as_ref();
        self.close();

        let file = File::open(path).map_err(|e| DumpError::FileOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.stream = Some(BufReader::new(file));
        self.path = path.to_path_buf();
        self.binary = binary;
        log::info!(
            "opened {} dump file {}",
            if binary { "binary" } else { "text" },
            path.display()
        );
        Ok(())
    }

    /// Close the open dump file. Safe to call when nothing is open.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("closed dump file {}", self.path.display());
        }
        self.path.clear();
    }

    /// Whether a dump file is currently open.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Decode the next frame, firing the sink's hooks as data streams by.
    ///
    /// `field_spec` is a whitespace-separated list of canonical field
    /// identifiers. In text mode it selects any subset of the frame's
    /// declared columns, in any order; in binary mode it must name every
    /// field in the file, in file order, because the binary format
    /// carries no field names.
    ///
    /// Returns `Ok(true)` when a frame was produced and `Ok(false)` when
    /// the stream holds no further frame.
    pub fn read_frame(&mut self, field_spec: &str, sink: &mut dyn FrameSink) -> Result<bool> {
        let fields = property::parse_field_spec(field_spec)?;
        let stream = self.stream.as_mut().ok_or(DumpError::NoOpenFile)?;

        let meta = if self.binary {
            formats::binary::read_frame(stream, &fields, sink)?
        } else {
            formats::text::read_frame(stream, &fields, sink)?
        };

        match meta {
            Some(meta) => {
                self.last_timestep = meta.timestep;
                self.n_atoms = meta.n_atoms;
                if meta.bounds.is_some() {
                    self.bounds = meta.bounds;
                }
                Ok(true)
            }
            None => {
                log::debug!("no further frames in {}", self.path.display());
                Ok(false)
            }
        }
    }

    /// Timestep id of the last decoded frame (`-1` before the first).
    pub fn last_timestep(&self) -> i64 {
        self.last_timestep
    }

    /// Declared atom count of the last decoded frame.
    pub fn atom_count(&self) -> i64 {
        self.n_atoms
    }

    /// Box geometry of the last decoded frame that declared one.
    pub fn box_bounds(&self) -> Option<&BoxBounds> {
        self.bounds.as_ref()
    }
}

impl Default for DumpReader {
    fn default() -> Self {
        Self::new()
    }
}
