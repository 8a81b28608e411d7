//! Binary dump frame decoder
//!
//! The binary format is a fixed layout with no magic number and no field
//! names: an 8-byte timestep, 8-byte atom count, triclinic flag, six
//! boundary codes, six box bounds, the per-atom field count, and then
//! per-processor blocks of doubles. The caller's field-spec must name
//! every field in file order, since the stream carries no schema.
//!
//! Values are read in the native byte order of this process, matching the
//! order the producing machine wrote them. No byte-order detection or
//! conversion is performed; a dump written on a machine of the opposite
//! endianness is not readable.

use byteorder::{NativeEndian, ReadBytesExt};
use crate::pbc;
use crate::property::{FieldValue, Property};
use crate::sink::FrameSink;
use crate::types::{AtomData, Boundary, BoxBounds, DumpError, FrameMeta, Result};
use std::io::{ErrorKind, Read};

/// Decode one frame from a binary dump stream.
///
/// A clean end of stream on the very first read is the normal "no more
/// frames" signal and returns `Ok(None)`; running out of bytes anywhere
/// after that is a [`DumpError::PrematureEof`].
pub(crate) fn read_frame<R: Read>(
    input: &mut R,
    fields: &[Property],
    sink: &mut dyn FrameSink,
) -> Result<Option<FrameMeta>> {
    let timestep = match input.read_i64::<NativeEndian>() {
        Ok(value) => value,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let n_atoms = read_i64(input, "atom count")?;

    let triclinic = read_i32(input, "triclinic flag")?;
    if triclinic != 0 {
        return Err(DumpError::UnsupportedGeometry);
    }

    let mut boundaries = [[Boundary::Periodic; 2]; 3];
    for axis in 0..3 {
        for side in 0..2 {
            let code = read_i32(input, "boundary code")?;
            boundaries[axis][side] = Boundary::from_code(code).ok_or_else(|| {
                DumpError::MalformedHeader(format!("unrecognized boundary code {}", code))
            })?;
        }
    }

    // Bounds are stored pairwise: xlo, xhi, ylo, yhi, zlo, zhi.
    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    for axis in 0..3 {
        lo[axis] = read_f64(input, "box bound")?;
        hi[axis] = read_f64(input, "box bound")?;
    }
    let bounds = BoxBounds { lo, hi, boundaries };

    let declared = read_i32(input, "field count")?;
    if declared as usize != fields.len() {
        return Err(DumpError::FieldCountMismatch {
            requested: fields.len(),
            declared: declared.max(0) as usize,
        });
    }

    let nprocs = read_i32(input, "processor block count")?;
    log::debug!(
        "binary frame: timestep {}, {} atoms, {} fields, {} processor blocks",
        timestep,
        n_atoms,
        declared,
        nprocs
    );

    sink.start_of_timestep();
    sink.box_bounds(&bounds);

    let mut streamed: i64 = 0;
    for _ in 0..nprocs {
        let n_values = read_i32(input, "block value count")?;

        // Atom assembly restarts at each block; blocks never split an atom.
        let mut atom = AtomData::default();
        let mut field = 0usize;
        for _ in 0..n_values {
            let raw = read_f64(input, "atom value")?;
            if let Some(&prop) = fields.get(field) {
                let mut value = FieldValue::from_raw(prop.kind(), raw);
                if let FieldValue::Float(v) = value {
                    value = FieldValue::Float(pbc::correct(prop.wrap_policy(), v, Some(&bounds)));
                }
                prop.store(&mut atom, value);
            }
            field += 1;
            if field == fields.len() {
                sink.atom_line(&atom);
                atom = AtomData::default();
                field = 0;
                streamed += 1;
            }
        }
        if field != 0 {
            log::warn!(
                "processor block ended mid-atom ({} of {} values); dropping partial atom",
                field,
                fields.len()
            );
        }
    }

    if streamed != n_atoms {
        return Err(DumpError::AtomCountMismatch {
            declared: n_atoms,
            streamed,
        });
    }

    sink.end_of_timestep();
    Ok(Some(FrameMeta {
        timestep,
        n_atoms,
        bounds: Some(bounds),
    }))
}

fn read_i64<R: Read>(input: &mut R, what: &str) -> Result<i64> {
    input.read_i64::<NativeEndian>().map_err(|e| eof_error(e, what))
}

fn read_i32<R: Read>(input: &mut R, what: &str) -> Result<i32> {
    input.read_i32::<NativeEndian>().map_err(|e| eof_error(e, what))
}

fn read_f64<R: Read>(input: &mut R, what: &str) -> Result<f64> {
    input.read_f64::<NativeEndian>().map_err(|e| eof_error(e, what))
}

fn eof_error(e: std::io::Error, what: &str) -> DumpError {
    if e.kind() == ErrorKind::UnexpectedEof {
        DumpError::PrematureEof(what.to_string())
    } else {
        DumpError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::parse_field_spec;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingSink {
        starts: usize,
        ends: usize,
        boxes: Vec<BoxBounds>,
        atoms: Vec<AtomData>,
    }

    impl FrameSink for RecordingSink {
        fn start_of_timestep(&mut self) {
            self.starts += 1;
        }
        fn box_bounds(&mut self, bounds: &BoxBounds) {
            self.boxes.push(*bounds);
        }
        fn atom_line(&mut self, atom: &AtomData) {
            self.atoms.push(*atom);
        }
        fn end_of_timestep(&mut self) {
            self.ends += 1;
        }
    }

    /// Builds a well-formed binary frame byte by byte.
    struct FrameBuilder {
        bytes: Vec<u8>,
    }

    impl FrameBuilder {
        fn new(timestep: i64, n_atoms: i64) -> Self {
            let mut b = FrameBuilder { bytes: Vec::new() };
            b.i64(timestep);
            b.i64(n_atoms);
            b.i32(0); // orthogonal box
            for _ in 0..6 {
                b.i32(0); // periodic everywhere
            }
            for _ in 0..3 {
                b.f64(0.0);
                b.f64(10.0);
            }
            b
        }

        fn i64(&mut self, v: i64) -> &mut Self {
            self.bytes.extend_from_slice(&v.to_ne_bytes());
            self
        }

        fn i32(&mut self, v: i32) -> &mut Self {
            self.bytes.extend_from_slice(&v.to_ne_bytes());
            self
        }

        fn f64(&mut self, v: f64) -> &mut Self {
            self.bytes.extend_from_slice(&v.to_ne_bytes());
            self
        }

        fn block(&mut self, values: &[f64]) -> &mut Self {
            self.i32(values.len() as i32);
            for &v in values {
                self.f64(v);
            }
            self
        }
    }

    fn decode(bytes: Vec<u8>, spec: &str) -> (Result<Option<FrameMeta>>, RecordingSink) {
        let mut input = Cursor::new(bytes);
        let fields = parse_field_spec(spec).unwrap();
        let mut sink = RecordingSink::default();
        let meta = read_frame(&mut input, &fields, &mut sink);
        (meta, sink)
    }

    #[test]
    fn test_single_frame_two_atoms() {
        let mut b = FrameBuilder::new(500, 2);
        b.i32(3); // fields per atom: id type x
        b.i32(1); // one processor block
        b.block(&[1.0, 4.0, 2.5, 2.0, 4.0, 7.5]);

        let (meta, sink) = decode(b.bytes.clone(), "id type x");
        let meta = meta.unwrap().unwrap();
        assert_eq!(meta.timestep, 500);
        assert_eq!(meta.n_atoms, 2);
        assert_eq!(sink.starts, 1);
        assert_eq!(sink.ends, 1);
        assert_eq!(sink.boxes.len(), 1);
        assert_eq!(sink.atoms.len(), 2);
        assert_eq!(sink.atoms[0].id, 1);
        assert_eq!(sink.atoms[0].atom_type, 4);
        assert_eq!(sink.atoms[0].x, 2.5);
        assert_eq!(sink.atoms[1].id, 2);
        assert_eq!(sink.atoms[1].x, 7.5);
    }

    #[test]
    fn test_atoms_split_across_processor_blocks() {
        let mut b = FrameBuilder::new(0, 3);
        b.i32(2); // id x
        b.i32(2); // two blocks
        b.block(&[1.0, 0.5, 2.0, 1.5]);
        b.block(&[3.0, 2.5]);

        let (meta, sink) = decode(b.bytes.clone(), "id x");
        assert!(meta.unwrap().is_some());
        assert_eq!(sink.atoms.len(), 3);
        assert_eq!(sink.atoms[2].id, 3);
        assert_eq!(sink.atoms[2].x, 2.5);
    }

    #[test]
    fn test_periodic_correction_applied() {
        let mut b = FrameBuilder::new(0, 2);
        b.i32(2); // x xs
        b.i32(1);
        b.block(&[11.0, 1.25, -1.0, -0.25]);

        let (_, sink) = decode(b.bytes.clone(), "x xs");
        assert_eq!(sink.atoms[0].x, 1.0);
        assert_eq!(sink.atoms[0].xs, 0.25);
        assert_eq!(sink.atoms[1].x, 9.0);
        assert_eq!(sink.atoms[1].xs, 0.75);
    }

    #[test]
    fn test_unwrapped_fields_not_corrected() {
        let mut b = FrameBuilder::new(0, 1);
        b.i32(2); // xu xsu
        b.i32(1);
        b.block(&[17.25, 1.75]);

        let (_, sink) = decode(b.bytes.clone(), "xu xsu");
        assert_eq!(sink.atoms[0].xu.to_bits(), 17.25f64.to_bits());
        assert_eq!(sink.atoms[0].xsu.to_bits(), 1.75f64.to_bits());
    }

    #[test]
    fn test_integer_fields_truncate() {
        let mut b = FrameBuilder::new(0, 1);
        b.i32(2); // id ix
        b.i32(1);
        b.block(&[3.9, -1.9]);

        let (_, sink) = decode(b.bytes.clone(), "id ix");
        assert_eq!(sink.atoms[0].id, 3);
        assert_eq!(sink.atoms[0].ix, -1);
    }

    #[test]
    fn test_field_count_mismatch_before_any_hook() {
        let mut b = FrameBuilder::new(0, 1);
        b.i32(3); // file declares three fields per atom
        b.i32(1);
        b.block(&[1.0, 2.0, 3.0]);

        let (meta, sink) = decode(b.bytes.clone(), "id x"); // spec has two
        match meta.unwrap_err() {
            DumpError::FieldCountMismatch { requested, declared } => {
                assert_eq!(requested, 2);
                assert_eq!(declared, 3);
            }
            other => panic!("expected FieldCountMismatch, got {:?}", other),
        }
        assert_eq!(sink.starts, 0);
        assert_eq!(sink.boxes.len(), 0);
        assert_eq!(sink.atoms.len(), 0);
    }

    #[test]
    fn test_atom_count_mismatch_after_streaming() {
        // Header declares 100 atoms, blocks only carry 99.
        let mut b = FrameBuilder::new(0, 100);
        b.i32(1); // single field: id
        b.i32(1);
        let values: Vec<f64> = (1..=99).map(|i| i as f64).collect();
        b.block(&values);

        let (meta, sink) = decode(b.bytes.clone(), "id");
        match meta.unwrap_err() {
            DumpError::AtomCountMismatch { declared, streamed } => {
                assert_eq!(declared, 100);
                assert_eq!(streamed, 99);
            }
            other => panic!("expected AtomCountMismatch, got {:?}", other),
        }
        // Hooks already fired for the 99 streamed atoms stay fired.
        assert_eq!(sink.atoms.len(), 99);
        assert_eq!(sink.starts, 1);
        assert_eq!(sink.ends, 0);
    }

    #[test]
    fn test_triclinic_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i64.to_ne_bytes());
        bytes.extend_from_slice(&1i64.to_ne_bytes());
        bytes.extend_from_slice(&1i32.to_ne_bytes()); // triclinic flag set

        let (meta, sink) = decode(bytes, "id");
        assert!(matches!(meta.unwrap_err(), DumpError::UnsupportedGeometry));
        assert_eq!(sink.starts, 0);
    }

    #[test]
    fn test_unknown_boundary_code() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i64.to_ne_bytes());
        bytes.extend_from_slice(&1i64.to_ne_bytes());
        bytes.extend_from_slice(&0i32.to_ne_bytes());
        bytes.extend_from_slice(&9i32.to_ne_bytes()); // bogus code

        let (meta, _) = decode(bytes, "id");
        assert!(matches!(meta.unwrap_err(), DumpError::MalformedHeader(_)));
    }

    #[test]
    fn test_clean_eof_is_no_frame() {
        let (meta, sink) = decode(Vec::new(), "id");
        assert!(meta.unwrap().is_none());
        assert_eq!(sink.starts, 0);
    }

    #[test]
    fn test_truncated_header_is_premature_eof() {
        // Timestep present, atom count cut short.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i64.to_ne_bytes());
        bytes.extend_from_slice(&[0u8; 3]);

        let (meta, _) = decode(bytes, "id");
        assert!(matches!(meta.unwrap_err(), DumpError::PrematureEof(_)));
    }

    #[test]
    fn test_truncated_block_is_premature_eof() {
        let mut b = FrameBuilder::new(0, 2);
        b.i32(1);
        b.i32(1);
        b.i32(2); // block claims two values
        b.f64(1.0); // only one present

        let (meta, sink) = decode(b.bytes.clone(), "id");
        assert!(matches!(meta.unwrap_err(), DumpError::PrematureEof(_)));
        // The first atom was streamed before the error surfaced.
        assert_eq!(sink.atoms.len(), 1);
    }

    #[test]
    fn test_two_frames_then_clean_eof() {
        let mut b = FrameBuilder::new(10, 1);
        b.i32(1);
        b.i32(1);
        b.block(&[1.0]);
        let mut second = FrameBuilder::new(20, 1);
        second.i32(1);
        second.i32(1);
        second.block(&[2.0]);
        b.bytes.extend_from_slice(&second.bytes);

        let mut input = Cursor::new(b.bytes.clone());
        let fields = parse_field_spec("id").unwrap();
        let mut sink = RecordingSink::default();

        let first = read_frame(&mut input, &fields, &mut sink).unwrap().unwrap();
        assert_eq!(first.timestep, 10);
        let second = read_frame(&mut input, &fields, &mut sink).unwrap().unwrap();
        assert_eq!(second.timestep, 20);
        assert!(read_frame(&mut input, &fields, &mut sink).unwrap().is_none());
        assert_eq!(sink.starts, 2);
        assert_eq!(sink.ends, 2);
    }
}
