//! Text dump frame decoder
//!
//! Parses the self-describing ASCII dump format: `ITEM:` tag lines open
//! sections (`TIMESTEP`, `NUMBER OF ATOMS`, `BOX BOUNDS`, `ATOMS`) and any
//! other line is atom data for the columns the `ATOMS` tag declared.
//!
//! One call decodes exactly one frame. Seeing a second `TIMESTEP` marker
//! means the current frame is over; the stream is rewound to just before
//! that marker line so the next call resumes there.

use crate::pbc;
use crate::property::{FieldValue, NumericKind, Property};
use crate::sink::FrameSink;
use crate::types::{AtomData, Boundary, BoxBounds, DumpError, FrameMeta, Result};
use std::io::{BufRead, Seek, SeekFrom};

/// Decode one frame from a text dump stream.
///
/// Returns `Ok(None)` when the stream is already exhausted. Reaching end
/// of input mid-frame is not an error: the frame in progress is complete.
pub(crate) fn read_frame<R: BufRead + Seek>(
    input: &mut R,
    fields: &[Property],
    sink: &mut dyn FrameSink,
) -> Result<Option<FrameMeta>> {
    let mut timestep: i64 = -1;
    let mut n_atoms: i64 = 0;
    let mut bounds: Option<BoxBounds> = None;
    let mut columns: Vec<String> = Vec::new();
    let mut inside_timestep = false;

    let mut line = String::new();
    loop {
        let line_start = input.stream_position()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.first() == Some(&"ITEM:") {
            match tokens.get(1).copied() {
                Some("TIMESTEP") => {
                    if inside_timestep {
                        // Start of the next frame: finish this one and
                        // rewind so the next call sees the marker again.
                        sink.end_of_timestep();
                        input.seek(SeekFrom::Start(line_start))?;
                        log::debug!("text frame complete: timestep {}", timestep);
                        return Ok(Some(FrameMeta { timestep, n_atoms, bounds }));
                    }
                    sink.start_of_timestep();
                    inside_timestep = true;
                    timestep = read_header_value(input, "timestep")?;
                }
                Some("NUMBER") => {
                    n_atoms = read_header_value(input, "atom count")?;
                }
                Some("BOX") => {
                    let b = read_box_bounds(input, &tokens)?;
                    sink.box_bounds(&b);
                    bounds = Some(b);
                }
                Some("ATOMS") => {
                    columns = tokens[2..].iter().map(|t| t.to_string()).collect();
                    check_requested_columns(fields, &columns)?;
                }
                _ => {
                    // Unrecognized section tag; skip the tag line.
                }
            }
        } else if !tokens.is_empty() {
            decode_atom_line(&tokens, &columns, fields, bounds.as_ref(), sink)?;
        }
    }

    if inside_timestep {
        // End of input closes the frame in progress.
        sink.end_of_timestep();
        log::debug!("text frame complete at end of stream: timestep {}", timestep);
        Ok(Some(FrameMeta { timestep, n_atoms, bounds }))
    } else {
        Ok(None)
    }
}

/// Read the single-value line that follows a `TIMESTEP` or
/// `NUMBER OF ATOMS` tag.
fn read_header_value<R: BufRead>(input: &mut R, what: &str) -> Result<i64> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(DumpError::PrematureEof(format!("{} value line", what)));
    }
    let text = line.trim();
    text.parse()
        .map_err(|_| DumpError::MalformedHeader(format!("invalid {} value '{}'", what, text)))
}

/// Parse a `BOX BOUNDS` section: three boundary letter pairs on the tag
/// line, then three `lo hi` lines.
fn read_box_bounds<R: BufRead>(input: &mut R, tag_tokens: &[&str]) -> Result<BoxBounds> {
    if tag_tokens.len() < 6 {
        return Err(DumpError::MalformedHeader(format!(
            "BOX BOUNDS tag line has {} tokens, expected at least 6",
            tag_tokens.len()
        )));
    }

    let mut boundaries = [[Boundary::Periodic; 2]; 3];
    for axis in 0..3 {
        let pair = tag_tokens[axis + 3];
        let mut letters = pair.chars();
        for side in 0..2 {
            let letter = letters.next().ok_or_else(|| {
                DumpError::MalformedHeader(format!("incomplete boundary pair '{}'", pair))
            })?;
            boundaries[axis][side] = Boundary::from_letter(letter).ok_or_else(|| {
                DumpError::MalformedHeader(format!("unrecognized boundary letter '{}'", letter))
            })?;
        }
    }

    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    let mut line = String::new();
    for axis in 0..3 {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(DumpError::PrematureEof("box bounds line".to_string()));
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(DumpError::MalformedHeader(format!(
                "box bounds line has {} tokens, expected 2",
                tokens.len()
            )));
        }
        lo[axis] = parse_bound(tokens[0])?;
        hi[axis] = parse_bound(tokens[1])?;
    }

    Ok(BoxBounds { lo, hi, boundaries })
}

fn parse_bound(token: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|_| DumpError::MalformedHeader(format!("invalid box bound '{}'", token)))
}

/// Verify every requested field is among the frame's declared columns.
fn check_requested_columns(fields: &[Property], columns: &[String]) -> Result<()> {
    for prop in fields {
        if !columns.iter().any(|c| c == prop.name()) {
            return Err(DumpError::MissingColumn {
                field: prop.name().to_string(),
                available: columns.join(" "),
            });
        }
    }
    Ok(())
}

/// Decode one atom data line and fire the atom hook.
fn decode_atom_line(
    tokens: &[&str],
    columns: &[String],
    fields: &[Property],
    bounds: Option<&BoxBounds>,
    sink: &mut dyn FrameSink,
) -> Result<()> {
    if tokens.len() != columns.len() {
        return Err(DumpError::MalformedAtomLine(format!(
            "header declares {} columns but the line has {} tokens",
            columns.len(),
            tokens.len()
        )));
    }

    let mut atom = AtomData::default();
    for &prop in fields {
        let col = columns
            .iter()
            .position(|c| c == prop.name())
            .ok_or_else(|| DumpError::MissingColumn {
                field: prop.name().to_string(),
                available: columns.join(" "),
            })?;
        let mut value = parse_token(prop, tokens[col])?;
        if let FieldValue::Float(v) = value {
            value = FieldValue::Float(pbc::correct(prop.wrap_policy(), v, bounds));
        }
        prop.store(&mut atom, value);
    }
    sink.atom_line(&atom);
    Ok(())
}

/// Convert one token according to the field's numeric kind.
fn parse_token(prop: Property, token: &str) -> Result<FieldValue> {
    match prop.kind() {
        NumericKind::Integer => token.parse().map(FieldValue::Int).map_err(|_| {
            DumpError::MalformedAtomLine(format!(
                "cannot parse '{}' as integer field '{}'",
                token,
                prop.name()
            ))
        }),
        NumericKind::Float => token.parse().map(FieldValue::Float).map_err(|_| {
            DumpError::MalformedAtomLine(format!(
                "cannot parse '{}' as float field '{}'",
                token,
                prop.name()
            ))
        }),
    }
}
