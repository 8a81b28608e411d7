//! Sink implementations for the CLI output modes

use dump_decoder::{AtomData, BoxBounds, FieldValue, FrameSink, Property};
use serde_json::{json, Map, Value};
use std::io::Write;

/// Counts frames and atoms; the per-frame lines are printed by the main
/// loop from the reader's accessors.
#[derive(Default)]
pub struct SummarySink {
    pub frames: usize,
    pub atoms: usize,
}

impl FrameSink for SummarySink {
    fn atom_line(&mut self, _atom: &AtomData) {
        self.atoms += 1;
    }

    fn end_of_timestep(&mut self) {
        self.frames += 1;
    }
}

impl SummarySink {
    pub fn print_summary(&self) {
        println!("\n=== DECODING SUMMARY ===");
        println!("Frames decoded: {}", self.frames);
        println!("Atoms streamed: {}", self.atoms);
    }
}

/// Emits one JSON object per event as a line: frame markers, box bounds,
/// and atoms restricted to the requested fields.
pub struct JsonSink<W: Write> {
    writer: W,
    fields: Vec<Property>,
    pub frames: usize,
    pub atoms: usize,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W, fields: Vec<Property>) -> Self {
        Self {
            writer,
            fields,
            frames: 0,
            atoms: 0,
        }
    }

    fn emit(&mut self, value: Value) {
        if let Err(e) = writeln!(self.writer, "{}", value) {
            log::error!("failed to write output: {}", e);
        }
    }

    pub fn finish(mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> FrameSink for JsonSink<W> {
    fn start_of_timestep(&mut self) {
        self.emit(json!({ "event": "frame_start" }));
    }

    fn box_bounds(&mut self, bounds: &BoxBounds) {
        let letters: Vec<String> = bounds
            .boundaries
            .iter()
            .map(|pair| format!("{}{}", pair[0].letter(), pair[1].letter()))
            .collect();
        self.emit(json!({
            "event": "box",
            "lo": bounds.lo,
            "hi": bounds.hi,
            "boundaries": letters,
        }));
    }

    fn atom_line(&mut self, atom: &AtomData) {
        self.atoms += 1;
        let mut object = Map::new();
        for &prop in &self.fields {
            let value = match prop.load(atom) {
                FieldValue::Int(v) => json!(v),
                FieldValue::Float(v) => json!(v),
            };
            object.insert(prop.name().to_string(), value);
        }
        self.emit(Value::Object(object));
    }

    fn end_of_timestep(&mut self) {
        self.frames += 1;
        self.emit(json!({ "event": "frame_end" }));
    }
}
