//! Frame sink capability set
//!
//! Decoders report parsing events through this trait as they stream a
//! frame. Every hook has a no-op default body, so an implementation only
//! overrides the events it cares about.

use crate::types::{AtomData, BoxBounds};

/// Receiver for the events of one decoded frame.
///
/// Hooks are invoked synchronously and in order from within
/// `read_frame`. Delivery is at-least-once: hooks fired for atoms that
/// were streamed before an error was detected are not retracted, so a
/// failed read means "frame partially or not delivered".
pub trait FrameSink {
    /// A new timestep has begun.
    fn start_of_timestep(&mut self) {}

    /// The frame's box geometry is known. In text mode this fires when
    /// the `BOX BOUNDS` section is parsed, mid-frame; in binary mode it
    /// fires before any atom, right after `start_of_timestep`.
    fn box_bounds(&mut self, _bounds: &BoxBounds) {}

    /// One atom record has been decoded. The reference is only valid for
    /// the duration of the call.
    fn atom_line(&mut self, _atom: &AtomData) {}

    /// The current timestep is complete.
    fn end_of_timestep(&mut self) {}
}
