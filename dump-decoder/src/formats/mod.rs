//! Frame decoders for the supported dump formats
//!
//! Both decoders stream exactly one frame per call through a
//! [`FrameSink`](crate::sink::FrameSink) and return the frame's metadata,
//! or `None` when the stream holds no further frame.

pub(crate) mod binary;
pub(crate) mod text;
