//! Renderer-facing decoration contract.
//!
//! This crate is the seam between the highlight engine and whatever front-end
//! paints frames: opaque document handles, ephemeral highlight spans, the sink
//! spans are drained through, and the callback trait the renderer drives once
//! per redraw cycle. It is deliberately dependency-free so both sides can
//! depend on it without pulling in each other's stacks.

pub mod document;
pub mod provider;
pub mod span;

pub use document::DocumentId;
pub use provider::DecorationProvider;
pub use span::{
  HighlightSpan,
  SYNTAX_PRIORITY,
  SpanSink,
  StyleId,
};
