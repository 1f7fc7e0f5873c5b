//! Callback contract the renderer drives during frame construction.

use crate::{
  document::DocumentId,
  span::SpanSink,
};

/// The callbacks the renderer invokes while producing a frame.
///
/// Registered once per process against the renderer's extension point. Every
/// callback is synchronous and completes before returning; the renderer calls
/// them inline while building the frame. A document with no active
/// highlighter is a no-op, never an error: detach can race with frame
/// scheduling, and the callbacks are expected to lose that race quietly.
pub trait DecorationProvider {
  /// Start of a redraw cycle for a window showing `doc`, with rows
  /// `topline..=botline` visible. Returns whether per-line callbacks should
  /// follow for this cycle.
  fn on_window_open(&mut self, doc: DocumentId, topline: u32, botline: u32) -> bool;

  /// One visible line. Within a cycle the renderer calls rows in increasing
  /// order, always after `on_window_open`.
  fn on_line(&mut self, doc: DocumentId, line: u32, sink: &mut dyn SpanSink);

  /// Spell-determination pass over `srow..=erow`, independent of the normal
  /// redraw cycle. Only spans with a defined spell flag are produced.
  fn on_spell_navigation(&mut self, doc: DocumentId, srow: u32, erow: u32, sink: &mut dyn SpanSink);

  /// The document was closed or unloaded.
  fn on_detach(&mut self, doc: DocumentId);
}
