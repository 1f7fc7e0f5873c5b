//! Editor surface the engine talks back to.

use std::ops::Range;

use the_decoration::DocumentId;

/// Where spell checking applies inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellMode {
  /// Spell check all text (plain-text behavior).
  Everywhere,
  /// Spell check only regions a `spell` capture opted in.
  CapturesOnly,
}

/// The buffer and redraw surface of the editor.
///
/// The engine never recomputes highlight state when edits arrive; it only
/// asks the host to invalidate rows and re-derives everything lazily on the
/// next redraw cycle. The spell mode is the one reversible option the engine
/// flips at attach time and restores at teardown.
pub trait EditorHost {
  /// Ask the renderer to repaint `rows` (half-open) of `doc` on its next
  /// cycle.
  fn request_redraw(&mut self, doc: DocumentId, rows: Range<u32>);

  /// Whether the buffer is still loaded. Teardown skips option restoration
  /// for unloaded buffers.
  fn is_loaded(&self, doc: DocumentId) -> bool;

  /// Enable or disable whatever non-tree highlighting mechanism the editor
  /// would otherwise run for `doc`.
  fn set_legacy_syntax(&mut self, doc: DocumentId, enabled: bool);

  fn spell_mode(&self, doc: DocumentId) -> SpellMode;

  fn set_spell_mode(&mut self, doc: DocumentId, mode: SpellMode);
}
