//! Engine-side implementation of the renderer's callback contract.

use the_decoration::{
  DecorationProvider,
  DocumentId,
  SpanSink,
};

use crate::{
  forest::TreeProvider,
  highlighter::EmitMode,
  host::EditorHost,
  registry::HighlighterRegistry,
};

/// Per-cycle adapter the renderer drives.
///
/// Bundles explicit borrows of the registry and the editor host for the
/// duration of one redraw cycle, so the callbacks never reach into ambient
/// state. Every callback is a no-op for documents without an active
/// highlighter.
pub struct DecorationContext<'a, T: TreeProvider> {
  highlighters: &'a mut HighlighterRegistry<T>,
  host:         &'a mut dyn EditorHost,
}

impl<'a, T: TreeProvider> DecorationContext<'a, T> {
  pub fn new(highlighters: &'a mut HighlighterRegistry<T>, host: &'a mut dyn EditorHost) -> Self {
    Self { highlighters, host }
  }
}

impl<T: TreeProvider> DecorationProvider for DecorationContext<'_, T> {
  fn on_window_open(&mut self, doc: DocumentId, topline: u32, botline: u32) -> bool {
    match self.highlighters.get_mut(doc) {
      Some(highlighter) => highlighter.window_open(topline, botline),
      None => false,
    }
  }

  fn on_line(&mut self, doc: DocumentId, line: u32, sink: &mut dyn SpanSink) {
    if let Some(highlighter) = self.highlighters.get_mut(doc) {
      highlighter.emit_line(line, EmitMode::Render, sink);
    }
  }

  fn on_spell_navigation(&mut self, doc: DocumentId, srow: u32, erow: u32, sink: &mut dyn SpanSink) {
    let Some(highlighter) = self.highlighters.get_mut(doc) else {
      return;
    };
    highlighter.refresh(srow..erow);
    for row in srow..=erow {
      highlighter.emit_line(row, EmitMode::Spell, sink);
    }
  }

  fn on_detach(&mut self, doc: DocumentId) {
    self.highlighters.detach(doc, self.host);
  }
}
