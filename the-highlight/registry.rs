//! Active-document registry and lifecycle manager.
//!
//! The registry is the one explicit table mapping documents to their
//! highlighters: inserted on attach, removed on detach, owned by whoever
//! manages document lifecycles and passed to the decoration adapter rather
//! than reached through ambient state.
//!
//! Holding an entry doubles as the notification subscription: byte edits
//! and reparse events are routed here by document id and only reach engines
//! that are still registered, so a document closed between event delivery
//! and frame production simply stops receiving both.

use std::{
  collections::HashMap,
  sync::Arc,
};

use the_decoration::DocumentId;

use crate::{
  forest::{
    ChangedRange,
    TreeProvider,
    TreeSource,
  },
  highlighter::{
    HighlightError,
    HighlightOptions,
    Highlighter,
    Result,
  },
  host::EditorHost,
  style::StyleResolver,
};

pub struct HighlighterRegistry<T: TreeProvider> {
  active: HashMap<DocumentId, Highlighter<T>>,
}

impl<T: TreeProvider> Default for HighlighterRegistry<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: TreeProvider> HighlighterRegistry<T> {
  pub fn new() -> Self {
    Self {
      active: HashMap::new(),
    }
  }

  /// Builds a highlighter for `provider`'s document and registers it,
  /// tearing down any previous highlighter for that document first so
  /// option restore points never nest.
  ///
  /// The registry is left unchanged when construction fails.
  pub fn attach(
    &mut self,
    provider: T,
    options: HighlightOptions,
    styles: Arc<dyn StyleResolver>,
    host: &mut dyn EditorHost,
  ) -> Result<DocumentId> {
    let TreeSource::Document(doc) = provider.source() else {
      return Err(HighlightError::UnsupportedSourceKind);
    };
    self.detach(doc, host);

    let highlighter = Highlighter::new(provider, options, styles, host)?;
    self.active.insert(doc, highlighter);
    Ok(doc)
  }

  /// Tears down and removes the highlighter for `doc`, if any.
  pub fn detach(&mut self, doc: DocumentId, host: &mut dyn EditorHost) {
    if let Some(mut highlighter) = self.active.remove(&doc) {
      highlighter.shutdown(host);
    }
  }

  pub fn get(&self, doc: DocumentId) -> Option<&Highlighter<T>> {
    self.active.get(&doc)
  }

  pub fn get_mut(&mut self, doc: DocumentId) -> Option<&mut Highlighter<T>> {
    self.active.get_mut(&doc)
  }

  pub fn is_active(&self, doc: DocumentId) -> bool {
    self.active.contains_key(&doc)
  }

  pub fn len(&self) -> usize {
    self.active.len()
  }

  pub fn is_empty(&self) -> bool {
    self.active.is_empty()
  }

  /// Byte-level edit notification for `doc`; ignored when no highlighter is
  /// registered.
  pub fn on_bytes(
    &self,
    doc: DocumentId,
    host: &mut dyn EditorHost,
    start_row: u32,
    new_end_row_offset: u32,
  ) {
    if let Some(highlighter) = self.active.get(&doc) {
      highlighter.notify_bytes(host, start_row, new_end_row_offset);
    }
  }

  /// Post-reparse tree change notification for `doc`; ignored when no
  /// highlighter is registered.
  pub fn on_tree_changed(&self, doc: DocumentId, host: &mut dyn EditorHost, ranges: &[ChangedRange]) {
    if let Some(highlighter) = self.active.get(&doc) {
      highlighter.notify_tree_changed(host, ranges);
    }
  }

  /// Sub-tree removal notification for `doc`; ignored when no highlighter
  /// is registered.
  pub fn on_subtree_removed(&self, doc: DocumentId, host: &mut dyn EditorHost, ranges: &[ChangedRange]) {
    if let Some(highlighter) = self.active.get(&doc) {
      highlighter.notify_subtree_removed(host, ranges);
    }
  }
}
