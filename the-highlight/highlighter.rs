//! Per-document highlight engine.
//!
//! One [`Highlighter`] exists per highlighted document. It owns no tree
//! memory: the forest lives behind [`TreeProvider`], and the engine keeps
//! only per-sub-tree cursors over that forest's match streams.
//!
//! `refresh` rebuilds the cursor list wholesale for the visible rows;
//! `emit_line` advances each cursor just far enough for the requested row and
//! caches the lookahead in `next_row`. An iterator, once created for a
//! sub-tree, is reused across consecutive lines until a match's start row
//! runs ahead of the render position, which gives each visible line a cost
//! proportional to the matches that overlap it rather than to the sub-tree's
//! total match count.

use std::{
  collections::HashMap,
  fmt,
  ops::Range,
  sync::Arc,
};

use smallvec::SmallVec;
use the_decoration::{
  DocumentId,
  HighlightSpan,
  SYNTAX_PRIORITY,
  SpanSink,
  StyleId,
};
use thiserror::Error;

use crate::{
  forest::{
    CaptureMetadata,
    ChangedRange,
    Language,
    NodeRange,
    QueryCapture,
    TreeProvider,
    TreeSource,
  },
  host::{
    EditorHost,
    SpellMode,
  },
  style::StyleResolver,
};

pub type Result<T> = std::result::Result<T, HighlightError>;

#[derive(Debug, Error)]
pub enum HighlightError {
  /// The forest is not backed by a live document, so no edit notifications
  /// exist to keep highlights correct.
  #[error("syntax source is not an editable document")]
  UnsupportedSourceKind,
}

/// Construction options for one highlighter.
#[derive(Debug, Clone, Default)]
pub struct HighlightOptions {
  /// Raw query source overriding the stock highlight query, per
  /// sub-language.
  pub queries: HashMap<Language, String>,
}

/// Priority boost so `nospell` spans out-rank `spell` spans carrying the
/// same explicit metadata priority.
const NOSPELL_PRIORITY_BOOST: u16 = 1;

/// What a line emission pass is answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
  /// Ordinary rendering: every styled span is emitted.
  Render,
  /// Spell determination: only spans with a defined spell flag are emitted.
  Spell,
}

/// One compiled query bound to one sub-language, plus the memoized
/// capture-to-style cache.
struct QueryBinding<Q> {
  /// `None` marks a query-less binding: the sub-language has no highlight
  /// query, and its sub-trees silently produce no spans.
  query:  Option<Q>,
  /// capture index -> resolved style. `None` entries are the cached
  /// "no style" answer (private captures, names the resolver rejects).
  styles: HashMap<u32, Option<StyleId>>,
}

impl<Q> QueryBinding<Q> {
  fn new(query: Option<Q>) -> Self {
    Self {
      query,
      styles: HashMap::new(),
    }
  }
}

/// Cursor over one sub-tree's match stream for the current visible range.
///
/// Rebuilt wholesale by every `refresh`, never patched incrementally.
struct SubtreeState<T: TreeProvider> {
  subtree:  T::Subtree,
  language: Language,
  iter:     Option<T::Matches>,
  /// Next row at which the iterator has to be consulted again. Rows before
  /// it are known to have no further matches.
  next_row: u32,
}

pub struct Highlighter<T: TreeProvider> {
  provider:    T,
  doc:         DocumentId,
  styles:      Arc<dyn StyleResolver>,
  options:     HighlightOptions,
  bindings:    HashMap<Language, QueryBinding<T::Query>>,
  states:      SmallVec<[SubtreeState<T>; 4]>,
  /// Last row emitted since the last refresh. A request at or before it
  /// means the renderer repeated or reordered rows, and cursors must be
  /// rebuilt.
  last_line:   Option<u32>,
  saved_spell: Option<SpellMode>,
  shut_down:   bool,
}

impl<T: TreeProvider> fmt::Debug for Highlighter<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Highlighter")
      .field("doc", &self.doc)
      .field("bindings", &self.bindings.len())
      .field("states", &self.states.len())
      .finish_non_exhaustive()
  }
}

impl<T: TreeProvider> Highlighter<T> {
  /// Builds the engine for `provider`'s document and applies the attach
  /// side effects: the legacy highlighting mechanism is disabled, the spell
  /// option is switched to captures-only (with a restore point), and the
  /// document is parsed in full.
  ///
  /// Fails with [`HighlightError::UnsupportedSourceKind`] when the forest is
  /// not backed by a document; nothing is touched in that case.
  pub fn new(
    mut provider: T,
    options: HighlightOptions,
    styles: Arc<dyn StyleResolver>,
    host: &mut dyn EditorHost,
  ) -> Result<Self> {
    let TreeSource::Document(doc) = provider.source() else {
      return Err(HighlightError::UnsupportedSourceKind);
    };

    host.set_legacy_syntax(doc, false);
    let saved_spell = host.spell_mode(doc);
    host.set_spell_mode(doc, SpellMode::CapturesOnly);
    provider.parse(None);
    tracing::debug!(?doc, "highlighter attached");

    Ok(Self {
      provider,
      doc,
      styles,
      options,
      bindings: HashMap::new(),
      states: SmallVec::new(),
      last_line: None,
      saved_spell: Some(saved_spell),
      shut_down: false,
    })
  }

  pub fn document(&self) -> DocumentId {
    self.doc
  }

  pub fn provider(&self) -> &T {
    &self.provider
  }

  /// Start of a redraw cycle: range-limited reparse (providers may ignore
  /// the range) followed by a state rebuild for the visible rows. Returns
  /// whether per-line emission should follow.
  pub fn window_open(&mut self, topline: u32, botline: u32) -> bool {
    self.provider.parse(Some(topline..botline + 1));
    self.refresh(topline..botline + 1);
    true
  }

  /// Discards and rebuilds the sub-tree states for `rows` (half-open).
  ///
  /// States are created ancestor-first, matching forest traversal order;
  /// sub-trees bound to a query-less language are skipped. Idempotent on an
  /// unchanged forest.
  pub fn refresh(&mut self, rows: Range<u32>) {
    self.last_line = None;
    let Self {
      provider,
      options,
      bindings,
      states,
      ..
    } = self;
    states.clear();

    provider.for_each_subtree(&mut |subtree| {
      let (start_row, end_row) = provider.row_range(subtree);
      if start_row >= rows.end || end_row < rows.start {
        return;
      }

      let language = provider.language(subtree);
      let binding = bindings.entry(language.clone()).or_insert_with(|| {
        let source = options.queries.get(&language).map(String::as_str);
        let query = provider.compile_query(&language, source);
        if query.is_none() {
          tracing::trace!(%language, "no highlight query, sub-trees will be skipped");
        }
        QueryBinding::new(query)
      });
      if binding.query.is_none() {
        return;
      }

      states.push(SubtreeState {
        subtree: subtree.clone(),
        language,
        iter: None,
        next_row: 0,
      });
    });
  }

  /// Emits the spans relevant to `line` into `sink`.
  ///
  /// Expects a preceding `refresh` covering `line` for this cycle. Rows are
  /// assumed to arrive in increasing order; a repeated or backward row
  /// resets every cursor so its spans are re-derived instead of lost.
  pub fn emit_line(&mut self, line: u32, mode: EmitMode, sink: &mut dyn SpanSink) {
    if self.last_line.is_some_and(|last| line <= last) {
      for state in &mut self.states {
        state.iter = None;
        state.next_row = 0;
      }
    }
    self.last_line = Some(line);

    let Self {
      provider,
      bindings,
      states,
      styles,
      ..
    } = self;

    for state in states.iter_mut() {
      let (start_row, end_row) = provider.row_range(&state.subtree);
      if line < start_row || line > end_row {
        continue;
      }

      let Some(binding) = bindings.get_mut(&state.language) else {
        continue;
      };
      let QueryBinding {
        query,
        styles: resolved,
      } = binding;
      let Some(query) = query.as_ref() else {
        continue;
      };

      if state.iter.is_none() || state.next_row < line {
        state.iter = Some(provider.iter_matches(query, &state.subtree, line..end_row + 1));
      }
      let Some(iter) = state.iter.as_mut() else {
        continue;
      };

      while line >= state.next_row {
        // A drained stream pins the cursor past the sub-tree, so no further
        // pulls happen until the next refresh.
        let (range, capture, metadata) = match iter.next() {
          Some(QueryCapture {
            capture,
            range,
            metadata,
          }) => (range, capture, metadata),
          None => (NodeRange::point(end_row + 1), None, CaptureMetadata::default()),
        };

        if let Some(index) = capture {
          let name = provider.capture_name(query, index);
          let style = *resolved.entry(index).or_insert_with(|| {
            if name.starts_with('_') {
              None
            } else {
              styles.resolve(name, &state.language)
            }
          });
          let (spell, spell_boost) = match name {
            "spell" => (Some(true), 0),
            "nospell" => (Some(false), NOSPELL_PRIORITY_BOOST),
            _ => (None, 0),
          };

          // Spans that ended before the requested line are stale leftovers
          // of the stream's match order and are dropped.
          if let Some(style) = style
            && range.end_row >= line
            && (mode == EmitMode::Render || spell.is_some())
          {
            let priority = metadata
              .priority
              .unwrap_or(SYNTAX_PRIORITY)
              .saturating_add(spell_boost);
            sink.emit(HighlightSpan {
              start_row: range.start_row,
              start_col: range.start_col,
              end_row: range.end_row,
              end_col: range.end_col,
              style,
              priority,
              spell,
              conceal: metadata.conceal,
              url: metadata.url,
            });
          }
        }

        if range.start_row > line {
          state.next_row = range.start_row;
        }
      }
    }
  }

  /// A byte-level edit landed. No highlight state is recomputed here; the
  /// affected rows are handed to the renderer for invalidation and
  /// everything is re-derived lazily on the next redraw cycle.
  pub fn notify_bytes(&self, host: &mut dyn EditorHost, start_row: u32, new_end_row_offset: u32) {
    host.request_redraw(self.doc, start_row..start_row + new_end_row_offset + 1);
  }

  /// A reparse changed these row ranges, possibly restricted to one
  /// sub-tree.
  pub fn notify_tree_changed(&self, host: &mut dyn EditorHost, ranges: &[ChangedRange]) {
    for range in ranges {
      host.request_redraw(self.doc, range.start_row..range.end_row + 1);
    }
  }

  /// Injected sub-trees were removed; their rows need a repaint too.
  pub fn notify_subtree_removed(&self, host: &mut dyn EditorHost, ranges: &[ChangedRange]) {
    for range in ranges {
      host.request_redraw(self.doc, range.start_row..range.end_row + 1);
    }
  }

  /// Reverses the attach side effects. Safe to call repeatedly, and safe on
  /// an already-unloaded document (the option restore is skipped then).
  pub fn shutdown(&mut self, host: &mut dyn EditorHost) {
    if self.shut_down {
      return;
    }
    self.shut_down = true;
    self.states.clear();
    self.last_line = None;

    if host.is_loaded(self.doc) {
      if let Some(mode) = self.saved_spell.take() {
        host.set_spell_mode(self.doc, mode);
      }
      host.set_legacy_syntax(self.doc, true);
    }
    tracing::debug!(doc = ?self.doc, "highlighter detached");
  }

  #[cfg(test)]
  pub(crate) fn state_snapshot(&self) -> Vec<(Language, (u32, u32), u32)> {
    self
      .states
      .iter()
      .map(|state| {
        (
          state.language.clone(),
          self.provider.row_range(&state.subtree),
          state.next_row,
        )
      })
      .collect()
  }
}
