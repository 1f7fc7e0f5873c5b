//! Narrow interface to the syntax-tree provider and query engine.
//!
//! A forest is a root tree plus zero or more injected sub-trees for embedded
//! sub-languages. Parsing, tree diffing, query compilation, and match
//! iteration all live behind [`TreeProvider`]; the engine only orchestrates
//! them per visible line and treats sub-tree values as cheap handles borrowed
//! for the duration of one redraw cycle.

use std::{
  fmt,
  ops::Range,
  sync::Arc,
};

use the_decoration::DocumentId;

/// Identifier of a sub-language inside the forest, either the root language
/// or an injected one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(Arc<str>);

impl Language {
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Language {
  fn from(name: &str) -> Self {
    Self::new(name)
  }
}

/// What a forest was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSource {
  /// A live editable buffer with edit notifications.
  Document(DocumentId),
  /// A standalone in-memory tree. Nothing reports edits for it, so it cannot
  /// be kept highlighted incrementally.
  Detached,
}

/// Row/column range covered by one query match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
  pub start_row: u32,
  pub start_col: u32,
  pub end_row:   u32,
  pub end_col:   u32,
}

impl NodeRange {
  /// Zero-width range at the start of `row`. Used as the end-of-stream
  /// sentinel when a match stream runs dry.
  pub const fn point(row: u32) -> Self {
    Self {
      start_row: row,
      start_col: 0,
      end_row:   row,
      end_col:   0,
    }
  }
}

/// Match metadata attached by query directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMetadata {
  /// Explicit priority override for spans from this match.
  pub priority: Option<u16>,
  /// Replacement text for concealed rendering.
  pub conceal:  Option<String>,
  /// Link target for the matched region.
  pub url:      Option<String>,
}

/// One (capture, node, metadata) result pulled from a match stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCapture {
  /// Capture index within the query, when the result names one.
  pub capture:  Option<u32>,
  /// Covering range of the matched node, after any metadata range
  /// adjustment the provider applies.
  pub range:    NodeRange,
  pub metadata: CaptureMetadata,
}

/// Contiguous row range reported by a reparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
  pub start_row: u32,
  /// Inclusive end row.
  pub end_row:   u32,
}

/// The syntax-tree provider and query engine, seen through the surface the
/// highlighter needs.
///
/// Implementations own the parser, the trees, and the compiled queries. The
/// trait is deliberately small: the engine must be able to re-derive every
/// span purely from (sub-tree, query, line), so nothing here exposes mutable
/// tree state.
pub trait TreeProvider {
  /// Compiled capture query for one sub-language.
  type Query;
  /// Cheap cloneable handle to one tree in the forest.
  type Subtree: Clone;
  /// Owned stream of capture results for one sub-tree and row range.
  type Matches: Iterator<Item = QueryCapture>;

  /// What this forest was parsed from.
  fn source(&self) -> TreeSource;

  /// (Re)parse the forest. `rows` restricts the reparse to a row range when
  /// the provider supports that; providers that do not may reparse fully.
  fn parse(&mut self, rows: Option<Range<u32>>);

  /// Visit every tree in the forest, ancestors before their injected
  /// descendants. Emission priority relies on this order: descendant spans
  /// are emitted after ancestor spans and therefore paint over them.
  fn for_each_subtree(&self, visit: &mut dyn FnMut(&Self::Subtree));

  fn language(&self, subtree: &Self::Subtree) -> Language;

  /// Inclusive row span covered by the sub-tree's root.
  fn row_range(&self, subtree: &Self::Subtree) -> (u32, u32);

  /// Compile the capture query for `language`, preferring `source` (a raw
  /// override query) over the stock one. `None` when the sub-language has no
  /// highlight query at all.
  fn compile_query(&self, language: &Language, source: Option<&str>) -> Option<Self::Query>;

  fn capture_name<'q>(&self, query: &'q Self::Query, index: u32) -> &'q str;

  /// Stream matches of `query` against `subtree` starting at `rows.start`
  /// and bounded by `rows.end`. Streams follow match order, which is not
  /// strictly sorted when patterns nest, and may include captures that ended
  /// before `rows.start`; the engine drops those as stale.
  fn iter_matches(&self, query: &Self::Query, subtree: &Self::Subtree, rows: Range<u32>) -> Self::Matches;
}
