//! Scriptable fakes for the external collaborators, shared by the unit
//! tests.
//!
//! `FakeTree` plays the syntax-tree provider and query engine: sub-trees are
//! scripted up front together with the capture stream each would yield.
//! `FakeStyles` records every resolver lookup so tests can assert on caching;
//! `FakeHost` records redraw requests and option flips.

use std::{
  cell::RefCell,
  collections::HashMap,
  num::NonZeroUsize,
  ops::Range,
};

use the_decoration::{
  DocumentId,
  StyleId,
};

use crate::{
  forest::{
    CaptureMetadata,
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

pub fn doc(id: usize) -> DocumentId {
  DocumentId::new(NonZeroUsize::new(id).unwrap())
}

pub fn capture(index: u32, start: (u32, u32), end: (u32, u32)) -> QueryCapture {
  capture_with(index, start, end, CaptureMetadata::default())
}

pub fn capture_with(
  index: u32,
  start: (u32, u32),
  end: (u32, u32),
  metadata: CaptureMetadata,
) -> QueryCapture {
  QueryCapture {
    capture: Some(index),
    range: NodeRange {
      start_row: start.0,
      start_col: start.1,
      end_row:   end.0,
      end_col:   end.1,
    },
    metadata,
  }
}

/// One scripted tree in the fake forest.
#[derive(Debug, Clone)]
pub struct FakeSubtree {
  pub language: Language,
  pub rows:     (u32, u32),
  /// The capture stream this sub-tree yields, in scripted (match) order.
  pub captures: Vec<QueryCapture>,
}

#[derive(Debug, Clone)]
pub struct FakeQuery {
  pub names: Vec<String>,
}

pub struct FakeTree {
  source:       TreeSource,
  subtrees:     Vec<FakeSubtree>,
  /// Stock query capture names per language; an absent entry means the
  /// language has no highlight query.
  queries:      HashMap<Language, Vec<String>>,
  /// Every `parse` call, in order, with the row restriction it carried.
  pub parses:   Vec<Option<Range<u32>>>,
}

impl FakeTree {
  pub fn document(doc: DocumentId) -> Self {
    Self::new(TreeSource::Document(doc))
  }

  pub fn detached() -> Self {
    Self::new(TreeSource::Detached)
  }

  fn new(source: TreeSource) -> Self {
    Self {
      source,
      subtrees: Vec::new(),
      queries: HashMap::new(),
      parses: Vec::new(),
    }
  }

  /// Appends a sub-tree; append ancestors before their descendants, the way
  /// a real forest traversal would visit them.
  pub fn with_subtree(mut self, language: &str, rows: (u32, u32), captures: Vec<QueryCapture>) -> Self {
    self.subtrees.push(FakeSubtree {
      language: Language::from(language),
      rows,
      captures,
    });
    self
  }

  pub fn with_query(mut self, language: &str, names: &[&str]) -> Self {
    self.queries.insert(
      Language::from(language),
      names.iter().map(|name| (*name).to_owned()).collect(),
    );
    self
  }
}

impl TreeProvider for FakeTree {
  type Matches = std::vec::IntoIter<QueryCapture>;
  type Query = FakeQuery;
  type Subtree = FakeSubtree;

  fn source(&self) -> TreeSource {
    self.source
  }

  fn parse(&mut self, rows: Option<Range<u32>>) {
    self.parses.push(rows);
  }

  fn for_each_subtree(&self, visit: &mut dyn FnMut(&FakeSubtree)) {
    for subtree in &self.subtrees {
      visit(subtree);
    }
  }

  fn language(&self, subtree: &FakeSubtree) -> Language {
    subtree.language.clone()
  }

  fn row_range(&self, subtree: &FakeSubtree) -> (u32, u32) {
    subtree.rows
  }

  fn compile_query(&self, language: &Language, source: Option<&str>) -> Option<FakeQuery> {
    // Overrides compile to a query whose capture names are the
    // comma-separated override text; close enough to a real compiler for
    // the engine's purposes.
    if let Some(source) = source {
      return Some(FakeQuery {
        names: source.split(',').map(str::to_owned).collect(),
      });
    }
    self.queries.get(language).map(|names| {
      FakeQuery {
        names: names.clone(),
      }
    })
  }

  fn capture_name<'q>(&self, query: &'q FakeQuery, index: u32) -> &'q str {
    &query.names[index as usize]
  }

  fn iter_matches(&self, _query: &FakeQuery, subtree: &FakeSubtree, rows: Range<u32>) -> Self::Matches {
    // Like a real capture cursor: bounded by the window end, but captures
    // of matches that began before the window may still come out, and the
    // stream follows match order rather than strict start order. Stale ones
    // are the engine's problem.
    subtree
      .captures
      .iter()
      .filter(|capture| capture.range.start_row < rows.end)
      .cloned()
      .collect::<Vec<_>>()
      .into_iter()
  }
}

#[derive(Debug, Default)]
pub struct FakeStyles {
  table: HashMap<String, u32>,
  log:   RefCell<Vec<(String, Language)>>,
}

impl FakeStyles {
  pub fn with(names: &[(&str, u32)]) -> Self {
    Self {
      table: names
        .iter()
        .map(|&(name, id)| (name.to_owned(), id))
        .collect(),
      log:   RefCell::new(Vec::new()),
    }
  }

  /// How many times the resolver was consulted.
  pub fn lookups(&self) -> usize {
    self.log.borrow().len()
  }

  pub fn lookup_log(&self) -> Vec<(String, Language)> {
    self.log.borrow().clone()
  }
}

impl StyleResolver for FakeStyles {
  fn resolve(&self, capture_name: &str, language: &Language) -> Option<StyleId> {
    self
      .log
      .borrow_mut()
      .push((capture_name.to_owned(), language.clone()));
    self.table.get(capture_name).copied().map(StyleId::new)
  }
}

#[derive(Debug)]
pub struct FakeHost {
  pub loaded:  bool,
  pub redraws: Vec<(DocumentId, Range<u32>)>,
  pub legacy:  Vec<(DocumentId, bool)>,
  pub spell:   HashMap<DocumentId, SpellMode>,
}

impl Default for FakeHost {
  fn default() -> Self {
    Self {
      loaded:  true,
      redraws: Vec::new(),
      legacy:  Vec::new(),
      spell:   HashMap::new(),
    }
  }
}

impl EditorHost for FakeHost {
  fn request_redraw(&mut self, doc: DocumentId, rows: Range<u32>) {
    self.redraws.push((doc, rows));
  }

  fn is_loaded(&self, _doc: DocumentId) -> bool {
    self.loaded
  }

  fn set_legacy_syntax(&mut self, doc: DocumentId, enabled: bool) {
    self.legacy.push((doc, enabled));
  }

  fn spell_mode(&self, doc: DocumentId) -> SpellMode {
    self.spell.get(&doc).copied().unwrap_or(SpellMode::Everywhere)
  }

  fn set_spell_mode(&mut self, doc: DocumentId, mode: SpellMode) {
    self.spell.insert(doc, mode);
  }
}
