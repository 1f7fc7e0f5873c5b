//! Incremental syntax highlighting over a forest of injected sub-trees.
//!
//! This crate is intentionally split into three layers:
//!
//! - **Seams** (`forest`, `style`, `host`): narrow interfaces to the external
//!   syntax-tree provider and query engine, the style system, and the editor
//!   surface. The engine owns no parser, no trees, and no buffer text.
//! - **Engine** (`highlighter`): one highlighter per document, driving query
//!   evaluation per visible line and emitting ephemeral spans with correct
//!   ordering, overrides, and edit invalidation.
//! - **Lifecycle** (`registry`, `decoration`): the explicit active-document
//!   table and the adapter implementing the renderer's callback contract from
//!   `the-decoration`.
//!
//! # Flow
//!
//! ```text
//! edit -> provider reparse -> notify_* --------> host redraw request
//! renderer window-open ----> refresh(rows)       states rebuilt wholesale
//! renderer per-line -------> emit_line(row)      spans into the sink
//! document close ----------> detach              teardown + deregistration
//! ```
//!
//! Everything runs on the renderer's single logical thread of control; no
//! entry point suspends or spawns work.

pub mod decoration;
pub mod forest;
pub mod highlighter;
pub mod host;
pub mod registry;
pub mod style;

#[cfg(test)]
pub(crate) mod fixture;

pub use the_decoration::{
  DecorationProvider,
  DocumentId,
  HighlightSpan,
  SYNTAX_PRIORITY,
  SpanSink,
  StyleId,
};

pub use crate::{
  decoration::DecorationContext,
  forest::{
    CaptureMetadata,
    ChangedRange,
    Language,
    NodeRange,
    QueryCapture,
    TreeProvider,
    TreeSource,
  },
  highlighter::{
    EmitMode,
    HighlightError,
    HighlightOptions,
    Highlighter,
  },
  host::{
    EditorHost,
    SpellMode,
  },
  registry::HighlighterRegistry,
  style::{
    NullStyles,
    StyleResolver,
  },
};
