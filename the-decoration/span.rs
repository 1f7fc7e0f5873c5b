//! Highlight spans and the sink the renderer drains them through.

/// Default priority for spans produced by syntax highlighting.
///
/// Match metadata may override it per span; the `nospell` boost is applied on
/// top of whichever value wins.
pub const SYNTAX_PRIORITY: u16 = 100;

/// Handle to a resolved visual style.
///
/// Resolving capture names to handles happens outside the engine; the
/// renderer maps handles back to concrete attributes when painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(u32);

impl StyleId {
  pub const fn new(id: u32) -> Self {
    Self(id)
  }

  pub const fn get(self) -> u32 {
    self.0
  }
}

/// One ephemeral rendering instruction.
///
/// Spans are never persisted: they are re-emitted on every redraw cycle and
/// are derivable purely from the sub-tree, its query, and the requested line.
/// Overlaps are resolved by `priority` (higher wins); emission order breaks
/// ties, so spans emitted later (descendant sub-trees) paint over earlier
/// ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
  pub start_row: u32,
  pub start_col: u32,
  pub end_row:   u32,
  pub end_col:   u32,
  pub style:     StyleId,
  pub priority:  u16,
  /// `Some(true)` inside a `spell` region, `Some(false)` inside `nospell`,
  /// `None` to inherit the surrounding behavior.
  pub spell:     Option<bool>,
  /// Replacement text when the span is rendered concealed.
  pub conceal:   Option<String>,
  /// Link target attached to the span.
  pub url:       Option<String>,
}

/// Destination for spans produced during line emission.
pub trait SpanSink {
  fn emit(&mut self, span: HighlightSpan);
}

impl SpanSink for Vec<HighlightSpan> {
  fn emit(&mut self, span: HighlightSpan) {
    self.push(span);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vec_sink_collects_in_emission_order() {
    let span = |row: u32| {
      HighlightSpan {
        start_row: row,
        start_col: 0,
        end_row:   row,
        end_col:   1,
        style:     StyleId::new(7),
        priority:  SYNTAX_PRIORITY,
        spell:     None,
        conceal:   None,
        url:       None,
      }
    };

    let mut sink: Vec<HighlightSpan> = Vec::new();
    sink.emit(span(0));
    sink.emit(span(1));

    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].start_row, 0);
    assert_eq!(sink[1].start_row, 1);
  }
}
