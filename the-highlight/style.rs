//! Capture-name to style-handle resolution seam.

use the_decoration::StyleId;

use crate::forest::Language;

/// Maps a capture name plus the sub-language it matched in to a resolved
/// style handle.
///
/// The composite key matters: `string` captured in an injected language may
/// resolve differently from `string` in the root language. Results are
/// cached per query binding, so an implementation is consulted at most once
/// per capture index of each binding.
pub trait StyleResolver {
  fn resolve(&self, capture_name: &str, language: &Language) -> Option<StyleId>;
}

/// Resolves nothing; documents highlighted through it render unstyled.
#[derive(Debug, Default)]
pub struct NullStyles;

impl StyleResolver for NullStyles {
  fn resolve(&self, _capture_name: &str, _language: &Language) -> Option<StyleId> {
    None
  }
}
