//! Smith-Waterman scoring backends.
//!
//! Contains the reference alignment (with traceback) and the greedy fallback
//! used for haystacks too large for a full score matrix.

pub mod greedy;
pub mod reference;

/// A haystack or needle character after case folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Folded {
	pub folded: char,
	pub upper: bool,
	pub lower: bool,
	pub alphabetic: bool,
}

pub(crate) fn fold(text: &str) -> Vec<Folded> {
	text.chars()
		.map(|c| Folded {
			folded: c.to_lowercase().next().unwrap_or(c),
			upper: c.is_uppercase(),
			lower: c.is_lowercase(),
			alphabetic: c.is_alphabetic(),
		})
		.collect()
}
