//! Pure ranking and highlighting over option lists.
//!
//! [`combined_search`] is the local filtering strategy: a substring filter on
//! every query token followed by exact / prefix / fuzzy bucketing. Fuzzy scores
//! come from [`cascade_matcher`], with a typo budget that grows with token length.

use std::cmp::Reverse;
use std::ops::Range;

use cascade_matcher::{Config, match_indices, match_list};

use crate::option::OptionItem;

/// A run of text that either matched the query or did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	pub text: String,
	pub is_match: bool,
}

impl Segment {
	fn new(text: String, is_match: bool) -> Self {
		Self { text, is_match }
	}
}

/// Unmatched characters tolerated for a token of `len` chars.
fn typo_budget(len: usize) -> u16 {
	match len {
		0..=3 => 0,
		4..=9 => 1,
		_ => 2,
	}
}

fn matcher_config(token: &str) -> Config {
	Config {
		max_typos: Some(typo_budget(token.chars().count())),
		..Config::default()
	}
}

/// Sum over query tokens of the best label/value score, or `None` when any
/// token matches neither.
fn fuzzy_score(tokens: &[&str], option: &OptionItem) -> Option<u32> {
	let haystacks = [option.label.as_str(), option.value.as_str()];
	tokens.iter().try_fold(0u32, |total, token| {
		let best = match_list(token, &haystacks, &matcher_config(token)).first()?.score;
		Some(total + u32::from(best))
	})
}

/// Orders options as exact matches, then prefix matches, then fuzzy matches.
///
/// Exact and prefix comparisons are case-insensitive against label or value.
/// Fuzzy candidates are ordered by descending score with ties in input order.
/// Candidates the matcher cannot score within the typo budget are kept after
/// them, in input order. A blank query returns the input unchanged.
pub fn exact_prefix_fuzzy_rank(query: &str, options: &[OptionItem]) -> Vec<OptionItem> {
	let query = query.trim();
	if query.is_empty() {
		return options.to_vec();
	}
	let needle = query.to_lowercase();
	let tokens: Vec<&str> = query.split_whitespace().collect();

	let mut exact = Vec::new();
	let mut prefix = Vec::new();
	let mut fuzzy = Vec::new();
	for option in options {
		let label = option.label.to_lowercase();
		let value = option.value.to_lowercase();
		if label == needle || value == needle {
			exact.push(option.clone());
		} else if label.starts_with(&needle) || value.starts_with(&needle) {
			prefix.push(option.clone());
		} else {
			fuzzy.push((fuzzy_score(&tokens, option), option.clone()));
		}
	}

	// Stable, and `None` sorts below every score.
	fuzzy.sort_by_key(|(score, _)| Reverse(*score));
	exact.extend(prefix);
	exact.extend(fuzzy.into_iter().map(|(_, option)| option));
	exact
}

/// Keeps options whose `label value` text contains every whitespace-separated
/// query token, case-insensitively. A blank query returns the input unchanged.
pub fn multi_token_filter(query: &str, options: &[OptionItem]) -> Vec<OptionItem> {
	let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
	if tokens.is_empty() {
		return options.to_vec();
	}

	options
		.iter()
		.filter(|option| {
			let haystack = format!("{} {}", option.label, option.value).to_lowercase();
			tokens.iter().all(|token| haystack.contains(token.as_str()))
		})
		.cloned()
		.collect()
}

/// [`multi_token_filter`] followed by [`exact_prefix_fuzzy_rank`].
pub fn combined_search(query: &str, options: &[OptionItem]) -> Vec<OptionItem> {
	exact_prefix_fuzzy_rank(query, &multi_token_filter(query, options))
}

/// Splits `text` into alternating matched and unmatched runs for `query`.
///
/// Each query token is fuzzy-matched independently and the union of matched
/// characters is highlighted; a token the matcher rejects still highlights its
/// first case-insensitive substring occurrence. The segments always
/// concatenate back to `text`.
/// A blank query, or one that matches nothing, yields a single unmatched segment.
pub fn highlight_segments(text: &str, query: &str) -> Vec<Segment> {
	let chars: Vec<char> = text.chars().collect();
	let mut matched = vec![false; chars.len()];
	for token in query.split_whitespace() {
		let indices: Vec<usize> = match match_indices(token, text, &matcher_config(token)) {
			Some(found) => found.indices,
			None => substring_span(token, &chars).map(|span| span.collect()).unwrap_or_default(),
		};
		for idx in indices {
			if let Some(slot) = matched.get_mut(idx) {
				*slot = true;
			}
		}
	}

	if !matched.contains(&true) {
		return vec![Segment::new(text.to_owned(), false)];
	}

	let mut segments: Vec<Segment> = Vec::new();
	for (ch, is_match) in chars.into_iter().zip(matched) {
		match segments.last_mut() {
			Some(last) if last.is_match == is_match => last.text.push(ch),
			_ => segments.push(Segment::new(ch.to_string(), is_match)),
		}
	}
	segments
}

/// Char range of the first case-insensitive occurrence of `token` in `chars`.
fn substring_span(token: &str, chars: &[char]) -> Option<Range<usize>> {
	let needle: Vec<char> = token.chars().collect();
	if needle.is_empty() || needle.len() > chars.len() {
		return None;
	}
	(0..=chars.len() - needle.len())
		.find(|&start| {
			chars[start..start + needle.len()]
				.iter()
				.zip(&needle)
				.all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
		})
		.map(|start| start..start + needle.len())
}
