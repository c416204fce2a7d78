mod indices;

pub use indices::match_indices;

use crate::limits::{exceeds_typo_budget, match_too_large};
use crate::smith_waterman::greedy::match_greedy;
use crate::smith_waterman::reference::align;
use crate::smith_waterman::{Folded, fold};
use crate::{Config, Match};

/// Scores the needle against every haystack, dropping haystacks without a match
/// or with more unmatched needle characters than `config.max_typos` allows.
///
/// An empty needle matches every haystack with a score of zero.
pub fn match_list<S1: AsRef<str>, S2: AsRef<str>>(needle: S1, haystacks: &[S2], config: &Config) -> Vec<Match> {
	let needle = needle.as_ref();
	if needle.is_empty() {
		return (0..haystacks.len())
			.map(|idx| Match {
				index: idx as u32,
				score: 0,
				exact: false,
			})
			.collect();
	}

	let folded_needle = fold(needle);
	let mut matches = Vec::new();
	for (idx, haystack) in haystacks.iter().enumerate() {
		if let Some((score, exact)) = score_one(needle, &folded_needle, haystack.as_ref(), config) {
			matches.push(Match {
				index: idx as u32,
				score,
				exact,
			});
		}
	}

	if config.sort {
		matches.sort_unstable();
	}

	matches
}

fn score_one(needle: &str, folded_needle: &[Folded], haystack: &str, config: &Config) -> Option<(u16, bool)> {
	let folded_haystack = fold(haystack);

	if match_too_large(folded_needle.len(), folded_haystack.len()) {
		let (score, indices, exact) = match_greedy(needle, haystack, &config.scoring);
		if score == 0 || exceeds_typo_budget(config.max_typos, folded_needle.len(), indices.len()) {
			return None;
		}
		return Some((score, exact));
	}

	let alignment = align(folded_needle, &folded_haystack, &config.scoring, needle == haystack);
	if alignment.score == 0 {
		return None;
	}
	if let Some(max_typos) = config.max_typos
		&& alignment.typos() > max_typos
	{
		return None;
	}

	Some((alignment.score, alignment.exact))
}
