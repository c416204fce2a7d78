use crate::limits::{exceeds_typo_budget, match_too_large};
use crate::smith_waterman::greedy::match_greedy;
use crate::smith_waterman::reference::smith_waterman_with_indices;
use crate::{Config, MatchIndices};

/// Char offsets of `needle` inside one `haystack`, for highlighting.
///
/// Tracing back needs the whole score matrix; reserve this for rows that are
/// about to be displayed.
pub fn match_indices<S1: AsRef<str>, S2: AsRef<str>>(needle: S1, haystack: S2, config: &Config) -> Option<MatchIndices> {
	let needle = needle.as_ref();
	let haystack = haystack.as_ref();
	if needle.is_empty() {
		return None;
	}

	let needle_len = needle.chars().count();
	if match_too_large(needle_len, haystack.chars().count()) {
		let (score, indices, exact) = match_greedy(needle, haystack, &config.scoring);
		if score == 0 || exceeds_typo_budget(config.max_typos, needle_len, indices.len()) {
			return None;
		}
		return Some(MatchIndices { score, indices, exact });
	}

	let (score, typos, indices, exact) = smith_waterman_with_indices(needle, haystack, &config.scoring);
	if score == 0 {
		return None;
	}
	if let Some(max_typos) = config.max_typos
		&& typos > max_typos
	{
		return None;
	}

	Some(MatchIndices { score, indices, exact })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strict() -> Config {
		Config {
			max_typos: Some(0),
			..Config::default()
		}
	}

	#[test]
	fn label_offsets_are_chars() {
		let matched = match_indices("air", "Nïke Air Max", &strict()).expect("air should match");
		assert_eq!(matched.indices, vec![5, 6, 7]);
		assert!(!matched.exact);
	}

	#[test]
	fn exact_label_is_flagged() {
		let matched = match_indices("Jordan", "Jordan", &strict()).expect("exact label");
		assert!(matched.exact);
		assert_eq!(matched.indices.len(), 6);
	}

	#[test]
	fn oversized_label_takes_greedy_path() {
		let label = format!("{}pegasus", "-".repeat(3000));
		let matched = match_indices("pegasus", &label, &strict()).expect("greedy match");
		assert_eq!(matched.indices.first().copied(), Some(3000));

		let missing = "q".repeat(400);
		assert!(match_indices(&missing, &label, &strict()).is_none());
	}

	#[test]
	fn typo_gate_uses_the_rendered_path() {
		let matched = match_indices("ab", "bab", &strict()).expect("in budget");
		assert_eq!(matched.indices, vec![1, 2]);
		assert!(match_indices("abx", "bab", &strict()).is_none());
	}

	#[test]
	fn empty_needle_has_no_indices() {
		assert!(match_indices("", "Nike", &Config::default()).is_none());
	}
}
