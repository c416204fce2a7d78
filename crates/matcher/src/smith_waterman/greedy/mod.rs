//! Greedy left-to-right matcher for haystacks too large for the score matrix.
//!
//! Each needle character takes the first matching haystack character after the
//! previous match. Scores use the same weights as the reference alignment, so
//! results are comparable, though never higher than the optimal alignment.

use super::fold;
use crate::Scoring;

/// Returns `(score, indices, exact)`. The score is zero unless every needle
/// character was matched in order; `indices` holds the char offsets matched so far.
pub fn match_greedy(needle: &str, haystack: &str, scoring: &Scoring) -> (u16, Vec<usize>, bool) {
	let needle_chars = fold(needle);
	let haystack_chars = fold(haystack);

	let mut indices = Vec::with_capacity(needle_chars.len());
	let mut score: u16 = 0;
	let mut cursor = 0;

	for needle_char in &needle_chars {
		let Some(offset) = haystack_chars[cursor..].iter().position(|c| c.folded == needle_char.folded) else {
			return (0, indices, false);
		};
		let j = cursor + offset;
		let haystack_char = haystack_chars[j];

		if let Some(&prev) = indices.last() {
			let gap = j - prev - 1;
			if gap > 0 {
				let penalty = scoring.gap_open_penalty + scoring.gap_extend_penalty.saturating_mul((gap - 1).min(u16::MAX as usize) as u16);
				score = score.saturating_sub(penalty);
			}
		}

		let mut gain = scoring.match_score;
		if j == 0 {
			gain += scoring.prefix_bonus;
		} else {
			let prev_char = haystack_chars[j - 1];
			if j == 1 && !prev_char.alphabetic {
				gain += scoring.offset_prefix_bonus;
			}
			let prev_is_delimiter = scoring.delimiters.contains(prev_char.folded);
			let seen_word = haystack_chars[..j - 1].iter().any(|c| !scoring.delimiters.contains(c.folded));
			if prev_is_delimiter && seen_word && !scoring.delimiters.contains(haystack_char.folded) {
				gain += scoring.delimiter_bonus;
			}
			if haystack_char.upper && prev_char.lower {
				gain += scoring.capitalization_bonus;
			}
		}
		if needle_char.upper == haystack_char.upper {
			gain += scoring.matching_case_bonus;
		}

		score = score.saturating_add(gain);
		indices.push(j);
		cursor = j + 1;
	}

	let exact = needle == haystack;
	if exact {
		score = score.saturating_add(scoring.exact_match_bonus);
	}

	(score, indices, exact)
}
