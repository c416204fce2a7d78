//! Fuzzy matching for short option labels.
//!
//! Scores a needle against haystacks with a Smith-Waterman local alignment using
//! affine gaps, with bonuses for prefix, delimiter and camelCase boundaries. The
//! alignment works on Unicode scalar values with simple case folding, so matched
//! indices are char offsets and can be used to split labels for highlighting.
//!
//! Long haystacks fall back to a greedy left-to-right matcher to bound the
//! size of the score matrix.

mod r#const;
mod limits;
mod one_shot;
pub mod smith_waterman;

pub use r#const::*;
pub use one_shot::{match_indices, match_list};

/// Scoring weights for the alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scoring {
	pub match_score: u16,
	pub mismatch_penalty: u16,
	pub gap_open_penalty: u16,
	pub gap_extend_penalty: u16,
	pub prefix_bonus: u16,
	pub offset_prefix_bonus: u16,
	pub capitalization_bonus: u16,
	pub matching_case_bonus: u16,
	pub exact_match_bonus: u16,
	pub delimiter_bonus: u16,
	/// Characters that start a new "word" for the delimiter bonus.
	pub delimiters: String,
}

impl Default for Scoring {
	fn default() -> Self {
		Self {
			match_score: MATCH_SCORE,
			mismatch_penalty: MISMATCH_PENALTY,
			gap_open_penalty: GAP_OPEN_PENALTY,
			gap_extend_penalty: GAP_EXTEND_PENALTY,
			prefix_bonus: PREFIX_BONUS,
			offset_prefix_bonus: OFFSET_PREFIX_BONUS,
			capitalization_bonus: CAPITALIZATION_BONUS,
			matching_case_bonus: MATCHING_CASE_BONUS,
			exact_match_bonus: EXACT_MATCH_BONUS,
			delimiter_bonus: DELIMITER_BONUS,
			delimiters: DEFAULT_DELIMITERS.to_string(),
		}
	}
}

/// Matcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
	/// Maximum number of needle characters that may go unmatched. `None` disables
	/// the budget, so any positive alignment score is a match.
	pub max_typos: Option<u16>,
	/// Sort matches by descending score, ties by ascending index.
	pub sort: bool,
	pub scoring: Scoring,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			max_typos: Some(0),
			sort: true,
			scoring: Scoring::default(),
		}
	}
}

/// A scored haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
	/// Index of the haystack in the input slice.
	pub index: u32,
	pub score: u16,
	/// The needle equals the haystack exactly (case sensitive).
	pub exact: bool,
}

impl Ord for Match {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		other.score.cmp(&self.score).then_with(|| self.index.cmp(&other.index))
	}
}

impl PartialOrd for Match {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

/// A scored haystack with the char offsets of the matched characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIndices {
	pub score: u16,
	/// Ascending char offsets into the haystack.
	pub indices: Vec<usize>,
	pub exact: bool,
}
