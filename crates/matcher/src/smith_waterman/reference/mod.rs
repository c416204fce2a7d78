use super::{Folded, fold};
use crate::Scoring;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
	/// Match or substitution; consumes one needle and one haystack char.
	Diag,
	/// Skips a haystack char.
	Up,
	/// Skips a needle char.
	Left,
}

/// Score matrix for one needle/haystack pair, kept for traceback.
#[derive(Debug, Clone)]
pub struct Alignment {
	/// Best score in the last needle row, including the exact match bonus.
	pub score: u16,
	pub exact: bool,
	cells: Vec<u16>,
	moves: Vec<Move>,
	matched: Vec<bool>,
	width: usize,
	height: usize,
	end: Option<usize>,
}

impl Alignment {
	/// Char offsets of the haystack characters on the best alignment path.
	pub fn indices(&self) -> Vec<usize> {
		let mut indices = Vec::new();
		let Some(end) = self.end else {
			return indices;
		};

		let (mut i, mut j) = (self.height - 1, end);
		loop {
			let idx = i * self.width + j;
			if self.cells[idx] == 0 {
				break;
			}
			match self.moves[idx] {
				Move::Diag => {
					if self.matched[idx] {
						indices.push(j);
					}
					if i == 0 || j == 0 {
						break;
					}
					i -= 1;
					j -= 1;
				}
				Move::Up => {
					if j == 0 {
						break;
					}
					j -= 1;
				}
				Move::Left => {
					if i == 0 {
						break;
					}
					i -= 1;
				}
			}
		}

		indices.reverse();
		indices
	}

	/// Needle characters left unmatched by the best path.
	pub fn typos(&self) -> u16 {
		self.height.saturating_sub(self.indices().len()) as u16
	}
}

pub fn smith_waterman(needle: &str, haystack: &str, scoring: &Scoring) -> Alignment {
	align(&fold(needle), &fold(haystack), scoring, needle == haystack)
}

/// Returns `(score, typos, indices, exact)` for the best alignment.
pub fn smith_waterman_with_indices(needle: &str, haystack: &str, scoring: &Scoring) -> (u16, u16, Vec<usize>, bool) {
	let alignment = smith_waterman(needle, haystack, scoring);
	let indices = alignment.indices();
	let typos = needle.chars().count().saturating_sub(indices.len()) as u16;
	(alignment.score, typos, indices, alignment.exact)
}

pub(crate) fn align(needle: &[Folded], haystack: &[Folded], scoring: &Scoring, exact: bool) -> Alignment {
	let height = needle.len();
	let width = haystack.len();
	let mut cells = vec![0u16; height * width];
	let mut moves = vec![Move::Diag; height * width];
	let mut matched = vec![false; height * width];

	for (i, needle_char) in needle.iter().enumerate() {
		let mut prev_haystack_is_delimiter = false;
		let mut prev_haystack_is_lowercase = false;
		let mut delimiter_bonus_enabled = false;

		for (j, haystack_char) in haystack.iter().enumerate() {
			let idx = i * width + j;
			let is_prefix = j == 0;
			let is_offset_prefix = j == 1 && !haystack[0].alphabetic && (i == 0 || cells[(i - 1) * width] == 0);
			let haystack_is_delimiter = scoring.delimiters.contains(haystack_char.folded);

			let diag = if i == 0 || j == 0 { 0 } else { cells[idx - width - 1] };
			let is_match = needle_char.folded == haystack_char.folded;
			let diag_score = if is_match {
				let mut gain = scoring.match_score;
				if is_prefix {
					gain += scoring.prefix_bonus;
				} else if is_offset_prefix {
					gain += scoring.offset_prefix_bonus;
				}
				if prev_haystack_is_delimiter && delimiter_bonus_enabled && !haystack_is_delimiter {
					gain += scoring.delimiter_bonus;
				}
				// ignore capitalization on the prefix
				if !is_prefix && haystack_char.upper && prev_haystack_is_lowercase {
					gain += scoring.capitalization_bonus;
				}
				if needle_char.upper == haystack_char.upper {
					gain += scoring.matching_case_bonus;
				}
				diag.saturating_add(gain)
			} else {
				diag.saturating_sub(scoring.mismatch_penalty)
			};

			let up_score = if j == 0 {
				0
			} else {
				let penalty = if moves[idx - 1] == Move::Up {
					scoring.gap_extend_penalty
				} else {
					scoring.gap_open_penalty
				};
				cells[idx - 1].saturating_sub(penalty)
			};

			let left_score = if i == 0 {
				0
			} else {
				let penalty = if moves[idx - width] == Move::Left {
					scoring.gap_extend_penalty
				} else {
					scoring.gap_open_penalty
				};
				cells[idx - width].saturating_sub(penalty)
			};

			let (score, step) = if diag_score >= up_score && diag_score >= left_score {
				(diag_score, Move::Diag)
			} else if up_score >= left_score {
				(up_score, Move::Up)
			} else {
				(left_score, Move::Left)
			};

			cells[idx] = score;
			moves[idx] = step;
			matched[idx] = is_match && step == Move::Diag;

			prev_haystack_is_lowercase = haystack_char.lower;
			prev_haystack_is_delimiter = haystack_is_delimiter;
			// Only enable delimiter bonus once a non-delimiter char has been seen
			delimiter_bonus_enabled |= !prev_haystack_is_delimiter;
		}
	}

	let mut best = 0;
	let mut end = None;
	if height > 0 {
		let last_row = &cells[(height - 1) * width..];
		for (j, &score) in last_row.iter().enumerate() {
			if score > best {
				best = score;
				end = Some(j);
			}
		}
	}

	let score = if best > 0 && exact {
		best.saturating_add(scoring.exact_match_bonus)
	} else {
		best
	};

	Alignment {
		score,
		exact,
		cells,
		moves,
		matched,
		width,
		height,
		end,
	}
}
