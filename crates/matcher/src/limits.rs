/// Upper bound on score matrix cells before falling back to greedy matching.
pub(crate) const MAX_MATRIX_CELLS: usize = 16 * 1024;

#[inline(always)]
pub(crate) fn match_too_large(needle_len: usize, haystack_len: usize) -> bool {
	needle_len.saturating_mul(haystack_len) > MAX_MATRIX_CELLS
}

#[inline(always)]
pub(crate) fn exceeds_typo_budget(max_typos: Option<u16>, needle_len: usize, matched_needle_chars: usize) -> bool {
	max_typos.is_some_and(|max_typos| needle_len.saturating_sub(matched_needle_chars) > max_typos as usize)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn typo_budget_counts_unmatched_needle_chars() {
		assert!(!exceeds_typo_budget(None, 10, 0));
		assert!(!exceeds_typo_budget(Some(0), 4, 4));
		assert!(exceeds_typo_budget(Some(0), 4, 3));
		assert!(!exceeds_typo_budget(Some(1), 4, 3));
	}

	#[test]
	fn matrix_limit_is_on_cell_count() {
		assert!(!match_too_large(4, 64));
		assert!(match_too_large(128, 1024));
	}
}
