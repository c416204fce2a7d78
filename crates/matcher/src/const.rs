// Default scoring weights. Positive weights are added per matched character,
// penalties are subtracted (saturating) per mismatch or gap.

pub const MATCH_SCORE: u16 = 12;
pub const MISMATCH_PENALTY: u16 = 6;
pub const GAP_OPEN_PENALTY: u16 = 5;
pub const GAP_EXTEND_PENALTY: u16 = 1;

/// Bonus for matching the first character of the haystack.
pub const PREFIX_BONUS: u16 = 12;
/// Bonus for matching the second character when the first is not alphabetic, e.g. `-a`.
pub const OFFSET_PREFIX_BONUS: u16 = 8;
/// Bonus for matching an uppercase character that follows a lowercase one (camelCase boundary).
pub const CAPITALIZATION_BONUS: u16 = 4;
/// Bonus when the needle and haystack characters share the same case.
pub const MATCHING_CASE_BONUS: u16 = 4;
/// Bonus added once when the needle equals the haystack.
pub const EXACT_MATCH_BONUS: u16 = 8;
/// Bonus for matching the first character after a delimiter.
pub const DELIMITER_BONUS: u16 = 4;

pub const DEFAULT_DELIMITERS: &str = " /.,_-:;()[]";
