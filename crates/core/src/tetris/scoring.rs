//! Scoring module - line-clear points, level and speed progression

/// Points for clearing 0..=4 rows with one lock
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 700, 1500];

/// Cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Speed reported at level 1
pub const BASE_SPEED: u32 = 1;

/// Points for clearing `lines` rows at once (0 outside 1..=4)
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Level reached after `total_lines` cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Speed at `level`
pub fn speed_for_level(level: u32) -> u32 {
    BASE_SPEED + level.saturating_sub(1)
}
