//! Scoring module - line clear points, level progression, gravity speed

use crate::types::{
    BASE_GRAVITY_MS, GRAVITY_FLOOR_MS, GRAVITY_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for clearing `rows` lines in one landing.
///
/// More than four rows cannot happen with the standard pieces and scores 0.
pub fn line_clear_score(rows: usize) -> u32 {
    LINE_SCORES.get(rows).copied().unwrap_or(0)
}

/// Level for a running line total. Starts at 1 and goes up every 10 lines.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity period for a level: 1200ms at level 1, 80ms faster per level, never under 500ms.
pub fn gravity_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(GRAVITY_STEP_MS);
    BASE_GRAVITY_MS
        .saturating_sub(speedup)
        .max(GRAVITY_FLOOR_MS)
}
