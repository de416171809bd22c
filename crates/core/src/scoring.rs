//! Scoring module - line clear awards, level and gravity
//!
//! All line awards are multiplied by the level *before* the clearing lock is
//! counted, so clears at level 0 are worth nothing. Drops are never scaled.

use crate::types::{
    Banner, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL,
    SOFT_DROP_POINTS_PER_ROW, TSPIN_DOUBLE_SCORE, TSPIN_TRIPLE_SCORE,
};

/// Result of one line-clearing lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClearAward {
    pub banner: Banner,
    pub points: u32,
}

/// Award for clearing `rows` rows at `level`.
///
/// `t_spin` is only consulted for two- and three-row clears; the caller is
/// responsible for passing false unless the locked piece was a T.
/// Returns None when nothing was cleared.
pub fn line_clear_award(rows: usize, level: u32, t_spin: bool) -> Option<LineClearAward> {
    let (banner, base) = match (rows, t_spin) {
        (2, true) => (Banner::TSpinDouble, TSPIN_DOUBLE_SCORE),
        (3, true) => (Banner::TSpinTriple, TSPIN_TRIPLE_SCORE),
        (1, _) => (Banner::Single, LINE_SCORES[1]),
        (2, _) => (Banner::Double, LINE_SCORES[2]),
        (3, _) => (Banner::Triple, LINE_SCORES[3]),
        (4, _) => (Banner::Tetris, LINE_SCORES[4]),
        _ => return None,
    };
    Some(LineClearAward {
        banner,
        points: base.saturating_mul(level),
    })
}

/// Points for a drop of `rows` rows
pub fn drop_points(rows: u32, is_hard_drop: bool) -> u32 {
    let per_row = if is_hard_drop {
        HARD_DROP_POINTS_PER_ROW
    } else {
        SOFT_DROP_POINTS_PER_ROW
    };
    rows.saturating_mul(per_row)
}

/// Level from total lines: one level per 10 lines, capped at 14
pub fn level_for_lines(total_lines: u32) -> u32 {
    (total_lines / LINES_PER_LEVEL).min(MAX_LEVEL)
}

/// Gravity interval in milliseconds: `(0.8 - level*0.007)^level * 1000`.
///
/// Not monotonic in `level`, and not clamped.
pub fn gravity_interval_ms(level: u32) -> f64 {
    let level = level as f64;
    (0.8 - level * 0.007).powf(level) * 1000.0
}
