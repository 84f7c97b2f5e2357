//! Pure evaluation of round progress: completion against the solution and
//! position within the time window.
//!
//! Both functions read their arguments only; the engine owns the session and
//! passes flattened views in.

use chrono::{DateTime, Utc};

/// How much of the puzzle has been solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Share of blank cells correctly filled, quantized down to tens.
    pub percent: i64,
    /// True once every cell matches the solution.
    pub is_complete: bool,
}

/// Where the round sits inside its time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStatus {
    /// Elapsed share of the round, rounded to the nearest percent.
    pub percent: i64,
    /// Whole minutes left, rounded up; negative once overdue.
    pub minutes_remaining: i64,
    /// True when no whole minute remains.
    pub is_out_of_time: bool,
}

/// Measures completion of `board` against `solution`.
///
/// Fixed cells are assumed correct (checked at session creation), so
/// `correct - (total - blank_count)` is the number of blanks filled
/// correctly; dividing by `blank_count` yields the share of the actual
/// puzzle solved, floored to the nearest 10%.
pub fn completion(board: &[u8], solution: &[u8], blank_count: usize) -> Completion {
    debug_assert!(blank_count > 0, "generator contract: at least one blank");

    let total = solution.len() as i64;
    let correct = board
        .iter()
        .zip(solution)
        .filter(|(value, expected)| value == expected)
        .count() as i64;
    let blanks = blank_count as i64;

    Completion {
        percent: ((correct + blanks - total) * 10).div_euclid(blanks) * 10,
        is_complete: correct == total,
    }
}

/// Measures elapsed time within the `[start, end)` window at `now`.
pub fn time_status(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> TimeStatus {
    let interval = (end - start).num_milliseconds();
    let elapsed = (now - start).num_milliseconds();
    debug_assert!(interval > 0, "session contract: end is after start");

    let percent = (elapsed as f64 / interval as f64 * 100.0).round() as i64;
    let minutes_remaining = ((interval - elapsed) as f64 / 60_000.0).ceil() as i64;

    TimeStatus {
        percent,
        minutes_remaining,
        is_out_of_time: minutes_remaining <= 0,
    }
}
