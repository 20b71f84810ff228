//! Scoring rules
//!
//! Every lock is worth a flat bonus regardless of shape, plus a fixed amount
//! per cleared row. There are no levels, combos or multipliers.

/// Points for locking any tetromino
pub const LOCK_POINTS: u32 = 4;

/// Points per cleared row
pub const LINE_POINTS: u32 = 10;

/// Points awarded for one lock that cleared `rows_cleared` rows
pub fn lock_award(rows_cleared: usize) -> u32 {
    let rows = u32::try_from(rows_cleared).unwrap_or(u32::MAX);
    LOCK_POINTS.saturating_add(LINE_POINTS.saturating_mul(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_without_clear() {
        assert_eq!(lock_award(0), 4);
    }

    #[test]
    fn test_single_clear() {
        assert_eq!(lock_award(1), 14);
    }

    #[test]
    fn test_four_rows() {
        assert_eq!(lock_award(4), 44);
    }
}
