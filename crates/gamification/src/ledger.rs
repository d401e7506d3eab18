//! Pure XP-to-level arithmetic. Levels span fixed 1000-point bands:
//! level 1 covers XP 0..=999, level 2 covers 1000..=1999, and so on,
//! with no upper bound.

use crate::GamificationError;

pub const XP_PER_LEVEL: i64 = 1000;

/// Level for an XP total: `xp / 1000 + 1`.
pub fn level_for(xp: i64) -> Result<i64, GamificationError> {
    if xp < 0 {
        return Err(GamificationError::InvalidXpAmount(xp));
    }
    Ok(xp / XP_PER_LEVEL + 1)
}

/// XP total at which the level *after* `level` begins, i.e. the amount
/// needed to finish the current band. Pass the current level, not `level + 1`.
pub fn xp_threshold_for_level(level: i64) -> Result<i64, GamificationError> {
    if level < 1 {
        return Err(GamificationError::InvalidLevel(level));
    }
    Ok(level * XP_PER_LEVEL)
}

/// Fraction of the current band completed, in `[0, 1)` when `level`
/// is the level derived from `xp`.
pub fn progress_fraction(xp: i64, level: i64) -> Result<f64, GamificationError> {
    if xp < 0 {
        return Err(GamificationError::InvalidXpAmount(xp));
    }
    if level < 1 {
        return Err(GamificationError::InvalidLevel(level));
    }
    Ok((xp - (level - 1) * XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_band_edges() {
        assert_eq!(level_for(0).unwrap(), 1);
        assert_eq!(level_for(999).unwrap(), 1);
        assert_eq!(level_for(1000).unwrap(), 2);
        assert_eq!(level_for(1999).unwrap(), 2);
        assert_eq!(level_for(2500).unwrap(), 3);
    }

    #[test]
    fn negative_xp_is_rejected() {
        assert!(level_for(-1).is_err());
        assert!(progress_fraction(-5, 1).is_err());
    }

    #[test]
    fn threshold_is_next_level_floor() {
        assert_eq!(xp_threshold_for_level(1).unwrap(), 1000);
        assert_eq!(xp_threshold_for_level(3).unwrap(), 3000);
        assert!(xp_threshold_for_level(0).is_err());
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        for xp in [0, 1, 500, 999, 1000, 1500, 2999, 10_000] {
            let level = level_for(xp).unwrap();
            let fraction = progress_fraction(xp, level).unwrap();
            assert!((0.0..1.0).contains(&fraction), "xp={xp} fraction={fraction}");
        }
    }

    #[test]
    fn progress_at_band_start_is_zero() {
        assert_eq!(progress_fraction(1000, 2).unwrap(), 0.0);
        assert_eq!(progress_fraction(950, 1).unwrap(), 0.95);
    }
}
