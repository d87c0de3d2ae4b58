// density.rs - Viewport area -> petal count
//
// Pure function of area. Randomness belongs to spawning only.

use crate::config::FieldConfig;

/// `round(area / density_factor)` clamped to `[min_count, max_count]`.
///
/// NaN and negative areas count as zero; an infinite area saturates at `max_count`.
pub fn compute_count(area: f64, config: &FieldConfig) -> usize {
    let area = if area.is_nan() { 0.0 } else { area.max(0.0) };
    let raw = (area / config.density_factor).round();

    // `as` saturates, so huge areas land on usize::MAX before the clamp
    (raw as usize).clamp(config.min_count, config.max_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_viewports() {
        let cfg = FieldConfig::default();
        // 1920x1080 -> 41.47
        assert_eq!(compute_count(1920.0 * 1080.0, &cfg), 41);
        // 375x667 phone -> 5, clamped up
        assert_eq!(compute_count(375.0 * 667.0, &cfg), 18);
        // 5120x2880 -> 294.9, clamped down
        assert_eq!(compute_count(5120.0 * 2880.0, &cfg), 75);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let cfg = FieldConfig { min_count: 0, ..FieldConfig::default() };
        assert_eq!(compute_count(25_000.0, &cfg), 1);
        assert_eq!(compute_count(24_999.0, &cfg), 0);
    }

    #[test]
    fn degenerate_areas_clamp_to_minimum() {
        let cfg = FieldConfig::default();
        assert_eq!(compute_count(0.0, &cfg), 18);
        assert_eq!(compute_count(-10.0, &cfg), 18);
        assert_eq!(compute_count(f64::NAN, &cfg), 18);
        assert_eq!(compute_count(f64::NEG_INFINITY, &cfg), 18);
    }

    #[test]
    fn unbounded_areas_saturate_at_maximum() {
        let cfg = FieldConfig::default();
        assert_eq!(compute_count(1e300, &cfg), 75);
        assert_eq!(compute_count(f64::INFINITY, &cfg), 75);
        // 1e200 * 1e200 overflows to +inf
        assert_eq!(compute_count(1e200 * 1e200, &cfg), 75);
    }

    #[test]
    fn same_area_same_count() {
        let cfg = FieldConfig::default();
        assert_eq!(compute_count(1_000_000.0, &cfg), compute_count(1_000_000.0, &cfg));
        assert_eq!(compute_count(1_000_000.0, &cfg), 20);
    }
}
