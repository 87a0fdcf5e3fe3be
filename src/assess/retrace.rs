//! Price-depth and time-speed assessment of a retrace.
//!
//! Both assessments emit sentences from a fixed vocabulary. The badge
//! logic in `bias` pattern-matches on these strings, so the wording is
//! load-bearing and must not drift.

use crate::domain::Assessment;

pub const DEPTH_SHALLOW: &str = "Shallow (<0.382) — imbalance risk / may chop";
pub const DEPTH_MODERATE: &str = "Moderate (0.382–0.5) — OK if time aligns";
pub const DEPTH_GOLDEN_HALF: &str = "Golden zone (≈0.5) — strong if time aligns";
pub const DEPTH_GOLDEN_618: &str = "Golden zone (≈0.618) — strong if time aligns";
pub const DEPTH_REVERSAL_RISK: &str = ">0.786 — reversal risk unless reclaimed";
pub const DEPTH_REVERSAL_CONFIRMED: &str = "At/through origin (≥1.0) — reversal confirmed/likely";

pub const TIME_AGGRESSIVE: &str = "Deep retrace in <0.3× impulse time — aggressive reversal risk";
pub const TIME_FAST: &str = "Fast retrace — needs structure/trigger to validate continuation";
pub const TIME_HEALTHY: &str = "Retrace time ≈ 0.382–0.618× impulse — healthy";
pub const TIME_WEAKNESS: &str = "Retrace time > impulse time without expansion — reversal/weakness risk";
pub const TIME_NOT_PROPORTIONATE: &str = "Time not proportionate — caution";

pub const INVALIDATION: &str = "Close beyond 0.786 against setup biases reversal. | Close through origin (1.0) confirms reversal.";

/// Classify how deep and how fast the retrace has run.
///
/// Depth is `|price_end - retrace| / |impulse range|` with the range
/// floored at a tiny epsilon; each band excludes its upper bound. The
/// time ratio is `retrace_bars / impulse_bars`. Missing observations
/// simply drop the matching assessment line.
pub fn analyze_retrace(
    price_start: f64,
    price_end: f64,
    retrace_price: Option<f64>,
    impulse_bars: u32,
    retrace_bars: Option<u32>,
) -> Assessment {
    let range = (price_end - price_start).abs().max(1e-9);
    let depth = retrace_price
        .filter(|rp| rp.is_finite())
        .map(|rp| (price_end - rp).abs() / range);

    let price_depth = depth.map(|d| {
        if d < 0.382 {
            DEPTH_SHALLOW
        } else if d < 0.5 {
            DEPTH_MODERATE
        } else if d < 0.618 {
            DEPTH_GOLDEN_HALF
        } else if d < 0.786 {
            DEPTH_GOLDEN_618
        } else if d < 1.0 {
            DEPTH_REVERSAL_RISK
        } else {
            DEPTH_REVERSAL_CONFIRMED
        }
        .to_string()
    });

    let time_speed = retrace_bars.map(|rb| {
        let ratio = f64::from(rb) / f64::from(impulse_bars.max(1));
        if ratio < 0.3 && depth.is_some_and(|d| d >= 0.618) {
            TIME_AGGRESSIVE
        } else if ratio < 0.3 {
            TIME_FAST
        } else if (0.382..=0.618).contains(&ratio) {
            TIME_HEALTHY
        } else if ratio > 1.0 {
            TIME_WEAKNESS
        } else {
            TIME_NOT_PROPORTIONATE
        }
        .to_string()
    });

    Assessment {
        price_depth,
        time_speed,
        invalidation: INVALIDATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_label(retrace_price: f64) -> String {
        // A 1000-point impulse keeps depth ratios exactly representable.
        analyze_retrace(0.0, 1000.0, Some(retrace_price), 60, None)
            .price_depth
            .unwrap()
    }

    #[test]
    fn depth_bands_exclude_upper_bound() {
        assert_eq!(depth_label(900.0), DEPTH_SHALLOW);
        assert_eq!(depth_label(618.0), DEPTH_MODERATE); // depth exactly 0.382
        assert_eq!(depth_label(550.0), DEPTH_MODERATE);
        assert_eq!(depth_label(500.0), DEPTH_GOLDEN_HALF); // depth exactly 0.5
        assert_eq!(depth_label(450.0), DEPTH_GOLDEN_HALF);
        assert_eq!(depth_label(382.0), DEPTH_GOLDEN_618); // depth exactly 0.618
        assert_eq!(depth_label(300.0), DEPTH_GOLDEN_618);
        assert_eq!(depth_label(214.0), DEPTH_REVERSAL_RISK); // depth exactly 0.786
        assert_eq!(depth_label(100.0), DEPTH_REVERSAL_RISK);
        assert_eq!(depth_label(0.0), DEPTH_REVERSAL_CONFIRMED);
        assert_eq!(depth_label(-100.0), DEPTH_REVERSAL_CONFIRMED);
    }

    #[test]
    fn depth_beyond_origin_counts_from_end() {
        // Retrace through the far side of the end also reads as depth.
        assert_eq!(depth_label(2100.0), DEPTH_REVERSAL_CONFIRMED);
    }

    #[test]
    fn time_bands_follow_ratio() {
        let speed = |rb: u32| {
            analyze_retrace(4500.0, 4550.0, None, 100, Some(rb))
                .time_speed
                .unwrap()
        };
        assert_eq!(speed(20), TIME_FAST);
        assert_eq!(speed(40), TIME_HEALTHY);
        assert_eq!(speed(50), TIME_HEALTHY);
        assert_eq!(speed(35), TIME_NOT_PROPORTIONATE);
        assert_eq!(speed(70), TIME_NOT_PROPORTIONATE);
        assert_eq!(speed(100), TIME_NOT_PROPORTIONATE);
        assert_eq!(speed(110), TIME_WEAKNESS);
    }

    #[test]
    fn healthy_band_includes_both_bounds() {
        let speed = |rb: u32| {
            analyze_retrace(0.0, 1000.0, None, 1000, Some(rb))
                .time_speed
                .unwrap()
        };
        assert_eq!(speed(382), TIME_HEALTHY);
        assert_eq!(speed(618), TIME_HEALTHY);
    }

    #[test]
    fn fast_retrace_turns_aggressive_when_deep() {
        let deep = analyze_retrace(0.0, 1000.0, Some(300.0), 100, Some(20));
        assert_eq!(deep.time_speed.as_deref(), Some(TIME_AGGRESSIVE));

        let shallow = analyze_retrace(0.0, 1000.0, Some(700.0), 100, Some(20));
        assert_eq!(shallow.time_speed.as_deref(), Some(TIME_FAST));
    }

    #[test]
    fn missing_observations_drop_lines() {
        let out = analyze_retrace(4500.0, 4550.0, None, 55, None);
        assert!(out.price_depth.is_none());
        assert!(out.time_speed.is_none());
        assert_eq!(out.invalidation, INVALIDATION);
    }

    #[test]
    fn nan_retrace_price_reads_as_absent() {
        let out = analyze_retrace(4500.0, 4550.0, Some(f64::NAN), 55, None);
        assert!(out.price_depth.is_none());
    }

    #[test]
    fn float_noise_at_the_shallow_boundary() {
        // 200 - 161.8 lands a hair under 38.2 in binary, so the depth
        // ratio sits just below 0.382 and stays in the shallow band.
        let out = analyze_retrace(100.0, 200.0, Some(161.8), 55, None);
        assert_eq!(out.price_depth.as_deref(), Some(DEPTH_SHALLOW));
    }

    #[test]
    fn zero_range_impulse_does_not_divide_by_zero() {
        let out = analyze_retrace(4500.0, 4500.0, Some(4490.0), 55, Some(20));
        assert_eq!(out.price_depth.as_deref(), Some(DEPTH_REVERSAL_CONFIRMED));
    }
}
