//! Fibonacci price levels and bar-count projections.
//!
//! Pure functions over the two impulse anchors. All published prices go
//! through [`round2`], so a level is always a clean 2-decimal number no
//! matter which front end asked for it.

use crate::domain::{ExpectedBarsRange, LevelSet};

/// Retracement ratios with their fixed report labels, in display order.
pub const FIB_RETRACEMENTS: [(&str, f64); 5] = [
    ("0.382", 0.382),
    ("0.500", 0.5),
    ("0.618", 0.618),
    ("0.786", 0.786),
    ("1.000", 1.0),
];

/// Extension ratios with their fixed report labels, in display order.
pub const FIB_EXTENSIONS: [(&str, f64); 4] = [
    ("1.272", 1.272),
    ("1.618", 1.618),
    ("2.000", 2.0),
    ("2.618", 2.618),
];

/// Round to 2 decimals, ties away from zero.
///
/// The epsilon shift keeps values sitting a hair under an exact .005
/// boundary (binary artifacts like `1.00499999...` for `1.005`) from
/// truncating down.
pub fn round2(x: f64) -> f64 {
    ((x + f64::EPSILON) * 100.0).round() / 100.0
}

/// Retracement levels walking back from the impulse end.
///
/// The `1.000` entry lands on the impulse origin.
pub fn retracement_levels(price_start: f64, price_end: f64) -> LevelSet {
    let range = price_end - price_start;
    let mut out = LevelSet::with_capacity(FIB_RETRACEMENTS.len());
    for (label, ratio) in FIB_RETRACEMENTS {
        out.push(label, round2(price_end - ratio * range));
    }
    out
}

/// Extension targets projected beyond the impulse end.
pub fn extension_levels(price_start: f64, price_end: f64) -> LevelSet {
    let range = price_end - price_start;
    let mut out = LevelSet::with_capacity(FIB_EXTENSIONS.len());
    for (label, ratio) in FIB_EXTENSIONS {
        out.push(label, round2(price_end + ratio * range));
    }
    out
}

/// Expected retrace duration at the 0.382/0.5/0.618 time ratios.
///
/// Each bound is rounded to the nearest bar and floored at 1.
pub fn expected_retrace_bars(bars: u32) -> ExpectedBarsRange {
    let scaled = |ratio: f64| ((f64::from(bars) * ratio).round() as u32).max(1);
    ExpectedBarsRange {
        min: scaled(0.382),
        mid: scaled(0.5),
        max: scaled(0.618),
    }
}

/// Price span between the 0.5 and 0.618 retracements, low bound first.
pub fn golden_box(price_start: f64, price_end: f64) -> [f64; 2] {
    zone_box(price_start, price_end, 0.5, 0.618)
}

/// Price span between the 0.618 and 0.786 retracements, low bound first.
pub fn deep_box(price_start: f64, price_end: f64) -> [f64; 2] {
    zone_box(price_start, price_end, 0.618, 0.786)
}

fn zone_box(price_start: f64, price_end: f64, near: f64, far: f64) -> [f64; 2] {
    let range = price_end - price_start;
    let a = round2(price_end - near * range);
    let b = round2(price_end - far * range);
    [a.min(b), a.max(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retracements_up_impulse() {
        let levels = retracement_levels(4500.0, 4550.0);
        assert_eq!(levels.len(), 5);
        assert_eq!(levels.get("0.382"), Some(4530.9));
        assert_eq!(levels.get("0.500"), Some(4525.0));
        assert_eq!(levels.get("0.618"), Some(4519.1));
        assert_eq!(levels.get("0.786"), Some(4510.7));
        assert_eq!(levels.get("1.000"), Some(4500.0));
    }

    #[test]
    fn extensions_up_impulse() {
        let levels = extension_levels(4500.0, 4550.0);
        assert_eq!(levels.get("1.272"), Some(4613.6));
        assert_eq!(levels.get("1.618"), Some(4630.9));
        assert_eq!(levels.get("2.000"), Some(4650.0));
        assert_eq!(levels.get("2.618"), Some(4680.9));
    }

    #[test]
    fn down_impulse_mirrors_up() {
        let levels = retracement_levels(4550.0, 4500.0);
        assert_eq!(levels.get("0.500"), Some(4525.0));
        assert_eq!(levels.get("1.000"), Some(4550.0));
        let ext = extension_levels(4550.0, 4500.0);
        assert_eq!(ext.get("2.000"), Some(4400.0));
    }

    #[test]
    fn degenerate_impulse_collapses_to_end() {
        let levels = retracement_levels(4500.0, 4500.0);
        for (_, price) in levels.iter() {
            assert_eq!(price, 4500.0);
        }
    }

    #[test]
    fn level_set_serializes_in_declaration_order() {
        let json = serde_json::to_string(&retracement_levels(4500.0, 4550.0)).unwrap();
        assert_eq!(
            json,
            r#"{"0.382":4530.9,"0.500":4525.0,"0.618":4519.1,"0.786":4510.7,"1.000":4500.0}"#
        );
    }

    #[test]
    fn full_retracement_recovers_origin() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = rng.gen_range(10_000i64..50_000_000) as f64 / 100.0;
            let b = rng.gen_range(10_000i64..50_000_000) as f64 / 100.0;
            let levels = retracement_levels(a, b);
            let targets = extension_levels(a, b);
            assert_eq!(levels.get("1.000"), Some(round2(a)));
            for (_, price) in levels.iter().chain(targets.iter()) {
                assert!(price.is_finite());
            }
        }
    }

    #[test]
    fn round2_shifts_off_binary_boundaries() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(4519.099_999_999_999), 4519.1);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn expected_bars_round_and_floor() {
        assert_eq!(
            expected_retrace_bars(55),
            ExpectedBarsRange {
                min: 21,
                mid: 28,
                max: 34
            }
        );
        assert_eq!(
            expected_retrace_bars(1),
            ExpectedBarsRange {
                min: 1,
                mid: 1,
                max: 1
            }
        );
    }

    #[test]
    fn expected_bars_ordered_for_any_length() {
        for bars in 1..=500 {
            let exp = expected_retrace_bars(bars);
            assert!(exp.min >= 1);
            assert!(exp.min <= exp.mid);
            assert!(exp.mid <= exp.max);
        }
    }

    #[test]
    fn zone_boxes_ordered_low_high() {
        assert_eq!(golden_box(4500.0, 4550.0), [4519.1, 4525.0]);
        assert_eq!(deep_box(4500.0, 4550.0), [4510.7, 4519.1]);
        // Down impulse flips the raw level order, not the box order.
        assert_eq!(golden_box(4550.0, 4500.0), [4525.0, 4530.9]);
    }
}
