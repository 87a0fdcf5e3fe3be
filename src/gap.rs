//! Interval overlap between a price gap and the prime retrace zones.

use serde::Serialize;

use crate::levels::{deep_box, golden_box};

/// Overlap between two closed price intervals.
///
/// Touching endpoints count as no overlap, so `len` is zero exactly when
/// the bounds are absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlap {
    pub len: f64,
    pub lo: Option<f64>,
    pub hi: Option<f64>,
}

pub fn overlap(a: [f64; 2], b: [f64; 2]) -> Overlap {
    let lo = a[0].max(b[0]);
    let hi = a[1].min(b[1]);
    if hi > lo {
        Overlap {
            len: hi - lo,
            lo: Some(lo),
            hi: Some(hi),
        }
    } else {
        Overlap {
            len: 0.0,
            lo: None,
            hi: None,
        }
    }
}

/// A gap checked against the golden and deep retrace boxes of an impulse.
#[derive(Debug, Clone, Serialize)]
pub struct GapAnalysis {
    pub golden_box: [f64; 2],
    pub deep_box: [f64; 2],
    pub gap: [f64; 2],
    pub golden: Overlap,
    pub deep: Overlap,
}

/// Normalize the gap bounds and intersect with both boxes.
pub fn analyze_gap(price_start: f64, price_end: f64, gap_top: f64, gap_bottom: f64) -> GapAnalysis {
    let golden_box = golden_box(price_start, price_end);
    let deep_box = deep_box(price_start, price_end);
    let gap = [gap_top.min(gap_bottom), gap_top.max(gap_bottom)];
    GapAnalysis {
        golden: overlap(golden_box, gap),
        deep: overlap(deep_box, gap),
        golden_box,
        deep_box,
        gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overlap() {
        let o = overlap([10.0, 20.0], [15.0, 25.0]);
        assert_eq!(o.len, 5.0);
        assert_eq!(o.lo, Some(15.0));
        assert_eq!(o.hi, Some(20.0));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let o = overlap([10.0, 20.0], [20.0, 30.0]);
        assert_eq!(o.len, 0.0);
        assert_eq!(o.lo, None);
        assert_eq!(o.hi, None);
    }

    #[test]
    fn disjoint_intervals() {
        let o = overlap([10.0, 20.0], [30.0, 40.0]);
        assert_eq!(o.len, 0.0);
        assert!(o.lo.is_none() && o.hi.is_none());
    }

    #[test]
    fn containment_clips_to_inner() {
        let o = overlap([10.0, 30.0], [15.0, 20.0]);
        assert_eq!(o.len, 5.0);
        assert_eq!(o.lo, Some(15.0));
        assert_eq!(o.hi, Some(20.0));
    }

    #[test]
    fn gap_bounds_accepted_in_either_order() {
        let a = analyze_gap(4500.0, 4550.0, 4521.0, 4515.0);
        let b = analyze_gap(4500.0, 4550.0, 4515.0, 4521.0);
        assert_eq!(a.gap, [4515.0, 4521.0]);
        assert_eq!(a.gap, b.gap);
        assert_eq!(a.golden, b.golden);
    }

    #[test]
    fn gap_straddling_both_boxes() {
        let ga = analyze_gap(4500.0, 4550.0, 4521.0, 4515.0);
        assert_eq!(ga.golden_box, [4519.1, 4525.0]);
        assert_eq!(ga.deep_box, [4510.7, 4519.1]);
        assert!((ga.golden.len - 1.9).abs() < 1e-9);
        assert_eq!(ga.golden.lo, Some(4519.1));
        assert_eq!(ga.golden.hi, Some(4521.0));
        assert!((ga.deep.len - 4.1).abs() < 1e-9);
    }

    #[test]
    fn gap_clear_of_both_boxes() {
        let ga = analyze_gap(4500.0, 4550.0, 4545.0, 4540.0);
        assert_eq!(ga.golden.len, 0.0);
        assert_eq!(ga.deep.len, 0.0);
    }
}
