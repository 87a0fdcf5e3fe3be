//! Headline bias badge and directional-bias resolution.
//!
//! The badge is a closed decision table over substrings of the fixed
//! assessment vocabulary in `retrace`. First match wins; reversal
//! evidence always outranks continuation.

use crate::domain::{Assessment, BadgeClass, BiasBadge, BiasSide, HtfBias};

pub fn bias_badge(assessment: &Assessment) -> BiasBadge {
    let depth = assessment.price_depth.as_deref().unwrap_or("");
    let speed = assessment.time_speed.as_deref().unwrap_or("");

    if depth.contains("At/through origin")
        || depth.contains(">0.786 — reversal")
        || speed.contains("reversal")
    {
        return badge("Bias: Reversal Risk", BadgeClass::Risk);
    }
    if depth.contains("Golden zone") && speed.contains("healthy") {
        return badge("Bias: Continuation (A‑grade)", BadgeClass::Good);
    }
    if depth.contains("Moderate") && speed.contains("healthy") {
        return badge("Bias: Continuation (B‑grade)", BadgeClass::Good);
    }
    if speed.contains("Fast retrace") || speed.contains("Time not proportionate") {
        return badge("Bias: Caution", BadgeClass::Warn);
    }
    badge("Bias: Mixed", BadgeClass::Mixed)
}

/// Apply the higher-timeframe override, falling back to impulse direction.
pub fn resolve_bias(htf: HtfBias, price_start: f64, price_end: f64) -> BiasSide {
    match htf {
        HtfBias::Bull => BiasSide::Bull,
        HtfBias::Bear => BiasSide::Bear,
        HtfBias::Auto => {
            if price_end >= price_start {
                BiasSide::Bull
            } else {
                BiasSide::Bear
            }
        }
    }
}

fn badge(text: &str, cls: BadgeClass) -> BiasBadge {
    BiasBadge {
        text: text.to_string(),
        cls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::retrace::{
        DEPTH_GOLDEN_618, DEPTH_GOLDEN_HALF, DEPTH_MODERATE, DEPTH_REVERSAL_CONFIRMED,
        DEPTH_REVERSAL_RISK, DEPTH_SHALLOW, INVALIDATION, TIME_AGGRESSIVE, TIME_FAST,
        TIME_HEALTHY, TIME_NOT_PROPORTIONATE, TIME_WEAKNESS,
    };

    fn assessment(depth: Option<&str>, speed: Option<&str>) -> Assessment {
        Assessment {
            price_depth: depth.map(str::to_string),
            time_speed: speed.map(str::to_string),
            invalidation: INVALIDATION.to_string(),
        }
    }

    #[test]
    fn reversal_evidence_wins() {
        for a in [
            assessment(Some(DEPTH_REVERSAL_CONFIRMED), Some(TIME_HEALTHY)),
            assessment(Some(DEPTH_REVERSAL_RISK), None),
            assessment(Some(DEPTH_GOLDEN_HALF), Some(TIME_WEAKNESS)),
            assessment(None, Some(TIME_AGGRESSIVE)),
        ] {
            let b = bias_badge(&a);
            assert_eq!(b.text, "Bias: Reversal Risk");
            assert_eq!(b.cls, BadgeClass::Risk);
        }
    }

    #[test]
    fn golden_and_healthy_grade_a() {
        for depth in [DEPTH_GOLDEN_HALF, DEPTH_GOLDEN_618] {
            let b = bias_badge(&assessment(Some(depth), Some(TIME_HEALTHY)));
            assert_eq!(b.text, "Bias: Continuation (A‑grade)");
            assert_eq!(b.cls, BadgeClass::Good);
        }
    }

    #[test]
    fn moderate_and_healthy_grade_b() {
        let b = bias_badge(&assessment(Some(DEPTH_MODERATE), Some(TIME_HEALTHY)));
        assert_eq!(b.text, "Bias: Continuation (B‑grade)");
        assert_eq!(b.cls, BadgeClass::Good);
    }

    #[test]
    fn fast_or_disproportionate_warns() {
        for speed in [TIME_FAST, TIME_NOT_PROPORTIONATE] {
            let b = bias_badge(&assessment(Some(DEPTH_SHALLOW), Some(speed)));
            assert_eq!(b.text, "Bias: Caution");
            assert_eq!(b.cls, BadgeClass::Warn);
        }
    }

    #[test]
    fn sparse_assessment_is_mixed() {
        let b = bias_badge(&assessment(None, None));
        assert_eq!(b.text, "Bias: Mixed");
        assert_eq!(b.cls, BadgeClass::Mixed);

        // Healthy time alone is not continuation evidence.
        let b = bias_badge(&assessment(Some(DEPTH_SHALLOW), Some(TIME_HEALTHY)));
        assert_eq!(b.text, "Bias: Mixed");
    }

    #[test]
    fn auto_bias_follows_impulse() {
        assert_eq!(resolve_bias(HtfBias::Auto, 4500.0, 4550.0), BiasSide::Bull);
        assert_eq!(resolve_bias(HtfBias::Auto, 4550.0, 4500.0), BiasSide::Bear);
        assert_eq!(resolve_bias(HtfBias::Auto, 4500.0, 4500.0), BiasSide::Bull);
    }

    #[test]
    fn override_ignores_prices() {
        assert_eq!(resolve_bias(HtfBias::Bear, 4500.0, 4550.0), BiasSide::Bear);
        assert_eq!(resolve_bias(HtfBias::Bull, 4550.0, 4500.0), BiasSide::Bull);
    }
}
