//! Playbook advice for the manual context flags.

use crate::domain::ContextFlags;

const ADVICE_FVG_GOLDEN: &str =
    "FVG inside 0.5–0.618 → wait for tap for higher‑conviction continuation.";
const ADVICE_FVG_DEEP: &str =
    "Untouched FVG in 0.618–0.786 → expect deeper return before sustained trend.";
const ADVICE_BPR_GOLDEN: &str =
    "BPR overlapping 0.5–0.618 → strong reaction zone (support/resistance).";
const ADVICE_IFVG_DEEP: &str =
    "IFVG near sweep at 0.618–0.786 → trap risk; reversal flip likely if no expansion.";
const ADVICE_BOTH_SWEPT: &str =
    "Both sides swept this hour → time distortion risk; skip until fresh liquidity forms.";
const ADVICE_NONE: &str = "No advanced context flags set.";

/// One line of advice per set flag, in declaration order.
pub fn contextual_advice(flags: ContextFlags) -> String {
    let mut tips: Vec<&str> = Vec::new();
    if flags.fvg_golden {
        tips.push(ADVICE_FVG_GOLDEN);
    }
    if flags.fvg_deep {
        tips.push(ADVICE_FVG_DEEP);
    }
    if flags.bpr_golden {
        tips.push(ADVICE_BPR_GOLDEN);
    }
    if flags.ifvg_deep {
        tips.push(ADVICE_IFVG_DEEP);
    }
    if flags.both_sides_swept {
        tips.push(ADVICE_BOTH_SWEPT);
    }
    if tips.is_empty() {
        tips.push(ADVICE_NONE);
    }
    tips.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_yields_placeholder() {
        assert_eq!(contextual_advice(ContextFlags::default()), ADVICE_NONE);
    }

    #[test]
    fn each_flag_contributes_one_line() {
        let all = ContextFlags {
            fvg_golden: true,
            fvg_deep: true,
            bpr_golden: true,
            ifvg_deep: true,
            both_sides_swept: true,
        };
        let text = contextual_advice(all);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                ADVICE_FVG_GOLDEN,
                ADVICE_FVG_DEEP,
                ADVICE_BPR_GOLDEN,
                ADVICE_IFVG_DEEP,
                ADVICE_BOTH_SWEPT,
            ]
        );
    }

    #[test]
    fn subset_keeps_declaration_order() {
        let flags = ContextFlags {
            bpr_golden: true,
            both_sides_swept: true,
            ..ContextFlags::default()
        };
        let text = contextual_advice(flags);
        assert_eq!(text, format!("{ADVICE_BPR_GOLDEN}\n{ADVICE_BOTH_SWEPT}"));
    }
}
