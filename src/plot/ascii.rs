//! Text price ladder for terminal output.
//!
//! This is intentionally "dumb" (one fixed-format row per level), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Row markers:
//! - `*golden*` on the 0.500 and 0.618 retracements
//! - `<- retrace` on the level nearest the observed retrace print

use crate::domain::{ImpulseSummary, LevelSet};

struct LadderRow {
    tag: String,
    price: f64,
    golden: bool,
}

/// Render every level as one row, sorted from the highest price down.
pub fn render_price_ladder(
    impulse: &ImpulseSummary,
    retracements: &LevelSet,
    extensions: &LevelSet,
    retrace_price: Option<f64>,
) -> String {
    let mut rows: Vec<LadderRow> = Vec::new();
    for (label, price) in extensions.iter() {
        rows.push(LadderRow {
            tag: format!("ext {label}"),
            price,
            golden: false,
        });
    }
    rows.push(LadderRow {
        tag: "B (impulse end)".to_string(),
        price: impulse.price_end,
        golden: false,
    });
    for (label, price) in retracements.iter() {
        rows.push(LadderRow {
            tag: if label == "1.000" {
                "fib 1.000 (A)".to_string()
            } else {
                format!("fib {label}")
            },
            price,
            golden: label == "0.500" || label == "0.618",
        });
    }
    rows.sort_by(|a, b| {
        b.price
            .partial_cmp(&a.price)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let marker_idx = retrace_price.filter(|rp| rp.is_finite()).and_then(|rp| {
        rows.iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| {
                (x.price - rp)
                    .abs()
                    .partial_cmp(&(y.price - rp).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(idx, _)| idx)
    });

    let mut out = String::new();
    out.push_str(&format!(
        "Ladder: A={:.2} B={:.2} ({})\n",
        impulse.price_start,
        impulse.price_end,
        impulse.direction.label()
    ));
    for (idx, row) in rows.iter().enumerate() {
        let mut line = format!("{:>10.2}  {:<16}", row.price, row.tag);
        if row.golden {
            line.push_str(" *golden*");
        }
        if Some(idx) == marker_idx {
            line.push_str(" <- retrace");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::levels::{extension_levels, retracement_levels};

    fn summary(price_start: f64, price_end: f64) -> ImpulseSummary {
        ImpulseSummary {
            direction: Direction::from_prices(price_start, price_end),
            price_start,
            price_end,
            range_points: (price_end - price_start).abs(),
            bars: 55,
            start_time: None,
            pivot_end_time: None,
        }
    }

    #[test]
    fn ladder_snapshot_up_impulse() {
        let rendered = render_price_ladder(
            &summary(4500.0, 4550.0),
            &retracement_levels(4500.0, 4550.0),
            &extension_levels(4500.0, 4550.0),
            Some(4519.0),
        );
        let expected = concat!(
            "Ladder: A=4500.00 B=4550.00 (up)\n",
            "   4680.90  ext 2.618\n",
            "   4650.00  ext 2.000\n",
            "   4630.90  ext 1.618\n",
            "   4613.60  ext 1.272\n",
            "   4550.00  B (impulse end)\n",
            "   4530.90  fib 0.382\n",
            "   4525.00  fib 0.500        *golden*\n",
            "   4519.10  fib 0.618        *golden* <- retrace\n",
            "   4510.70  fib 0.786\n",
            "   4500.00  fib 1.000 (A)\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn down_impulse_reverses_the_ladder() {
        let rendered = render_price_ladder(
            &summary(4550.0, 4500.0),
            &retracement_levels(4550.0, 4500.0),
            &extension_levels(4550.0, 4500.0),
            None,
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Ladder: A=4550.00 B=4500.00 (down)");
        assert!(lines[1].contains("fib 1.000 (A)"));
        assert!(lines[6].contains("B (impulse end)"));
        assert!(lines[10].contains("ext 2.618"));
        assert!(!rendered.contains("<- retrace"));
    }

    #[test]
    fn retrace_marker_picks_nearest_level() {
        let rendered = render_price_ladder(
            &summary(4500.0, 4550.0),
            &retracement_levels(4500.0, 4550.0),
            &extension_levels(4500.0, 4550.0),
            Some(4531.5),
        );
        let marked: Vec<&str> = rendered
            .lines()
            .filter(|line| line.ends_with("<- retrace"))
            .collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("fib 0.382"));
    }
}
