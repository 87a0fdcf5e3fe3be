use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Impulse direction inferred from the two anchor prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Up when the impulse ends at or above where it started.
    pub fn from_prices(price_start: f64, price_end: f64) -> Self {
        if price_end >= price_start {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Higher-timeframe bias override. `Auto` falls back to the impulse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HtfBias {
    #[default]
    Auto,
    Bull,
    Bear,
}

impl HtfBias {
    pub fn label(self) -> &'static str {
        match self {
            HtfBias::Auto => "auto",
            HtfBias::Bull => "bull",
            HtfBias::Bear => "bear",
        }
    }
}

impl std::fmt::Display for HtfBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved directional bias, with any `Auto` override already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasSide {
    Bull,
    Bear,
}

impl BiasSide {
    pub fn label(self) -> &'static str {
        match self {
            BiasSide::Bull => "bull",
            BiasSide::Bear => "bear",
        }
    }
}

/// Direction hint for the gap overlap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GapSide {
    Bullish,
    Bearish,
}

impl GapSide {
    pub fn label(self) -> &'static str {
        match self {
            GapSide::Bullish => "bullish",
            GapSide::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for GapSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Session presets for the "now" clock field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPreset {
    /// Pre-market macro window.
    Pre,
    /// Cash open.
    Open,
    /// Mid-morning.
    Mid,
    /// Lunch lull.
    Lunch,
    /// Afternoon session.
    Pm,
    /// Into the close.
    Close,
}

impl SessionPreset {
    pub const ALL: [SessionPreset; 6] = [
        SessionPreset::Pre,
        SessionPreset::Open,
        SessionPreset::Mid,
        SessionPreset::Lunch,
        SessionPreset::Pm,
        SessionPreset::Close,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SessionPreset::Pre => "pre",
            SessionPreset::Open => "open",
            SessionPreset::Mid => "mid",
            SessionPreset::Lunch => "lunch",
            SessionPreset::Pm => "pm",
            SessionPreset::Close => "close",
        }
    }

    /// Clock time the preset writes into the "now" field.
    pub fn now_hint(self) -> &'static str {
        match self {
            SessionPreset::Pre => "08:15",
            SessionPreset::Open => "09:55",
            SessionPreset::Mid => "10:55",
            SessionPreset::Lunch => "12:15",
            SessionPreset::Pm => "13:55",
            SessionPreset::Close => "15:15",
        }
    }
}

/// Severity class attached to badges and quality summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeClass {
    Risk,
    Good,
    Warn,
    Mixed,
}

impl BadgeClass {
    pub fn label(self) -> &'static str {
        match self {
            BadgeClass::Risk => "risk",
            BadgeClass::Good => "good",
            BadgeClass::Warn => "warn",
            BadgeClass::Mixed => "mixed",
        }
    }
}

/// Manual liquidity/structure observations supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextFlags {
    /// FVG sits inside the 0.5-0.618 zone.
    pub fvg_golden: bool,
    /// Untouched FVG sits in the 0.618-0.786 zone.
    pub fvg_deep: bool,
    /// BPR overlaps the 0.5-0.618 zone.
    pub bpr_golden: bool,
    /// IFVG near a sweep at 0.618-0.786.
    pub ifvg_deep: bool,
    /// Both sides of liquidity were swept this hour.
    pub both_sides_swept: bool,
}

/// Ordered ratio-label to price mapping.
///
/// Keeps the declaration order of the ratio tables so reports and JSON
/// exports always list levels the same way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSet {
    entries: Vec<(&'static str, f64)>,
}

impl LevelSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: &'static str, price: f64) {
        self.entries.push((label, price));
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, price)| *price)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().map(|(label, price)| (*label, *price))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LevelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, price) in &self.entries {
            map.serialize_entry(label, price)?;
        }
        map.end()
    }
}

/// Expected retrace duration in bars at the 0.382/0.5/0.618 time ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpectedBarsRange {
    pub min: u32,
    pub mid: u32,
    pub max: u32,
}

/// One Fibonacci minute count projected forward from the pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeCount {
    pub count: u32,
    /// Projected clock in `HH:MM`, absent when the pivot did not parse.
    pub clock: Option<String>,
}

/// Price-depth and time-speed assessment of the retrace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_depth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_speed: Option<String>,
    pub invalidation: String,
}

/// A single scored criterion: an automatic pass/fail or a manual note.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Flag(bool),
    Note(String),
}

/// Outcome of the A+ setup checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Number of automatic criteria that passed, out of 7.
    pub score: u8,
    /// Criterion id to value, ordered by the numeric id prefix.
    pub details: BTreeMap<String, CriterionValue>,
}

/// Headline bias badge derived from the assessment labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasBadge {
    pub text: String,
    pub cls: BadgeClass,
}

/// Echo of the analyzed impulse with normalized times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpulseSummary {
    pub direction: Direction,
    pub price_start: f64,
    pub price_end: f64,
    pub range_points: f64,
    pub bars: u32,
    pub start_time: Option<String>,
    pub pivot_end_time: Option<String>,
}

/// Everything the analysis pipeline needs for one run.
///
/// Clock fields carry the raw user text; parsing happens inside the
/// pipeline so the TUI and CLI validate the same way.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub price_start: f64,
    pub price_end: f64,
    /// Explicit impulse length. Overridden when both clock times parse.
    pub bars: Option<u32>,
    pub start_time: String,
    pub pivot_time: String,
    pub retrace_price: Option<f64>,
    pub retrace_bars: Option<u32>,
    /// Falls back to the pivot time when blank.
    pub now_time: String,
    pub tol_bars: u32,
    pub htf_bias: HtfBias,
    pub flags: ContextFlags,
}
