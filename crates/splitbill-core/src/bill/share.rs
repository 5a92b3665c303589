//! How member share cells are entered.
//!
//! Shares are always stored as percentage text. The input mode only decides
//! whether the user types that text or picks one of the preset fractions.

use splitbill_engine::engine::parse_amount;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShareInputMode {
    /// Free-text percentage.
    #[default]
    Percent,
    /// Pick from [`SHARE_FRACTIONS`].
    Fraction,
}

impl ShareInputMode {
    pub fn toggle(self) -> Self {
        match self {
            ShareInputMode::Percent => ShareInputMode::Fraction,
            ShareInputMode::Fraction => ShareInputMode::Percent,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShareInputMode::Percent => "percent",
            ShareInputMode::Fraction => "fraction",
        }
    }
}

impl fmt::Display for ShareInputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShareInputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(ShareInputMode::Percent),
            "fraction" | "frac" => Ok(ShareInputMode::Fraction),
            other => Err(format!("unknown share input mode '{}'", other)),
        }
    }
}

/// A preset share: display label plus the percentage text it stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareFraction {
    pub label: &'static str,
    pub percent: &'static str,
}

pub const SHARE_FRACTIONS: [ShareFraction; 7] = [
    ShareFraction { label: "0", percent: "0" },
    ShareFraction { label: "1/4", percent: "25" },
    ShareFraction { label: "1/3", percent: "33.33" },
    ShareFraction { label: "1/2", percent: "50" },
    ShareFraction { label: "2/3", percent: "66.67" },
    ShareFraction { label: "3/4", percent: "75" },
    ShareFraction { label: "1", percent: "100" },
];

impl ShareFraction {
    /// The preset whose percentage equals the stored value, if any.
    pub fn matching(raw: &str) -> Option<ShareFraction> {
        if raw.trim().is_empty() {
            return None;
        }
        let pct = parse_amount(raw);
        SHARE_FRACTIONS
            .iter()
            .copied()
            .find(|f| parse_amount(f.percent) == pct)
    }

    /// Index of the matching preset, for positioning a picker.
    pub fn index_of(raw: &str) -> Option<usize> {
        let found = Self::matching(raw)?;
        SHARE_FRACTIONS.iter().position(|f| *f == found)
    }
}
