//! Threshold tables mapping raw ratios to description suffixes and
//! score keys.
//!
//! Lower bounds are exclusive. Percentage bands treat exactly 1 and
//! exactly 0 as their own cases.

use crate::models::ScoreKey;

/// Prefix shared by every description key.
pub const DESCRIPTION_PREFIX: &str = "business_process_summary__";

/// Builds `business_process_summary__<family>_<suffix>`.
pub fn description_key(family: &str, suffix: &str) -> String {
    format!("{}{}_{}", DESCRIPTION_PREFIX, family, suffix)
}

/// Band of a ratio expressed as a share of a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PctBand {
    Full,
    Gt85,
    Gt60,
    Gt40,
    Gt15,
    Gt0,
    Zero,
}

impl PctBand {
    pub fn classify(pct: f64) -> Self {
        if pct == 1.0 {
            PctBand::Full
        } else if pct > 0.85 {
            PctBand::Gt85
        } else if pct > 0.6 {
            PctBand::Gt60
        } else if pct > 0.4 {
            PctBand::Gt40
        } else if pct > 0.15 {
            PctBand::Gt15
        } else if pct > 0.0 {
            PctBand::Gt0
        } else {
            PctBand::Zero
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            PctBand::Full => "100",
            PctBand::Gt85 => "gt_85",
            PctBand::Gt60 => "gt_60",
            PctBand::Gt40 => "gt_40",
            PctBand::Gt15 => "gt_15",
            PctBand::Gt0 => "gt_0",
            PctBand::Zero => "0",
        }
    }

    /// Severity when a higher share is better (scope, automatization).
    pub fn ascending_key(&self) -> ScoreKey {
        match self {
            PctBand::Full | PctBand::Gt85 => ScoreKey::VeryHigh,
            PctBand::Gt60 => ScoreKey::High,
            PctBand::Gt40 => ScoreKey::Medium,
            PctBand::Gt15 => ScoreKey::Low,
            PctBand::Gt0 | PctBand::Zero => ScoreKey::VeryLow,
        }
    }

    /// Severity when a higher share is worse (heterogeneity).
    pub fn descending_key(&self) -> ScoreKey {
        match self {
            PctBand::Full | PctBand::Gt85 => ScoreKey::VeryLow,
            PctBand::Gt60 => ScoreKey::Low,
            PctBand::Gt40 => ScoreKey::Medium,
            PctBand::Gt15 => ScoreKey::High,
            PctBand::Gt0 | PctBand::Zero => ScoreKey::VeryHigh,
        }
    }
}

/// Band of a weighted rating in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    Gt83,
    Gt75,
    Gt58,
    Gt33,
    Gt16,
    Lt16,
}

impl RatingBand {
    pub fn classify(rating: f64) -> Self {
        if rating > 0.833 {
            RatingBand::Gt83
        } else if rating > 0.75 {
            RatingBand::Gt75
        } else if rating > 0.583 {
            RatingBand::Gt58
        } else if rating > 0.333 {
            RatingBand::Gt33
        } else if rating > 0.167 {
            RatingBand::Gt16
        } else {
            RatingBand::Lt16
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            RatingBand::Gt83 => "gt_83",
            RatingBand::Gt75 => "gt_75",
            RatingBand::Gt58 => "gt_58",
            RatingBand::Gt33 => "gt_33",
            RatingBand::Gt16 => "gt_16",
            RatingBand::Lt16 => "lt_16",
        }
    }

    pub fn score_key(&self) -> ScoreKey {
        match self {
            RatingBand::Gt83 => ScoreKey::VeryHigh,
            RatingBand::Gt75 | RatingBand::Gt58 => ScoreKey::High,
            RatingBand::Gt33 => ScoreKey::Medium,
            RatingBand::Gt16 => ScoreKey::Low,
            RatingBand::Lt16 => ScoreKey::VeryLow,
        }
    }
}

/// Band of an entity's user count relative to its peer average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceBand {
    Gt2,
    Gt1_8,
    Gt1_2,
    Gt0_8,
    Gt0_5,
    Lt0_5,
}

impl RelevanceBand {
    /// Compares by multiplication so a zero average never divides.
    pub fn classify(users: f64, avg: f64) -> Self {
        if users > 2.0 * avg {
            RelevanceBand::Gt2
        } else if users > 1.8 * avg {
            RelevanceBand::Gt1_8
        } else if users > 1.2 * avg {
            RelevanceBand::Gt1_2
        } else if users > 0.8 * avg {
            RelevanceBand::Gt0_8
        } else if users > 0.5 * avg {
            RelevanceBand::Gt0_5
        } else {
            RelevanceBand::Lt0_5
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            RelevanceBand::Gt2 => "gt_2",
            RelevanceBand::Gt1_8 => "gt_1.8",
            RelevanceBand::Gt1_2 => "gt_1.2",
            RelevanceBand::Gt0_8 => "gt_0.8",
            RelevanceBand::Gt0_5 => "gt_0.5",
            RelevanceBand::Lt0_5 => "lt_0.5",
        }
    }

    pub fn score_key(&self) -> ScoreKey {
        match self {
            RelevanceBand::Gt2 => ScoreKey::VeryHigh,
            RelevanceBand::Gt1_8 | RelevanceBand::Gt1_2 => ScoreKey::High,
            RelevanceBand::Gt0_8 => ScoreKey::Medium,
            RelevanceBand::Gt0_5 => ScoreKey::Low,
            RelevanceBand::Lt0_5 => ScoreKey::VeryLow,
        }
    }
}
