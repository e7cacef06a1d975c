//! HSE risk assessment on the 5×5 likelihood/consequence matrix.

use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    Rare = 1,
    Unlikely = 2,
    Possible = 3,
    Likely = 4,
    AlmostCertain = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    Insignificant = 1,
    Minor = 2,
    Moderate = 3,
    Major = 4,
    Catastrophic = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl Likelihood {
    pub const ALL: [Likelihood; 5] = [
        Likelihood::Rare,
        Likelihood::Unlikely,
        Likelihood::Possible,
        Likelihood::Likely,
        Likelihood::AlmostCertain,
    ];

    pub fn from_rating(rating: u8) -> Result<Self> {
        validate_range("likelihood", rating, 1, 5)?;
        Ok(Self::ALL[usize::from(rating - 1)])
    }

    pub fn rating(self) -> u8 {
        self as u8
    }
}

impl Consequence {
    pub const ALL: [Consequence; 5] = [
        Consequence::Insignificant,
        Consequence::Minor,
        Consequence::Moderate,
        Consequence::Major,
        Consequence::Catastrophic,
    ];

    pub fn from_rating(rating: u8) -> Result<Self> {
        validate_range("consequence", rating, 1, 5)?;
        Ok(Self::ALL[usize::from(rating - 1)])
    }

    pub fn rating(self) -> u8 {
        self as u8
    }
}

use RiskLevel::{Extreme as E, High as H, Low as L, Medium as M};

/// Rows are likelihood 1..=5, columns consequence 1..=5.
pub const RISK_MATRIX: [[RiskLevel; 5]; 5] = [
    [L, L, L, L, M],
    [L, L, M, M, H],
    [L, M, M, H, E],
    [L, M, H, E, E],
    [M, H, E, E, E],
];

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        }
    }

    /// Days until the assessment must be reviewed again. Extreme risks are
    /// reviewed before work continues.
    pub fn review_interval_days(self) -> u32 {
        match self {
            RiskLevel::Low => 365,
            RiskLevel::Medium => 180,
            RiskLevel::High => 30,
            RiskLevel::Extreme => 0,
        }
    }

    pub fn requires_work_stop(self) -> bool {
        self == RiskLevel::Extreme
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub likelihood: Likelihood,
    pub consequence: Consequence,
    pub score: u8,
    pub level: RiskLevel,
}

pub fn risk_level(likelihood: Likelihood, consequence: Consequence) -> RiskLevel {
    RISK_MATRIX[usize::from(likelihood.rating() - 1)][usize::from(consequence.rating() - 1)]
}

pub fn assess_risk(likelihood: Likelihood, consequence: Consequence) -> RiskAssessment {
    RiskAssessment {
        likelihood,
        consequence,
        score: likelihood.rating() * consequence.rating(),
        level: risk_level(likelihood, consequence),
    }
}

pub fn assess_risk_raw(likelihood: u8, consequence: u8) -> Result<RiskAssessment> {
    Ok(assess_risk(
        Likelihood::from_rating(likelihood)?,
        Consequence::from_rating(consequence)?,
    ))
}
