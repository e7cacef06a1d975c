//! Profit and margin arithmetic shared by PJO costing, JO closing and the
//! finance reports. Amounts are in rupiah; margins are percentages.

use crate::utils::error::Result;
use crate::utils::validation::validate_amount;
use serde::{Deserialize, Serialize};

pub fn net_profit(revenue: f64, direct_cost: f64, overhead: f64) -> f64 {
    revenue - direct_cost - overhead
}

/// Returns 0 when there is no revenue to divide by.
pub fn net_margin(revenue: f64, net_profit: f64) -> f64 {
    if revenue > 0.0 {
        (net_profit / revenue) * 100.0
    } else {
        0.0
    }
}

pub fn gross_profit(revenue: f64, direct_cost: f64) -> f64 {
    revenue - direct_cost
}

pub fn gross_margin(revenue: f64, direct_cost: f64) -> f64 {
    net_margin(revenue, gross_profit(revenue, direct_cost))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginHealth {
    Loss,
    Critical,
    Warning,
    Healthy,
}

impl MarginHealth {
    pub const WARNING_THRESHOLD: f64 = 20.0;
    pub const CRITICAL_THRESHOLD: f64 = 10.0;

    pub fn classify(net_margin: f64) -> Self {
        if net_margin < 0.0 {
            MarginHealth::Loss
        } else if net_margin < Self::CRITICAL_THRESHOLD {
            MarginHealth::Critical
        } else if net_margin < Self::WARNING_THRESHOLD {
            MarginHealth::Warning
        } else {
            MarginHealth::Healthy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarginHealth::Loss => "Loss",
            MarginHealth::Critical => "Critical",
            MarginHealth::Warning => "Warning",
            MarginHealth::Healthy => "Healthy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub revenue: f64,
    pub direct_cost: f64,
    pub overhead: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub gross_profit: f64,
    pub gross_margin: f64,
    pub net_profit: f64,
    pub net_margin: f64,
    pub health: MarginHealth,
}

impl ProfitBreakdown {
    pub fn new(revenue: f64, direct_cost: f64, overhead: f64) -> Self {
        Self {
            revenue,
            direct_cost,
            overhead,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount("revenue", self.revenue)?;
        validate_amount("direct_cost", self.direct_cost)?;
        validate_amount("overhead", self.overhead)?;
        Ok(())
    }

    pub fn net_profit(&self) -> f64 {
        net_profit(self.revenue, self.direct_cost, self.overhead)
    }

    pub fn net_margin(&self) -> f64 {
        net_margin(self.revenue, self.net_profit())
    }

    pub fn summarize(&self) -> ProfitSummary {
        let net_margin = self.net_margin();
        ProfitSummary {
            gross_profit: gross_profit(self.revenue, self.direct_cost),
            gross_margin: gross_margin(self.revenue, self.direct_cost),
            net_profit: self.net_profit(),
            net_margin,
            health: MarginHealth::classify(net_margin),
        }
    }
}

/// Estimated (PJO) against realised (JO) cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetVariance {
    pub amount: f64,
    pub percent: f64,
    pub over_budget: bool,
}

pub fn budget_variance(budgeted: f64, actual: f64) -> BudgetVariance {
    let amount = actual - budgeted;
    let percent = if budgeted > 0.0 {
        (amount / budgeted) * 100.0
    } else {
        0.0
    };
    BudgetVariance {
        amount,
        percent,
        over_budget: amount > 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_net_profit_subtracts_costs() {
        assert_eq!(net_profit(10_000_000.0, 6_000_000.0, 1_500_000.0), 2_500_000.0);
        assert_eq!(net_profit(0.0, 0.0, 0.0), 0.0);
        assert_eq!(net_profit(1_000.0, 800.0, 400.0), -200.0);
    }

    #[test]
    fn test_net_margin_zero_revenue() {
        assert_eq!(net_margin(0.0, 0.0), 0.0);
        assert_eq!(net_margin(0.0, -500.0), 0.0);
    }

    #[test]
    fn test_net_margin_percent() {
        assert_eq!(net_margin(10_000_000.0, 2_500_000.0), 25.0);
        assert_eq!(net_margin(200.0, -50.0), -25.0);
    }

    #[test]
    fn test_net_profit_matches_formula_over_grid() {
        for revenue in [0.0, 1.0, 250.5, 1_000_000.0] {
            for direct in [0.0, 0.25, 300.0] {
                for overhead in [0.0, 10.0, 99.99] {
                    let p = ProfitBreakdown::new(revenue, direct, overhead);
                    assert_eq!(p.net_profit(), revenue - direct - overhead);
                    if revenue > 0.0 {
                        assert_eq!(p.net_margin(), (p.net_profit() / revenue) * 100.0);
                    } else {
                        assert_eq!(p.net_margin(), 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_summary_health() {
        let summary = ProfitBreakdown::new(1_000.0, 600.0, 100.0).summarize();
        assert_eq!(summary.gross_profit, 400.0);
        assert_close(summary.gross_margin, 40.0);
        assert_eq!(summary.net_profit, 300.0);
        assert_close(summary.net_margin, 30.0);
        assert_eq!(summary.health, MarginHealth::Healthy);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(MarginHealth::classify(-0.01), MarginHealth::Loss);
        assert_eq!(MarginHealth::classify(0.0), MarginHealth::Critical);
        assert_eq!(MarginHealth::classify(9.99), MarginHealth::Critical);
        assert_eq!(MarginHealth::classify(10.0), MarginHealth::Warning);
        assert_eq!(MarginHealth::classify(19.99), MarginHealth::Warning);
        assert_eq!(MarginHealth::classify(20.0), MarginHealth::Healthy);
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        assert!(ProfitBreakdown::new(100.0, 50.0, 10.0).validate().is_ok());
        assert!(ProfitBreakdown::new(-1.0, 0.0, 0.0).validate().is_err());
        assert!(ProfitBreakdown::new(1.0, 0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_budget_variance() {
        let over = budget_variance(1_000.0, 1_200.0);
        assert_eq!(over.amount, 200.0);
        assert_close(over.percent, 20.0);
        assert!(over.over_budget);

        let under = budget_variance(1_000.0, 900.0);
        assert_close(under.percent, -10.0);
        assert!(!under.over_budget);

        let no_budget = budget_variance(0.0, 500.0);
        assert_eq!(no_budget.percent, 0.0);
        assert!(no_budget.over_budget);
    }
}
