use super::types::{AssetClass, FinancialSnapshot};

pub const DEFAULT_RISK_TOLERANCE: u32 = 3;

impl FinancialSnapshot {
    pub fn total_assets(&self) -> f64 {
        self.holdings.iter().map(|h| h.value).sum()
    }

    pub fn liquid_assets(&self) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.liquid)
            .map(|h| h.value)
            .sum()
    }

    /// Holdings that belong to one of the investable asset classes.
    pub fn investable_assets(&self) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.asset_class.is_some())
            .map(|h| h.value)
            .sum()
    }

    pub fn class_total(&self, class: AssetClass) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.asset_class == Some(class))
            .map(|h| h.value)
            .sum()
    }

    pub fn total_liabilities(&self) -> f64 {
        self.liabilities.iter().map(|l| l.amount).sum()
    }

    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.total_liabilities()
    }

    pub fn liquid_net_worth(&self) -> f64 {
        self.liquid_assets() - self.total_liabilities()
    }

    /// Monthly amount available to invest; never negative.
    pub fn monthly_surplus(&self) -> f64 {
        (self.monthly_income - self.monthly_expenses).max(0.0)
    }

    /// `(income - expenses) / income` as a fraction, 0 without income.
    pub fn savings_rate(&self) -> f64 {
        if self.monthly_income <= 0.0 {
            return 0.0;
        }
        (self.monthly_income - self.monthly_expenses) / self.monthly_income
    }

    pub fn emergency_fund(&self) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.liquid && h.asset_class == Some(AssetClass::Cash))
            .map(|h| h.value)
            .sum()
    }

    pub fn emergency_fund_months(&self) -> f64 {
        if self.monthly_expenses <= 0.0 {
            return 0.0;
        }
        self.emergency_fund() / self.monthly_expenses
    }

    pub fn has_details(&self) -> bool {
        self.monthly_income > 0.0 || !self.holdings.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::types::{Holding, Liability};

    pub(crate) fn holding(name: &str, class: Option<AssetClass>, value: f64, liquid: bool) -> Holding {
        Holding {
            name: name.to_string(),
            asset_class: class,
            value,
            liquid,
        }
    }

    pub(crate) fn sample_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            age: 32,
            monthly_income: 150_000.0,
            monthly_expenses: 80_000.0,
            holdings: vec![
                holding("Index fund", Some(AssetClass::Equity), 1_100_000.0, true),
                holding("Debt fund", Some(AssetClass::Debt), 400_000.0, true),
                holding("EPF", Some(AssetClass::Debt), 200_000.0, false),
                holding("SGB", Some(AssetClass::Gold), 200_000.0, false),
                holding("REIT", Some(AssetClass::Reits), 100_000.0, true),
                holding("Savings", Some(AssetClass::Cash), 0.0, true),
                holding("Flat", None, 5_000_000.0, false),
            ],
            liabilities: vec![Liability {
                name: "Home loan".to_string(),
                amount: 3_000_000.0,
            }],
            risk_tolerance: DEFAULT_RISK_TOLERANCE,
            life_cover: 0.0,
            health_cover: 500_000.0,
        }
    }

    #[test]
    fn aggregates_assets_and_liabilities() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.total_assets(), 7_000_000.0);
        assert_eq!(snapshot.investable_assets(), 2_000_000.0);
        assert_eq!(snapshot.liquid_assets(), 1_600_000.0);
        assert_eq!(snapshot.total_liabilities(), 3_000_000.0);
        assert_eq!(snapshot.net_worth(), 4_000_000.0);
        assert_eq!(snapshot.liquid_net_worth(), -1_400_000.0);
        assert_eq!(snapshot.class_total(AssetClass::Debt), 600_000.0);
    }

    #[test]
    fn savings_and_emergency_ratios_guard_zero_denominators() {
        let mut snapshot = sample_snapshot();
        assert!((snapshot.savings_rate() - 70_000.0 / 150_000.0).abs() < 1e-12);
        assert_eq!(snapshot.monthly_surplus(), 70_000.0);

        snapshot.monthly_income = 0.0;
        snapshot.monthly_expenses = 0.0;
        assert_eq!(snapshot.savings_rate(), 0.0);
        assert_eq!(snapshot.emergency_fund_months(), 0.0);

        snapshot.monthly_expenses = 50_000.0;
        assert_eq!(snapshot.monthly_surplus(), 0.0);
        snapshot.holdings.push(holding("Cash", Some(AssetClass::Cash), 200_000.0, true));
        assert_eq!(snapshot.emergency_fund_months(), 4.0);
    }
}
