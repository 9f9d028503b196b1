use serde::{Deserialize, Serialize};

use super::types::{AllocationVector, AssetClass, FinancialSnapshot, GoalBucket, ReturnBand, RiskCategory};

/// Growth share (Equity + US Equity + Crypto) at or above which an allocation reads as Aggressive.
pub const AGGRESSIVE_GROWTH_SHARE: f64 = 60.0;
pub const MODERATE_GROWTH_SHARE: f64 = 35.0;

/// Static expected CAGR band per asset class, in percent.
pub fn expected_cagr(class: AssetClass) -> ReturnBand {
    let (min, max) = match class {
        AssetClass::Equity => (12.0, 15.0),
        AssetClass::UsEquity => (10.0, 12.0),
        AssetClass::Debt => (6.0, 7.0),
        AssetClass::Gold => (8.0, 10.0),
        AssetClass::Reits => (8.0, 10.0),
        AssetClass::Crypto => (15.0, 25.0),
        AssetClass::Cash => (3.0, 4.0),
    };
    ReturnBand { min, max }
}

// Columns: equity, us equity, debt, gold, reits, crypto, cash.
type Row = [f64; 7];

const fn ideal_row(category: RiskCategory, bucket: GoalBucket) -> Row {
    use GoalBucket::*;
    use RiskCategory::*;
    match (category, bucket) {
        (Conservative, ShortTerm) => [0.0, 0.0, 70.0, 20.0, 0.0, 0.0, 10.0],
        (Conservative, MidTerm) => [30.0, 0.0, 50.0, 15.0, 0.0, 0.0, 5.0],
        (Conservative, LongTerm) => [40.0, 10.0, 35.0, 10.0, 5.0, 0.0, 0.0],
        (Moderate, ShortTerm) => [10.0, 0.0, 65.0, 20.0, 0.0, 0.0, 5.0],
        (Moderate, MidTerm) => [50.0, 5.0, 30.0, 10.0, 5.0, 0.0, 0.0],
        (Moderate, LongTerm) => [55.0, 15.0, 20.0, 5.0, 5.0, 0.0, 0.0],
        (Aggressive, ShortTerm) => [20.0, 0.0, 60.0, 15.0, 5.0, 0.0, 0.0],
        (Aggressive, MidTerm) => [60.0, 10.0, 20.0, 5.0, 5.0, 0.0, 0.0],
        (Aggressive, LongTerm) => [60.0, 15.0, 15.0, 5.0, 5.0, 0.0, 0.0],
    }
}

/// Reference mix for a risk category and goal bucket. Zero-weight classes are omitted.
pub fn ideal_allocation(category: RiskCategory, bucket: GoalBucket) -> AllocationVector {
    let row = ideal_row(category, bucket);
    let mut vector = AllocationVector::new();
    for (class, pct) in AssetClass::ALL.into_iter().zip(row) {
        if pct > 0.0 {
            vector.set(class, pct);
        }
    }
    vector
}

/// CAGR band of an allocation using the static per-class table.
pub fn weighted_return(vector: &AllocationVector) -> ReturnBand {
    weighted_return_with(vector, expected_cagr)
}

/// `sum(pct / 100 * class_min)` and `sum(pct / 100 * class_max)`, rounded to one decimal.
pub fn weighted_return_with(
    vector: &AllocationVector,
    class_return: impl Fn(AssetClass) -> ReturnBand,
) -> ReturnBand {
    let (min, max) = vector.iter().fold((0.0, 0.0), |(min, max), (class, pct)| {
        let band = class_return(class);
        (min + pct / 100.0 * band.min, max + pct / 100.0 * band.max)
    });
    ReturnBand {
        min: round_one_decimal(min),
        max: round_one_decimal(max),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn validate_allocation(vector: &AllocationVector) -> bool {
    (vector.total() - 100.0).abs() < 1e-9
}

pub fn infer_category_from_allocation(vector: &AllocationVector) -> RiskCategory {
    let growth: f64 = vector
        .iter()
        .filter(|(class, _)| class.is_growth())
        .map(|(_, pct)| pct)
        .sum();
    if growth >= AGGRESSIVE_GROWTH_SHARE {
        RiskCategory::Aggressive
    } else if growth >= MODERATE_GROWTH_SHARE {
        RiskCategory::Moderate
    } else {
        RiskCategory::Conservative
    }
}

/// Whole-percent share of each investable class in the snapshot's holdings.
/// All classes read 0 when nothing investable is held.
pub fn current_allocation(snapshot: &FinancialSnapshot) -> AllocationVector {
    let total = snapshot.investable_assets();
    let mut vector = AllocationVector::new();
    for class in AssetClass::ALL {
        let pct = if total > 0.0 {
            (snapshot.class_total(class) / total * 100.0).round()
        } else {
            0.0
        };
        vector.set(class, pct);
    }
    vector
}

/// Whether a bucket uses the ideal mix or an allocation the user saved explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "allocation", rename_all = "camelCase")]
pub enum AllocationChoice {
    #[default]
    Default,
    Saved(AllocationVector),
}

impl AllocationChoice {
    pub fn effective(&self, category: RiskCategory, bucket: GoalBucket) -> AllocationVector {
        match self {
            AllocationChoice::Default => ideal_allocation(category, bucket),
            AllocationChoice::Saved(vector) => vector.clone(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, AllocationChoice::Saved(_))
    }
}
