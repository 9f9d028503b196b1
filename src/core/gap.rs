use serde::Serialize;

use super::types::{AllocationVector, AssetClass};

/// Percentage points either side of the ideal within which a class counts as balanced.
pub const BALANCE_TOLERANCE_PP: f64 = 2.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AllocationStance {
    Balanced,
    /// Current holding exceeds the ideal.
    Overweight,
    /// Current holding falls short of the ideal.
    Underweight,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGap {
    pub asset_class: AssetClass,
    pub current_pct: f64,
    pub ideal_pct: f64,
    /// `ideal - current`.
    pub delta: f64,
    pub stance: AllocationStance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationComparison {
    pub classes: Vec<ClassGap>,
}

impl AllocationComparison {
    pub fn get(&self, class: AssetClass) -> Option<&ClassGap> {
        self.classes.iter().find(|gap| gap.asset_class == class)
    }

    pub fn is_balanced(&self) -> bool {
        self.classes
            .iter()
            .all(|gap| gap.stance == AllocationStance::Balanced)
    }

    pub fn overweight(&self) -> impl Iterator<Item = &ClassGap> {
        self.with_stance(AllocationStance::Overweight)
    }

    pub fn underweight(&self) -> impl Iterator<Item = &ClassGap> {
        self.with_stance(AllocationStance::Underweight)
    }

    fn with_stance(&self, stance: AllocationStance) -> impl Iterator<Item = &ClassGap> {
        self.classes.iter().filter(move |gap| gap.stance == stance)
    }
}

pub fn classify(delta: f64) -> AllocationStance {
    if delta < -BALANCE_TOLERANCE_PP {
        AllocationStance::Overweight
    } else if delta > BALANCE_TOLERANCE_PP {
        AllocationStance::Underweight
    } else {
        AllocationStance::Balanced
    }
}

/// Compares every class of the ideal vector against the current mix.
/// Classes held but absent from the ideal are not reported.
pub fn compare(current: &AllocationVector, ideal: &AllocationVector) -> AllocationComparison {
    let classes = ideal
        .iter()
        .map(|(asset_class, ideal_pct)| {
            let current_pct = current.get(asset_class);
            let delta = ideal_pct - current_pct;
            ClassGap {
                asset_class,
                current_pct,
                ideal_pct,
                delta,
                stance: classify(delta),
            }
        })
        .collect();
    AllocationComparison { classes }
}
