use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Horizon classification derived solely from a goal's year count.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum GoalBucket {
    #[serde(rename = "Short-Term", alias = "short", alias = "shortTerm", alias = "short-term")]
    ShortTerm,
    #[serde(rename = "Mid-Term", alias = "mid", alias = "midTerm", alias = "mid-term")]
    MidTerm,
    #[serde(rename = "Long-Term", alias = "long", alias = "longTerm", alias = "long-term")]
    LongTerm,
}

pub const SHORT_TERM_MAX_YEARS: u32 = 3;
pub const MID_TERM_MAX_YEARS: u32 = 7;

impl GoalBucket {
    pub const ALL: [GoalBucket; 3] = [
        GoalBucket::ShortTerm,
        GoalBucket::MidTerm,
        GoalBucket::LongTerm,
    ];

    pub fn from_years(years: u32) -> Self {
        if years <= SHORT_TERM_MAX_YEARS {
            GoalBucket::ShortTerm
        } else if years <= MID_TERM_MAX_YEARS {
            GoalBucket::MidTerm
        } else {
            GoalBucket::LongTerm
        }
    }

    /// Expected annual return (fraction) used to grow capital earmarked to goals in this bucket.
    pub fn expected_return(self) -> f64 {
        match self {
            GoalBucket::ShortTerm => 0.06,
            GoalBucket::MidTerm => 0.09,
            GoalBucket::LongTerm => 0.11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalBucket::ShortTerm => "Short-Term",
            GoalBucket::MidTerm => "Mid-Term",
            GoalBucket::LongTerm => "Long-Term",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(alias = "conservative")]
    Conservative,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(alias = "aggressive")]
    Aggressive,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [
        RiskCategory::Conservative,
        RiskCategory::Moderate,
        RiskCategory::Aggressive,
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[serde(alias = "Equity")]
    Equity,
    #[serde(alias = "usEquity", alias = "US Equity")]
    UsEquity,
    #[serde(alias = "Debt")]
    Debt,
    #[serde(alias = "Gold")]
    Gold,
    #[serde(alias = "REITs")]
    Reits,
    #[serde(alias = "Crypto")]
    Crypto,
    #[serde(alias = "Cash")]
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 7] = [
        AssetClass::Equity,
        AssetClass::UsEquity,
        AssetClass::Debt,
        AssetClass::Gold,
        AssetClass::Reits,
        AssetClass::Crypto,
        AssetClass::Cash,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equity => "Equity",
            AssetClass::UsEquity => "US Equity",
            AssetClass::Debt => "Debt",
            AssetClass::Gold => "Gold",
            AssetClass::Reits => "REITs",
            AssetClass::Crypto => "Crypto",
            AssetClass::Cash => "Cash",
        }
    }

    /// Classes counted as growth exposure when inferring a risk category from a mix.
    pub fn is_growth(self) -> bool {
        matches!(
            self,
            AssetClass::Equity | AssetClass::UsEquity | AssetClass::Crypto
        )
    }
}

/// Percentage per asset class. Classes absent from the map are treated as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationVector(BTreeMap<AssetClass, f64>);

impl AllocationVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_pairs(pairs: &[(AssetClass, f64)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    pub fn get(&self, class: AssetClass) -> f64 {
        self.0.get(&class).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, class: AssetClass, pct: f64) {
        self.0.insert(class, pct);
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        self.0.iter().map(|(class, pct)| (*class, *pct))
    }

    pub fn classes(&self) -> impl Iterator<Item = AssetClass> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Annual return band in percent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ReturnBand {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub name: String,
    /// `None` for assets outside the investable classes (property, jewellery).
    #[serde(default)]
    pub asset_class: Option<AssetClass>,
    pub value: f64,
    #[serde(default = "default_liquid")]
    pub liquid: bool,
}

fn default_liquid() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct FinancialSnapshot {
    pub age: u32,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub holdings: Vec<Holding>,
    pub liabilities: Vec<Liability>,
    pub risk_tolerance: u32,
    pub life_cover: f64,
    pub health_cover: f64,
}

/// Smaller tier number is strictly higher priority.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ActionTier {
    Milestone = 1,
    RiskMitigation = 2,
    MonetaryOptimization = 3,
}

impl From<ActionTier> for u8 {
    fn from(value: ActionTier) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ActionTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ActionTier::Milestone),
            2 => Ok(ActionTier::RiskMitigation),
            3 => Ok(ActionTier::MonetaryOptimization),
            other => Err(format!("action tier must be 1, 2 or 3, got {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub benefit: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub location: String,
    pub monetary_value: f64,
    /// Urgency on a 1-10 scale.
    pub risk_score: f64,
    pub tier: ActionTier,
    #[serde(default)]
    pub target: String,
}
