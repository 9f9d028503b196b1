pub mod actions;
pub mod aggregate;
pub mod allocation;
pub mod fire;
pub mod gap;
pub mod goals;
pub mod plan;
pub mod projection;
pub mod risk;
mod snapshot;
pub mod solver;
mod types;

pub use allocation::AllocationChoice;
pub use goals::{Goal, GoalRecord};
pub use plan::{FireSettings, PlanInput, PlanReport, build_plan};
pub use risk::QuizAnswer;
pub use snapshot::DEFAULT_RISK_TOLERANCE;
pub use types::{
    ActionItem, ActionTier, AllocationVector, AssetClass, FinancialSnapshot, GoalBucket,
    Holding, Liability, ReturnBand, RiskCategory,
};
