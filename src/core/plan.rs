use std::collections::BTreeMap;

use serde::Serialize;

use super::actions::{self, ActionContext};
use super::aggregate::{self, PortfolioAggregate};
use super::allocation::{self, AllocationChoice};
use super::fire::{self, FireInputs, FireMetrics};
use super::gap::{self, AllocationComparison};
use super::goals::{self, Goal, GoalRecord, DEFAULT_STEP_UP_PCT};
use super::projection::percent_to_rate;
use super::risk::{self, QuizAnswer};
use super::types::{
    ActionItem, AllocationVector, FinancialSnapshot, GoalBucket, ReturnBand, RiskCategory,
};

#[derive(Debug, Clone, Copy)]
pub struct FireSettings {
    pub retirement_age: u32,
    pub coast_age: u32,
    pub inflation_pct: f64,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            retirement_age: fire::DEFAULT_RETIREMENT_AGE,
            coast_age: fire::DEFAULT_COAST_AGE,
            inflation_pct: fire::DEFAULT_FIRE_INFLATION * 100.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanInput {
    pub snapshot: FinancialSnapshot,
    pub goals: Vec<GoalRecord>,
    pub quiz: Option<Vec<QuizAnswer>>,
    /// Buckets missing from the map use the ideal allocation.
    pub allocations: BTreeMap<GoalBucket, AllocationChoice>,
    pub completed_actions: Vec<String>,
    /// Replaces the built-in action rules when present.
    pub candidate_actions: Option<Vec<ActionItem>>,
    /// Solve every goal's contribution, not only those already marked solved.
    pub solve_goals: bool,
    pub fire: FireSettings,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskSource {
    Quiz,
    Inferred,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub score: u32,
    pub max_score: u32,
    pub category: RiskCategory,
    pub source: RiskSource,
    /// Category implied by the user's current holdings.
    pub holdings_category: RiskCategory,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    pub total_assets: f64,
    pub liquid_assets: f64,
    pub investable_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub liquid_net_worth: f64,
    pub monthly_surplus: f64,
    pub savings_rate: f64,
    pub emergency_fund_months: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPlan {
    pub bucket: GoalBucket,
    pub ideal: AllocationVector,
    pub effective: AllocationVector,
    pub saved: bool,
    pub expected_return: ReturnBand,
    pub gap: AllocationComparison,
    pub goal_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub risk: RiskSummary,
    pub net_worth: NetWorthSummary,
    pub current_allocation: AllocationVector,
    pub buckets: Vec<BucketPlan>,
    pub goals: Vec<Goal>,
    pub aggregate: PortfolioAggregate,
    pub fire: FireMetrics,
    pub actions: Vec<ActionItem>,
}

/// Derives a full plan from a snapshot. Pure; every call recomputes from its inputs.
pub fn build_plan(input: &PlanInput) -> PlanReport {
    let snapshot = &input.snapshot;

    let mut goals: Vec<Goal> = input.goals.iter().map(Goal::from_record).collect();
    if input.solve_goals {
        for goal in goals.iter_mut().filter(|g| !g.is_solved()) {
            goal.solve_contribution();
        }
    }
    goals::sort_by_priority(&mut goals);

    let quiz = input.quiz.as_deref().filter(|answers| !answers.is_empty());
    let score = risk::score(quiz, snapshot, &goals);
    let category = risk::categorize(score);

    let current = allocation::current_allocation(snapshot);
    let buckets: Vec<BucketPlan> = GoalBucket::ALL
        .into_iter()
        .map(|bucket| bucket_plan(bucket, category, &current, input, &goals))
        .collect();

    let aggregate = aggregate::aggregate(
        &goals,
        snapshot.monthly_surplus(),
        snapshot.investable_assets(),
    );

    let long_term = buckets
        .iter()
        .find(|plan| plan.bucket == GoalBucket::LongTerm)
        .map(|plan| plan.expected_return.min)
        .unwrap_or(0.0);
    let fire = fire::fire_metrics(&FireInputs {
        age: snapshot.age,
        retirement_age: input.fire.retirement_age,
        coast_age: input.fire.coast_age,
        monthly_expenses: snapshot.monthly_expenses,
        monthly_savings: snapshot.monthly_surplus(),
        net_worth: snapshot.net_worth(),
        inflation: percent_to_rate(input.fire.inflation_pct),
        expected_cagr: percent_to_rate(long_term),
        annual_step_up: percent_to_rate(DEFAULT_STEP_UP_PCT),
    });

    // Rebalancing advice targets the bucket of the furthest goal.
    let focus = goals
        .iter()
        .map(Goal::bucket)
        .max()
        .unwrap_or(GoalBucket::LongTerm);
    let comparison = buckets
        .iter()
        .find(|plan| plan.bucket == focus)
        .map(|plan| &plan.gap);
    let candidates = match &input.candidate_actions {
        Some(candidates) => candidates.clone(),
        None => actions::default_candidates(&ActionContext {
            snapshot,
            goals: &goals,
            aggregate: &aggregate,
            comparison: if snapshot.investable_assets() > 0.0 { comparison } else { None },
        }),
    };
    let actions = actions::rank_pending(candidates, &input.completed_actions);

    tracing::debug!(
        score,
        ?category,
        goals = goals.len(),
        actions = actions.len(),
        "built plan"
    );

    PlanReport {
        risk: RiskSummary {
            score,
            max_score: risk::MAX_RISK_SCORE,
            category,
            source: if quiz.is_some() { RiskSource::Quiz } else { RiskSource::Inferred },
            holdings_category: allocation::infer_category_from_allocation(&current),
        },
        net_worth: NetWorthSummary {
            total_assets: snapshot.total_assets(),
            liquid_assets: snapshot.liquid_assets(),
            investable_assets: snapshot.investable_assets(),
            total_liabilities: snapshot.total_liabilities(),
            net_worth: snapshot.net_worth(),
            liquid_net_worth: snapshot.liquid_net_worth(),
            monthly_surplus: snapshot.monthly_surplus(),
            savings_rate: snapshot.savings_rate(),
            emergency_fund_months: snapshot.emergency_fund_months(),
        },
        current_allocation: current,
        buckets,
        goals,
        aggregate,
        fire,
        actions,
    }
}

fn bucket_plan(
    bucket: GoalBucket,
    category: RiskCategory,
    current: &AllocationVector,
    input: &PlanInput,
    goals: &[Goal],
) -> BucketPlan {
    let choice = input.allocations.get(&bucket).cloned().unwrap_or_default();
    let ideal = allocation::ideal_allocation(category, bucket);
    let effective = choice.effective(category, bucket);
    BucketPlan {
        bucket,
        expected_return: allocation::weighted_return(&effective),
        gap: gap::compare(current, &effective),
        saved: choice.is_saved(),
        goal_ids: goals
            .iter()
            .filter(|g| g.bucket() == bucket)
            .map(|g| g.id().to_string())
            .collect(),
        ideal,
        effective,
    }
}
