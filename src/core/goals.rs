use serde::{Deserialize, Serialize};

use super::projection::{percent_to_rate, project};
use super::solver::{self, StepUpSolveConfig, StepUpSolveResult};
use super::types::GoalBucket;

pub const DEFAULT_HORIZON_YEARS: u32 = 1;
pub const DEFAULT_INFLATION_PCT: f64 = 6.0;
pub const DEFAULT_STEP_UP_PCT: f64 = 10.0;

/// A funding goal. Future cost is recomputed on every edit to a field it depends on,
/// and any edit clears the solved contribution until it is solved again.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    id: String,
    name: String,
    priority: u32,
    horizon_years: u32,
    cost_today: f64,
    allocated_today: f64,
    inflation_pct: f64,
    step_up_pct: f64,
    future_cost: f64,
    monthly_contribution: f64,
    contribution_solved: bool,
}

/// Persisted goal fields. Derived values are never read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_horizon", alias = "timeYears", alias = "years")]
    pub horizon_years: u32,
    #[serde(default, alias = "amount", alias = "amountRequiredToday")]
    pub cost_today: f64,
    #[serde(default, alias = "amountAvailableToday")]
    pub allocated_today: f64,
    #[serde(default = "default_inflation", alias = "goalInflation")]
    pub inflation_pct: f64,
    #[serde(default = "default_step_up", alias = "stepUp")]
    pub step_up_pct: f64,
    #[serde(default)]
    pub sip_calculated: bool,
}

fn default_priority() -> u32 {
    1
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_YEARS
}

fn default_inflation() -> f64 {
    DEFAULT_INFLATION_PCT
}

fn default_step_up() -> f64 {
    DEFAULT_STEP_UP_PCT
}

impl Goal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut goal = Self {
            id: id.into(),
            name: name.into(),
            priority: 1,
            horizon_years: DEFAULT_HORIZON_YEARS,
            cost_today: 0.0,
            allocated_today: 0.0,
            inflation_pct: DEFAULT_INFLATION_PCT,
            step_up_pct: DEFAULT_STEP_UP_PCT,
            future_cost: 0.0,
            monthly_contribution: 0.0,
            contribution_solved: false,
        };
        goal.invalidate();
        goal
    }

    /// Rebuilds a goal from storage. A record flagged as solved is solved again
    /// rather than trusting any stored contribution.
    pub fn from_record(record: &GoalRecord) -> Self {
        let mut goal = Goal::new(record.id.clone(), record.name.clone());
        goal.priority = record.priority;
        goal.horizon_years = record.horizon_years;
        goal.cost_today = record.cost_today;
        goal.allocated_today = record.allocated_today;
        goal.inflation_pct = record.inflation_pct;
        goal.step_up_pct = record.step_up_pct;
        goal.invalidate();
        if record.sip_calculated {
            goal.solve_contribution();
        }
        goal
    }

    pub fn to_record(&self) -> GoalRecord {
        GoalRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            priority: self.priority,
            horizon_years: self.horizon_years,
            cost_today: self.cost_today,
            allocated_today: self.allocated_today,
            inflation_pct: self.inflation_pct,
            step_up_pct: self.step_up_pct,
            sip_calculated: self.contribution_solved,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    pub fn cost_today(&self) -> f64 {
        self.cost_today
    }

    pub fn allocated_today(&self) -> f64 {
        self.allocated_today
    }

    pub fn inflation_pct(&self) -> f64 {
        self.inflation_pct
    }

    pub fn step_up_pct(&self) -> f64 {
        self.step_up_pct
    }

    pub fn future_cost(&self) -> f64 {
        self.future_cost
    }

    /// Zero until solved; check [`Goal::is_solved`] to tell an unsolved goal from a funded one.
    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn is_solved(&self) -> bool {
        self.contribution_solved
    }

    pub fn bucket(&self) -> GoalBucket {
        GoalBucket::from_years(self.horizon_years)
    }

    pub fn expected_return(&self) -> f64 {
        self.bucket().expected_return()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    pub fn set_horizon_years(&mut self, years: u32) {
        self.horizon_years = years;
        self.invalidate();
    }

    pub fn set_cost_today(&mut self, cost: f64) {
        self.cost_today = cost;
        self.invalidate();
    }

    pub fn set_allocated_today(&mut self, allocated: f64) {
        self.allocated_today = allocated;
        self.invalidate();
    }

    pub fn set_inflation_pct(&mut self, pct: f64) {
        self.inflation_pct = pct;
        self.invalidate();
    }

    pub fn set_step_up_pct(&mut self, pct: f64) {
        self.step_up_pct = pct;
        self.invalidate();
    }

    /// Solves the monthly contribution for the current future cost and marks the goal solved.
    pub fn solve_contribution(&mut self) -> StepUpSolveResult {
        let result = solver::solve_with_config(
            self.future_cost,
            self.horizon_years,
            self.expected_return(),
            percent_to_rate(self.step_up_pct),
            StepUpSolveConfig::default(),
        );
        self.monthly_contribution = result.monthly_contribution;
        self.contribution_solved = true;
        result
    }

    fn invalidate(&mut self) {
        self.future_cost = resolve_gap(self, self.expected_return());
        self.monthly_contribution = 0.0;
        self.contribution_solved = false;
    }
}

/// Inflation-adjusted cost of `goal` at its horizon, net of the projected value of
/// capital already earmarked to it. Never negative.
pub fn resolve_gap(goal: &Goal, expected_return: f64) -> f64 {
    if goal.cost_today <= 0.0 || goal.horizon_years == 0 {
        return 0.0;
    }
    let years = goal.horizon_years as f64;
    let inflated = project(goal.cost_today, percent_to_rate(goal.inflation_pct), years);
    if goal.allocated_today > 0.0 {
        let grown = project(goal.allocated_today, expected_return, years);
        (inflated - grown).max(0.0)
    } else {
        inflated
    }
}

/// Orders goals by priority rank (lower first), then by name.
pub fn sort_by_priority(goals: &mut [Goal]) {
    goals.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.name.cmp(&b.name))
    });
}
