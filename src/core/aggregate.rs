use serde::Serialize;

use super::goals::Goal;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAggregate {
    pub goal_count: usize,
    pub solved_goal_count: usize,
    pub total_required_monthly: f64,
    pub total_future_cost: f64,
    pub total_allocated: f64,
    pub investable_capital: f64,
    /// Negative when more capital is earmarked to goals than exists.
    pub remaining_investable: f64,
    pub monthly_capacity: f64,
    /// Negative when the solved contributions exceed monthly capacity.
    pub monthly_surplus: f64,
    pub capacity_utilization_pct: f64,
    pub over_allocated: bool,
    pub over_subscribed: bool,
}

/// Sums goal requirements against investable capacity. Unsolved goals add nothing
/// to the required contribution but still count toward allocated capital.
pub fn aggregate(goals: &[Goal], monthly_capacity: f64, investable_capital: f64) -> PortfolioAggregate {
    let mut total_required_monthly = 0.0;
    let mut total_future_cost = 0.0;
    let mut total_allocated = 0.0;
    let mut solved_goal_count = 0;
    for goal in goals {
        if goal.is_solved() {
            total_required_monthly += goal.monthly_contribution();
            solved_goal_count += 1;
        }
        total_future_cost += goal.future_cost();
        total_allocated += goal.allocated_today();
    }

    let remaining_investable = investable_capital - total_allocated;
    let monthly_surplus = monthly_capacity - total_required_monthly;
    let capacity_utilization_pct = if monthly_capacity > 0.0 {
        total_required_monthly / monthly_capacity * 100.0
    } else {
        0.0
    };

    PortfolioAggregate {
        goal_count: goals.len(),
        solved_goal_count,
        total_required_monthly,
        total_future_cost,
        total_allocated,
        investable_capital,
        remaining_investable,
        monthly_capacity,
        monthly_surplus,
        capacity_utilization_pct,
        over_allocated: remaining_investable < 0.0,
        over_subscribed: monthly_surplus < 0.0,
    }
}
