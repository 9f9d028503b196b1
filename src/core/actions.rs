use std::cmp::Ordering;

use super::aggregate::PortfolioAggregate;
use super::gap::AllocationComparison;
use super::goals::Goal;
use super::types::{ActionItem, ActionTier, AssetClass, FinancialSnapshot};

pub const TOP_ACTIONS: usize = 10;
pub const EMERGENCY_FUND_TARGET_MONTHS: f64 = 6.0;
pub const TARGET_SAVINGS_RATE: f64 = 0.30;
/// Cash share of investable assets above which idle cash is flagged.
pub const EXCESS_CASH_PCT: f64 = 15.0;
pub const LIFE_COVER_INCOME_MULTIPLE: f64 = 10.0;
pub const RECOMMENDED_HEALTH_COVER: f64 = 1_000_000.0;

/// Intra-tier ordering key; higher ranks first.
pub fn action_score(item: &ActionItem) -> f64 {
    item.risk_score * 10.0 + item.monetary_value / 10_000.0
}

fn compare(a: &ActionItem, b: &ActionItem) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then_with(|| action_score(b).total_cmp(&action_score(a)))
}

/// Orders candidates by tier, then by score, and keeps the first [`TOP_ACTIONS`].
/// Ties keep the order they were supplied in.
pub fn rank(mut candidates: Vec<ActionItem>) -> Vec<ActionItem> {
    candidates.sort_by(compare);
    candidates.truncate(TOP_ACTIONS);
    candidates
}

/// Drops candidates the caller has already completed, then ranks the rest.
pub fn rank_pending(candidates: Vec<ActionItem>, completed: &[String]) -> Vec<ActionItem> {
    let pending = candidates
        .into_iter()
        .filter(|item| !completed.iter().any(|id| id == &item.id))
        .collect();
    rank(pending)
}

/// Derived state the default rule set reads from.
pub struct ActionContext<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub goals: &'a [Goal],
    pub aggregate: &'a PortfolioAggregate,
    pub comparison: Option<&'a AllocationComparison>,
}

struct Candidate {
    id: String,
    title: String,
    benefit: &'static str,
    rationale: String,
    location: &'static str,
    target: &'static str,
}

impl Candidate {
    fn scored(self, tier: ActionTier, risk_score: f64, monetary_value: f64) -> ActionItem {
        ActionItem {
            id: self.id,
            title: self.title,
            benefit: self.benefit.to_string(),
            rationale: self.rationale,
            location: self.location.to_string(),
            monetary_value: monetary_value.max(0.0),
            risk_score,
            tier,
            target: self.target.to_string(),
        }
    }
}

/// Built-in candidate rules. Output is unranked; pass it through [`rank_pending`].
pub fn default_candidates(ctx: &ActionContext<'_>) -> Vec<ActionItem> {
    let mut items = Vec::new();
    milestone_actions(ctx, &mut items);
    risk_actions(ctx, &mut items);
    optimization_actions(ctx, &mut items);
    items
}

fn milestone_actions(ctx: &ActionContext<'_>, items: &mut Vec<ActionItem>) {
    if !ctx.snapshot.has_details() {
        items.push(
            Candidate {
                id: "enter-details".to_string(),
                title: "Enter your income, expenses and assets".to_string(),
                benefit: "Unlocks every calculation in your plan",
                rationale: "No income or holdings have been recorded yet.".to_string(),
                location: "Profile",
                target: "/profile",
            }
            .scored(ActionTier::Milestone, 10.0, 0.0),
        );
    }

    if ctx.goals.is_empty() {
        items.push(
            Candidate {
                id: "set-goals".to_string(),
                title: "Set your financial goals".to_string(),
                benefit: "Turns savings into a plan with a deadline",
                rationale: "No goals have been created.".to_string(),
                location: "Goals",
                target: "/goals",
            }
            .scored(ActionTier::Milestone, 8.0, 0.0),
        );
        return;
    }

    let unsolved: Vec<&Goal> = ctx.goals.iter().filter(|g| !g.is_solved()).collect();
    if !unsolved.is_empty() {
        let future_cost: f64 = unsolved.iter().map(|g| g.future_cost()).sum();
        items.push(
            Candidate {
                id: "solve-goal-sips".to_string(),
                title: "Calculate the monthly SIP for your goals".to_string(),
                benefit: "Shows exactly how much to invest each month",
                rationale: format!(
                    "{} of {} goals have no monthly contribution yet.",
                    unsolved.len(),
                    ctx.goals.len()
                ),
                location: "Goals",
                target: "/goals",
            }
            .scored(ActionTier::Milestone, 7.0, future_cost),
        );
    }
}

fn risk_actions(ctx: &ActionContext<'_>, items: &mut Vec<ActionItem>) {
    let snapshot = ctx.snapshot;
    let annual_income = snapshot.monthly_income * 12.0;

    if snapshot.life_cover <= 0.0 && annual_income > 0.0 {
        items.push(
            Candidate {
                id: "life-insurance".to_string(),
                title: "Get term life insurance".to_string(),
                benefit: "Protects your dependents' income",
                rationale: format!(
                    "No life cover recorded; {}x annual income is the usual baseline.",
                    LIFE_COVER_INCOME_MULTIPLE
                ),
                location: "Insurance",
                target: "/insurance",
            }
            .scored(ActionTier::RiskMitigation, 9.0, annual_income * LIFE_COVER_INCOME_MULTIPLE),
        );
    }

    if snapshot.health_cover <= 0.0 {
        items.push(
            Candidate {
                id: "health-insurance".to_string(),
                title: "Get health insurance".to_string(),
                benefit: "Keeps medical bills from draining your investments",
                rationale: "No health cover recorded.".to_string(),
                location: "Insurance",
                target: "/insurance",
            }
            .scored(ActionTier::RiskMitigation, 9.0, RECOMMENDED_HEALTH_COVER),
        );
    }

    let months = snapshot.emergency_fund_months();
    if snapshot.monthly_expenses > 0.0 && months < EMERGENCY_FUND_TARGET_MONTHS {
        let shortfall =
            EMERGENCY_FUND_TARGET_MONTHS * snapshot.monthly_expenses - snapshot.emergency_fund();
        let urgency = if months < 3.0 { 8.0 } else { 6.0 };
        items.push(
            Candidate {
                id: "emergency-fund".to_string(),
                title: "Build a 6-month emergency fund".to_string(),
                benefit: "Avoids selling investments in a crisis",
                rationale: format!("Liquid cash covers {months:.1} months of expenses."),
                location: "Net Worth",
                target: "/net-worth",
            }
            .scored(ActionTier::RiskMitigation, urgency, shortfall),
        );
    }

    if ctx.aggregate.over_allocated {
        items.push(
            Candidate {
                id: "over-allocated-capital".to_string(),
                title: "Reduce capital earmarked to goals".to_string(),
                benefit: "Keeps every goal backed by money that exists",
                rationale: "Goals claim more capital than your investable assets.".to_string(),
                location: "Goals",
                target: "/goals",
            }
            .scored(ActionTier::RiskMitigation, 7.0, -ctx.aggregate.remaining_investable),
        );
    }

    if ctx.aggregate.over_subscribed {
        items.push(
            Candidate {
                id: "sip-deficit".to_string(),
                title: "Close the monthly SIP shortfall".to_string(),
                benefit: "Keeps your goals on schedule",
                rationale: format!(
                    "Required SIPs exceed monthly capacity by {:.0}.",
                    -ctx.aggregate.monthly_surplus
                ),
                location: "Goals",
                target: "/goals",
            }
            .scored(ActionTier::RiskMitigation, 7.0, -ctx.aggregate.monthly_surplus * 12.0),
        );
    }
}

fn optimization_actions(ctx: &ActionContext<'_>, items: &mut Vec<ActionItem>) {
    let snapshot = ctx.snapshot;
    let investable = snapshot.investable_assets();

    if let Some(comparison) = ctx.comparison {
        for gap in comparison.overweight() {
            items.push(
                Candidate {
                    id: format!("rebalance-{:?}", gap.asset_class).to_lowercase(),
                    title: format!("Rebalance out of {}", gap.asset_class.label()),
                    benefit: "Brings risk back in line with your profile",
                    rationale: format!(
                        "{} is {:.0}% of your portfolio against an ideal of {:.0}%.",
                        gap.asset_class.label(),
                        gap.current_pct,
                        gap.ideal_pct
                    ),
                    location: "Portfolio",
                    target: "/portfolio",
                }
                .scored(ActionTier::MonetaryOptimization, 4.0, -gap.delta / 100.0 * investable),
            );
        }
    }

    if investable > 0.0 {
        let cash = snapshot.class_total(AssetClass::Cash);
        let excess = cash - EMERGENCY_FUND_TARGET_MONTHS * snapshot.monthly_expenses;
        if cash / investable * 100.0 > EXCESS_CASH_PCT && excess > 0.0 {
            items.push(
                Candidate {
                    id: "deploy-excess-cash".to_string(),
                    title: "Invest idle cash".to_string(),
                    benefit: "Puts money beyond your emergency fund to work",
                    rationale: "Cash is more than 15% of investable assets.".to_string(),
                    location: "Portfolio",
                    target: "/portfolio",
                }
                .scored(ActionTier::MonetaryOptimization, 3.0, excess),
            );
        }
    }

    let rate = snapshot.savings_rate();
    if snapshot.monthly_income > 0.0 && rate < TARGET_SAVINGS_RATE {
        items.push(
            Candidate {
                id: "raise-savings-rate".to_string(),
                title: "Raise your savings rate to 30%".to_string(),
                benefit: "Shortens every goal and your FIRE date",
                rationale: format!("You save {:.0}% of income.", rate * 100.0),
                location: "Budget",
                target: "/budget",
            }
            .scored(
                ActionTier::MonetaryOptimization,
                5.0,
                (TARGET_SAVINGS_RATE - rate) * snapshot.monthly_income * 12.0,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate;
    use crate::core::allocation::{current_allocation, ideal_allocation};
    use crate::core::gap::compare as compare_allocations;
    use crate::core::snapshot::tests::sample_snapshot;
    use crate::core::types::{GoalBucket, RiskCategory};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn item(id: &str, tier: ActionTier, risk_score: f64, monetary_value: f64) -> ActionItem {
        ActionItem {
            id: id.to_string(),
            title: id.to_string(),
            benefit: String::new(),
            rationale: String::new(),
            location: String::new(),
            monetary_value,
            risk_score,
            tier,
            target: String::new(),
        }
    }

    fn ids(items: &[ActionItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn tier_outranks_score() {
        let ranked = rank(vec![
            item("optimise", ActionTier::MonetaryOptimization, 10.0, 5_000_000.0),
            item("insure", ActionTier::RiskMitigation, 2.0, 0.0),
            item("start", ActionTier::Milestone, 1.0, 0.0),
        ]);
        assert_eq!(ids(&ranked), ["start", "insure", "optimise"]);
    }

    #[test]
    fn score_breaks_ties_within_a_tier() {
        // 5 * 10 + 200_000 / 10_000 = 70 beats 6 * 10 + 0 = 60.
        let ranked = rank(vec![
            item("urgent", ActionTier::RiskMitigation, 6.0, 0.0),
            item("valuable", ActionTier::RiskMitigation, 5.0, 200_000.0),
        ]);
        assert_eq!(ids(&ranked), ["valuable", "urgent"]);
        assert_eq!(action_score(&ranked[0]), 70.0);
    }

    #[test]
    fn equal_scores_keep_generation_order() {
        let ranked = rank(vec![
            item("first", ActionTier::MonetaryOptimization, 3.0, 0.0),
            item("second", ActionTier::MonetaryOptimization, 3.0, 0.0),
            item("third", ActionTier::MonetaryOptimization, 3.0, 0.0),
        ]);
        assert_eq!(ids(&ranked), ["first", "second", "third"]);
    }

    #[test]
    fn truncates_after_sorting() {
        let mut candidates: Vec<ActionItem> = (0..12)
            .map(|i| item(&format!("tip-{i}"), ActionTier::MonetaryOptimization, 5.0, 0.0))
            .collect();
        candidates.push(item("late-milestone", ActionTier::Milestone, 1.0, 0.0));

        let ranked = rank(candidates);
        assert_eq!(ranked.len(), TOP_ACTIONS);
        assert_eq!(ranked[0].id, "late-milestone");
    }

    #[test]
    fn completed_actions_are_dropped_before_ranking() {
        let candidates = vec![
            item("life-insurance", ActionTier::RiskMitigation, 9.0, 0.0),
            item("set-goals", ActionTier::Milestone, 8.0, 0.0),
            item("raise-savings-rate", ActionTier::MonetaryOptimization, 5.0, 0.0),
        ];
        let ranked = rank_pending(candidates, &["set-goals".to_string()]);
        assert_eq!(ids(&ranked), ["life-insurance", "raise-savings-rate"]);
    }

    #[test]
    fn default_rules_cover_a_sample_household() {
        let snapshot = sample_snapshot();
        let mut goal = Goal::new("home", "Home");
        goal.set_cost_today(3_000_000.0);
        goal.set_horizon_years(8);
        goal.set_allocated_today(2_500_000.0);
        let goals = vec![goal];
        let agg = aggregate(&goals, snapshot.monthly_surplus(), snapshot.investable_assets());
        let ideal = ideal_allocation(RiskCategory::Conservative, GoalBucket::LongTerm);
        let comparison = compare_allocations(&current_allocation(&snapshot), &ideal);

        let ctx = ActionContext {
            snapshot: &snapshot,
            goals: &goals,
            aggregate: &agg,
            comparison: Some(&comparison),
        };
        let candidates = default_candidates(&ctx);
        let found = ids(&candidates);

        assert!(found.contains(&"solve-goal-sips"));
        assert!(found.contains(&"life-insurance"));
        assert!(found.contains(&"emergency-fund"));
        assert!(found.contains(&"over-allocated-capital"));
        assert!(found.contains(&"rebalance-equity"));
        assert!(!found.contains(&"health-insurance"));
        assert!(!found.contains(&"set-goals"));
        assert!(!found.contains(&"raise-savings-rate"));

        let ranked = rank_pending(candidates, &[]);
        assert_eq!(ranked[0].id, "solve-goal-sips");
        assert!(ranked.iter().all(|i| i.monetary_value >= 0.0));
    }

    #[test]
    fn empty_profile_asks_for_details_and_goals() {
        let mut snapshot = sample_snapshot();
        snapshot.monthly_income = 0.0;
        snapshot.monthly_expenses = 0.0;
        snapshot.holdings.clear();
        snapshot.liabilities.clear();
        let agg = aggregate(&[], 0.0, 0.0);
        let ctx = ActionContext {
            snapshot: &snapshot,
            goals: &[],
            aggregate: &agg,
            comparison: None,
        };

        let ranked = rank_pending(default_candidates(&ctx), &[]);
        assert_eq!(ids(&ranked), ["enter-details", "set-goals"]);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_rank_is_idempotent_and_tier_ordered(
            raw in proptest::collection::vec((1u8..=3, 1u32..=10, 0u32..2_000_000), 0..25)
        ) {
            let candidates: Vec<ActionItem> = raw
                .iter()
                .enumerate()
                .map(|(i, (tier, risk, value))| {
                    let tier = ActionTier::try_from(*tier).expect("tier in range");
                    item(&format!("a{i}"), tier, *risk as f64, *value as f64)
                })
                .collect();

            let first = rank(candidates.clone());
            let second = rank(candidates);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.len() <= TOP_ACTIONS);
            prop_assert!(first.windows(2).all(|w| w[0].tier <= w[1].tier));
        }
    }
}
