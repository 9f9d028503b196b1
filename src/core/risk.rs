use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::goals::Goal;
use super::types::{AssetClass, FinancialSnapshot, RiskCategory};

/// Highest score still categorised Conservative.
pub const CONSERVATIVE_MAX_SCORE: u32 = 20;
/// Highest score still categorised Moderate.
pub const MODERATE_MAX_SCORE: u32 = 35;
pub const MAX_RISK_SCORE: u32 = 50;
pub const QUIZ_WEIGHTS: [u32; 3] = [1, 3, 5];

/// The single mapping from score to category; every consumer goes through this.
pub fn categorize(score: u32) -> RiskCategory {
    if score <= CONSERVATIVE_MAX_SCORE {
        RiskCategory::Conservative
    } else if score <= MODERATE_MAX_SCORE {
        RiskCategory::Moderate
    } else {
        RiskCategory::Aggressive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: u32,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub label: &'static str,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: [QuizOption; 3],
}

const fn options(low: &'static str, mid: &'static str, high: &'static str) -> [QuizOption; 3] {
    [
        QuizOption { label: low, score: QUIZ_WEIGHTS[0] },
        QuizOption { label: mid, score: QUIZ_WEIGHTS[1] },
        QuizOption { label: high, score: QUIZ_WEIGHTS[2] },
    ]
}

pub static RISK_QUESTIONS: [QuizQuestion; 10] = [
    QuizQuestion {
        id: 1,
        question: "What's your investment horizon?",
        options: options("< 3 years", "3-7 years", "> 7 years"),
    },
    QuizQuestion {
        id: 2,
        question: "How do you react if your portfolio drops 15% in a month?",
        options: options("Sell all", "Hold", "Buy more"),
    },
    QuizQuestion {
        id: 3,
        question: "What's your monthly saving rate (% of income)?",
        options: options("<10%", "10-25%", ">25%"),
    },
    QuizQuestion {
        id: 4,
        question: "How stable is your income?",
        options: options("Unstable", "Moderately stable", "Very stable"),
    },
    QuizQuestion {
        id: 5,
        question: "Your investing experience?",
        options: options("None", "Some experience", "Experienced investor"),
    },
    QuizQuestion {
        id: 6,
        question: "How important is capital protection vs. returns?",
        options: options("Safety first", "Balanced", "Growth focus"),
    },
    QuizQuestion {
        id: 7,
        question: "How would you feel if markets stayed down for a year?",
        options: options("Panic", "Wait", "See it as an opportunity"),
    },
    QuizQuestion {
        id: 8,
        question: "What's your main goal?",
        options: options("Short-term needs", "Steady long-term growth", "Financial freedom"),
    },
    QuizQuestion {
        id: 9,
        question: "How many dependents do you support financially?",
        options: options("3+", "1-2", "None"),
    },
    QuizQuestion {
        id: 10,
        question: "What % of your total assets are invested currently?",
        options: options("<20%", "20-60%", ">60%"),
    },
];

pub fn question(id: u32) -> Option<&'static QuizQuestion> {
    RISK_QUESTIONS.iter().find(|q| q.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("unknown quiz question {0}")]
    UnknownQuestion(u32),
    #[error("quiz question {question} has no option scored {score}")]
    InvalidOption { question: u32, score: u32 },
    #[error("quiz question {0} answered more than once")]
    DuplicateAnswer(u32),
}

/// Sum of quiz weights after checking every answer against the catalog.
pub fn quiz_score(answers: &[QuizAnswer]) -> Result<u32, QuizError> {
    let mut seen = Vec::with_capacity(answers.len());
    let mut total = 0;
    for answer in answers {
        let q = question(answer.question_id).ok_or(QuizError::UnknownQuestion(answer.question_id))?;
        if !q.options.iter().any(|o| o.score == answer.score) {
            return Err(QuizError::InvalidOption {
                question: answer.question_id,
                score: answer.score,
            });
        }
        if seen.contains(&answer.question_id) {
            return Err(QuizError::DuplicateAnswer(answer.question_id));
        }
        seen.push(answer.question_id);
        total += answer.score;
    }
    Ok(total)
}

/// Risk score from quiz answers when present, otherwise inferred from the snapshot.
///
/// Quiz answers are summed as supplied; checking them is [`quiz_score`]'s job.
pub fn score(quiz: Option<&[QuizAnswer]>, snapshot: &FinancialSnapshot, goals: &[Goal]) -> u32 {
    match quiz {
        Some(answers) if !answers.is_empty() => answers.iter().map(|a| a.score).sum(),
        _ => inferred_score(snapshot, goals),
    }
}

pub fn inferred_score(snapshot: &FinancialSnapshot, goals: &[Goal]) -> u32 {
    let savings_rate_pct = snapshot.savings_rate() * 100.0;
    let max_horizon = goals.iter().map(Goal::horizon_years).max();
    let emergency_months = snapshot.emergency_fund_months();

    // Share of all holdings, property included.
    let total_assets = snapshot.total_assets();
    let equity_pct = if total_assets > 0.0 {
        let equity =
            snapshot.class_total(AssetClass::Equity) + snapshot.class_total(AssetClass::UsEquity);
        (equity / total_assets * 100.0).round()
    } else {
        0.0
    };

    let total = age_points(snapshot.age)
        + savings_points(snapshot.monthly_income, savings_rate_pct)
        + horizon_points(max_horizon)
        + emergency_points(emergency_months)
        + equity_points(equity_pct)
        + snapshot.risk_tolerance;
    total.min(MAX_RISK_SCORE)
}

fn age_points(age: u32) -> u32 {
    match age {
        0..=29 => 5,
        30..=39 => 4,
        40..=49 => 3,
        50..=59 => 2,
        _ => 1,
    }
}

/// No income reads as a 0% savings rate.
fn savings_points(monthly_income: f64, savings_rate_pct: f64) -> u32 {
    if monthly_income <= 0.0 {
        1
    } else if savings_rate_pct > 25.0 {
        5
    } else if savings_rate_pct > 10.0 {
        3
    } else {
        1
    }
}

fn horizon_points(max_horizon: Option<u32>) -> u32 {
    match max_horizon {
        None => 1,
        Some(years) if years > 7 => 5,
        Some(years) if years > 3 => 3,
        Some(_) => 1,
    }
}

fn emergency_points(months: f64) -> u32 {
    if months >= 6.0 {
        4
    } else if months >= 3.0 {
        2
    } else {
        1
    }
}

fn equity_points(equity_pct: f64) -> u32 {
    if equity_pct > 50.0 {
        5
    } else if equity_pct > 30.0 {
        3
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::tests::{holding, sample_snapshot};

    fn goal(years: u32) -> Goal {
        let mut goal = Goal::new(format!("g{years}"), "goal");
        goal.set_horizon_years(years);
        goal
    }

    #[test]
    fn category_boundaries_are_inclusive() {
        assert_eq!(categorize(0), RiskCategory::Conservative);
        assert_eq!(categorize(18), RiskCategory::Conservative);
        assert_eq!(categorize(20), RiskCategory::Conservative);
        assert_eq!(categorize(21), RiskCategory::Moderate);
        assert_eq!(categorize(35), RiskCategory::Moderate);
        assert_eq!(categorize(36), RiskCategory::Aggressive);
        assert_eq!(categorize(MAX_RISK_SCORE), RiskCategory::Aggressive);
    }

    #[test]
    fn quiz_answers_are_summed() {
        let answers = [
            QuizAnswer { question_id: 1, score: 5 },
            QuizAnswer { question_id: 2, score: 3 },
            QuizAnswer { question_id: 3, score: 1 },
        ];
        let snapshot = sample_snapshot();
        assert_eq!(score(Some(&answers), &snapshot, &[]), 9);
        assert_eq!(quiz_score(&answers), Ok(9));
    }

    #[test]
    fn empty_quiz_falls_back_to_inference() {
        let snapshot = sample_snapshot();
        let goals = [goal(10)];
        assert_eq!(
            score(Some(&[]), &snapshot, &goals),
            inferred_score(&snapshot, &goals)
        );
    }

    #[test]
    fn quiz_validation_rejects_bad_answers() {
        assert_eq!(
            quiz_score(&[QuizAnswer { question_id: 11, score: 1 }]),
            Err(QuizError::UnknownQuestion(11))
        );
        assert_eq!(
            quiz_score(&[QuizAnswer { question_id: 4, score: 2 }]),
            Err(QuizError::InvalidOption { question: 4, score: 2 })
        );
        assert_eq!(
            quiz_score(&[
                QuizAnswer { question_id: 4, score: 3 },
                QuizAnswer { question_id: 4, score: 5 },
            ]),
            Err(QuizError::DuplicateAnswer(4))
        );
    }

    #[test]
    fn full_quiz_tops_out_at_the_score_cap() {
        let answers: Vec<QuizAnswer> = RISK_QUESTIONS
            .iter()
            .map(|q| QuizAnswer { question_id: q.id, score: 5 })
            .collect();
        assert_eq!(quiz_score(&answers), Ok(MAX_RISK_SCORE));
        assert!(RISK_QUESTIONS.iter().all(|q| q.options.iter().map(|o| o.score).eq(QUIZ_WEIGHTS)));
    }

    #[test]
    fn inferred_score_buckets_each_signal() {
        // age 32 -> 4, savings 46.7% -> 5, horizon 10y -> 5, no cash -> 1,
        // equity 16% of all holdings -> 1, tolerance 3.
        let snapshot = sample_snapshot();
        assert_eq!(inferred_score(&snapshot, &[goal(2), goal(10)]), 19);
        assert_eq!(
            categorize(inferred_score(&snapshot, &[goal(2), goal(10)])),
            RiskCategory::Conservative
        );

        // No goals scores like a short horizon.
        assert_eq!(inferred_score(&snapshot, &[]), 15);
        assert_eq!(inferred_score(&snapshot, &[]), inferred_score(&snapshot, &[goal(1)]));
    }

    #[test]
    fn missing_income_scores_like_a_low_savings_rate() {
        let mut snapshot = sample_snapshot();
        snapshot.monthly_income = 0.0;
        // age 4, savings 1, horizon 1, cash 1, equity 1, tolerance 3.
        assert_eq!(inferred_score(&snapshot, &[]), 11);

        snapshot.monthly_income = 80_000.0;
        assert_eq!(inferred_score(&snapshot, &[]), 11);
    }

    #[test]
    fn property_dilutes_the_equity_signal() {
        let mut snapshot = sample_snapshot();
        let with_flat = inferred_score(&snapshot, &[goal(10)]);
        snapshot.holdings.retain(|h| h.asset_class.is_some());
        // Equity 1.1M of 2M is 55% -> 5 points instead of 1.
        assert_eq!(inferred_score(&snapshot, &[goal(10)]), with_flat + 4);
    }

    #[test]
    fn inferred_score_for_a_cautious_profile() {
        let mut snapshot = sample_snapshot();
        snapshot.age = 61;
        snapshot.monthly_income = 0.0;
        snapshot.risk_tolerance = 1;
        snapshot.holdings = vec![
            holding("FD", Some(AssetClass::Debt), 900_000.0, true),
            holding("Savings", Some(AssetClass::Cash), 480_000.0, true),
        ];
        // age 1, no income 1, horizon 2y -> 1, 6 months cash -> 4, equity 0 -> 1, tolerance 1.
        assert_eq!(inferred_score(&snapshot, &[goal(2)]), 9);
    }

    #[test]
    fn inferred_score_is_capped() {
        let mut snapshot = sample_snapshot();
        snapshot.risk_tolerance = 100;
        assert_eq!(inferred_score(&snapshot, &[]), MAX_RISK_SCORE);
    }
}
