use serde::Serialize;

use super::projection::project;

/// 4% safe withdrawal rate.
pub const FIRE_MULTIPLIER: f64 = 25.0;
pub const LEAN_FIRE_FACTOR: f64 = 0.8;
pub const FAT_FIRE_FACTOR: f64 = 2.0;
/// Growth assumed for FIRE timelines (FD / debt fund territory).
pub const CONSERVATIVE_GROWTH_RATE: f64 = 0.05;
pub const DEFAULT_FIRE_INFLATION: f64 = 0.06;
pub const DEFAULT_RETIREMENT_AGE: u32 = 60;
pub const DEFAULT_COAST_AGE: u32 = 45;
pub const MAX_FIRE_YEARS: u32 = 100;

/// Corpus that sustains today's expenses indefinitely.
pub fn fire_number(monthly_expenses: f64) -> f64 {
    monthly_expenses * 12.0 * FIRE_MULTIPLIER
}

/// Years of conservative growth plus annual savings until `corpus` reaches `target`.
/// Returns [`MAX_FIRE_YEARS`] if the target is never reached.
pub fn years_to_fire(corpus: f64, annual_savings: f64, target: f64) -> u32 {
    let mut corpus = corpus;
    let mut years = 0;
    while corpus < target && years < MAX_FIRE_YEARS {
        corpus = corpus * (1.0 + CONSERVATIVE_GROWTH_RATE) + annual_savings;
        years += 1;
    }
    years
}

/// Corpus that, left alone from `coast_age`, grows into `target` by `retirement_age`.
pub fn coast_fire_number(target: f64, coast_age: u32, retirement_age: u32) -> f64 {
    let years = retirement_age.saturating_sub(coast_age);
    target / (1.0 + CONSERVATIVE_GROWTH_RATE).powf(f64::from(years))
}

/// Level monthly investment that grows `net_worth` into `target` over `months`, floored at 0.
pub fn monthly_investment_needed(target: f64, net_worth: f64, months: u32) -> f64 {
    let r = CONSERVATIVE_GROWTH_RATE / 12.0;
    if months == 0 {
        return (target - net_worth).max(0.0);
    }
    let growth = (1.0 + r).powf(f64::from(months));
    let needed = (target - net_worth * growth) * r / (growth - 1.0);
    needed.max(0.0)
}

/// Years for a corpus growing at `annual_cagr` with a monthly SIP stepped up once a
/// year to reach `target`. Capped at [`MAX_FIRE_YEARS`].
pub fn years_to_fire_with_step_up(
    corpus: f64,
    monthly_sip: f64,
    annual_step_up: f64,
    annual_cagr: f64,
    target: f64,
) -> u32 {
    let mut corpus = corpus;
    let mut sip = monthly_sip;
    let mut years = 0;
    while corpus < target && years < MAX_FIRE_YEARS {
        corpus = corpus * (1.0 + annual_cagr) + sip * 12.0;
        sip *= 1.0 + annual_step_up;
        years += 1;
    }
    years
}

#[derive(Debug, Clone, Copy)]
pub struct FireInputs {
    pub age: u32,
    pub retirement_age: u32,
    pub coast_age: u32,
    pub monthly_expenses: f64,
    pub monthly_savings: f64,
    pub net_worth: f64,
    /// Fraction, e.g. 0.06.
    pub inflation: f64,
    pub expected_cagr: f64,
    pub annual_step_up: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireMetrics {
    pub fire_number: f64,
    pub annual_expenses_at_retirement: f64,
    pub required_corpus: f64,
    pub lean_fire_number: f64,
    pub fat_fire_number: f64,
    pub years_to_fire: u32,
    pub fire_age: u32,
    pub coast_fire_number: f64,
    pub monthly_investment_needed: f64,
    pub coast_monthly_investment_needed: f64,
    pub step_up_years_to_fire: u32,
    pub step_up_fire_age: u32,
}

pub fn fire_metrics(inputs: &FireInputs) -> FireMetrics {
    let years_to_retirement = inputs.retirement_age.saturating_sub(inputs.age);
    let annual_expenses_at_retirement = project(
        inputs.monthly_expenses * 12.0,
        inputs.inflation,
        years_to_retirement as f64,
    );
    let required_corpus = annual_expenses_at_retirement * FIRE_MULTIPLIER;
    let annual_savings = inputs.monthly_savings.max(0.0) * 12.0;

    let years_to_fire = years_to_fire(inputs.net_worth, annual_savings, required_corpus);
    let coast_fire_number =
        coast_fire_number(required_corpus, inputs.coast_age, inputs.retirement_age);
    let months_to_coast = inputs.coast_age.saturating_sub(inputs.age).saturating_mul(12);
    let step_up_years = years_to_fire_with_step_up(
        inputs.net_worth,
        inputs.monthly_savings.max(0.0),
        inputs.annual_step_up,
        inputs.expected_cagr,
        required_corpus,
    );

    tracing::debug!(required_corpus, years_to_fire, step_up_years, "computed fire metrics");

    FireMetrics {
        fire_number: fire_number(inputs.monthly_expenses),
        annual_expenses_at_retirement,
        required_corpus,
        lean_fire_number: required_corpus * LEAN_FIRE_FACTOR,
        fat_fire_number: required_corpus * FAT_FIRE_FACTOR,
        years_to_fire,
        fire_age: inputs.age + years_to_fire,
        coast_fire_number,
        monthly_investment_needed: monthly_investment_needed(
            required_corpus,
            inputs.net_worth,
            years_to_retirement.saturating_mul(12),
        ),
        coast_monthly_investment_needed: monthly_investment_needed(
            coast_fire_number,
            inputs.net_worth,
            months_to_coast,
        ),
        step_up_years_to_fire: step_up_years,
        step_up_fire_age: inputs.age + step_up_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn inputs() -> FireInputs {
        FireInputs {
            age: 30,
            retirement_age: DEFAULT_RETIREMENT_AGE,
            coast_age: DEFAULT_COAST_AGE,
            monthly_expenses: 50_000.0,
            monthly_savings: 50_000.0,
            net_worth: 1_000_000.0,
            inflation: DEFAULT_FIRE_INFLATION,
            expected_cagr: 0.11,
            annual_step_up: 0.10,
        }
    }

    #[test]
    fn basic_fire_number_is_twenty_five_years_of_expenses() {
        assert_eq!(fire_number(50_000.0), 15_000_000.0);
        assert_eq!(fire_number(0.0), 0.0);
    }

    #[test]
    fn already_funded_takes_zero_years() {
        assert_eq!(years_to_fire(2_000_000.0, 0.0, 1_000_000.0), 0);
        assert_eq!(years_to_fire_with_step_up(2_000_000.0, 0.0, 0.1, 0.1, 1_000_000.0), 0);
    }

    #[test]
    fn unreachable_target_stops_at_the_cap() {
        assert_eq!(years_to_fire(0.0, 0.0, 1_000_000.0), MAX_FIRE_YEARS);
        assert_eq!(
            years_to_fire_with_step_up(0.0, 0.0, 0.1, 0.1, 1_000_000.0),
            MAX_FIRE_YEARS
        );
    }

    #[test]
    fn years_to_fire_counts_whole_years() {
        // 0 -> 100 -> 205 -> 315.25
        assert_eq!(years_to_fire(0.0, 100.0, 300.0), 3);
    }

    #[test]
    fn coast_number_discounts_at_conservative_growth() {
        assert_close(coast_fire_number(1_050.0, 59, 60), 1_000.0, 1e-9);
        assert_eq!(coast_fire_number(1_000.0, 60, 60), 1_000.0);
        assert_eq!(coast_fire_number(1_000.0, 65, 60), 1_000.0);
    }

    #[test]
    fn monthly_investment_matches_annuity_formula_and_floors_at_zero() {
        let r: f64 = CONSERVATIVE_GROWTH_RATE / 12.0;
        let growth = (1.0 + r).powi(120);
        let expected = 1_000_000.0 * r / (growth - 1.0);
        assert_close(monthly_investment_needed(1_000_000.0, 0.0, 120), expected, 1e-9);

        assert_eq!(monthly_investment_needed(1_000_000.0, 5_000_000.0, 120), 0.0);
        assert_eq!(monthly_investment_needed(1_000.0, 400.0, 0), 600.0);
    }

    #[test]
    fn step_up_reaches_fire_no_later_than_level_saving() {
        let metrics = fire_metrics(&inputs());
        assert!(metrics.step_up_years_to_fire <= metrics.years_to_fire);
        assert_eq!(metrics.step_up_fire_age, 30 + metrics.step_up_years_to_fire);
    }

    #[test]
    fn metrics_roll_up_consistently() {
        let metrics = fire_metrics(&inputs());
        let expected_annual = 600_000.0 * 1.06_f64.powi(30);
        assert_close(metrics.annual_expenses_at_retirement, expected_annual, 1e-6);
        assert_close(metrics.required_corpus, expected_annual * 25.0, 1e-4);
        assert_close(metrics.lean_fire_number, metrics.required_corpus * 0.8, 1e-4);
        assert_close(metrics.fat_fire_number, metrics.required_corpus * 2.0, 1e-4);
        assert_eq!(metrics.fire_number, 15_000_000.0);
        assert_eq!(metrics.fire_age, 30 + metrics.years_to_fire);
        assert!(metrics.coast_fire_number < metrics.required_corpus);
        assert!(metrics.monthly_investment_needed > 0.0);
        assert!(metrics.coast_monthly_investment_needed > 0.0);
    }

    #[test]
    fn absurd_ages_do_not_overflow() {
        let mut far = inputs();
        far.retirement_age = 400_000_000;
        far.coast_age = u32::MAX;
        let metrics = fire_metrics(&far);
        assert!(metrics.monthly_investment_needed >= 0.0);
        assert!(metrics.coast_fire_number >= 0.0);
        assert!(metrics.coast_monthly_investment_needed >= 0.0);
        assert!(metrics.years_to_fire <= MAX_FIRE_YEARS);
    }

    #[test]
    fn retirement_age_at_or_below_current_age_is_tolerated() {
        let mut late = inputs();
        late.age = 70;
        let metrics = fire_metrics(&late);
        assert_eq!(metrics.annual_expenses_at_retirement, 600_000.0);
        // No months left before the coast age: the whole shortfall is due now.
        assert_close(
            metrics.coast_monthly_investment_needed,
            (metrics.coast_fire_number - 1_000_000.0).max(0.0),
            1e-6,
        );
        assert!(metrics.monthly_investment_needed >= 0.0);
    }
}
