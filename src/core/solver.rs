use serde::Serialize;

/// Accepted distance, in currency units, between the simulated corpus and the target.
pub const SOLVER_TOLERANCE: f64 = 1.0;
/// Bisection steps before the solver gives up and returns its best midpoint.
pub const SOLVER_MAX_ITERATIONS: u32 = 100;
/// Longest horizon the solver simulates; longer horizons are clamped to it.
pub const MAX_HORIZON_YEARS: u32 = 100;
/// Upper-bound doublings allowed when `future_gap / months` does not bracket the answer
/// (only possible with negative returns or step-ups).
const MAX_BRACKET_EXPANSIONS: u32 = 64;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveMethod {
    NothingToFund,
    ClosedForm,
    Bisection,
}

#[derive(Debug, Clone, Copy)]
pub struct StepUpSolveConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for StepUpSolveConfig {
    fn default() -> Self {
        Self {
            tolerance: SOLVER_TOLERANCE,
            max_iterations: SOLVER_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub simulated_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpSolveResult {
    pub method: SolveMethod,
    pub monthly_contribution: f64,
    pub simulated_value: f64,
    pub iterations: Vec<SolveIteration>,
    pub converged: bool,
    pub message: String,
}

/// Initial monthly contribution that funds `future_gap` over `years`, growing the
/// contribution by `annual_step_up` (fraction) every year at `annual_return` (fraction).
pub fn solve(future_gap: f64, years: u32, annual_return: f64, annual_step_up: f64) -> f64 {
    solve_with_config(
        future_gap,
        years,
        annual_return,
        annual_step_up,
        StepUpSolveConfig::default(),
    )
    .monthly_contribution
}

pub fn solve_with_config(
    future_gap: f64,
    years: u32,
    annual_return: f64,
    annual_step_up: f64,
    config: StepUpSolveConfig,
) -> StepUpSolveResult {
    if future_gap <= 0.0 || years == 0 {
        return StepUpSolveResult {
            method: SolveMethod::NothingToFund,
            monthly_contribution: 0.0,
            simulated_value: 0.0,
            iterations: Vec::new(),
            converged: true,
            message: "No funding gap; contribution is zero.".to_string(),
        };
    }

    let years = clamp_horizon(years);

    if annual_step_up == 0.0 {
        let monthly = level_contribution(future_gap, years, annual_return);
        return StepUpSolveResult {
            method: SolveMethod::ClosedForm,
            monthly_contribution: monthly,
            simulated_value: simulate_future_value(monthly, years, annual_return, 0.0),
            iterations: Vec::new(),
            converged: true,
            message: "Solved level contribution in closed form.".to_string(),
        };
    }

    bisect(future_gap, years, annual_return, annual_step_up, config)
}

fn clamp_horizon(years: u32) -> u32 {
    if years > MAX_HORIZON_YEARS {
        tracing::warn!(years, max = MAX_HORIZON_YEARS, "horizon clamped for solving");
    }
    years.min(MAX_HORIZON_YEARS)
}

/// Ordinary annuity payment: `gap * r / ((1 + r)^n - 1)` with monthly `r`.
fn level_contribution(future_gap: f64, years: u32, annual_return: f64) -> f64 {
    let months = f64::from(years) * 12.0;
    let r = annual_return / 12.0;
    if r.abs() < 1e-12 {
        return future_gap / months;
    }
    let growth = (1.0 + r).powf(months) - 1.0;
    if growth.abs() < 1e-12 {
        return future_gap / months;
    }
    future_gap * r / growth
}

fn bisect(
    future_gap: f64,
    years: u32,
    annual_return: f64,
    annual_step_up: f64,
    config: StepUpSolveConfig,
) -> StepUpSolveResult {
    let months = f64::from(years) * 12.0;
    let max_iterations = config.max_iterations.max(1);
    let mut lo = 0.0;
    let mut hi = future_gap / months;

    let mut expansions = 0;
    while simulate_future_value(hi, years, annual_return, annual_step_up) < future_gap
        && expansions < MAX_BRACKET_EXPANSIONS
    {
        lo = hi;
        hi *= 2.0;
        expansions += 1;
    }

    let mut iterations = Vec::with_capacity(max_iterations as usize);
    let mut best = (hi, f64::INFINITY, 0.0);
    let mut converged = false;
    let mut it = 0;
    while it < max_iterations {
        it += 1;
        let mid = (lo + hi) * 0.5;
        let simulated = simulate_future_value(mid, years, annual_return, annual_step_up);
        iterations.push(SolveIteration {
            iteration: it,
            lower_bound: lo,
            upper_bound: hi,
            candidate_value: mid,
            simulated_value: simulated,
        });

        let miss = (simulated - future_gap).abs();
        if miss < best.1 {
            best = (mid, miss, simulated);
        }
        if miss <= config.tolerance {
            converged = true;
            break;
        }

        if simulated < future_gap {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let (monthly, _, simulated) = best;
    let message = if converged {
        tracing::debug!(iterations = it, monthly, "step-up contribution converged");
        "Solved stepped-up contribution.".to_string()
    } else {
        tracing::warn!(
            iterations = it,
            future_gap,
            years,
            "step-up solver reached iteration cap; returning best estimate"
        );
        "Reached max iterations before tolerance was met; returning best estimate.".to_string()
    };

    StepUpSolveResult {
        method: SolveMethod::Bisection,
        monthly_contribution: monthly,
        simulated_value: simulated,
        iterations,
        converged,
        message,
    }
}

/// Corpus accumulated by month-end contributions that step up once per year.
///
/// Each month's contribution compounds monthly until the end of the horizon, so a
/// zero step-up reproduces the ordinary annuity future value. Runs once per year:
/// the corpus grows by a year of compounding, then takes that year's twelve
/// contributions valued at year end. Horizons past [`MAX_HORIZON_YEARS`] are clamped.
pub fn simulate_future_value(
    initial_monthly: f64,
    years: u32,
    annual_return: f64,
    annual_step_up: f64,
) -> f64 {
    let r = annual_return / 12.0;
    let yearly_growth = (1.0 + r).powi(12);
    // Value at year end of 1 paid at the end of each month.
    let year_factor = if r.abs() < 1e-12 {
        12.0
    } else {
        (yearly_growth - 1.0) / r
    };

    let mut total = 0.0;
    let mut contribution = initial_monthly;
    for _ in 0..years.min(MAX_HORIZON_YEARS) {
        total = total * yearly_growth + contribution * year_factor;
        contribution *= 1.0 + annual_step_up;
    }
    total
}
