use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::actions::rank_pending;
use crate::core::allocation::{ideal_allocation, validate_allocation, weighted_return};
use crate::core::risk::{self, QuizError, RISK_QUESTIONS};
use crate::core::solver::{MAX_HORIZON_YEARS, StepUpSolveResult};
use crate::core::{
    ActionItem, AllocationChoice, AllocationVector, AssetClass, DEFAULT_RISK_TOLERANCE,
    FinancialSnapshot, FireSettings, Goal, GoalBucket, GoalRecord, Holding, Liability,
    PlanInput, QuizAnswer, ReturnBand, RiskCategory, build_plan,
};

const DEFAULT_AGE: u32 = 30;
const MAX_AGE: u32 = 120;
const DEFAULT_RETIREMENT_AGE: u32 = 60;
const DEFAULT_COAST_AGE: u32 = 45;
const DEFAULT_INFLATION_RATE: f64 = 6.0;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: String },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
    #[error("goal '{goal}' must have a horizon of at least 1 year")]
    InvalidHorizon { goal: String },
    #[error("duplicate goal id '{0}'")]
    DuplicateGoal(String),
    #[error("{bucket} allocation must sum to 100, got {total}")]
    AllocationSum { bucket: String, total: f64 },
    #[error("--coast-age must be <= --retirement-age")]
    CoastAfterRetirement,
    #[error("either risk or score is required")]
    MissingRisk,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("invalid request: {0}")]
    Payload(String),
}

impl IntoResponse for InputError {
    fn into_response(self) -> Response {
        error_response(StatusCode::BAD_REQUEST, &self.to_string())
    }
}

/// Saved allocation for one goal bucket, `BUCKET=CLASS:PCT,CLASS:PCT` on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketAllocation {
    pub bucket: GoalBucket,
    pub allocation: AllocationVector,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sipplan",
    about = "Goal-based SIP planner: step-up contributions, risk-based allocation and ranked actions"
)]
pub struct Cli {
    #[arg(long, default_value_t = DEFAULT_AGE)]
    age: u32,
    #[arg(long, default_value_t = 0.0, help = "Monthly take-home income")]
    monthly_income: f64,
    #[arg(long, default_value_t = 0.0)]
    monthly_expenses: f64,
    #[arg(
        long = "holding",
        value_name = "CLASS:VALUE[:NAME[:illiquid]]",
        value_parser = parse_holding_arg,
        help = "Asset holding; CLASS is equity, us_equity, debt, gold, reits, crypto, cash or other"
    )]
    holdings: Vec<Holding>,
    #[arg(long = "liability", value_name = "NAME:AMOUNT", value_parser = parse_liability_arg)]
    liabilities: Vec<Liability>,
    #[arg(
        long = "goal",
        value_name = "NAME:COST:YEARS[:ALLOCATED[:INFLATION[:STEPUP]]]",
        value_parser = parse_goal_arg,
        help = "Goal in today's money; inflation and step-up in percent (default 6 and 10)"
    )]
    goals: Vec<GoalRecord>,
    #[arg(
        long = "quiz",
        value_name = "QUESTION:SCORE",
        value_parser = parse_quiz_arg,
        help = "Risk quiz answer; when any are given the quiz replaces the inferred score"
    )]
    quiz: Vec<QuizAnswer>,
    #[arg(
        long = "allocation",
        value_name = "BUCKET=CLASS:PCT,...",
        value_parser = parse_allocation_arg,
        help = "Saved allocation for a goal bucket (short, mid, long); must sum to 100"
    )]
    allocations: Vec<BucketAllocation>,
    #[arg(long = "completed", value_name = "ACTION_ID", help = "Action already completed")]
    completed_actions: Vec<String>,
    #[arg(skip)]
    candidate_actions: Option<Vec<ActionItem>>,
    #[arg(
        long,
        default_value_t = DEFAULT_RISK_TOLERANCE,
        help = "Declared risk tolerance from 1 (low) to 5 (high)"
    )]
    risk_tolerance: u32,
    #[arg(long, default_value_t = 0.0)]
    life_cover: f64,
    #[arg(long, default_value_t = 0.0)]
    health_cover: f64,
    #[arg(long, default_value_t = DEFAULT_RETIREMENT_AGE)]
    retirement_age: u32,
    #[arg(long, default_value_t = DEFAULT_COAST_AGE)]
    coast_age: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_INFLATION_RATE,
        help = "Expense inflation used for FIRE targets, in percent"
    )]
    inflation_rate: f64,
    #[arg(long, help = "Solve every goal's monthly SIP, not only those already solved")]
    solve_goals: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    age: Option<u32>,
    monthly_income: Option<f64>,
    monthly_expenses: Option<f64>,
    holdings: Option<Vec<Holding>>,
    liabilities: Option<Vec<Liability>>,
    goals: Option<Vec<GoalRecord>>,
    quiz: Option<Vec<QuizAnswer>>,
    allocations: Option<BTreeMap<GoalBucket, AllocationVector>>,
    completed_actions: Option<Vec<String>>,
    actions: Option<Vec<ActionItem>>,
    risk_tolerance: Option<u32>,
    life_cover: Option<f64>,
    health_cover: Option<f64>,
    retirement_age: Option<u32>,
    coast_age: Option<u32>,
    inflation_rate: Option<f64>,
    solve_goals: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolvePayload {
    goals: Vec<GoalRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RankPayload {
    actions: Vec<ActionItem>,
    completed_actions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IdealQuery {
    risk: Option<RiskCategory>,
    score: Option<u32>,
    bucket: Option<GoalBucket>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalSolution {
    goal: Goal,
    bucket: GoalBucket,
    expected_return: f64,
    solver: StepUpSolveResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    goals: Vec<GoalSolution>,
    total_monthly_contribution: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdealBucket {
    bucket: GoalBucket,
    allocation: AllocationVector,
    expected_return: ReturnBand,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdealResponse {
    risk: RiskCategory,
    buckets: Vec<IdealBucket>,
}

#[derive(Debug, Serialize)]
struct RankResponse {
    actions: Vec<ActionItem>,
}

fn parse_enum<T: DeserializeOwned>(raw: &str) -> Result<T, ValueError> {
    let deserializer: StrDeserializer<'_, ValueError> = raw.trim().into_deserializer();
    T::deserialize(deserializer)
}

fn parse_number(label: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{label} must be a number, got '{raw}'"))
}

fn parse_goal_arg(raw: &str) -> Result<GoalRecord, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 3 || parts.len() > 6 {
        return Err("expected NAME:COST:YEARS[:ALLOCATED[:INFLATION[:STEPUP]]]".to_string());
    }
    let name = parts[0].trim();
    if name.is_empty() {
        return Err("goal name must not be empty".to_string());
    }
    let horizon_years = parts[2]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("years must be a whole number, got '{}'", parts[2]))?;

    let mut record = Goal::new("", name).to_record();
    record.cost_today = parse_number("cost", parts[1])?;
    record.horizon_years = horizon_years;
    if let Some(v) = parts.get(3) {
        record.allocated_today = parse_number("allocated", v)?;
    }
    if let Some(v) = parts.get(4) {
        record.inflation_pct = parse_number("inflation", v)?;
    }
    if let Some(v) = parts.get(5) {
        record.step_up_pct = parse_number("step-up", v)?;
    }
    Ok(record)
}

fn parse_holding_arg(raw: &str) -> Result<Holding, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err("expected CLASS:VALUE[:NAME[:illiquid]]".to_string());
    }
    let class = parts[0].trim();
    let asset_class = if class.eq_ignore_ascii_case("other") {
        None
    } else {
        Some(
            parse_enum::<AssetClass>(class)
                .map_err(|_| format!("unknown asset class '{class}'"))?,
        )
    };
    let liquid = match parts.get(3).map(|s| s.trim()) {
        None | Some("liquid") => true,
        Some("illiquid") => false,
        Some(other) => return Err(format!("expected 'liquid' or 'illiquid', got '{other}'")),
    };
    Ok(Holding {
        name: parts
            .get(2)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| class.to_string()),
        asset_class,
        value: parse_number("value", parts[1])?,
        liquid,
    })
}

fn parse_liability_arg(raw: &str) -> Result<Liability, String> {
    let (name, amount) = raw
        .rsplit_once(':')
        .ok_or_else(|| "expected NAME:AMOUNT".to_string())?;
    Ok(Liability {
        name: name.trim().to_string(),
        amount: parse_number("amount", amount)?,
    })
}

fn parse_quiz_arg(raw: &str) -> Result<QuizAnswer, String> {
    let (question, score) = raw
        .split_once(':')
        .ok_or_else(|| "expected QUESTION:SCORE".to_string())?;
    let question_id = question
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("question must be a whole number, got '{question}'"))?;
    let score = score
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("score must be a whole number, got '{score}'"))?;
    Ok(QuizAnswer { question_id, score })
}

fn parse_allocation_arg(raw: &str) -> Result<BucketAllocation, String> {
    let (bucket, classes) = raw
        .split_once('=')
        .ok_or_else(|| "expected BUCKET=CLASS:PCT,...".to_string())?;
    let bucket = parse_enum::<GoalBucket>(bucket)
        .map_err(|_| format!("unknown goal bucket '{bucket}'"))?;
    let mut allocation = AllocationVector::new();
    for entry in classes.split(',').filter(|e| !e.trim().is_empty()) {
        let (class, pct) = entry
            .split_once(':')
            .ok_or_else(|| format!("expected CLASS:PCT, got '{entry}'"))?;
        let class = parse_enum::<AssetClass>(class)
            .map_err(|_| format!("unknown asset class '{class}'"))?;
        allocation.set(class, parse_number("percentage", pct)?);
    }
    Ok(BucketAllocation { bucket, allocation })
}

/// NaN and negative amounts read as 0; infinities are rejected.
fn amount(field: &str, value: f64) -> Result<f64, InputError> {
    if value.is_infinite() {
        return Err(InputError::NonFinite {
            field: field.to_string(),
        });
    }
    if value.is_nan() || value < 0.0 {
        return Ok(0.0);
    }
    Ok(value)
}

fn percent(field: &str, value: f64) -> Result<f64, InputError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(InputError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(value)
}

fn validate_goal(index: usize, mut record: GoalRecord) -> Result<GoalRecord, InputError> {
    if record.id.trim().is_empty() {
        record.id = format!("goal-{}", index + 1);
    }
    let label = if record.name.is_empty() {
        record.id.clone()
    } else {
        record.name.clone()
    };
    if record.horizon_years == 0 {
        return Err(InputError::InvalidHorizon { goal: label });
    }
    if record.horizon_years > MAX_HORIZON_YEARS {
        return Err(InputError::OutOfRange {
            field: format!("goal '{label}' years"),
            min: 1.0,
            max: f64::from(MAX_HORIZON_YEARS),
        });
    }
    record.cost_today = amount(&format!("goal '{label}' cost"), record.cost_today)?;
    record.allocated_today = amount(&format!("goal '{label}' allocated"), record.allocated_today)?;
    percent(&format!("goal '{label}' inflation"), record.inflation_pct)?;
    percent(&format!("goal '{label}' step-up"), record.step_up_pct)?;
    Ok(record)
}

fn validate_goals(records: Vec<GoalRecord>) -> Result<Vec<GoalRecord>, InputError> {
    let mut seen = HashSet::new();
    let mut goals = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let record = validate_goal(index, record)?;
        if !seen.insert(record.id.clone()) {
            return Err(InputError::DuplicateGoal(record.id));
        }
        goals.push(record);
    }
    Ok(goals)
}

fn build_request(cli: Cli) -> Result<PlanInput, InputError> {
    if cli.age > MAX_AGE {
        return Err(InputError::OutOfRange {
            field: "--age".to_string(),
            min: 0.0,
            max: MAX_AGE as f64,
        });
    }

    if !(1..=5).contains(&cli.risk_tolerance) {
        return Err(InputError::OutOfRange {
            field: "--risk-tolerance".to_string(),
            min: 1.0,
            max: 5.0,
        });
    }

    for (field, age) in [
        ("--retirement-age", cli.retirement_age),
        ("--coast-age", cli.coast_age),
    ] {
        if age > MAX_AGE {
            return Err(InputError::OutOfRange {
                field: field.to_string(),
                min: 0.0,
                max: f64::from(MAX_AGE),
            });
        }
    }

    if cli.coast_age > cli.retirement_age {
        return Err(InputError::CoastAfterRetirement);
    }

    let inflation_pct = percent("--inflation-rate", cli.inflation_rate)?;

    let holdings = cli
        .holdings
        .into_iter()
        .map(|h| {
            Ok(Holding {
                value: amount(&format!("holding '{}' value", h.name), h.value)?,
                ..h
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;
    let liabilities = cli
        .liabilities
        .into_iter()
        .map(|l| {
            Ok(Liability {
                amount: amount(&format!("liability '{}' amount", l.name), l.amount)?,
                ..l
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    let goals = validate_goals(cli.goals)?;

    if !cli.quiz.is_empty() {
        risk::quiz_score(&cli.quiz)?;
    }

    let mut allocations = BTreeMap::new();
    for saved in cli.allocations {
        for (class, pct) in saved.allocation.iter() {
            percent(&format!("{} {} allocation", saved.bucket.label(), class.label()), pct)?;
        }
        if !validate_allocation(&saved.allocation) {
            return Err(InputError::AllocationSum {
                bucket: saved.bucket.label().to_string(),
                total: saved.allocation.total(),
            });
        }
        allocations.insert(saved.bucket, AllocationChoice::Saved(saved.allocation));
    }

    let snapshot = FinancialSnapshot {
        age: cli.age,
        monthly_income: amount("--monthly-income", cli.monthly_income)?,
        monthly_expenses: amount("--monthly-expenses", cli.monthly_expenses)?,
        holdings,
        liabilities,
        risk_tolerance: cli.risk_tolerance,
        life_cover: amount("--life-cover", cli.life_cover)?,
        health_cover: amount("--health-cover", cli.health_cover)?,
    };

    Ok(PlanInput {
        snapshot,
        goals,
        quiz: if cli.quiz.is_empty() { None } else { Some(cli.quiz) },
        allocations,
        completed_actions: cli.completed_actions,
        candidate_actions: cli.candidate_actions,
        solve_goals: cli.solve_goals,
        fire: FireSettings {
            retirement_age: cli.retirement_age,
            coast_age: cli.coast_age,
            inflation_pct,
        },
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        age: DEFAULT_AGE,
        monthly_income: 0.0,
        monthly_expenses: 0.0,
        holdings: Vec::new(),
        liabilities: Vec::new(),
        goals: Vec::new(),
        quiz: Vec::new(),
        allocations: Vec::new(),
        completed_actions: Vec::new(),
        candidate_actions: None,
        risk_tolerance: DEFAULT_RISK_TOLERANCE,
        life_cover: 0.0,
        health_cover: 0.0,
        retirement_age: DEFAULT_RETIREMENT_AGE,
        coast_age: DEFAULT_COAST_AGE,
        inflation_rate: DEFAULT_INFLATION_RATE,
        solve_goals: false,
    }
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanInput, InputError> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| InputError::Payload(e.to_string()))?;
    plan_request_from_payload(payload)
}

fn plan_request_from_payload(payload: PlanPayload) -> Result<PlanInput, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.holdings {
        cli.holdings = v;
    }
    if let Some(v) = payload.liabilities {
        cli.liabilities = v;
    }
    if let Some(v) = payload.goals {
        cli.goals = v;
    }
    if let Some(v) = payload.quiz {
        cli.quiz = v;
    }
    if let Some(v) = payload.allocations {
        cli.allocations = v
            .into_iter()
            .map(|(bucket, allocation)| BucketAllocation { bucket, allocation })
            .collect();
    }
    if let Some(v) = payload.completed_actions {
        cli.completed_actions = v;
    }
    if let Some(v) = payload.actions {
        cli.candidate_actions = Some(v);
    }
    if let Some(v) = payload.risk_tolerance {
        cli.risk_tolerance = v;
    }
    if let Some(v) = payload.life_cover {
        cli.life_cover = v;
    }
    if let Some(v) = payload.health_cover {
        cli.health_cover = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.coast_age {
        cli.coast_age = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.solve_goals {
        cli.solve_goals = v;
    }

    build_request(cli)
}

fn solve_goals(records: Vec<GoalRecord>) -> Result<SolveResponse, InputError> {
    let goals = validate_goals(records)?
        .iter()
        .map(|record| {
            let mut goal = Goal::from_record(record);
            let solver = goal.solve_contribution();
            GoalSolution {
                bucket: goal.bucket(),
                expected_return: goal.expected_return(),
                goal,
                solver,
            }
        })
        .collect::<Vec<_>>();
    let total_monthly_contribution = goals.iter().map(|s| s.goal.monthly_contribution()).sum();
    Ok(SolveResponse {
        goals,
        total_monthly_contribution,
    })
}

fn ideal_response(query: IdealQuery) -> Result<IdealResponse, InputError> {
    let risk = match (query.risk, query.score) {
        (Some(risk), _) => risk,
        (None, Some(score)) => risk::categorize(score),
        (None, None) => return Err(InputError::MissingRisk),
    };
    let buckets = match query.bucket {
        Some(bucket) => vec![bucket],
        None => GoalBucket::ALL.to_vec(),
    };
    Ok(IdealResponse {
        risk,
        buckets: buckets
            .into_iter()
            .map(|bucket| {
                let allocation = ideal_allocation(risk, bucket);
                IdealBucket {
                    bucket,
                    expected_return: weighted_return(&allocation),
                    allocation,
                }
            })
            .collect(),
    })
}

/// Parses CLI arguments and returns the plan report as pretty JSON.
pub fn run_cli<I, T>(args: I) -> Result<String, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let input = build_request(cli)?;
    let report = build_plan(&input);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/plan", post(plan_handler))
        .route("/api/goals/solve", post(solve_handler))
        .route("/api/allocation/ideal", get(ideal_handler))
        .route("/api/risk/questions", get(questions_handler))
        .route("/api/actions/rank", post(rank_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "sipplan HTTP API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/health");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn plan_handler(payload: Result<Json<PlanPayload>, JsonRejection>) -> Response {
    let request = match payload
        .map_err(|e| InputError::Payload(e.body_text()))
        .and_then(|Json(payload)| plan_request_from_payload(payload))
    {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "rejected plan request");
            return err.into_response();
        }
    };

    let report = build_plan(&request);
    tracing::info!(
        score = report.risk.score,
        category = ?report.risk.category,
        goals = report.goals.len(),
        required_monthly = report.aggregate.total_required_monthly,
        actions = report.actions.len(),
        "plan built"
    );
    json_response(StatusCode::OK, report)
}

async fn solve_handler(payload: Result<Json<SolvePayload>, JsonRejection>) -> Response {
    let result = payload
        .map_err(|e| InputError::Payload(e.body_text()))
        .and_then(|Json(payload)| solve_goals(payload.goals));
    match result {
        Ok(response) => {
            tracing::info!(goals = response.goals.len(), "goals solved");
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejected solve request");
            err.into_response()
        }
    }
}

async fn ideal_handler(query: Result<Query<IdealQuery>, QueryRejection>) -> Response {
    let result = query
        .map_err(|e| InputError::Payload(e.body_text()))
        .and_then(|Query(query)| ideal_response(query));
    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => err.into_response(),
    }
}

async fn questions_handler() -> Response {
    json_response(StatusCode::OK, &RISK_QUESTIONS)
}

async fn rank_handler(payload: Result<Json<RankPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => json_response(
            StatusCode::OK,
            RankResponse {
                actions: rank_pending(payload.actions, &payload.completed_actions),
            },
        ),
        Err(rejection) => InputError::Payload(rejection.body_text()).into_response(),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
