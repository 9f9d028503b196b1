/// Compounds `principal` forward at `annual_rate` (a fraction, e.g. 0.06) for `years`.
///
/// Negative principals (deficits) are projected the same way. Non-positive spans
/// return the principal unchanged.
pub fn project(principal: f64, annual_rate: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return principal;
    }
    principal * (1.0 + annual_rate).powf(years)
}

pub fn percent_to_rate(pct: f64) -> f64 {
    pct / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn zero_years_returns_principal() {
        assert_eq!(project(1_234.5, 0.11, 0.0), 1_234.5);
        assert_eq!(project(-500.0, 0.2, 0.0), -500.0);
    }

    #[test]
    fn compounds_annually() {
        assert_close(project(2_000_000.0, 0.06, 10.0), 3_581_695.39, 0.01);
        assert_close(project(100.0, 0.10, 2.0), 121.0, 1e-9);
    }

    #[test]
    fn deficit_is_projected_symmetrically() {
        let positive = project(10_000.0, 0.08, 5.0);
        let negative = project(-10_000.0, 0.08, 5.0);
        assert_close(negative, -positive, 1e-9);
    }

    #[test]
    fn percent_conversion_divides_once() {
        assert_close(percent_to_rate(6.0), 0.06, 1e-12);
        assert_close(project(100.0, percent_to_rate(50.0), 1.0), 150.0, 1e-9);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_non_negative_principal_stays_non_negative(
            principal in 0u32..50_000_000,
            rate_bp in -10_000i32..5_000,
            years in 0u32..60
        ) {
            let value = project(principal as f64, rate_bp as f64 / 10_000.0, years as f64);
            prop_assert!(value >= 0.0);
        }

        #[test]
        fn prop_zero_span_is_identity(principal in -1_000_000i64..1_000_000, rate_bp in -5_000i32..5_000) {
            let p = principal as f64;
            prop_assert_eq!(project(p, rate_bp as f64 / 10_000.0, 0.0), p);
        }
    }
}
