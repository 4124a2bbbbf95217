//! Fixed-percentage monthly salary decomposition.
//!
//! Monthly gross = annual CTC / 12, split as:
//! - basic 50%, HRA 20% (each rounded)
//! - conveyance 1600 and medical 1250 (fixed)
//! - special = the remainder, which absorbs rounding and may go negative
//!   for very low CTC values.

use serde::Serialize;

/// One lakh in rupees.
pub const LAKH: f64 = 100_000.0;
pub const MONTHLY_CONVEYANCE: i64 = 1600;
pub const MONTHLY_MEDICAL: i64 = 1250;

const BASIC_SHARE: f64 = 0.50;
const HRA_SHARE: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    pub monthly_basic: i64,
    #[serde(rename = "monthlyHRA")]
    pub monthly_hra: i64,
    pub monthly_conveyance: i64,
    pub monthly_medical: i64,
    pub monthly_special: i64,
    pub total_monthly_gross: i64,
    /// Annual CTC exactly as supplied.
    pub total_annual_gross: f64,
}

pub fn annual_ctc_from_lpa(salary_lpa: f64) -> f64 {
    salary_lpa * LAKH
}

/// Zero and negative inputs are evaluated as-is.
pub fn calculate_breakdown(annual_ctc: f64) -> SalaryBreakdown {
    let monthly_gross = annual_ctc / 12.0;
    let basic = monthly_gross * BASIC_SHARE;
    let hra = monthly_gross * HRA_SHARE;
    let special =
        monthly_gross - (basic + hra + MONTHLY_CONVEYANCE as f64 + MONTHLY_MEDICAL as f64);

    SalaryBreakdown {
        monthly_basic: round_half_up(basic),
        monthly_hra: round_half_up(hra),
        monthly_conveyance: MONTHLY_CONVEYANCE,
        monthly_medical: MONTHLY_MEDICAL,
        monthly_special: round_half_up(special),
        total_monthly_gross: round_half_up(monthly_gross),
        total_annual_gross: annual_ctc,
    }
}

/// Rounds .5 toward positive infinity (-2.5 becomes -2).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_sum(b: &SalaryBreakdown) -> i64 {
        b.monthly_basic + b.monthly_hra + b.monthly_conveyance + b.monthly_medical + b.monthly_special
    }

    #[test]
    fn test_twelve_lakh_breakdown() {
        let b = calculate_breakdown(1_200_000.0);
        assert_eq!(b.total_monthly_gross, 100_000);
        assert_eq!(b.monthly_basic, 50_000);
        assert_eq!(b.monthly_hra, 20_000);
        assert_eq!(b.monthly_conveyance, 1_600);
        assert_eq!(b.monthly_medical, 1_250);
        assert_eq!(b.monthly_special, 27_150);
        assert_eq!(b.total_annual_gross, 1_200_000.0);
    }

    #[test]
    fn test_components_sum_to_gross_within_rounding() {
        for ctc in [250_000.0, 333_333.0, 455_000.0, 777_777.0, 1_050_000.0, 2_499_999.0] {
            let b = calculate_breakdown(ctc);
            let diff = (component_sum(&b) - b.total_monthly_gross).abs();
            assert!(diff <= 3, "ctc {ctc}: components off by {diff}");
        }
    }

    #[test]
    fn test_low_ctc_gives_negative_special() {
        // 30,000 / 12 = 2,500 gross; fixed allowances alone are 2,850.
        let b = calculate_breakdown(30_000.0);
        assert_eq!(b.total_monthly_gross, 2_500);
        assert_eq!(b.monthly_special, -2_100);
    }

    #[test]
    fn test_zero_ctc_is_evaluated() {
        let b = calculate_breakdown(0.0);
        assert_eq!(b.monthly_basic, 0);
        assert_eq!(b.total_monthly_gross, 0);
        assert_eq!(b.monthly_special, -2_850);
    }

    #[test]
    fn test_round_half_up_matches_source_rounding() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn test_lpa_conversion() {
        assert_eq!(annual_ctc_from_lpa(12.0), 1_200_000.0);
    }

    #[test]
    fn test_breakdown_serializes_with_source_keys() {
        let value = serde_json::to_value(calculate_breakdown(1_200_000.0)).unwrap();
        assert_eq!(value["monthlyHRA"], 20_000);
        assert_eq!(value["monthlySpecial"], 27_150);
        assert_eq!(value["totalMonthlyGross"], 100_000);
    }
}
