//! Late fee calculation.
//!
//! A stateless domain service: the calculation involves policy that does
//! not belong to the loan itself (rates could later vary by book or member
//! type), so it lives outside the aggregate.

use chrono::{NaiveDate, Utc};

use crate::loan::{Loan, LoanError};
use crate::values::Money;

/// Daily rate for the first tier, in cents.
const TIER_1_DAILY_CENTS: u64 = 50;
/// Daily rate for days 8 through 14, in cents.
const TIER_2_DAILY_CENTS: u64 = 100;
/// Daily rate from day 15 on, in cents.
const TIER_3_DAILY_CENTS: u64 = 200;

/// Last day covered by the first tier.
const TIER_1_END: u64 = 7;
/// Last day covered by the second tier.
const TIER_2_END: u64 = 14;

/// Calculates late fees over a tiered daily rate:
/// days 1–7 at 0.50/day, days 8–14 at 1.00/day, days 15+ at 2.00/day.
///
/// Ten days overdue works out to 7 × 0.50 + 3 × 1.00 = 6.50 EUR.
#[derive(Debug, Clone, Copy, Default)]
pub struct LateFeeCalculator;

impl LateFeeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculates the late fee for an overdue loan as of today.
    ///
    /// Fails if the loan is not overdue.
    pub fn calculate(&self, loan: &Loan) -> Result<Money, LoanError> {
        self.calculate_as_of(loan, Utc::now().date_naive())
    }

    /// Calculates the late fee for an overdue loan as of the given date.
    pub fn calculate_as_of(&self, loan: &Loan, as_of: NaiveDate) -> Result<Money, LoanError> {
        if !loan.is_overdue_as_of(as_of) {
            return Err(LoanError::NotOverdue);
        }
        Ok(fee_for_days(loan.days_overdue_as_of(as_of)))
    }

    /// Estimates the fee if a loan were to run `projected_days` late.
    ///
    /// Returns a zero fee for non-positive input; the loan does not have to
    /// be overdue.
    pub fn estimate(&self, projected_days: i64) -> Money {
        fee_for_days(projected_days)
    }

    /// Returns the per-day rate currently applying at `days_overdue`,
    /// zero when not overdue.
    pub fn daily_rate(&self, days_overdue: i64) -> Money {
        if days_overdue <= 0 {
            Money::eur(0)
        } else if days_overdue as u64 <= TIER_1_END {
            Money::eur(TIER_1_DAILY_CENTS)
        } else if days_overdue as u64 <= TIER_2_END {
            Money::eur(TIER_2_DAILY_CENTS)
        } else {
            Money::eur(TIER_3_DAILY_CENTS)
        }
    }
}

/// Sums the three non-overlapping tier contributions.
fn fee_for_days(days_overdue: i64) -> Money {
    if days_overdue <= 0 {
        return Money::eur(0);
    }
    let days = days_overdue as u64;

    let tier_1_days = days.min(TIER_1_END);
    let tier_2_days = days.saturating_sub(TIER_1_END).min(TIER_2_END - TIER_1_END);
    let tier_3_days = days.saturating_sub(TIER_2_END);

    Money::eur(
        tier_1_days * TIER_1_DAILY_CENTS
            + tier_2_days * TIER_2_DAILY_CENTS
            + tier_3_days * TIER_3_DAILY_CENTS,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use common::{BookId, LoanId, MemberId};

    use crate::loan::LOAN_PERIOD_DAYS;

    use super::*;

    fn loan_overdue_by(days: u64) -> Loan {
        let borrowed = Utc::now().date_naive() - Days::new(LOAN_PERIOD_DAYS + days);
        Loan::new_on(
            LoanId::generate(),
            BookId::generate(),
            MemberId::generate(),
            borrowed,
        )
    }

    #[test]
    fn fee_for_loan_not_overdue_fails() {
        let loan = Loan::new(LoanId::generate(), BookId::generate(), MemberId::generate());
        let calculator = LateFeeCalculator::new();
        assert_eq!(calculator.calculate(&loan), Err(LoanError::NotOverdue));
    }

    #[test]
    fn ten_days_overdue_costs_six_fifty() {
        let calculator = LateFeeCalculator::new();
        let loan = loan_overdue_by(10);
        assert_eq!(calculator.calculate(&loan).unwrap(), Money::eur(650));
    }

    #[test]
    fn tier_boundaries() {
        let calculator = LateFeeCalculator::new();
        assert_eq!(calculator.estimate(1), Money::eur(50));
        assert_eq!(calculator.estimate(7), Money::eur(350));
        assert_eq!(calculator.estimate(8), Money::eur(450));
        assert_eq!(calculator.estimate(14), Money::eur(1050));
        assert_eq!(calculator.estimate(15), Money::eur(1250));
        assert_eq!(calculator.estimate(30), Money::eur(4250));
    }

    #[test]
    fn estimate_for_non_positive_days_is_zero() {
        let calculator = LateFeeCalculator::new();
        assert_eq!(calculator.estimate(0), Money::eur(0));
        assert_eq!(calculator.estimate(-5), Money::eur(0));
    }

    #[test]
    fn daily_rate_follows_tiers() {
        let calculator = LateFeeCalculator::new();
        assert_eq!(calculator.daily_rate(0), Money::eur(0));
        assert_eq!(calculator.daily_rate(1), Money::eur(50));
        assert_eq!(calculator.daily_rate(7), Money::eur(50));
        assert_eq!(calculator.daily_rate(8), Money::eur(100));
        assert_eq!(calculator.daily_rate(14), Money::eur(100));
        assert_eq!(calculator.daily_rate(15), Money::eur(200));
    }

    #[test]
    fn returned_loan_has_no_fee() {
        let calculator = LateFeeCalculator::new();
        let mut loan = loan_overdue_by(10);
        loan.return_book().unwrap();
        assert_eq!(calculator.calculate(&loan), Err(LoanError::NotOverdue));
    }

    #[test]
    fn calculate_as_of_is_deterministic() {
        let calculator = LateFeeCalculator::new();
        let loan = Loan::new(LoanId::generate(), BookId::generate(), MemberId::generate());
        let as_of = loan.due_date() + Days::new(10);
        assert_eq!(
            calculator.calculate_as_of(&loan, as_of).unwrap(),
            Money::eur(650)
        );
    }
}
