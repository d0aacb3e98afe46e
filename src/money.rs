//! Helpers for monetary values and the totals shared by the summary endpoints.

use serde::Serialize;

/// Round `value` to whole cents, with halves rounded away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The overall income, expenses and their difference across a set of summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub net_balance: f64,
}

impl Totals {
    /// Sum `(income, expense)` pairs into overall totals.
    pub fn from_income_and_expenses(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (total_income, total_expense) = pairs
            .into_iter()
            .fold((0.0, 0.0), |(income, expense), (row_income, row_expense)| {
                (income + row_income, expense + row_expense)
            });

        let total_income = round_to_cents(total_income);
        let total_expense = round_to_cents(total_expense);

        Self {
            total_income,
            total_expense,
            net_balance: round_to_cents(total_income - total_expense),
        }
    }
}

#[cfg(test)]
mod round_to_cents_tests {
    use super::round_to_cents;

    #[test]
    fn keeps_whole_cents() {
        assert_eq!(round_to_cents(12.34), 12.34);
    }

    #[test]
    fn rounds_half_cents_away_from_zero() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(-0.125), -0.13);
    }

    #[test]
    fn drops_sub_cent_amounts() {
        assert_eq!(round_to_cents(0.004), 0.0);
    }
}
