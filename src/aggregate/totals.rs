//! Income/expense totals and the overspending flag.

use crate::{expense::Expense, income::Income};

/// The headline sums over a set of income and expense records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expenses: f64,
}

impl Totals {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    /// Whether more was spent than earned.
    pub fn is_overspending(&self) -> bool {
        self.net() < 0.0
    }
}

/// Sum the amounts of the given income and expense records.
pub fn compute_totals(income: &[Income], expenses: &[Expense]) -> Totals {
    Totals {
        income: income.iter().map(|record| record.amount).sum(),
        expenses: expenses.iter().map(|record| record.amount).sum(),
    }
}

#[cfg(test)]
mod totals_tests {
    use time::macros::date;

    use crate::{
        aggregate::fixtures::{test_expense, test_income},
        expense::ExpenseCategory,
    };

    use super::compute_totals;

    #[test]
    fn sums_and_net_match_worked_example() {
        let expenses = vec![
            test_expense(45.99, ExpenseCategory::FoodAndDining, date!(2024 - 06 - 24)),
            test_expense(
                89.99,
                ExpenseCategory::BillsAndUtilities,
                date!(2024 - 06 - 22),
            ),
        ];
        let income = vec![test_income(1000.0, date!(2024 - 06 - 01))];

        let totals = compute_totals(&income, &expenses);

        assert!((totals.expenses - 135.98).abs() < 1e-9);
        assert!((totals.income - 1000.0).abs() < 1e-9);
        assert!((totals.net() - 864.02).abs() < 1e-9);
        assert!(!totals.is_overspending());
    }

    #[test]
    fn overspending_when_expenses_exceed_income() {
        let expenses = vec![test_expense(
            50.0,
            ExpenseCategory::Other,
            date!(2024 - 06 - 24),
        )];

        let totals = compute_totals(&[], &expenses);

        assert_eq!(totals.net(), -50.0);
        assert!(totals.is_overspending());
    }

    #[test]
    fn empty_inputs_are_zero_and_not_overspending() {
        let totals = compute_totals(&[], &[]);

        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expenses, 0.0);
        assert!(!totals.is_overspending());
    }
}
