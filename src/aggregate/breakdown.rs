//! Per-category sums with percentage-of-total shares.

use std::collections::HashMap;

use crate::{expense::Expense, income::Income};

/// One category's share of a breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category label.
    pub label: String,
    /// The summed amount for the category.
    pub total: f64,
    /// The category's share of the grand total, rounded to the nearest
    /// whole percent for display.
    pub percent: i64,
}

/// Group `(label, amount)` pairs by label, summing amounts, sorted by total
/// descending.
///
/// Categories with no matching records simply do not appear; a zero grand
/// total yields an empty breakdown rather than a division by zero.
pub fn category_breakdown<'a>(
    records: impl IntoIterator<Item = (&'a str, f64)>,
) -> Vec<CategoryShare> {
    let mut totals_by_label: HashMap<&str, f64> = HashMap::new();

    for (label, amount) in records {
        *totals_by_label.entry(label).or_insert(0.0) += amount;
    }

    let grand_total: f64 = totals_by_label.values().sum();
    if grand_total <= 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = totals_by_label
        .into_iter()
        .map(|(label, total)| CategoryShare {
            label: label.to_owned(),
            total,
            percent: (total / grand_total * 100.0).round() as i64,
        })
        .collect();

    // Sort by total descending; break ties by label so the order is stable.
    shares.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });

    shares
}

/// The category breakdown of a set of expenses.
pub fn expense_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    category_breakdown(
        expenses
            .iter()
            .map(|expense| (expense.category.label(), expense.amount)),
    )
}

/// The category breakdown of a set of income records.
pub fn income_breakdown(income: &[Income]) -> Vec<CategoryShare> {
    category_breakdown(
        income
            .iter()
            .map(|record| (record.category.label(), record.amount)),
    )
}

#[cfg(test)]
mod breakdown_tests {
    use time::macros::date;

    use crate::{
        aggregate::fixtures::{test_expense, test_income_with},
        expense::ExpenseCategory,
        income::IncomeCategory,
    };

    use super::{category_breakdown, expense_breakdown, income_breakdown};

    #[test]
    fn groups_and_sorts_by_total_descending() {
        let expenses = vec![
            test_expense(10.0, ExpenseCategory::FoodAndDining, date!(2024 - 06 - 01)),
            test_expense(20.0, ExpenseCategory::FoodAndDining, date!(2024 - 06 - 02)),
            test_expense(50.0, ExpenseCategory::Travel, date!(2024 - 06 - 03)),
            test_expense(20.0, ExpenseCategory::Shopping, date!(2024 - 06 - 04)),
        ];

        let shares = expense_breakdown(&expenses);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].label, "Travel");
        assert_eq!(shares[0].total, 50.0);
        assert_eq!(shares[0].percent, 50);
        assert_eq!(shares[1].label, "Food & Dining");
        assert_eq!(shares[1].percent, 30);
        assert_eq!(shares[2].label, "Shopping");
        assert_eq!(shares[2].percent, 20);
    }

    #[test]
    fn percentages_sum_to_about_one_hundred() {
        let expenses = vec![
            test_expense(33.0, ExpenseCategory::FoodAndDining, date!(2024 - 06 - 01)),
            test_expense(33.0, ExpenseCategory::Travel, date!(2024 - 06 - 02)),
            test_expense(34.0, ExpenseCategory::Shopping, date!(2024 - 06 - 03)),
        ];

        let shares = expense_breakdown(&expenses);
        let percent_sum: i64 = shares.iter().map(|share| share.percent).sum();

        // Rounding may move the sum off 100 by at most one per category.
        assert!((98..=102).contains(&percent_sum), "got {percent_sum}");
    }

    #[test]
    fn empty_input_gives_empty_breakdown() {
        assert!(expense_breakdown(&[]).is_empty());
    }

    #[test]
    fn zero_total_gives_empty_breakdown_not_division_by_zero() {
        let expenses = vec![test_expense(
            0.0,
            ExpenseCategory::FoodAndDining,
            date!(2024 - 06 - 01),
        )];

        assert!(expense_breakdown(&expenses).is_empty());
    }

    #[test]
    fn unknown_categories_get_their_own_bucket() {
        let expenses = vec![
            test_expense(10.0, ExpenseCategory::Other, date!(2024 - 06 - 01)),
            test_expense(
                30.0,
                ExpenseCategory::Unknown("Pet Supplies".to_owned()),
                date!(2024 - 06 - 02),
            ),
        ];

        let shares = expense_breakdown(&expenses);

        assert_eq!(shares[0].label, "Pet Supplies");
        assert_eq!(shares[0].percent, 75);
    }

    #[test]
    fn income_breakdown_groups_by_income_category() {
        let income = vec![
            test_income_with(900.0, IncomeCategory::Salary, date!(2024 - 06 - 01)),
            test_income_with(100.0, IncomeCategory::Gift, date!(2024 - 06 - 02)),
        ];

        let shares = income_breakdown(&income);

        assert_eq!(shares[0].label, "Salary");
        assert_eq!(shares[0].percent, 90);
        assert_eq!(shares[1].label, "Gift");
    }

    #[test]
    fn generic_breakdown_accepts_any_labelled_amounts() {
        let shares = category_breakdown(vec![("Salary", 1000.0), ("Gift", 0.0)]);

        // Zero-sum categories still appear as long as the grand total is
        // positive; only empty inputs and zero grand totals vanish.
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].label, "Salary");
        assert_eq!(shares[0].percent, 100);
        assert_eq!(shares[1].percent, 0);
    }
}
