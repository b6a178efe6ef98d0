//! Calendar rollups at day and month granularity.

use time::{Date, Month};

use crate::{expense::Expense, filter::last_day_of_month, income::Income, reminder::Reminder};

/// Which kinds of records fall on one day of a month.
///
/// Day granularity only tracks presence per kind of event; no amounts are
/// aggregated at this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    /// The day of the month, 1-based.
    pub day: u8,
    /// Whether any expense is dated this day.
    pub has_expenses: bool,
    /// Whether any income is dated this day.
    pub has_income: bool,
    /// Whether any reminder falls due this day.
    pub has_reminders: bool,
}

impl DayActivity {
    /// Whether anything at all happens on this day.
    pub fn has_events(&self) -> bool {
        self.has_expenses || self.has_income || self.has_reminders
    }
}

/// For each day of the given month, flag which kinds of records fall on it.
///
/// Returns one entry per day of the month, in order.
pub fn day_activity(
    year: i32,
    month: Month,
    expenses: &[Expense],
    income: &[Income],
    reminders: &[Reminder],
) -> Vec<DayActivity> {
    let days_in_month = last_day_of_month(year, month);

    (1..=days_in_month)
        .map(|day| {
            let matches =
                |date: Date| date.year() == year && date.month() == month && date.day() == day;

            DayActivity {
                day,
                has_expenses: expenses.iter().any(|expense| matches(expense.date)),
                has_income: income.iter().any(|record| matches(record.date)),
                has_reminders: reminders.iter().any(|reminder| matches(reminder.due_date)),
            }
        })
        .collect()
}

/// One month's totals in a year overview.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    /// The month the totals cover.
    pub month: Month,
    /// The sum of expense amounts dated within the month.
    pub expense_total: f64,
    /// The sum of income amounts dated within the month.
    pub income_total: f64,
    /// The number of reminders due within the month.
    pub reminder_count: usize,
}

/// For each of the twelve months of `year`, sum the expenses and income
/// dated within the month and count the reminders due in it.
pub fn month_summaries(
    year: i32,
    expenses: &[Expense],
    income: &[Income],
    reminders: &[Reminder],
) -> Vec<MonthSummary> {
    (1..=12u8)
        .map(|month_number| {
            let month = Month::try_from(month_number).expect("month number is in 1..=12");
            let in_month = |date: Date| date.year() == year && date.month() == month;

            MonthSummary {
                month,
                expense_total: expenses
                    .iter()
                    .filter(|expense| in_month(expense.date))
                    .map(|expense| expense.amount)
                    .sum(),
                income_total: income
                    .iter()
                    .filter(|record| in_month(record.date))
                    .map(|record| record.amount)
                    .sum(),
                reminder_count: reminders
                    .iter()
                    .filter(|reminder| in_month(reminder.due_date))
                    .count(),
            }
        })
        .collect()
}

#[cfg(test)]
mod day_activity_tests {
    use time::{Month, macros::date};

    use crate::{
        aggregate::fixtures::{test_expense, test_income, test_reminder},
        expense::ExpenseCategory,
    };

    use super::day_activity;

    #[test]
    fn flags_days_with_records() {
        let expenses = vec![test_expense(
            10.0,
            ExpenseCategory::Other,
            date!(2024 - 06 - 05),
        )];
        let income = vec![test_income(100.0, date!(2024 - 06 - 12))];
        let reminders = vec![test_reminder(date!(2024 - 06 - 05))];

        let days = day_activity(2024, Month::June, &expenses, &income, &reminders);

        assert_eq!(days.len(), 30);

        let day5 = days[4];
        assert!(day5.has_expenses);
        assert!(!day5.has_income);
        assert!(day5.has_reminders);
        assert!(day5.has_events());

        let day12 = days[11];
        assert!(!day12.has_expenses);
        assert!(day12.has_income);
        assert!(day12.has_events());

        let day1 = days[0];
        assert!(!day1.has_events());
    }

    #[test]
    fn ignores_records_from_other_months_and_years() {
        let expenses = vec![
            test_expense(10.0, ExpenseCategory::Other, date!(2024 - 05 - 05)),
            test_expense(10.0, ExpenseCategory::Other, date!(2023 - 06 - 05)),
        ];

        let days = day_activity(2024, Month::June, &expenses, &[], &[]);

        assert!(days.iter().all(|day| !day.has_events()));
    }

    #[test]
    fn leap_february_has_29_days() {
        let days = day_activity(2024, Month::February, &[], &[], &[]);

        assert_eq!(days.len(), 29);
    }
}

#[cfg(test)]
mod month_summaries_tests {
    use time::{Month, macros::date};

    use crate::{
        aggregate::fixtures::{test_expense, test_income, test_reminder},
        expense::ExpenseCategory,
    };

    use super::month_summaries;

    #[test]
    fn sums_amounts_per_month() {
        let expenses = vec![
            test_expense(10.0, ExpenseCategory::Other, date!(2024 - 01 - 15)),
            test_expense(20.0, ExpenseCategory::Other, date!(2024 - 01 - 20)),
            test_expense(30.0, ExpenseCategory::Other, date!(2024 - 02 - 10)),
        ];
        let income = vec![test_income(1000.0, date!(2024 - 02 - 01))];
        let reminders = vec![
            test_reminder(date!(2024 - 03 - 01)),
            test_reminder(date!(2024 - 03 - 15)),
        ];

        let summaries = month_summaries(2024, &expenses, &income, &reminders);

        assert_eq!(summaries.len(), 12);
        assert_eq!(summaries[0].month, Month::January);
        assert_eq!(summaries[0].expense_total, 30.0);
        assert_eq!(summaries[1].expense_total, 30.0);
        assert_eq!(summaries[1].income_total, 1000.0);
        assert_eq!(summaries[2].reminder_count, 2);
    }

    #[test]
    fn year_total_equals_sum_of_month_totals() {
        // A synthetic set spanning several months; the month rollup must
        // neither double count nor drop records.
        let expenses = vec![
            test_expense(10.0, ExpenseCategory::Other, date!(2024 - 01 - 01)),
            test_expense(20.0, ExpenseCategory::Other, date!(2024 - 01 - 31)),
            test_expense(30.0, ExpenseCategory::Other, date!(2024 - 06 - 15)),
            test_expense(40.0, ExpenseCategory::Other, date!(2024 - 12 - 31)),
            // Outside the year; must not be counted anywhere.
            test_expense(99.0, ExpenseCategory::Other, date!(2023 - 12 - 31)),
        ];
        let income = vec![
            test_income(100.0, date!(2024 - 03 - 01)),
            test_income(200.0, date!(2024 - 03 - 02)),
            test_income(300.0, date!(2025 - 01 - 01)),
        ];

        let summaries = month_summaries(2024, &expenses, &income, &[]);

        let expense_sum: f64 = summaries.iter().map(|summary| summary.expense_total).sum();
        let income_sum: f64 = summaries.iter().map(|summary| summary.income_total).sum();

        let want_expenses: f64 = expenses
            .iter()
            .filter(|expense| expense.date.year() == 2024)
            .map(|expense| expense.amount)
            .sum();
        let want_income: f64 = income
            .iter()
            .filter(|record| record.date.year() == 2024)
            .map(|record| record.amount)
            .sum();

        assert!((expense_sum - want_expenses).abs() < 1e-9);
        assert!((income_sum - want_income).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs_give_twelve_zero_months() {
        let summaries = month_summaries(2024, &[], &[], &[]);

        assert_eq!(summaries.len(), 12);
        assert!(summaries.iter().all(|summary| {
            summary.expense_total == 0.0
                && summary.income_total == 0.0
                && summary.reminder_count == 0
        }));
    }
}
