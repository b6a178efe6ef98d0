//! Period report aggregation and the plain-text report document.

use serde::Deserialize;
use time::{Date, Month};

use crate::{
    expense::Expense,
    filter::last_day_of_month,
    income::Income,
    money::{Currency, format_money},
};

use super::breakdown::{CategoryShare, category_breakdown};

/// The reporting period, always anchored to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// The current calendar month.
    #[default]
    Monthly,
    /// The current quarter (three-month block starting at a quarter
    /// boundary).
    Quarterly,
    /// The current calendar year.
    Yearly,
}

impl ReportPeriod {
    /// Every period, in the order shown in selectors.
    pub const ALL_VALUES: [ReportPeriod; 3] = [
        ReportPeriod::Monthly,
        ReportPeriod::Quarterly,
        ReportPeriod::Yearly,
    ];

    /// The value used in form submissions.
    pub fn as_query_value(self) -> &'static str {
        match self {
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Quarterly => "quarterly",
            ReportPeriod::Yearly => "yearly",
        }
    }

    /// The label shown in the period selector.
    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::Monthly => "Monthly Report",
            ReportPeriod::Quarterly => "Quarterly Report",
            ReportPeriod::Yearly => "Yearly Report",
        }
    }

    /// The noun used in insight sentences, e.g. "month" in
    /// "You saved X this month."
    fn noun(self) -> &'static str {
        match self {
            ReportPeriod::Monthly => "month",
            ReportPeriod::Quarterly => "quarter",
            ReportPeriod::Yearly => "year",
        }
    }
}

/// The inclusive date window a report covers, with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    /// The first day of the period.
    pub start: Date,
    /// The last day of the period.
    pub end: Date,
    /// The display label, e.g. "June 2024", "Q2 2024", "2024".
    pub label: String,
}

/// Compute the date window for a period anchored at `today`.
pub fn period_window(period: ReportPeriod, today: Date) -> PeriodWindow {
    let year = today.year();

    match period {
        ReportPeriod::Monthly => {
            let month = today.month();
            PeriodWindow {
                start: Date::from_calendar_date(year, month, 1)
                    .expect("the first of a month is always valid"),
                end: Date::from_calendar_date(year, month, last_day_of_month(year, month))
                    .expect("the last day of a month is always valid"),
                label: format!("{} {year}", month_name(month)),
            }
        }
        ReportPeriod::Quarterly => {
            let quarter_index = (u8::from(today.month()) - 1) / 3;
            let start_month = Month::try_from(quarter_index * 3 + 1)
                .expect("quarter start month is in 1..=10");
            let end_month = Month::try_from(quarter_index * 3 + 3)
                .expect("quarter end month is in 3..=12");

            PeriodWindow {
                start: Date::from_calendar_date(year, start_month, 1)
                    .expect("the first of a month is always valid"),
                end: Date::from_calendar_date(
                    year,
                    end_month,
                    last_day_of_month(year, end_month),
                )
                .expect("the last day of a month is always valid"),
                label: format!("Q{} {year}", quarter_index + 1),
            }
        }
        ReportPeriod::Yearly => PeriodWindow {
            start: Date::from_calendar_date(year, Month::January, 1)
                .expect("January 1st is always valid"),
            end: Date::from_calendar_date(year, Month::December, 31)
                .expect("December 31st is always valid"),
            label: format!("{year}"),
        },
    }
}

/// One line in a top-transactions list.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLine {
    /// The record's description.
    pub description: String,
    /// The record's amount.
    pub amount: f64,
    /// The record's category label.
    pub category: String,
}

/// Everything a period report displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    /// The period the report covers.
    pub period: ReportPeriod,
    /// The display label of the covered window.
    pub period_label: String,
    /// The sum of income amounts in the window.
    pub total_income: f64,
    /// The sum of expense amounts in the window.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_savings: f64,
    /// `net / income * 100`, or 0 when there is no income.
    pub savings_rate: f64,
    /// Per-category income sums, largest first.
    pub income_by_category: Vec<CategoryShare>,
    /// Per-category expense sums, largest first.
    pub expenses_by_category: Vec<CategoryShare>,
    /// The five largest expenses.
    pub top_expenses: Vec<TransactionLine>,
    /// The five largest income records.
    pub top_income: Vec<TransactionLine>,
    /// How many records the window contains, both sides combined.
    pub transaction_count: usize,
    /// Total expenses divided by 30. The divisor is fixed at 30 for every
    /// period length, including quarterly and yearly reports.
    pub average_daily_spending: f64,
}

impl ReportSummary {
    /// The one-line insight: saved or overspent.
    pub fn insight(&self) -> String {
        let noun = self.period.noun();

        if self.net_savings > 0.0 {
            format!(
                "✓ Great job! You saved {} this {noun}.",
                format_money(self.net_savings, Currency::Inr)
            )
        } else {
            format!(
                "⚠ You overspent by {} this {noun}. Consider reviewing your expenses.",
                format_money(self.net_savings.abs(), Currency::Inr)
            )
        }
    }

    /// The single largest expense category, if any expenses exist.
    pub fn highest_expense_category(&self) -> Option<&CategoryShare> {
        self.expenses_by_category.first()
    }
}

/// Build a report for the period anchored at `today` from already-loaded
/// record slices.
pub fn build_report(
    period: ReportPeriod,
    today: Date,
    expenses: &[Expense],
    income: &[Income],
) -> ReportSummary {
    let window = period_window(period, today);
    let in_window = |date: Date| date >= window.start && date <= window.end;

    let expenses: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| in_window(expense.date))
        .collect();
    let income: Vec<&Income> = income
        .iter()
        .filter(|record| in_window(record.date))
        .collect();

    let total_income: f64 = income.iter().map(|record| record.amount).sum();
    let total_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    ReportSummary {
        period,
        period_label: window.label,
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        income_by_category: category_breakdown(
            income
                .iter()
                .map(|record| (record.category.label(), record.amount)),
        ),
        expenses_by_category: category_breakdown(
            expenses
                .iter()
                .map(|expense| (expense.category.label(), expense.amount)),
        ),
        top_expenses: top_transactions(
            expenses
                .iter()
                .map(|expense| TransactionLine {
                    description: expense.description.clone(),
                    amount: expense.amount,
                    category: expense.category.label().to_owned(),
                }),
        ),
        top_income: top_transactions(income.iter().map(|record| TransactionLine {
            description: record.description.clone(),
            amount: record.amount,
            category: record.category.label().to_owned(),
        })),
        transaction_count: expenses.len() + income.len(),
        // Daily average always uses a 30-day divisor, even for quarterly and
        // yearly periods.
        average_daily_spending: total_expenses / 30.0,
    }
}

/// The five largest transactions by amount, descending.
fn top_transactions(lines: impl Iterator<Item = TransactionLine>) -> Vec<TransactionLine> {
    let mut lines: Vec<TransactionLine> = lines.collect();
    lines.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    lines.truncate(5);
    lines
}

/// Render the report as the plain-text document that is copied to the
/// clipboard.
pub fn render_report_text(
    report: &ReportSummary,
    generated_on: Date,
    custom_requirements: Option<&str>,
) -> String {
    let money = |amount: f64| format_money(amount, Currency::Inr);

    let mut text = String::new();

    text.push_str(&format!("FINANCIAL REPORT - {}\n", report.period_label));
    text.push_str(&format!("Generated on: {generated_on}\n\n"));

    text.push_str("SUMMARY:\n--------\n");
    text.push_str(&format!("Total Income: {}\n", money(report.total_income)));
    text.push_str(&format!(
        "Total Expenses: {}\n",
        money(report.total_expenses)
    ));
    text.push_str(&format!("Net Savings: {}\n", money(report.net_savings)));
    if report.total_income > 0.0 {
        text.push_str(&format!("Savings Rate: {:.1}%\n\n", report.savings_rate));
    } else {
        text.push_str("Savings Rate: 0%\n\n");
    }

    text.push_str("INCOME BREAKDOWN:\n----------------\n");
    for share in &report.income_by_category {
        text.push_str(&format!("{}: {}\n", share.label, money(share.total)));
    }

    text.push_str("\nEXPENSE BREAKDOWN:\n-----------------\n");
    for share in &report.expenses_by_category {
        text.push_str(&format!("{}: {}\n", share.label, money(share.total)));
    }

    text.push_str("\nTOP EXPENSES:\n------------\n");
    for line in &report.top_expenses {
        text.push_str(&format!(
            "{}: {} ({})\n",
            line.description,
            money(line.amount),
            line.category
        ));
    }

    text.push_str("\nTOP INCOME SOURCES:\n------------------\n");
    for line in &report.top_income {
        text.push_str(&format!(
            "{}: {} ({})\n",
            line.description,
            money(line.amount),
            line.category
        ));
    }

    if let Some(custom_requirements) = custom_requirements
        && !custom_requirements.trim().is_empty()
    {
        text.push_str(&format!("\nCUSTOM REQUIREMENTS:\n{custom_requirements}\n"));
    }

    text.push_str("\nINSIGHTS & RECOMMENDATIONS:\n--------------------------\n");
    text.push_str(&report.insight());
    text.push('\n');

    if let Some(highest) = report.highest_expense_category() {
        text.push_str(&format!(
            "\nYour highest expense category is {} at {}.\n",
            highest.label,
            money(highest.total)
        ));
    }

    text.push_str(&format!(
        "\nTotal Transactions: {}\n",
        report.transaction_count
    ));
    text.push_str(&format!(
        "Average Daily Spending: {}\n",
        money(report.average_daily_spending)
    ));

    text
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}



#[cfg(test)]
mod render_report_text_tests {
    use time::macros::date;

    use crate::{
        aggregate::fixtures::{test_expense, test_income},
        expense::ExpenseCategory,
    };

    use super::{ReportPeriod, build_report, render_report_text};

    #[test]
    fn renders_all_sections() {
        let expenses = vec![test_expense(
            45.99,
            ExpenseCategory::FoodAndDining,
            date!(2024 - 06 - 10),
        )];
        let income = vec![test_income(1000.0, date!(2024 - 06 - 01))];

        let report = build_report(ReportPeriod::Monthly, date!(2024 - 06 - 24), &expenses, &income);
        let text = render_report_text(&report, date!(2024 - 06 - 24), None);

        assert!(text.contains("FINANCIAL REPORT - June 2024"));
        assert!(text.contains("SUMMARY:"));
        assert!(text.contains("Total Income: ₹1,000.00"));
        assert!(text.contains("Total Expenses: ₹45.99"));
        assert!(text.contains("INCOME BREAKDOWN:"));
        assert!(text.contains("EXPENSE BREAKDOWN:"));
        assert!(text.contains("TOP EXPENSES:"));
        assert!(text.contains("TOP INCOME SOURCES:"));
        assert!(text.contains("INSIGHTS & RECOMMENDATIONS:"));
        assert!(text.contains("Your highest expense category is Food & Dining"));
        assert!(text.contains("Total Transactions: 2"));
        assert!(text.contains("Average Daily Spending:"));
    }

    #[test]
    fn custom_requirements_appear_when_present() {
        let report = build_report(ReportPeriod::Monthly, date!(2024 - 06 - 24), &[], &[]);

        let with = render_report_text(&report, date!(2024 - 06 - 24), Some("Focus on groceries"));
        assert!(with.contains("CUSTOM REQUIREMENTS:\nFocus on groceries"));

        let without = render_report_text(&report, date!(2024 - 06 - 24), Some("   "));
        assert!(!without.contains("CUSTOM REQUIREMENTS:"));
    }

    #[test]
    fn zero_income_renders_zero_percent_savings_rate() {
        let expenses = vec![test_expense(
            50.0,
            ExpenseCategory::Other,
            date!(2024 - 06 - 10),
        )];

        let report = build_report(ReportPeriod::Monthly, date!(2024 - 06 - 24), &expenses, &[]);
        let text = render_report_text(&report, date!(2024 - 06 - 24), None);

        assert!(text.contains("Savings Rate: 0%"));
        assert!(text.contains("Net Savings: -₹50.00"));
    }
}
