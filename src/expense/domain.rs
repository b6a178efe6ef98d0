//! Core expense domain types.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::{Date, OffsetDateTime};

use crate::{
    attachment::Attachment, database_id::ExpenseId, filter::SearchableRecord, money::Currency,
    session::UserId,
};

/// The fixed set of expense categories offered by the UI.
///
/// Rows inserted outside the app may carry labels not in the fixed set;
/// these are preserved in the [ExpenseCategory::Unknown] variant so that
/// aggregation treats them as their own bucket instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    FoodAndDining,
    Transportation,
    Shopping,
    Entertainment,
    BillsAndUtilities,
    Healthcare,
    Travel,
    Education,
    Other,
    /// A label outside the fixed set, preserved verbatim.
    Unknown(String),
}

impl ExpenseCategory {
    /// The fixed set, in the order shown in selectors.
    pub const FIXED: [ExpenseCategory; 9] = [
        ExpenseCategory::FoodAndDining,
        ExpenseCategory::Transportation,
        ExpenseCategory::Shopping,
        ExpenseCategory::Entertainment,
        ExpenseCategory::BillsAndUtilities,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Travel,
        ExpenseCategory::Education,
        ExpenseCategory::Other,
    ];

    /// The display label, e.g. "Food & Dining".
    pub fn label(&self) -> &str {
        match self {
            ExpenseCategory::FoodAndDining => "Food & Dining",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::BillsAndUtilities => "Bills & Utilities",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Other => "Other",
            ExpenseCategory::Unknown(label) => label,
        }
    }

    /// Parse a label, falling back to [ExpenseCategory::Unknown] for labels
    /// outside the fixed set.
    pub fn from_label(label: &str) -> Self {
        ExpenseCategory::FIXED
            .into_iter()
            .find(|category| category.label() == label)
            .unwrap_or_else(|| ExpenseCategory::Unknown(label.to_owned()))
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl ToSql for ExpenseCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for ExpenseCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(ExpenseCategory::from_label)
    }
}

/// An expense: an event where money was spent.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The ID of the user the expense belongs to.
    pub user_id: UserId,
    /// The amount of money spent. Always non-negative.
    pub amount: f64,
    /// A text description of what the expense was for.
    pub description: String,
    /// The category of the expense.
    pub category: ExpenseCategory,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// When the expense happened.
    pub date: Date,
    /// Whether the category was filled in by the keyword heuristic.
    pub ai_suggested: bool,
    /// When the row was created, assigned by the store.
    pub created_at: OffsetDateTime,
    /// Files attached to the expense. Only populated by fetch; add returns
    /// the bare record and callers re-fetch to pick attachments up.
    pub attachments: Vec<Attachment>,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            date,
            description: description.to_owned(),
            category: ExpenseCategory::Other,
            currency: Currency::Inr,
            ai_suggested: false,
        }
    }
}

impl SearchableRecord for Expense {
    fn description(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> &str {
        self.category.label()
    }
}

/// A builder for creating [Expense] records.
///
/// Optional fields default to the values the expense form starts with:
/// category "Other", currency INR, heuristic flag off.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// The amount of money spent. Must be non-negative.
    pub amount: f64,
    /// When the expense happened.
    pub date: Date,
    /// A text description of what the expense was for.
    pub description: String,
    /// The category of the expense.
    pub category: ExpenseCategory,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// Whether the category was filled in by the keyword heuristic.
    pub ai_suggested: bool,
}

impl ExpenseBuilder {
    /// Set the category.
    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the currency.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Mark the category as chosen by the keyword heuristic.
    pub fn ai_suggested(mut self, ai_suggested: bool) -> Self {
        self.ai_suggested = ai_suggested;
        self
    }
}
