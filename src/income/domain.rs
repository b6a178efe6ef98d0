//! Core income domain types.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::{Date, OffsetDateTime};

use crate::{
    database_id::IncomeId, filter::SearchableRecord, money::Currency, session::UserId,
};

/// The fixed set of income categories offered by the UI.
///
/// As with expenses, labels inserted outside the app are preserved in the
/// [IncomeCategory::Unknown] variant and aggregate as their own bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Business,
    Investments,
    Rental,
    Bonus,
    Gift,
    Other,
    /// A label outside the fixed set, preserved verbatim.
    Unknown(String),
}

impl IncomeCategory {
    /// The fixed set, in the order shown in selectors.
    pub const FIXED: [IncomeCategory; 8] = [
        IncomeCategory::Salary,
        IncomeCategory::Freelance,
        IncomeCategory::Business,
        IncomeCategory::Investments,
        IncomeCategory::Rental,
        IncomeCategory::Bonus,
        IncomeCategory::Gift,
        IncomeCategory::Other,
    ];

    /// The display label, e.g. "Salary".
    pub fn label(&self) -> &str {
        match self {
            IncomeCategory::Salary => "Salary",
            IncomeCategory::Freelance => "Freelance",
            IncomeCategory::Business => "Business",
            IncomeCategory::Investments => "Investments",
            IncomeCategory::Rental => "Rental",
            IncomeCategory::Bonus => "Bonus",
            IncomeCategory::Gift => "Gift",
            IncomeCategory::Other => "Other",
            IncomeCategory::Unknown(label) => label,
        }
    }

    /// Parse a label, falling back to [IncomeCategory::Unknown] for labels
    /// outside the fixed set.
    pub fn from_label(label: &str) -> Self {
        IncomeCategory::FIXED
            .into_iter()
            .find(|category| category.label() == label)
            .unwrap_or_else(|| IncomeCategory::Unknown(label.to_owned()))
    }
}

impl Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl ToSql for IncomeCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for IncomeCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(IncomeCategory::from_label)
    }
}

/// An income record: an event where money was earned.
///
/// To create a new `Income`, use [Income::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    /// The ID of the income record.
    pub id: IncomeId,
    /// The ID of the user the record belongs to.
    pub user_id: UserId,
    /// The amount of money earned. Always non-negative.
    pub amount: f64,
    /// A text description of where the money came from.
    pub description: String,
    /// The category of the income.
    pub category: IncomeCategory,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// When the income was received.
    pub date: Date,
    /// When the row was created, assigned by the store.
    pub created_at: OffsetDateTime,
    /// Blob store keys of files attached to the record.
    pub file_attachments: Vec<String>,
}

impl Income {
    /// Create a new income record.
    ///
    /// Shortcut for [IncomeBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> IncomeBuilder {
        IncomeBuilder {
            amount,
            date,
            description: description.to_owned(),
            category: IncomeCategory::Other,
            currency: Currency::Usd,
        }
    }
}

impl SearchableRecord for Income {
    fn description(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> &str {
        self.category.label()
    }
}

/// A builder for creating [Income] records.
///
/// Optional fields default to the values the income form starts with:
/// category "Other", currency USD.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeBuilder {
    /// The amount of money earned. Must be non-negative.
    pub amount: f64,
    /// When the income was received.
    pub date: Date,
    /// A text description of where the money came from.
    pub description: String,
    /// The category of the income.
    pub category: IncomeCategory,
    /// The currency the amount is denominated in.
    pub currency: Currency,
}

impl IncomeBuilder {
    /// Set the category.
    pub fn category(mut self, category: IncomeCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the currency.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
