//! Core reminder domain types.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::{Date, OffsetDateTime};

use crate::{database_id::ReminderId, session::UserId};

/// The fixed set of reminder categories.
///
/// Labels are lowercase in storage and in the UI, matching the small
/// actionable vocabulary they come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReminderCategory {
    Loan,
    Bill,
    Medicine,
    Recharge,
    /// A label outside the fixed set, preserved verbatim.
    Unknown(String),
}

impl ReminderCategory {
    /// The fixed set, in the order shown in selectors.
    pub const FIXED: [ReminderCategory; 4] = [
        ReminderCategory::Loan,
        ReminderCategory::Bill,
        ReminderCategory::Medicine,
        ReminderCategory::Recharge,
    ];

    /// The display label, e.g. "bill".
    pub fn label(&self) -> &str {
        match self {
            ReminderCategory::Loan => "loan",
            ReminderCategory::Bill => "bill",
            ReminderCategory::Medicine => "medicine",
            ReminderCategory::Recharge => "recharge",
            ReminderCategory::Unknown(label) => label,
        }
    }

    /// Parse a label, falling back to [ReminderCategory::Unknown] for labels
    /// outside the fixed set.
    pub fn from_label(label: &str) -> Self {
        ReminderCategory::FIXED
            .into_iter()
            .find(|category| category.label() == label)
            .unwrap_or_else(|| ReminderCategory::Unknown(label.to_owned()))
    }
}

impl Display for ReminderCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl ToSql for ReminderCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for ReminderCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(ReminderCategory::from_label)
    }
}

/// A bill/loan reminder with an optional monetary amount.
///
/// To create a new `Reminder`, use [Reminder::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// The ID of the reminder.
    pub id: ReminderId,
    /// The ID of the user the reminder belongs to.
    pub user_id: UserId,
    /// What the reminder is about.
    pub title: String,
    /// Optional free-form detail text.
    pub description: Option<String>,
    /// The category of the reminder.
    pub category: ReminderCategory,
    /// When the reminder falls due.
    pub due_date: Date,
    /// The monetary amount tied to the reminder, if any. Completing a
    /// reminder that carries an amount records a matching income entry.
    pub amount: Option<f64>,
    /// Whether the reminder has been checked off.
    pub is_completed: bool,
    /// When the row was created, assigned by the store.
    pub created_at: OffsetDateTime,
}

impl Reminder {
    /// Create a new reminder.
    ///
    /// Shortcut for [ReminderBuilder] for discoverability.
    pub fn build(title: &str, due_date: Date) -> ReminderBuilder {
        ReminderBuilder {
            title: title.to_owned(),
            description: None,
            category: ReminderCategory::Bill,
            due_date,
            amount: None,
        }
    }
}

/// A builder for creating [Reminder] records.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderBuilder {
    /// What the reminder is about.
    pub title: String,
    /// Optional free-form detail text.
    pub description: Option<String>,
    /// The category of the reminder.
    pub category: ReminderCategory,
    /// When the reminder falls due.
    pub due_date: Date,
    /// The monetary amount tied to the reminder, if any.
    pub amount: Option<f64>,
}

impl ReminderBuilder {
    /// Set the detail text.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the category.
    pub fn category(mut self, category: ReminderCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the amount.
    pub fn amount(mut self, amount: Option<f64>) -> Self {
        self.amount = amount;
        self
    }
}
