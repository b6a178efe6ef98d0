//! Shared record constructors for aggregation tests.

use time::Date;

use crate::{
    expense::{Expense, ExpenseCategory},
    income::{Income, IncomeCategory},
    money::Currency,
    reminder::{Reminder, ReminderCategory},
    session::UserId,
};

pub(crate) fn test_expense(amount: f64, category: ExpenseCategory, date: Date) -> Expense {
    Expense {
        id: 0,
        user_id: UserId::new("user-1"),
        amount,
        description: "expense".to_owned(),
        category,
        currency: Currency::Usd,
        date,
        ai_suggested: false,
        created_at: time::OffsetDateTime::now_utc(),
        attachments: Vec::new(),
    }
}

pub(crate) fn test_income(amount: f64, date: Date) -> Income {
    Income {
        id: 0,
        user_id: UserId::new("user-1"),
        amount,
        description: "income".to_owned(),
        category: IncomeCategory::Salary,
        currency: Currency::Usd,
        date,
        created_at: time::OffsetDateTime::now_utc(),
        file_attachments: Vec::new(),
    }
}

pub(crate) fn test_income_with(amount: f64, category: IncomeCategory, date: Date) -> Income {
    Income {
        category,
        ..test_income(amount, date)
    }
}

pub(crate) fn test_reminder(due_date: Date) -> Reminder {
    Reminder {
        id: 0,
        user_id: UserId::new("user-1"),
        title: "reminder".to_owned(),
        description: None,
        category: ReminderCategory::Bill,
        due_date,
        amount: None,
        is_completed: false,
        created_at: time::OffsetDateTime::now_utc(),
    }
}
