//! Bill/loan reminders.
//!
//! This module contains everything related to reminders:
//! - The `Reminder` model and `ReminderBuilder` for creating reminders
//! - Store functions for fetching, adding, toggling, and deleting reminders
//! - The completion toggle whose side effect records an income entry for
//!   reminders that carry an amount
//! - View handlers for the reminders page

mod complete;
mod delete;
mod domain;
mod panel;
mod store;

pub use complete::toggle_reminder_endpoint;
pub use delete::delete_reminder_endpoint;
pub use domain::{Reminder, ReminderBuilder, ReminderCategory};
pub use panel::{create_reminder_endpoint, get_reminders_page};
pub use store::{add_reminder, create_reminder_table, fetch_reminders};

#[cfg(test)]
pub use store::get_reminder;
