//! Calendar pages: the current month's day grid and the year overview.

mod month_page;
mod year_page;

pub use month_page::get_calendar_page;
pub use year_page::get_year_overview_page;
