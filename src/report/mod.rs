//! Period report generation pages and endpoints.

mod generate;
mod page;

pub use generate::{email_report_endpoint, generate_report_endpoint};
pub use page::get_reports_page;
