//! The record filter pipeline: a coarse recency predicate applied by the
//! store's fetch query, followed by an in-process text search over the
//! already-narrowed rows.
//!
//! The ordering is a fixed contract: the time filter narrows first (as a SQL
//! predicate on `date`), then the search string narrows the fetched set.
//! Searching "coffee" with a "past week" filter never returns older coffee
//! purchases.

use serde::Deserialize;
use time::{Date, Duration, Month};

/// A coarse recency predicate over record dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    /// No recency restriction.
    #[default]
    All,
    /// Records dated within the past 7 days.
    Week,
    /// Records dated within the past calendar month.
    Month,
    /// Records dated within the past calendar year.
    Year,
}

impl TimeFilter {
    /// Every filter value, in the order shown in selectors.
    pub const ALL_VALUES: [TimeFilter; 4] = [
        TimeFilter::All,
        TimeFilter::Week,
        TimeFilter::Month,
        TimeFilter::Year,
    ];

    /// The value used in query strings and form submissions.
    pub fn as_query_value(self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
        }
    }

    /// The label shown in the filter selector.
    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::All => "All time",
            TimeFilter::Week => "Past week",
            TimeFilter::Month => "Past month",
            TimeFilter::Year => "Past year",
        }
    }

    /// The cutoff date for this filter: records with `date >= cutoff` pass.
    ///
    /// Returns `None` for [TimeFilter::All], meaning no date restriction.
    pub fn cutoff(self, today: Date) -> Option<Date> {
        match self {
            TimeFilter::All => None,
            TimeFilter::Week => Some(today - Duration::days(7)),
            TimeFilter::Month => Some(months_before(today, 1)),
            TimeFilter::Year => Some(years_before(today, 1)),
        }
    }
}

/// The filter parameters applied to a record fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// The recency predicate, applied by the store's SQL query.
    pub time: TimeFilter,
    /// A free-text query matched against description and category after the
    /// time-filtered rows are fetched.
    pub search: Option<String>,
}

impl RecordFilter {
    /// A filter that lets every record through.
    pub fn none() -> Self {
        Self::default()
    }

    /// A filter with only a recency predicate.
    pub fn time(time: TimeFilter) -> Self {
        Self { time, search: None }
    }
}

/// The query string sent by the list pages' filter bar.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// The selected time filter, defaulting to all time.
    #[serde(default)]
    pub filter: TimeFilter,
    /// The search box contents, if any.
    pub search: Option<String>,
}

impl From<FilterQuery> for RecordFilter {
    fn from(query: FilterQuery) -> Self {
        // An empty search box means no text filter at all.
        let search = query
            .search
            .filter(|search_text| !search_text.trim().is_empty());

        Self {
            time: query.filter,
            search,
        }
    }
}

/// A record that can be matched against a free-text search query.
pub trait SearchableRecord {
    /// The record's description text.
    fn description(&self) -> &str;
    /// The record's category label.
    fn category_label(&self) -> &str;
}

/// Keep the records whose description or category contains `query`,
/// case-insensitively.
///
/// This runs over rows the store has already fetched, so a time filter on the
/// fetch always narrows before the text search does.
pub fn apply_search<T: SearchableRecord>(records: Vec<T>, query: &str) -> Vec<T> {
    let query = query.to_lowercase();

    records
        .into_iter()
        .filter(|record| {
            record.description().to_lowercase().contains(&query)
                || record.category_label().to_lowercase().contains(&query)
        })
        .collect()
}

/// The date `months` calendar months before `date`, clamping the day to the
/// target month's length (e.g. 31 March - 1 month = 28 February).
pub(crate) fn months_before(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month_number = u8::from(date.month()) as i32 - months as i32;

    while month_number < 1 {
        month_number += 12;
        year -= 1;
    }

    let month = Month::try_from(month_number as u8).expect("month number is in 1..=12");
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("clamped day is valid for the month")
}

/// The date `years` calendar years before `date`, clamping 29 February to 28
/// February in non-leap years.
pub(crate) fn years_before(date: Date, years: i32) -> Date {
    let year = date.year() - years;
    let day = date.day().min(last_day_of_month(year, date.month()));

    Date::from_calendar_date(year, date.month(), day).expect("clamped day is valid for the month")
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod time_filter_tests {
    use time::macros::date;

    use super::TimeFilter;

    #[test]
    fn all_has_no_cutoff() {
        assert_eq!(TimeFilter::All.cutoff(date!(2024 - 06 - 15)), None);
    }

    #[test]
    fn week_cutoff_is_seven_days_back() {
        assert_eq!(
            TimeFilter::Week.cutoff(date!(2024 - 06 - 15)),
            Some(date!(2024 - 06 - 08))
        );
    }

    #[test]
    fn week_cutoff_crosses_month_boundary() {
        assert_eq!(
            TimeFilter::Week.cutoff(date!(2024 - 03 - 03)),
            Some(date!(2024 - 02 - 25))
        );
    }

    #[test]
    fn month_cutoff_is_one_month_back() {
        assert_eq!(
            TimeFilter::Month.cutoff(date!(2024 - 06 - 15)),
            Some(date!(2024 - 05 - 15))
        );
    }

    #[test]
    fn month_cutoff_clamps_day() {
        // 31 March minus one month lands in February, which is shorter.
        assert_eq!(
            TimeFilter::Month.cutoff(date!(2024 - 03 - 31)),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            TimeFilter::Month.cutoff(date!(2023 - 03 - 31)),
            Some(date!(2023 - 02 - 28))
        );
    }

    #[test]
    fn month_cutoff_crosses_year_boundary() {
        assert_eq!(
            TimeFilter::Month.cutoff(date!(2024 - 01 - 15)),
            Some(date!(2023 - 12 - 15))
        );
    }

    #[test]
    fn year_cutoff_is_one_year_back() {
        assert_eq!(
            TimeFilter::Year.cutoff(date!(2024 - 06 - 15)),
            Some(date!(2023 - 06 - 15))
        );
    }

    #[test]
    fn year_cutoff_clamps_leap_day() {
        assert_eq!(
            TimeFilter::Year.cutoff(date!(2024 - 02 - 29)),
            Some(date!(2023 - 02 - 28))
        );
    }
}
