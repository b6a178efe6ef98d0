//! The fixed set of supported currencies and money formatting helpers.

use numfmt::{Formatter, Precision};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

/// A supported currency code.
///
/// The set is fixed and not configurable at runtime. Records created outside
/// the app with an unrecognised code fall back to [Currency::Usd] when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee
    Inr,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Chinese Yuan
    Cny,
    /// Australian Dollar
    Aud,
    /// Canadian Dollar
    Cad,
}

impl Currency {
    /// Every supported currency, in the order shown in selectors.
    pub const ALL: [Currency; 8] = [
        Currency::Inr,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cny,
        Currency::Aud,
        Currency::Cad,
    ];

    /// The ISO 4217 code, e.g. "INR".
    pub fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }

    /// The display symbol, e.g. "₹".
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cny => "¥",
            Currency::Aud => "A$",
            Currency::Cad => "C$",
        }
    }

    /// The human-readable name, e.g. "Indian Rupee".
    pub fn name(self) -> &'static str {
        match self {
            Currency::Inr => "Indian Rupee",
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Cny => "Chinese Yuan",
            Currency::Aud => "Australian Dollar",
            Currency::Cad => "Canadian Dollar",
        }
    }

    /// Parse an ISO 4217 code. Returns `None` for unrecognised codes.
    pub fn from_code(code: &str) -> Option<Self> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.code().into())
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .map(|code| Currency::from_code(code).unwrap_or(Currency::Usd))
    }
}

/// Format `amount` with the currency's symbol and two decimal places,
/// e.g. `format_money(-1234.5, Currency::Inr)` gives "-₹1,234.50".
pub fn format_money(amount: f64, currency: Currency) -> String {
    let symbol = currency.symbol();

    if amount == 0.0 {
        // Zero is hardcoded as "0" by numfmt, so we must specify the
        // formatted string for zero ourselves.
        return format!("{symbol}0.00");
    }

    let prefix = if amount < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    let fmt = Formatter::currency(&prefix)
        .expect("currency symbols fit within the formatter prefix limit")
        .precision(Precision::Decimals(2));

    let mut formatted_string = fmt.fmt_string(amount.abs());

    // numfmt omits the last trailing zero, so we must add it ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Format `amount` with the currency's symbol, rounded to the nearest whole
/// number, e.g. "₹1,235".
pub fn format_money_rounded(amount: f64, currency: Currency) -> String {
    let symbol = currency.symbol();
    let amount = amount.round();

    if amount == 0.0 {
        return format!("{symbol}0");
    }

    let prefix = if amount < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    Formatter::currency(&prefix)
        .expect("currency symbols fit within the formatter prefix limit")
        .precision(Precision::Decimals(0))
        .fmt_string(amount.abs())
}
