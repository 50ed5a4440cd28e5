//! Locale-aware rendering of amounts and timestamps.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
}

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Formats timestamps for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, timestamp: DateTime<Utc>, pattern: DatePattern) -> String;
}

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Which date components to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// Two-digit day, month and year (`05/06/21` in pt-BR). Used in list rows.
    NumericShort,
    /// Two-digit day with the long month name (`05 de junho` in pt-BR).
    DayLongMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthNames {
    Portuguese,
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateOrder {
    DayMonthYear,
    MonthDayYear,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Inserted between the currency symbol and the digits.
    pub symbol_separator: Option<char>,
    pub utc_offset: FixedOffset,
    month_names: MonthNames,
    date_order: DateOrder,
}

impl LocaleConfig {
    /// Resolves a BCP 47 tag. Portuguese tags use Brazilian conventions; anything
    /// else falls back to US English conventions under the supplied tag.
    pub fn for_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-");
        let language = normalized
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if language == "pt" {
            Self {
                language_tag: normalized,
                decimal_separator: ',',
                grouping_separator: '.',
                symbol_separator: Some('\u{a0}'),
                utc_offset: utc(),
                month_names: MonthNames::Portuguese,
                date_order: DateOrder::DayMonthYear,
            }
        } else {
            Self {
                language_tag: normalized,
                decimal_separator: '.',
                grouping_separator: ',',
                symbol_separator: None,
                utc_offset: utc(),
                month_names: MonthNames::English,
                date_order: DateOrder::MonthDayYear,
            }
        }
    }

    pub fn with_offset_minutes(mut self, minutes: i32) -> Result<Self, FormatError> {
        self.utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(FormatError::InvalidOffset(minutes))?;
        Ok(self)
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("pt-BR")
    }
}

/// Formatter bound to one locale and one currency.
#[derive(Debug, Clone, Default)]
pub struct LocaleFormatter {
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
}

impl LocaleFormatter {
    pub fn new(locale: LocaleConfig, currency: CurrencyCode) -> Self {
        Self { locale, currency }
    }

    /// Builds a formatter from raw settings values.
    pub fn from_settings(
        language_tag: &str,
        currency: &str,
        utc_offset_minutes: i32,
    ) -> Result<Self, FormatError> {
        let locale = LocaleConfig::for_tag(language_tag).with_offset_minutes(utc_offset_minutes)?;
        Ok(Self::new(locale, CurrencyCode::new(currency)))
    }

    /// Formats a raw epoch-milliseconds value.
    pub fn format_timestamp_millis(
        &self,
        millis: i64,
        pattern: DatePattern,
    ) -> Result<String, FormatError> {
        format_timestamp_millis(millis, &self.locale, pattern)
    }
}

impl CurrencyFormatter for LocaleFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        format_currency(amount, &self.locale, &self.currency)
    }
}

impl DateFormatter for LocaleFormatter {
    fn format_date(&self, timestamp: DateTime<Utc>, pattern: DatePattern) -> String {
        format_date(timestamp, &self.locale, pattern)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `amount` as currency text, e.g. `R$ 1.234,50` (pt-BR, BRL) or
/// `-$12.00` (en-US, USD).
pub fn format_currency(amount: Decimal, locale: &LocaleConfig, currency: &CurrencyCode) -> String {
    let precision = minor_units_for(currency.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(currency.as_str());
    let separator = locale
        .symbol_separator
        .map(String::from)
        .unwrap_or_default();
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{separator}{body}")
}

/// Rounds to `precision` places and applies the locale's separators.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    let raw = rounded.to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (raw.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };
    let mut body = format!("{sign}{}", group_digits(digits, locale.grouping_separator));
    if let Some(frac) = frac_part {
        body.push(locale.decimal_separator);
        body.push_str(frac);
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders `timestamp` in the locale's offset using `pattern`.
pub fn format_date(timestamp: DateTime<Utc>, locale: &LocaleConfig, pattern: DatePattern) -> String {
    let local = timestamp.with_timezone(&locale.utc_offset);
    let day = local.day();
    let month = local.month();
    match pattern {
        DatePattern::NumericShort => {
            let year = local.year().rem_euclid(100);
            match locale.date_order {
                DateOrder::DayMonthYear => format!("{day:02}/{month:02}/{year:02}"),
                DateOrder::MonthDayYear => format!("{month:02}/{day:02}/{year:02}"),
            }
        }
        DatePattern::DayLongMonth => match locale.month_names {
            MonthNames::Portuguese => format!("{day:02} de {}", portuguese_month(month)),
            MonthNames::English => format!("{} {day:02}", english_month(month)),
        },
    }
}

/// Same as [`format_date`] for a raw epoch-milliseconds value.
pub fn format_timestamp_millis(
    millis: i64,
    locale: &LocaleConfig,
    pattern: DatePattern,
) -> Result<String, FormatError> {
    let timestamp = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or(FormatError::InvalidTimestamp(millis))?;
    Ok(format_date(timestamp, locale, pattern))
}

fn utc() -> FixedOffset {
    chrono::Offset::fix(&Utc)
}

fn portuguese_month(month: u32) -> &'static str {
    match month {
        1 => "janeiro",
        2 => "fevereiro",
        3 => "março",
        4 => "abril",
        5 => "maio",
        6 => "junho",
        7 => "julho",
        8 => "agosto",
        9 => "setembro",
        10 => "outubro",
        11 => "novembro",
        12 => "dezembro",
        _ => "",
    }
}

fn english_month(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn brazilian_currency_uses_comma_decimals_and_dot_grouping() {
        let locale = LocaleConfig::for_tag("pt-BR");
        let brl = CurrencyCode::new("brl");
        assert_eq!(format_currency(dec("1234.5"), &locale, &brl), "R$\u{a0}1.234,50");
        assert_eq!(format_currency(dec("0"), &locale, &brl), "R$\u{a0}0,00");
        assert_eq!(format_currency(dec("-50"), &locale, &brl), "-R$\u{a0}50,00");
        assert_eq!(
            format_currency(dec("1234567.891"), &locale, &brl),
            "R$\u{a0}1.234.567,89"
        );
    }

    #[test]
    fn us_currency_and_zero_decimal_currencies() {
        let locale = LocaleConfig::for_tag("en-US");
        assert_eq!(format_currency(dec("999.995"), &locale, &CurrencyCode::new("USD")), "$1,000.00");
        assert_eq!(format_currency(dec("1500"), &locale, &CurrencyCode::new("JPY")), "¥1,500");
        assert_eq!(format_currency(dec("-12"), &locale, &CurrencyCode::new("CHF")), "-CHF12.00");
    }

    #[test]
    fn dates_render_in_both_patterns() {
        let locale = LocaleConfig::for_tag("pt-BR");
        let timestamp = Utc.with_ymd_and_hms(2021, 6, 5, 15, 0, 0).unwrap();
        assert_eq!(format_date(timestamp, &locale, DatePattern::NumericShort), "05/06/21");
        assert_eq!(format_date(timestamp, &locale, DatePattern::DayLongMonth), "05 de junho");

        let english = LocaleConfig::for_tag("en_US");
        assert_eq!(format_date(timestamp, &english, DatePattern::NumericShort), "06/05/21");
        assert_eq!(format_date(timestamp, &english, DatePattern::DayLongMonth), "June 05");
    }

    #[test]
    fn dates_shift_into_configured_offset() {
        let locale = LocaleConfig::for_tag("pt-BR").with_offset_minutes(-180).unwrap();
        let timestamp = Utc.with_ymd_and_hms(2021, 3, 1, 1, 0, 0).unwrap();
        assert_eq!(format_date(timestamp, &locale, DatePattern::DayLongMonth), "28 de fevereiro");
    }

    #[test]
    fn invalid_inputs_produce_errors() {
        let locale = LocaleConfig::default();
        assert_eq!(
            format_timestamp_millis(i64::MAX, &locale, DatePattern::NumericShort),
            Err(FormatError::InvalidTimestamp(i64::MAX))
        );
        assert_eq!(
            LocaleConfig::default().with_offset_minutes(24 * 60).unwrap_err(),
            FormatError::InvalidOffset(24 * 60)
        );
    }

    #[test]
    fn formatter_traits_delegate_to_locale() {
        let formatter = LocaleFormatter::from_settings("pt-BR", "BRL", 0).unwrap();
        assert_eq!(formatter.format_amount(dec("10")), "R$\u{a0}10,00");
        assert_eq!(
            formatter.format_timestamp_millis(0, DatePattern::NumericShort).unwrap(),
            "01/01/70"
        );
    }
}
