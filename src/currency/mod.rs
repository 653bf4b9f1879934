//! Fixed display locale: Brazilian Portuguese number grouping and the real (BRL).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub minor_units: u8,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            currency_code: "BRL".into(),
            currency_symbol: "R$".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            minor_units: 2,
        }
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let grouped = match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, locale.grouping_separator)),
        None => group_digits(int_part, locale.grouping_separator),
    };
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, locale.decimal_separator, frac),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount with the given locale, e.g. `R$ 1.234,56` or `-R$ 50,00`.
pub fn format_currency_with(locale: &LocaleConfig, amount: f64) -> String {
    let rounded = round_minor(amount, locale.minor_units);
    let body = format_number(locale, rounded.abs(), locale.minor_units);
    if rounded < 0.0 {
        format!("-{} {}", locale.currency_symbol, body)
    } else {
        format!("{} {}", locale.currency_symbol, body)
    }
}

/// Formats an amount in the fixed display currency.
pub fn format_currency(amount: f64) -> String {
    format_currency_with(&LocaleConfig::default(), amount)
}

/// `dd/mm/yyyy`, the fixed display date format.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}

fn round_minor(amount: f64, minor_units: u8) -> f64 {
    let factor = 10f64.powi(minor_units as i32);
    let rounded = (amount * factor).round() / factor;
    // Avoid rendering `-R$ 0,00` for tiny negative remainders.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
