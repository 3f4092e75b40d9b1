//! Normalization of raw extracted fields.
//!
//! The extraction gateway returns loosely formatted text. This module turns
//! it into canonical forms: national identification numbers are checksum
//! validated and reformatted, dates are parsed from common local formats
//! into the ISO calendar, and monetary amounts become integer cents.
//!
//! Field kinds are detected from the field name. Values that fail
//! validation are kept as trimmed text rather than dropped, so nothing the
//! gateway extracted is silently lost.

use chrono::NaiveDate;

use crate::domain::foundation::{FieldMap, FieldValue, RawFieldMap};

/// Validates an 11-digit personal identification number and returns its
/// canonical `XXX.XXX.XXX-XX` form.
///
/// The last two digits are check digits computed over the preceding ones;
/// numbers with all-equal digits are rejected outright.
pub fn normalize_person_id(raw: &str) -> Option<String> {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 {
        return None;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return None;
    }

    let check = |len: usize, start_weight: u32| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (start_weight - i as u32))
            .sum();
        let rem = sum % 11;
        if rem < 2 {
            0
        } else {
            11 - rem
        }
    };

    if check(9, 10) != digits[9] || check(10, 11) != digits[10] {
        return None;
    }

    let s: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect();
    Some(format!("{}.{}.{}-{}", &s[..3], &s[3..6], &s[6..9], &s[9..]))
}

/// Validates a 14-digit company registration number and returns its
/// canonical `XX.XXX.XXX/XXXX-XX` form.
pub fn normalize_company_id(raw: &str) -> Option<String> {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 14 {
        return None;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return None;
    }

    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check = |weights: &[u32]| -> u32 {
        let sum: u32 = digits
            .iter()
            .zip(weights.iter())
            .map(|(&d, &w)| d * w)
            .sum();
        let rem = sum % 11;
        if rem < 2 {
            0
        } else {
            11 - rem
        }
    };

    if check(&FIRST) != digits[12] || check(&SECOND) != digits[13] {
        return None;
    }

    let s: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect();
    Some(format!(
        "{}.{}.{}/{}-{}",
        &s[..2],
        &s[2..5],
        &s[5..8],
        &s[8..12],
        &s[12..]
    ))
}

/// Parses a date written in any of the common local formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    const FORMATS: [&str; 5] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%d/%m/%y", "%d.%m.%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parses a monetary amount into integer cents.
///
/// Accepts currency prefixes, thousands separators, and either comma or
/// point as the decimal mark. Negative amounts are rejected.
pub fn parse_money_cents(raw: &str) -> Option<i64> {
    let mut clean: String = raw
        .trim()
        .trim_start_matches("R$")
        .trim_start_matches('$')
        .replace(' ', "");
    if clean.is_empty() {
        return None;
    }

    // "1.234,56" style: points are thousands, comma is the decimal mark.
    if clean.contains(',') {
        clean = clean.replace('.', "").replace(',', ".");
    } else if clean.matches('.').count() > 1 {
        clean = clean.replace('.', "");
    }

    let (units_str, cents_str) = match clean.split_once('.') {
        Some((u, c)) => (u, c),
        None => (clean.as_str(), ""),
    };

    let units: i64 = units_str.parse().ok()?;
    if units < 0 {
        return None;
    }
    let cents: i64 = match cents_str.len() {
        0 => 0,
        1 => cents_str.parse::<i64>().ok()? * 10,
        2 => cents_str.parse().ok()?,
        _ => return None,
    };
    Some(units * 100 + cents)
}

fn is_person_id_key(key: &str) -> bool {
    key.contains("person_id") || (key.contains("tax_id") && !key.contains("company"))
}

fn is_company_id_key(key: &str) -> bool {
    key.contains("company_id") || key.contains("company_tax_id") || key.contains("registration_number")
}

fn is_date_key(key: &str) -> bool {
    ["date", "birth", "issued", "expires", "valid_until", "married_on"]
        .iter()
        .any(|needle| key.contains(needle))
}

fn is_money_key(key: &str) -> bool {
    ["amount", "value", "debt", "balance"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Normalizes every field of a raw extraction result.
///
/// Empty values are dropped. Unrecognized field names pass through as
/// trimmed text.
pub fn sanitize(raw: RawFieldMap) -> FieldMap {
    let mut out = FieldMap::new();
    for (key, value) in raw {
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        let key_lower = key.to_lowercase();

        let normalized = if is_company_id_key(&key_lower) {
            normalize_company_id(&value).map(FieldValue::Text)
        } else if is_person_id_key(&key_lower) {
            normalize_person_id(&value).map(FieldValue::Text)
        } else if is_date_key(&key_lower) {
            parse_date(&value).map(FieldValue::Date)
        } else if is_money_key(&key_lower) {
            parse_money_cents(&value).map(FieldValue::Money)
        } else {
            None
        };

        out.insert(key, normalized.unwrap_or(FieldValue::Text(value)));
    }
    out
}
