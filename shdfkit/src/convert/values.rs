//! Resistor value normalization.
//!
//! Values are stored as a bare integer number of ohms. Accepted inputs:
//! `220`, `220 ohm`, `220Ω`, `4.7k`, `4k7`, `1M`, `2.2 meg`, `10 kohms`.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("empty resistance value")]
    Empty,

    #[error("'{0}' is not a resistance")]
    NotNumeric(String),

    #[error("'{0}' is not a whole number of ohms")]
    Fractional(String),

    #[error("'{0}' is too large")]
    Overflow(String),
}

const UNIT_SUFFIXES: [&str; 4] = ["ohms", "ohm", "ω", "r"];

/// Lower-case, unit suffix removed, surrounding whitespace trimmed.
fn strip_unit(text: &str) -> String {
    let mut s = text.trim().to_lowercase();
    for suffix in UNIT_SUFFIXES {
        if let Some(rest) = s.strip_suffix(suffix) {
            s = rest.trim_end().to_string();
            break;
        }
    }
    s
}

fn split_multiplier(s: &str) -> (&str, u64) {
    if let Some(rest) = s.strip_suffix("meg") {
        return (rest, 1_000_000);
    }
    match s.chars().last() {
        Some('k') => (&s[..s.len() - 1], 1_000),
        Some('m') => (&s[..s.len() - 1], 1_000_000),
        _ => (s, 1),
    }
}

/// `4k7` -> (`4.7`, 1000)
fn split_rkm(s: &str) -> Option<(String, u64)> {
    let (idx, multiplier) = s.char_indices().find_map(|(i, c)| match c {
        'k' => Some((i, 1_000)),
        'm' => Some((i, 1_000_000)),
        _ => None,
    })?;
    let (whole, frac) = (&s[..idx], &s[idx + 1..]);
    if whole.is_empty() || frac.is_empty() {
        return None;
    }
    Some((format!("{}.{}", whole, frac), multiplier))
}

fn scale_decimal(number: &str, multiplier: u64, original: &str) -> Result<u64, ValueError> {
    let not_numeric = || ValueError::NotNumeric(original.to_string());
    let overflow = || ValueError::Overflow(original.to_string());

    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(not_numeric());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) {
        return Err(not_numeric());
    }

    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?
    };
    let mut total = whole_value.checked_mul(multiplier).ok_or_else(overflow)?;

    let frac = frac.trim_end_matches('0');
    if !frac.is_empty() {
        let scale = 10u64.checked_pow(frac.len() as u32).ok_or_else(overflow)?;
        let frac_value = frac.parse::<u64>().map_err(|_| overflow())?;
        let scaled = frac_value.checked_mul(multiplier).ok_or_else(overflow)?;
        if scaled % scale != 0 {
            return Err(ValueError::Fractional(original.to_string()));
        }
        total = total.checked_add(scaled / scale).ok_or_else(overflow)?;
    }

    Ok(total)
}

/// Parse a resistance into whole ohms.
pub fn parse_resistance(text: &str) -> Result<u64, ValueError> {
    let s = strip_unit(text);
    if s.is_empty() {
        return Err(ValueError::Empty);
    }

    let (number, multiplier) = split_multiplier(&s);
    let number = number.trim_end();
    match scale_decimal(number, multiplier, text) {
        Ok(ohms) => Ok(ohms),
        Err(ValueError::NotNumeric(_)) => match split_rkm(&s) {
            Some((number, multiplier)) => scale_decimal(&number, multiplier, text),
            None => Err(ValueError::NotNumeric(text.to_string())),
        },
        Err(e) => Err(e),
    }
}

/// Resistance as the bare integer string stored in documents.
pub fn normalize_resistance(text: &str) -> Result<String, ValueError> {
    parse_resistance(text).map(|ohms| ohms.to_string())
}

/// Loose comparison form: lower-cased with `ohm`, `Ω` and whitespace removed.
pub fn strip_resistance_text(text: &str) -> String {
    text.to_lowercase()
        .replace("ohm", "")
        .replace('ω', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
