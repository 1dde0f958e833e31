//! Breadboard Address Translation
//!
//! Wokwi addresses breadboard holes as `<column><side>.<row>` (`10t.a`) and
//! power rails as `<rail>.<column>` (`tn.1`). SHDF writes the same positions
//! as `breadboard.<column><row>` (`breadboard.10a`) and
//! `breadboard.<column><rail>` (`breadboard.1tn`).
//!
//! Electrical layout: columns 1-60, rows a-j. Rows a-e of one column form
//! one strip on the top half and rows f-j one strip on the bottom half; the
//! halves are never joined through the strip. The four rails (`tp`, `tn`,
//! `bp`, `bn`) each run the full length and are isolated from each other.

use serde::Serialize;
use thiserror::Error;

/// Id of the breadboard pseudo-component in SHDF endpoints.
pub const BREADBOARD_ID: &str = "breadboard";

pub const MIN_COLUMN: u32 = 1;
pub const MAX_COLUMN: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid breadboard point: {0}")]
    Format(String),

    #[error("invalid breadboard column: {column} (must be 1-60)")]
    ColumnOutOfRange { column: u32 },

    #[error("Invalid breadboard point: {text} (row '{row}' is not on the {side} half)")]
    SideMismatch { text: String, row: char, side: Side },
}

/// Half of the terminal strip area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    /// Rows a-e are on the top half, f-j on the bottom half. The column
    /// never matters.
    pub fn of_row(row: char) -> Option<Side> {
        match row {
            'a'..='e' => Some(Side::Top),
            'f'..='j' => Some(Side::Bottom),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Side::Top => 't',
            Side::Bottom => 'b',
        }
    }

    fn from_letter(letter: char) -> Option<Side> {
        match letter {
            't' => Some(Side::Top),
            'b' => Some(Side::Bottom),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Bottom => write!(f, "bottom"),
        }
    }
}

/// Power rail: top/bottom, positive/negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rail {
    Tp,
    Tn,
    Bp,
    Bn,
}

impl Rail {
    pub const ALL: [Rail; 4] = [Rail::Tp, Rail::Tn, Rail::Bp, Rail::Bn];

    pub fn as_str(self) -> &'static str {
        match self {
            Rail::Tp => "tp",
            Rail::Tn => "tn",
            Rail::Bp => "bp",
            Rail::Bn => "bn",
        }
    }

    pub fn parse(s: &str) -> Option<Rail> {
        Rail::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

/// Electrical node a breadboard hole belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BreadboardNode {
    Strip { column: u32, side: Side },
    Rail(Rail),
}

impl std::fmt::Display for BreadboardNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreadboardNode::Strip { column, side } => write!(f, "strip {}{}", column, side.letter()),
            BreadboardNode::Rail(rail) => write!(f, "rail {}", rail.as_str()),
        }
    }
}

/// A breadboard position, independent of notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BreadboardAddress {
    Strip { column: u32, row: char },
    Rail { rail: Rail, column: u32 },
}

fn parse_column(digits: &str, text: &str) -> Result<u32, AddressError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AddressError::Format(text.to_string()));
    }
    digits
        .parse::<u32>()
        .map_err(|_| AddressError::Format(text.to_string()))
}

fn split_leading_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl BreadboardAddress {
    /// Parse a Wokwi breadboard cell (the part after `<part id>:`).
    pub fn parse_simulator(cell: &str) -> Result<Self, AddressError> {
        let (left, right) = cell
            .split_once('.')
            .ok_or_else(|| AddressError::Format(cell.to_string()))?;

        if let Some(rail) = Rail::parse(left) {
            let column = parse_column(right, cell)?;
            return Ok(BreadboardAddress::Rail { rail, column });
        }

        let (digits, side_letter) = split_leading_digits(left);
        let column = parse_column(digits, cell)?;
        let side = single_char(side_letter)
            .and_then(Side::from_letter)
            .ok_or_else(|| AddressError::Format(cell.to_string()))?;
        let row = single_char(right)
            .filter(|&r| Side::of_row(r).is_some())
            .ok_or_else(|| AddressError::Format(cell.to_string()))?;

        if Side::of_row(row) != Some(side) {
            return Err(AddressError::SideMismatch {
                text: cell.to_string(),
                row,
                side,
            });
        }

        Ok(BreadboardAddress::Strip { column, row })
    }

    /// Parse an SHDF breadboard address, with or without the `breadboard.`
    /// prefix. Accepts `10a`, `1tn` and `tn.1`.
    pub fn parse_neutral(text: &str) -> Result<Self, AddressError> {
        let position = text
            .strip_prefix(BREADBOARD_ID)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(text);

        if let Some((rail, digits)) = position.split_once('.') {
            let rail = Rail::parse(rail).ok_or_else(|| AddressError::Format(text.to_string()))?;
            let column = parse_column(digits, text)?;
            return Ok(BreadboardAddress::Rail { rail, column });
        }

        let (digits, suffix) = split_leading_digits(position);
        let column = parse_column(digits, text)?;

        if let Some(rail) = Rail::parse(suffix) {
            return Ok(BreadboardAddress::Rail { rail, column });
        }

        match single_char(suffix) {
            Some(row) if Side::of_row(row).is_some() => Ok(BreadboardAddress::Strip { column, row }),
            _ => Err(AddressError::Format(text.to_string())),
        }
    }

    pub fn column(&self) -> u32 {
        match *self {
            BreadboardAddress::Strip { column, .. } | BreadboardAddress::Rail { column, .. } => column,
        }
    }

    pub fn validate_column(&self) -> Result<(), AddressError> {
        let column = self.column();
        if (MIN_COLUMN..=MAX_COLUMN).contains(&column) {
            Ok(())
        } else {
            Err(AddressError::ColumnOutOfRange { column })
        }
    }

    /// SHDF endpoint text, e.g. `breadboard.10a` or `breadboard.1tn`.
    pub fn to_neutral(&self) -> String {
        match self {
            BreadboardAddress::Strip { column, row } => format!("{}.{}{}", BREADBOARD_ID, column, row),
            BreadboardAddress::Rail { rail, column } => {
                format!("{}.{}{}", BREADBOARD_ID, column, rail.as_str())
            }
        }
    }

    /// Wokwi cell text, e.g. `10t.a` or `tn.1`.
    pub fn to_simulator(&self) -> String {
        match self {
            BreadboardAddress::Strip { column, row } => {
                format!("{}{}.{}", column, strip_side(*row).letter(), row)
            }
            BreadboardAddress::Rail { rail, column } => format!("{}.{}", rail.as_str(), column),
        }
    }

    pub fn node(&self) -> BreadboardNode {
        match *self {
            BreadboardAddress::Strip { column, row } => BreadboardNode::Strip {
                column,
                side: strip_side(row),
            },
            BreadboardAddress::Rail { rail, .. } => BreadboardNode::Rail(rail),
        }
    }
}

// rows are a-j by construction
fn strip_side(row: char) -> Side {
    Side::of_row(row).unwrap_or(Side::Bottom)
}

/// `10t.a` -> `breadboard.10a`, `tn.1` -> `breadboard.1tn`
pub fn simulator_to_neutral(cell: &str) -> Result<String, AddressError> {
    BreadboardAddress::parse_simulator(cell).map(|addr| addr.to_neutral())
}

/// `breadboard.10a` -> `10t.a`, `breadboard.1tn` -> `tn.1`
pub fn neutral_to_simulator(endpoint: &str) -> Result<String, AddressError> {
    BreadboardAddress::parse_neutral(endpoint).map(|addr| addr.to_simulator())
}

pub fn is_breadboard_endpoint(endpoint: &str) -> bool {
    endpoint
        .strip_prefix(BREADBOARD_ID)
        .is_some_and(|rest| rest.starts_with('.'))
}
