//! Odds normalization across the four quoting conventions.
//!
//! Every function in this module is total: malformed or out-of-range input
//! saturates to [`MIN_DECIMAL_ODDS`] instead of failing.
//!
//! Supported conventions:
//! - Decimal:    `2.50` (total return per unit staked)
//! - American:   `+150` / `-200` (signed, relative to 100)
//! - Fractional: `3/2` (net profit per unit staked)
//! - Implied:    `40` (break-even win probability, percent)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Floor for a wager that can still pay out something.
pub const MIN_DECIMAL_ODDS: f64 = 1.01;

/// Largest denominator produced when rendering fractional odds.
const MAX_FRACTION_DENOMINATOR: u64 = 100;

/// Odds quoting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OddsType {
    Decimal,
    American,
    Fractional,
    Implied,
}

impl OddsType {
    /// All conventions, in display order.
    pub const ALL: [Self; 4] = [
        Self::Decimal,
        Self::American,
        Self::Fractional,
        Self::Implied,
    ];
}

impl fmt::Display for OddsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::American => write!(f, "american"),
            Self::Fractional => write!(f, "fractional"),
            Self::Implied => write!(f, "implied"),
        }
    }
}

impl FromStr for OddsType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" => Ok(Self::Decimal),
            "american" => Ok(Self::American),
            "fractional" => Ok(Self::Fractional),
            "implied" => Ok(Self::Implied),
            other => Err(ValidationError::UnsupportedOddsType(other.to_string())),
        }
    }
}

impl TryFrom<String> for OddsType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OddsType> for String {
    fn from(kind: OddsType) -> Self {
        kind.to_string()
    }
}

/// Raw odds as entered: either a number or free text such as `"+150"`
/// or `"3/2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OddsValue {
    Number(f64),
    Text(String),
}

impl From<f64> for OddsValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OddsValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OddsValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for OddsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Stake, gross return and net profit of a single winning bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub stake: f64,
    pub total_return: f64,
    pub profit: f64,
}

/// Converts raw odds in the given convention to decimal odds.
///
/// Never fails. Anything unparseable, out of range or non-finite comes
/// back as [`MIN_DECIMAL_ODDS`].
pub fn to_decimal(raw: &OddsValue, kind: OddsType) -> f64 {
    let decimal = match kind {
        OddsType::Decimal => parse_number(raw).unwrap_or(MIN_DECIMAL_ODDS),
        OddsType::American => american_to_decimal(raw),
        OddsType::Fractional => fractional_to_decimal(raw),
        OddsType::Implied => implied_to_decimal(raw),
    };
    saturate(decimal)
}

/// Renders decimal odds in the requested convention.
///
/// American odds come back as signed text (`"+150"`, `"-200"`),
/// fractional odds as reduced `"num/den"` text, decimal and implied as
/// numbers rounded to two places.
pub fn from_decimal(decimal: f64, kind: OddsType) -> OddsValue {
    let decimal = saturate(decimal);
    match kind {
        OddsType::Decimal => OddsValue::Number(round2(decimal)),
        OddsType::American => {
            if decimal >= 2.0 {
                OddsValue::Text(format!("+{:.0}", ((decimal - 1.0) * 100.0).round()))
            } else {
                OddsValue::Text(format!("-{:.0}", (100.0 / (decimal - 1.0)).round()))
            }
        }
        OddsType::Fractional => {
            let (num, den) = approximate_fraction(decimal - 1.0, MAX_FRACTION_DENOMINATOR);
            OddsValue::Text(format!("{num}/{den}"))
        }
        OddsType::Implied => OddsValue::Number(round2(implied_probability(decimal))),
    }
}

/// Break-even win probability implied by decimal odds, in percent.
///
/// Returns 0 for odds below [`MIN_DECIMAL_ODDS`] or non-finite input.
pub fn implied_probability(decimal: f64) -> f64 {
    if !decimal.is_finite() || decimal < MIN_DECIMAL_ODDS {
        return 0.0;
    }
    100.0 / decimal
}

/// Payout of `stake` at `decimal` odds if the bet wins.
pub fn payout(stake: f64, decimal: f64) -> Payout {
    let total_return = stake * decimal;
    Payout {
        stake,
        total_return,
        profit: total_return - stake,
    }
}

fn saturate(decimal: f64) -> f64 {
    if decimal.is_finite() && decimal >= MIN_DECIMAL_ODDS {
        decimal
    } else {
        MIN_DECIMAL_ODDS
    }
}

fn parse_number(raw: &OddsValue) -> Option<f64> {
    match raw {
        OddsValue::Number(n) => Some(*n),
        OddsValue::Text(s) => s.trim().parse::<f64>().ok(),
    }
}

fn american_to_decimal(raw: &OddsValue) -> f64 {
    let value = match raw {
        OddsValue::Number(n) => Some(n.trunc()),
        OddsValue::Text(s) => {
            let s = s.trim();
            let s = s.strip_prefix('+').unwrap_or(s);
            s.parse::<i64>().ok().map(|v| v as f64)
        }
    };

    match value {
        Some(v) if v > 0.0 => v / 100.0 + 1.0,
        // -1 .. -99 is not a valid American quote
        Some(v) if v <= -100.0 => 100.0 / v.abs() + 1.0,
        _ => MIN_DECIMAL_ODDS,
    }
}

fn fractional_to_decimal(raw: &OddsValue) -> f64 {
    let OddsValue::Text(s) = raw else {
        return MIN_DECIMAL_ODDS;
    };
    let Some((num, den)) = s.split_once('/') else {
        return MIN_DECIMAL_ODDS;
    };
    match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
        (Ok(num), Ok(den)) if den != 0.0 => num / den + 1.0,
        _ => MIN_DECIMAL_ODDS,
    }
}

fn implied_to_decimal(raw: &OddsValue) -> f64 {
    match parse_number(raw) {
        Some(pct) if pct > 0.0 && pct < 100.0 => 100.0 / pct,
        _ => MIN_DECIMAL_ODDS,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Best rational approximation `num/den` of `x` with `den <= max_den`,
/// walking the continued-fraction convergents.
fn approximate_fraction(x: f64, max_den: u64) -> (u64, u64) {
    let (mut h_prev, mut h) = (0u64, 1u64);
    let (mut k_prev, mut k) = (1u64, 0u64);
    let mut value = x.max(0.0);

    for _ in 0..64 {
        let a = value.floor() as u64;
        let h_next = a.saturating_mul(h).saturating_add(h_prev);
        let k_next = a.saturating_mul(k).saturating_add(k_prev);
        if k_next > max_den {
            break;
        }
        (h_prev, h) = (h, h_next);
        (k_prev, k) = (k, k_next);

        let frac = value - value.floor();
        if frac < 1e-9 {
            break;
        }
        value = 1.0 / frac;
    }

    (h, k.max(1))
}
