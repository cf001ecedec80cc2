//! Common types for confidence intervals

use kalibera_core::{math, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower bound, median and upper bound of a confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfRange {
    /// Lower bound of the interval
    pub lower: f64,
    /// Median of the sliced statistics
    pub median: f64,
    /// Upper bound of the interval
    pub upper: f64,
}

impl ConfRange {
    /// Create a new range
    pub fn new(lower: f64, median: f64, upper: f64) -> Self {
        Self {
            lower,
            median,
            upper,
        }
    }

    /// Mean distance of the bounds from the median
    pub fn error(&self) -> f64 {
        math::mean(&[self.upper - self.median, self.median - self.lower])
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl fmt::Display for ConfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} [{:.6}, {:.6}] (±{:.6})",
            self.median,
            self.lower,
            self.upper,
            self.error()
        )
    }
}

/// Exact confidence level, stored as a reduced fraction
///
/// Boundary indices of a confidence slice are computed with integer
/// arithmetic on this fraction, so a level such as `0.95` can never land one
/// index off because of binary rounding. Levels are built from decimal
/// strings or integer ratios; binary floats are rejected.
///
/// # Examples
///
/// ```rust
/// use kalibera_confidence::ConfidenceLevel;
///
/// let level: ConfidenceLevel = "0.95".parse().unwrap();
/// assert_eq!(level, ConfidenceLevel::NINETY_FIVE);
/// assert_eq!(level, ConfidenceLevel::from_ratio(95, 100).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfidenceLevel {
    numerator: u64,
    denominator: u64,
}

/// Decimal places accepted when parsing a level
const MAX_DECIMAL_PLACES: u32 = 18;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl ConfidenceLevel {
    /// Common confidence levels
    pub const NINETY: Self = Self {
        numerator: 9,
        denominator: 10,
    };
    pub const NINETY_FIVE: Self = Self {
        numerator: 19,
        denominator: 20,
    };
    pub const NINETY_NINE: Self = Self {
        numerator: 99,
        denominator: 100,
    };

    /// Level `numerator / denominator`, which must lie strictly inside (0, 1)
    pub fn from_ratio(numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 || numerator == 0 || numerator >= denominator {
            return Err(Error::InvalidParameter(format!(
                "Confidence level {numerator}/{denominator} must be in (0, 1)"
            )));
        }
        let divisor = gcd(numerator, denominator);
        Ok(Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    /// Numerator of the reduced fraction
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Denominator of the reduced fraction
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Approximate value, for display and reporting only
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// `floor(exclude * length)` where `exclude = (1 - level) / 2`
    pub fn lower_index(&self, length: usize) -> usize {
        let (p, d) = (self.numerator as u128, self.denominator as u128);
        ((length as u128 * (d - p)) / (2 * d)) as usize
    }

    /// `ceil((1 - exclude) * length)`, an exclusive bound
    pub fn upper_index(&self, length: usize) -> usize {
        let (p, d) = (self.numerator as u128, self.denominator as u128);
        let scaled = length as u128 * (d + p);
        scaled.div_ceil(2 * d) as usize
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl FromStr for ConfidenceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid =
            || Error::InvalidParameter(format!("'{s}' is not a decimal confidence level"));

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > MAX_DECIMAL_PLACES as usize {
            return Err(Error::InvalidParameter(format!(
                "'{s}' has more than {MAX_DECIMAL_PLACES} decimal places"
            )));
        }

        let scale = 10u64.pow(fraction.len() as u32);
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: u64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| invalid())?
        };
        let numerator = whole
            .checked_mul(scale)
            .and_then(|n| n.checked_add(fraction))
            .ok_or_else(invalid)?;

        Self::from_ratio(numerator, scale)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.value() * 100.0)
    }
}

/// Conversion into an exact confidence level at API boundaries
///
/// Decimal strings and [`ConfidenceLevel`] values convert; `f32`/`f64`
/// always fail with [`Error::Precision`].
pub trait IntoConfidenceLevel {
    /// Convert, rejecting inexact representations
    fn into_confidence_level(self) -> Result<ConfidenceLevel>;
}

impl IntoConfidenceLevel for ConfidenceLevel {
    fn into_confidence_level(self) -> Result<ConfidenceLevel> {
        Ok(self)
    }
}

impl IntoConfidenceLevel for &str {
    fn into_confidence_level(self) -> Result<ConfidenceLevel> {
        self.parse()
    }
}

impl IntoConfidenceLevel for String {
    fn into_confidence_level(self) -> Result<ConfidenceLevel> {
        self.parse()
    }
}

impl IntoConfidenceLevel for f64 {
    fn into_confidence_level(self) -> Result<ConfidenceLevel> {
        Err(Error::Precision(format!(
            "confidence level {self} is a binary float; pass a decimal string or ConfidenceLevel"
        )))
    }
}

impl IntoConfidenceLevel for f32 {
    fn into_confidence_level(self) -> Result<ConfidenceLevel> {
        Err(Error::Precision(format!(
            "confidence level {self} is a binary float; pass a decimal string or ConfidenceLevel"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conf_range() {
        let range = ConfRange::new(2.0, 5.0, 9.0);
        assert_eq!(range.error(), 3.5);
        assert_eq!(range.width(), 7.0);
        assert!(range.contains(5.0));
        assert!(!range.contains(1.0));
        assert!(!range.contains(9.5));
    }

    #[test]
    fn test_conf_range_display() {
        let display = format!("{}", ConfRange::new(1.0, 2.0, 3.0));
        assert!(display.contains("2.000000"));
        assert!(display.contains("[1.000000, 3.000000]"));
    }

    #[test]
    fn test_conf_range_serde() {
        let range = ConfRange::new(0.5, 1.0, 1.5);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"lower":0.5,"median":1.0,"upper":1.5}"#);
        assert_eq!(serde_json::from_str::<ConfRange>(&json).unwrap(), range);
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("0.95".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::NINETY_FIVE);
        assert_eq!(".9".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::NINETY);
        assert_eq!(" 0.990 ".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::NINETY_NINE);

        let level: ConfidenceLevel = "0.8".parse().unwrap();
        assert_eq!((level.numerator(), level.denominator()), (4, 5));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", ".", "abc", "0.9x", "-0.5", "1", "0", "1.5", "0.0", "1e-2"] {
            assert!(bad.parse::<ConfidenceLevel>().is_err(), "accepted {bad:?}");
        }
        assert!("0.1234567890123456789".parse::<ConfidenceLevel>().is_err());
    }

    #[test]
    fn test_from_ratio() {
        assert_eq!(ConfidenceLevel::from_ratio(95, 100).unwrap(), ConfidenceLevel::NINETY_FIVE);
        assert!(ConfidenceLevel::from_ratio(1, 0).is_err());
        assert!(ConfidenceLevel::from_ratio(0, 10).is_err());
        assert!(ConfidenceLevel::from_ratio(10, 10).is_err());
    }

    #[test]
    fn test_floats_are_rejected() {
        assert!(matches!(0.95f64.into_confidence_level(), Err(Error::Precision(_))));
        assert!(matches!(0.95f32.into_confidence_level(), Err(Error::Precision(_))));
        assert!("0.95".into_confidence_level().is_ok());
        assert!(String::from("0.8").into_confidence_level().is_ok());
    }

    #[test]
    fn test_boundary_indices() {
        let level = ConfidenceLevel::NINETY_FIVE;
        assert_eq!(level.lower_index(1000), 25);
        assert_eq!(level.upper_index(1000), 975);
        assert_eq!(level.lower_index(1), 0);
        assert_eq!(level.upper_index(1), 1);
    }

    #[test]
    fn test_confidence_level_display() {
        assert_eq!(format!("{}", ConfidenceLevel::NINETY_FIVE), "95.0%");
        assert_eq!(format!("{}", ConfidenceLevel::NINETY_NINE), "99.0%");
    }
}
