//! Unit-tagged coordinate values.
//!
//! A stored annotation position mixes two frames over its lifetime: absolute
//! pixels while a gesture is in flight and percentages of the surface once
//! committed. Each coordinate carries its unit explicitly instead of encoding
//! it as a `%` suffix inside a string.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoordParseError;

/// The unit a [`Coord`] is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Absolute pixels relative to the surface origin.
    Pixel,
    /// Percentage of the surface width or height.
    Percent,
}

/// A single coordinate value together with its unit.
///
/// Serializes to the record export shape: percentages become strings with a
/// three-digit fraction and a `%` suffix (`"12.500%"`), pixels become plain
/// JSON numbers. Deserialization accepts numbers, bare numeric strings and
/// `%`-suffixed strings.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord {
    pub unit: Unit,
    pub value: f64,
}

impl Coord {
    /// Creates a pixel coordinate.
    #[inline]
    pub fn pixel(value: f64) -> Self {
        Self {
            unit: Unit::Pixel,
            value,
        }
    }

    /// Creates a percentage coordinate.
    #[inline]
    pub fn percent(value: f64) -> Self {
        Self {
            unit: Unit::Percent,
            value,
        }
    }

    /// Returns true if this coordinate is a percentage.
    #[inline]
    pub fn is_percent(&self) -> bool {
        self.unit == Unit::Percent
    }

    /// Returns true if the value is finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Percent => write!(f, "{:.3}%", self.value),
            Unit::Pixel => write!(f, "{}", self.value),
        }
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (unit, digits) = match trimmed.strip_suffix('%') {
            Some(rest) => (Unit::Percent, rest.trim_end()),
            None => (Unit::Pixel, trimmed),
        };
        let value: f64 = digits.parse().map_err(|_| CoordParseError {
            input: s.to_string(),
        })?;
        Ok(Self { unit, value })
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.unit {
            Unit::Percent => serializer.collect_str(self),
            Unit::Pixel => serializer.serialize_f64(self.value),
        }
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordVisitor;

        impl Visitor<'_> for CoordVisitor {
            type Value = Coord;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a number or a numeric string with optional '%' suffix")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Coord::pixel(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Coord::pixel(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Coord::pixel(value as f64))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CoordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_and_pixel() {
        let pct: Coord = "12.5%".parse().unwrap();
        assert_eq!(pct, Coord::percent(12.5));

        let px: Coord = " 40 ".parse().unwrap();
        assert_eq!(px, Coord::pixel(40.0));

        assert!("abc%".parse::<Coord>().is_err());
        assert!("".parse::<Coord>().is_err());
    }

    #[test]
    fn test_display_uses_three_decimals_for_percent() {
        assert_eq!(Coord::percent(10.0).to_string(), "10.000%");
        assert_eq!(Coord::percent(33.33333).to_string(), "33.333%");
        assert_eq!(Coord::pixel(20.0).to_string(), "20");
    }

    #[test]
    fn test_serde_shapes() {
        let json = serde_json::to_string(&Coord::percent(7.25)).unwrap();
        assert_eq!(json, "\"7.250%\"");

        let json = serde_json::to_string(&Coord::pixel(3.5)).unwrap();
        assert_eq!(json, "3.5");

        let from_num: Coord = serde_json::from_str("42").unwrap();
        assert_eq!(from_num, Coord::pixel(42.0));

        let from_str: Coord = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_str, Coord::pixel(42.0));

        let from_pct: Coord = serde_json::from_str("\"1.500%\"").unwrap();
        assert_eq!(from_pct, Coord::percent(1.5));

        assert!(serde_json::from_str::<Coord>("true").is_err());
    }
}
