//! Point balance value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative point total.
///
/// Every constructor clamps at zero, so no code path can produce a negative
/// balance. Raw input from storage or clients goes through [`Points::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Points(i64);

impl Points {
    pub const ZERO: Self = Self(0);

    /// Create from a raw value, clamping negatives to zero
    #[inline]
    pub const fn new(raw: i64) -> Self {
        if raw < 0 {
            Self(0)
        } else {
            Self(raw)
        }
    }

    /// Create from an optional raw value; missing or negative input is zero
    #[inline]
    pub const fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(value) => Self::new(value),
            None => Self::ZERO,
        }
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Apply a signed delta, saturating at zero
    #[must_use]
    pub const fn adjusted(self, delta: i64) -> Self {
        Self::new(self.0.saturating_add(delta))
    }

    /// Add a credit
    #[must_use]
    pub const fn credited(self, amount: Self) -> Self {
        Self(self.0.saturating_add(amount.0))
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Points {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl From<Points> for i64 {
    fn from(points: Points) -> Self {
        points.0
    }
}

impl std::iter::Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::credited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(Points::new(-5), Points::ZERO);
        assert_eq!(Points::from_raw(Some(-1)), Points::ZERO);
        assert_eq!(Points::from_raw(None), Points::ZERO);
        assert_eq!(Points::from_raw(Some(42)).value(), 42);
    }

    #[test]
    fn test_adjusted_saturates() {
        let points = Points::new(20);
        assert_eq!(points.adjusted(15).value(), 35);
        assert_eq!(points.adjusted(-20), Points::ZERO);
        assert_eq!(points.adjusted(-500), Points::ZERO);
        assert_eq!(Points::new(i64::MAX).adjusted(1).value(), i64::MAX);
    }

    #[test]
    fn test_deserialize_clamps() {
        let points: Points = serde_json::from_str("-30").unwrap();
        assert_eq!(points, Points::ZERO);
        assert_eq!(serde_json::to_string(&Points::new(80)).unwrap(), "80");
    }

    #[test]
    fn test_sum() {
        let total: Points = [Points::new(50), Points::new(30)].into_iter().sum();
        assert_eq!(total.value(), 80);
    }
}
