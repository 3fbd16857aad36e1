//! Line-item quantity.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Number of units of one product in the cart. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// The smallest allowed quantity, also the default for new line items.
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, rejecting zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Interpret raw user input from a quantity field.
    ///
    /// Anything that is not a finite number of at least 1 (empty input,
    /// text, `0`, negatives, `NaN`) falls back to [`Quantity::MIN`].
    /// Fractional values are truncated toward zero and values beyond
    /// `u32::MAX` saturate.
    #[must_use]
    pub fn parse_clamped(raw: &str) -> Self {
        let Ok(value) = raw.trim().parse::<f64>() else {
            return Self::MIN;
        };
        if !value.is_finite() || value < 1.0 {
            return Self::MIN;
        }
        if value >= f64::from(u32::MAX) {
            return Self(NonZeroU32::MAX);
        }
        // 1.0 <= value < u32::MAX, so the truncated value fits and is non-zero
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = value.trunc() as u32;
        Self::new(count).unwrap_or(Self::MIN)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one() {
        assert_eq!(Quantity::default().get(), 1);
    }

    #[test]
    fn test_parse_clamped_accepts_positive_integers() {
        assert_eq!(Quantity::parse_clamped("3").get(), 3);
        assert_eq!(Quantity::parse_clamped(" 12 ").get(), 12);
        assert_eq!(Quantity::parse_clamped("1e2").get(), 100);
    }

    #[test]
    fn test_parse_clamped_falls_back_to_one() {
        for raw in ["", "abc", "0", "-4", "0.5", "NaN", "inf", "-inf"] {
            assert_eq!(Quantity::parse_clamped(raw), Quantity::MIN, "input {raw:?}");
        }
    }

    #[test]
    fn test_parse_clamped_truncates_fractions() {
        assert_eq!(Quantity::parse_clamped("2.9").get(), 2);
    }

    #[test]
    fn test_parse_clamped_saturates() {
        assert_eq!(Quantity::parse_clamped("1e20").get(), u32::MAX);
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(5).map(Quantity::get), Some(5));
    }
}
