//! Price bracket type for catalog filtering.

use serde::{Deserialize, Serialize};

/// An inclusive price bracket.
///
/// Serializes as a two-element array (`[min, max]`), which is the shape the
/// filter endpoint expects in its `radio` field.
///
/// # Examples
///
/// ```
/// use clove_core::PriceRange;
///
/// let bracket = PriceRange::new(0.0, 19.99);
/// assert!(bracket.contains(19.99));
/// assert!(!bracket.contains(20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange(f64, f64);

impl PriceRange {
    /// Create a new bracket from inclusive bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self(min, max)
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.0
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.1
    }

    /// Whether `price` falls within the bracket.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.0 && price <= self.1
    }

    /// The bracket as the `[min, max]` pair the wire format uses.
    #[must_use]
    pub const fn into_pair(self) -> [f64; 2] {
        [self.0, self.1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let bracket = PriceRange::new(20.0, 39.99);
        assert!(bracket.contains(20.0));
        assert!(bracket.contains(39.99));
        assert!(!bracket.contains(19.99));
        assert!(!bracket.contains(40.0));
    }

    #[test]
    fn test_serializes_as_pair() {
        let bracket = PriceRange::new(0.0, 19.99);
        let json = serde_json::to_string(&bracket).expect("serialize");
        assert_eq!(json, "[0.0,19.99]");

        let back: PriceRange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, bracket);
    }
}
