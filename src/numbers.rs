//! A numeric value abstraction over the two JSON number representations.
//!
//! Bound keywords (`minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum`, `multipleOf`) are pre-normalised into `SchemaNumber`
//! at compile time so validation can compare heterogeneous representations
//! (integer instance vs floating-point bound and vice versa) without loss.

use fraction::{BigFraction, BigUint};
use num_cmp::NumCmp;
use serde_json::Number;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy)]
pub(crate) enum SchemaNumber {
    Int(i64),
    Float(f64),
}

impl SchemaNumber {
    pub(crate) fn from_json(number: &Number) -> SchemaNumber {
        if let Some(value) = number.as_i64() {
            SchemaNumber::Int(value)
        } else {
            // u64 beyond i64::MAX or a floating point number
            SchemaNumber::Float(number.as_f64().unwrap_or(f64::NAN))
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            SchemaNumber::Int(value) => value as f64,
            SchemaNumber::Float(value) => value,
        }
    }

    pub(crate) fn is_positive(self) -> bool {
        match self {
            SchemaNumber::Int(value) => value > 0,
            SchemaNumber::Float(value) => value > 0.0,
        }
    }

    fn compare(self, other: SchemaNumber) -> Option<Ordering> {
        match (self, other) {
            (SchemaNumber::Int(left), SchemaNumber::Int(right)) => Some(left.cmp(&right)),
            (SchemaNumber::Int(left), SchemaNumber::Float(right)) => NumCmp::num_cmp(left, right),
            (SchemaNumber::Float(left), SchemaNumber::Int(right)) => NumCmp::num_cmp(left, right),
            (SchemaNumber::Float(left), SchemaNumber::Float(right)) => left.partial_cmp(&right),
        }
    }

    pub(crate) fn eq(self, other: SchemaNumber) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    pub(crate) fn lt(self, other: SchemaNumber) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    pub(crate) fn le(self, other: SchemaNumber) -> bool {
        matches!(
            self.compare(other),
            Some(Ordering::Less) | Some(Ordering::Equal)
        )
    }

    pub(crate) fn gt(self, other: SchemaNumber) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    pub(crate) fn ge(self, other: SchemaNumber) -> bool {
        matches!(
            self.compare(other),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        )
    }

    /// Multiple-of test. Integer pairs use plain modulo; anything with a
    /// floating point operand divides first and falls back to an exact
    /// fraction when the division overflows.
    pub(crate) fn is_multiple_of(self, factor: SchemaNumber) -> bool {
        match (self, factor) {
            (SchemaNumber::Int(value), SchemaNumber::Int(factor)) => {
                factor != 0 && value % factor == 0
            }
            (value, factor) => {
                let (value, factor) = (value.as_f64(), factor.as_f64());
                let remainder = (value / factor) % 1.;
                if remainder.is_nan() {
                    // Involves heap allocations via the underlying `BigUint` type
                    let fraction = BigFraction::from(value) / BigFraction::from(factor);
                    if let Some(denom) = fraction.denom() {
                        denom == &BigUint::from(1_u8)
                    } else {
                        true
                    }
                } else {
                    remainder.abs() < f64::EPSILON
                }
            }
        }
    }
}

impl fmt::Display for SchemaNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaNumber::Int(value) => write!(f, "{}", value),
            SchemaNumber::Float(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaNumber;
    use test_case::test_case;

    #[test_case(SchemaNumber::Int(5), SchemaNumber::Int(5), true)]
    #[test_case(SchemaNumber::Int(5), SchemaNumber::Float(5.0), true)]
    #[test_case(SchemaNumber::Float(5.0), SchemaNumber::Int(5), true)]
    #[test_case(SchemaNumber::Int(5), SchemaNumber::Float(5.5), false)]
    fn test_eq(left: SchemaNumber, right: SchemaNumber, expected: bool) {
        assert_eq!(left.eq(right), expected);
    }

    #[test]
    fn test_ordering_across_representations() {
        assert!(SchemaNumber::Int(1).lt(SchemaNumber::Float(1.5)));
        assert!(SchemaNumber::Float(1.5).lt(SchemaNumber::Int(2)));
        assert!(SchemaNumber::Int(2).ge(SchemaNumber::Float(2.0)));
        assert!(SchemaNumber::Float(2.5).gt(SchemaNumber::Int(2)));
    }

    #[test_case(SchemaNumber::Int(6), SchemaNumber::Int(3), true)]
    #[test_case(SchemaNumber::Int(7), SchemaNumber::Int(3), false)]
    #[test_case(SchemaNumber::Float(4.5), SchemaNumber::Float(1.5), true; "positive_float_multiple")]
    #[test_case(SchemaNumber::Float(1.1), SchemaNumber::Float(0.1), true)]
    #[test_case(SchemaNumber::Float(4.55), SchemaNumber::Float(0.1), false)]
    #[test_case(SchemaNumber::Int(4), SchemaNumber::Float(2.0), true)]
    #[test_case(SchemaNumber::Int(-7), SchemaNumber::Float(2.0), false)]
    #[test_case(SchemaNumber::Float(-4.5), SchemaNumber::Float(1.5), true; "negative_float_multiple")]
    fn test_is_multiple_of(value: SchemaNumber, factor: SchemaNumber, expected: bool) {
        assert_eq!(value.is_multiple_of(factor), expected);
    }

    #[test]
    fn test_zero_factor_is_never_a_multiple() {
        assert!(!SchemaNumber::Int(6).is_multiple_of(SchemaNumber::Int(0)));
    }
}
