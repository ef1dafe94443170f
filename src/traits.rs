use num_traits::{Float, FloatConst, FromPrimitive, Signed, ToPrimitive};
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::CompileError;

/// A trait comprising all operations required for the scalars carried by
/// differentiable trees.
///
/// This aggregates `num_traits::Float` (providing sin, cos, exp, etc.),
/// `FloatConst` (PI, E), and standard arithmetic/debug traits.
pub trait MathScalar:
    Float
    + FloatConst
    + FromPrimitive
    + ToPrimitive
    + Signed
    + Debug
    + Display
    + Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Convert a parsed numeric literal into this scalar type.
    ///
    /// Literals are read as `f64`. The conversion fails instead of rounding
    /// when the value does not survive the trip into `Self` and back.
    fn from_literal(literal: f64) -> Result<Self, CompileError> {
        Self::from_f64(literal)
            .filter(|value| value.to_f64() == Some(literal))
            .ok_or(CompileError::LiteralConversion { literal })
    }

    /// The golden ratio φ, registered as the reserved constant `φ`
    fn golden_ratio() -> Self {
        (Self::one() + (Self::one() + Self::one() + Self::one() + Self::one() + Self::one()).sqrt())
            / (Self::one() + Self::one())
    }
}

// Blanket implementation for any type that satisfies the bounds
impl<T> MathScalar for T where
    T: Float
        + FloatConst
        + FromPrimitive
        + ToPrimitive
        + Signed
        + Debug
        + Display
        + Copy
        + Clone
        + PartialEq
        + PartialOrd
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Neg<Output = T>
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literal_exact() {
        assert_eq!(f64::from_literal(0.1), Ok(0.1));
        assert_eq!(f32::from_literal(2.5), Ok(2.5f32));
    }

    #[test]
    fn test_from_literal_rejects_lossy_cast() {
        // 0.1 has no exact f32 representation
        assert_eq!(
            f32::from_literal(0.1),
            Err(CompileError::LiteralConversion { literal: 0.1 })
        );
    }

    #[test]
    fn test_golden_ratio() {
        assert!((f64::golden_ratio() - 1.618_033_988_749_895).abs() < 1e-12);
    }
}
