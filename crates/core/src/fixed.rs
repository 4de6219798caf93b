//! 24.8 fixed point values as sent by the server for attributes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute magnitude in 1/256ths
///
/// The raw wire value is kept as-is so decoding and re-encoding never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Fixed256(i32);

impl Fixed256 {
    pub const SCALE: i32 = 256;

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn from_int(value: i16) -> Self {
        Self(value as i32 * Self::SCALE)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Exact conversion: every i32 / 256 is representable in an f64
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Whole part, rounded toward negative infinity
    pub fn floor(self) -> i32 {
        self.0.div_euclid(Self::SCALE)
    }
}

impl fmt::Display for Fixed256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_decoding() {
        assert_eq!(Fixed256::from_raw(256).to_f64(), 1.0);
        assert_eq!(Fixed256::from_raw(128).to_f64(), 0.5);
        assert_eq!(Fixed256::from_raw(-64).to_f64(), -0.25);
        assert_eq!(Fixed256::from_int(6).raw(), 1536);
    }

    #[test]
    fn test_raw_roundtrip_extremes() {
        for raw in [i32::MIN, -1, 0, 1, 255, 257, i32::MAX] {
            let value = Fixed256::from_raw(raw);
            assert_eq!(value.raw(), raw);
            assert_eq!((value.to_f64() * 256.0) as i64, raw as i64);
        }
    }

    #[test]
    fn test_floor() {
        assert_eq!(Fixed256::from_raw(383).floor(), 1);
        assert_eq!(Fixed256::from_raw(-1).floor(), -1);
    }
}
