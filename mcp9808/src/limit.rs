use core::convert::TryFrom;
use core::fmt;

use fixed::types::I12F4;

use crate::register::Register;
use crate::temp::{encode_limit, Temperature};

/// The three alert thresholds, each with its own 2-byte register.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Limit {
    Lower,
    Upper,
    Critical,
}

impl Limit {
    pub const fn register(self) -> Register {
        match self {
            Limit::Lower => Register::LOWER_LIMIT,
            Limit::Upper => Register::UPPER_LIMIT,
            Limit::Critical => Register::CRITICAL_LIMIT,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LimitError {
    /// Limits are programmed in whole degrees only.
    NotWholeDegrees,
    /// Outside -256 to 255 C.
    OutOfRange,
    LowerExceedsUpper,
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LimitError::NotWholeDegrees => write!(f, "limit must be a whole number of degrees"),
            LimitError::OutOfRange => write!(f, "limit must be between -256 and 255 C"),
            LimitError::LowerExceedsUpper => write!(f, "lower limit must be below upper limit"),
        }
    }
}

/** A validated set of lower, upper and critical limits.

Each limit is a whole number of degrees the limit registers can hold, and `lower < upper`.
The critical limit is independent of the window. */
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Limits {
    lower: I12F4,
    upper: I12F4,
    critical: I12F4,
}

impl Limits {
    pub fn lower(&self) -> Temperature {
        Temperature(self.lower)
    }

    pub fn upper(&self) -> Temperature {
        Temperature(self.upper)
    }

    pub fn critical(&self) -> Temperature {
        Temperature(self.critical)
    }

    pub fn get(&self, limit: Limit) -> Temperature {
        match limit {
            Limit::Lower => self.lower(),
            Limit::Upper => self.upper(),
            Limit::Critical => self.critical(),
        }
    }
}

impl TryFrom<(I12F4, I12F4, I12F4)> for Limits {
    type Error = LimitError;

    fn try_from(val: (I12F4, I12F4, I12F4)) -> Result<Self, Self::Error> {
        let (lower, upper, critical) = val;

        for t in [lower, upper, critical] {
            encode_limit(t)?;
        }

        if lower >= upper {
            Err(LimitError::LowerExceedsUpper)
        } else {
            Ok(Limits { lower, upper, critical })
        }
    }
}

impl From<Limits> for (I12F4, I12F4, I12F4) {
    fn from(limits: Limits) -> (I12F4, I12F4, I12F4) {
        (limits.lower, limits.upper, limits.critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed_macro::fixed;

    #[test]
    fn test_registers() {
        assert_eq!(Limit::Upper.register().address(), 0x02);
        assert_eq!(Limit::Lower.register().address(), 0x03);
        assert_eq!(Limit::Critical.register().address(), 0x04);
    }

    #[test]
    fn test_valid_limits() {
        let limits = Limits::try_from((fixed!(10: I12F4), fixed!(25: I12F4), fixed!(35: I12F4))).unwrap();

        assert_eq!(limits.get(Limit::Lower).to_f32(), 10.0);
        assert_eq!(limits.get(Limit::Upper).to_f32(), 25.0);
        assert_eq!(limits.get(Limit::Critical).to_f32(), 35.0);
    }

    #[test]
    fn test_invalid_limits() {
        assert_eq!(
            Limits::try_from((fixed!(25: I12F4), fixed!(10: I12F4), fixed!(35: I12F4))),
            Err(LimitError::LowerExceedsUpper)
        );
        assert_eq!(
            Limits::try_from((fixed!(10: I12F4), fixed!(10: I12F4), fixed!(35: I12F4))),
            Err(LimitError::LowerExceedsUpper)
        );
        assert_eq!(
            Limits::try_from((fixed!(10.5: I12F4), fixed!(25: I12F4), fixed!(35: I12F4))),
            Err(LimitError::NotWholeDegrees)
        );
        assert_eq!(
            Limits::try_from((fixed!(10: I12F4), fixed!(25: I12F4), fixed!(300: I12F4))),
            Err(LimitError::OutOfRange)
        );
    }
}
