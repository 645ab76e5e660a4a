use core::fmt;

use fixed::types::I12F4;
use fixed_macro::fixed;

use crate::limit::LimitError;

/* Invariant: every Temperature produced by this crate is a multiple of 1/16 C in
[-256, 256), i.e. exactly what a 13-bit register can hold. */

/// Ambient or limit temperature in degrees Celsius, at the sensor's native 1/16 C step.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Default, Clone, Copy)]
pub struct Temperature(pub(crate) I12F4);

const SIGN_BIT: u16 = 1 << 12;
const MAGNITUDE: u16 = 0x0FFF;
const SIGN_OFFSET: I12F4 = fixed!(256: I12F4);

// Bits 15:13 carry alert flags and bits 1:0 are unimplemented in the limit registers.
const LIMIT_BITS: u16 = 0x1FFC;

/// Smallest limit accepted by [encode_limit].
pub const LIMIT_MIN: i16 = -256;
/// Largest limit accepted by [encode_limit].
pub const LIMIT_MAX: i16 = 255;

impl Temperature {
    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    /// Whole degrees, if the temperature has no fractional part.
    pub fn whole_degrees(self) -> Option<i16> {
        if self.0.frac() == I12F4::ZERO {
            Some(self.0.to_num())
        } else {
            None
        }
    }
}

impl From<Temperature> for I12F4 {
    fn from(temp: Temperature) -> Self {
        temp.0
    }
}

impl From<Temperature> for f32 {
    fn from(temp: Temperature) -> Self {
        temp.to_f32()
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/** Decode the 13 low bits of an ambient temperature register.

Bit 12 is the sign. The remaining 12 bits hold 8 integer bits over a 4-bit fraction; a set
sign bit means the value is that magnitude minus 256. Bits above 12 are ignored. */
pub fn decode_temperature(raw: u16) -> Temperature {
    let magnitude = I12F4::from_bits((raw & MAGNITUDE) as i16);

    if raw & SIGN_BIT != 0 {
        Temperature(magnitude - SIGN_OFFSET)
    } else {
        Temperature(magnitude)
    }
}

/// Decode an upper, lower or critical limit register.
pub fn decode_limit(raw: u16) -> Temperature {
    decode_temperature(raw & LIMIT_BITS)
}

/** Encode a whole-degree limit into the 16-bit value written to a limit register.

Positive limits land as `[temp >> 4, (temp & 0xF) << 4]`. Negative limits are stored in
13-bit two's complement, so bit 12 is set and [decode_limit] gives the input back. */
pub fn encode_limit(celsius: I12F4) -> Result<u16, LimitError> {
    let whole = Temperature(celsius).whole_degrees().ok_or(LimitError::NotWholeDegrees)?;

    if !(LIMIT_MIN..=LIMIT_MAX).contains(&whole) {
        return Err(LimitError::OutOfRange);
    }

    let temp = whole.unsigned_abs();
    let high_byte = (temp >> 4) as u8;
    let low_byte = ((temp & 0x0F) << 4) as u8;
    let raw = u16::from_be_bytes([high_byte, low_byte]);

    if whole < 0 {
        Ok(raw.wrapping_neg() & (SIGN_BIT | MAGNITUDE))
    } else {
        Ok(raw)
    }
}
