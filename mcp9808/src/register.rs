/*! Register map and bit-field descriptors.

Multi-byte registers travel MSB first on the wire. Field offsets count from the least
significant bit of the register contents, taken as a single big-endian integer. */

/// An addressable register: its pointer value and how many bytes a full read or write moves.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Register {
    address: u8,
    width: u8,
}

impl Register {
    pub const CONFIG: Register = Register::new(0x01, 2);
    pub const UPPER_LIMIT: Register = Register::new(0x02, 2);
    pub const LOWER_LIMIT: Register = Register::new(0x03, 2);
    pub const CRITICAL_LIMIT: Register = Register::new(0x04, 2);
    pub const TEMPERATURE: Register = Register::new(0x05, 2);
    /** Only the upper byte of the ambient temperature register. The alert flags live here, so
    they can be fetched without clocking out the temperature itself. */
    pub const TEMPERATURE_MSB: Register = Register::new(0x05, 1);
    pub const DEVICE_ID: Register = Register::new(0x07, 1);
    pub const RESOLUTION: Register = Register::new(0x08, 1);

    pub const fn new(address: u8, width: u8) -> Self {
        assert!(width == 1 || width == 2, "registers are 1 or 2 bytes wide");

        Register { address, width }
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Width in bytes.
    pub const fn width(&self) -> u8 {
        self.width
    }

    pub const fn bits(&self) -> u8 {
        self.width * 8
    }
}

/** A named run of bits inside a [Register].

Descriptors are plain values, so the driver's fields are `const`s and a field that does not
fit in its register is rejected when the constant is evaluated. */
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BitField {
    register: Register,
    offset: u8,
    width: u8,
}

impl BitField {
    pub const HYSTERESIS: BitField = BitField::new(Register::CONFIG, 9, 2);
    pub const POWER_MODE: BitField = BitField::new(Register::CONFIG, 8, 1);
    pub const CRIT_LOCK: BitField = BitField::new(Register::CONFIG, 7, 1);
    pub const WIN_LOCK: BitField = BitField::new(Register::CONFIG, 6, 1);
    pub const ALERT_SELECT: BitField = BitField::new(Register::CONFIG, 2, 1);
    pub const ALERT_POLARITY: BitField = BitField::new(Register::CONFIG, 1, 1);
    pub const ALERT_MODE: BitField = BitField::new(Register::CONFIG, 0, 1);
    pub const RESOLUTION: BitField = BitField::new(Register::RESOLUTION, 0, 2);
    pub const TEMPERATURE_DATA: BitField = BitField::new(Register::TEMPERATURE, 0, 13);
    pub const ALERT_CRITICAL: BitField = BitField::new(Register::TEMPERATURE_MSB, 7, 1);
    pub const ALERT_HIGH: BitField = BitField::new(Register::TEMPERATURE_MSB, 6, 1);
    pub const ALERT_LOW: BitField = BitField::new(Register::TEMPERATURE_MSB, 5, 1);

    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        assert!(width > 0, "bit-field must be at least one bit wide");
        assert!(
            offset as u16 + width as u16 <= register.bits() as u16,
            "bit-field does not fit in its register"
        );

        BitField { register, offset, width }
    }

    pub const fn register(&self) -> Register {
        self.register
    }

    pub const fn offset(&self) -> u8 {
        self.offset
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// Field mask, shifted into place within the register.
    pub const fn mask(&self) -> u16 {
        self.max() << self.offset
    }

    pub const fn fits(&self, value: u16) -> bool {
        value <= self.max()
    }

    /// Pull this field out of a full register value.
    pub const fn extract(&self, raw: u16) -> u16 {
        (raw >> self.offset) & self.max()
    }

    /** Replace this field within a full register value, leaving every other bit alone.
    Excess high bits of `value` are masked off; check with [BitField::fits] first if they
    matter. */
    pub const fn insert(&self, raw: u16, value: u16) -> u16 {
        (raw & !self.mask()) | ((value & self.max()) << self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        assert_eq!(BitField::HYSTERESIS.mask(), 0b0000_0110_0000_0000);
        assert_eq!(BitField::POWER_MODE.mask(), 0b0000_0001_0000_0000);
        assert_eq!(BitField::RESOLUTION.mask(), 0b11);
        assert_eq!(BitField::TEMPERATURE_DATA.mask(), 0x1FFF);
        assert_eq!(BitField::ALERT_CRITICAL.mask(), 0x80);
    }

    #[test]
    fn test_full_width_field() {
        let word = BitField::new(Register::CONFIG, 0, 16);

        assert_eq!(word.max(), 0xFFFF);
        assert_eq!(word.extract(0xBEEF), 0xBEEF);
        assert_eq!(word.insert(0x1234, 0xBEEF), 0xBEEF);
    }

    #[test]
    fn test_extract() {
        // Hysteresis of 0b11 and shutdown set, alert control set.
        let raw = 0b0000_0111_0000_1000;

        assert_eq!(BitField::HYSTERESIS.extract(raw), 0b11);
        assert_eq!(BitField::POWER_MODE.extract(raw), 1);
        assert_eq!(BitField::ALERT_MODE.extract(raw), 0);
    }

    #[test]
    fn test_insert_preserves_neighbours() {
        let raw = 0b0000_0111_0000_1000;

        let cleared = BitField::HYSTERESIS.insert(raw, 0);
        assert_eq!(cleared, 0b0000_0001_0000_1000);

        let set = BitField::HYSTERESIS.insert(cleared, 0b10);
        assert_eq!(set, 0b0000_0101_0000_1000);
    }

    #[test]
    fn test_insert_masks_excess_bits() {
        assert!(!BitField::HYSTERESIS.fits(4));
        assert!(BitField::HYSTERESIS.fits(3));
        assert_eq!(BitField::HYSTERESIS.insert(0, 0b111), 0b0000_0110_0000_0000);
    }

    #[test]
    fn test_alert_flags_share_msb() {
        for field in [BitField::ALERT_CRITICAL, BitField::ALERT_HIGH, BitField::ALERT_LOW] {
            assert_eq!(field.register(), Register::TEMPERATURE_MSB);
            assert_eq!(field.register().address(), Register::TEMPERATURE.address());
            assert_eq!(field.register().width(), 1);
        }
    }

    #[test]
    #[should_panic(expected = "bit-field does not fit in its register")]
    fn test_field_overflows_register() {
        BitField::new(Register::RESOLUTION, 7, 2);
    }
}
