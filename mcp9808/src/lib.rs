/*! `mcp9808` is an [`embedded_hal`](https://github.com/rust-embedded/embedded-hal) crate for
accessing [Microchip MCP9808](https://www.microchip.com/en-us/product/MCP9808) temperature
sensors over an I2C bus.

The MCP9808 exposes a handful of registers behind a register pointer. This crate uses:

* Configuration Register (hysteresis, shutdown, alert output settings)
* Upper, Lower and Critical Limit Registers (whole degrees, -256 to 255 C)
* Ambient Temperature Register (1/16 C steps, plus three alert flags)
* Device ID Register (must read `0x04`)
* Resolution Register

Registers are addressed with the map used by the datasheet: CONFIG `0x01`, UPPER `0x02`,
LOWER `0x03`, CRITICAL `0x04`, TEMPERATURE `0x05`, DEVICE_ID `0x07`, RESOLUTION `0x08`.

# Every call is a bus transaction

Nothing is cached. Every getter performs at least one blocking I2C transaction, and every
setter of a field that shares its register with other fields performs a read followed by a
write. Two controllers (or two threads without a lock around the bus) updating fields of the
same register can therefore lose one of the updates.

```toml
[dependencies]
mcp9808 = "0.1.0"
```
*/
#![no_std]
#![doc(html_root_url = "https://docs.rs/mcp9808/0.1.0")]

#[cfg(feature = "std")]
extern crate std;

use core::convert::{Infallible, TryInto};
use core::fmt;
use core::result::Result;

use embedded_hal::i2c::I2c;
use fixed::types::I12F4;
#[cfg(feature = "log")]
use log::debug;

mod config;
mod limit;
mod register;
mod temp;

pub use config::*;
pub use limit::*;
pub use register::*;
pub use temp::*;

/// Address with A2, A1 and A0 all tied low.
pub const DEFAULT_ADDRESS: u8 = 0x18;
/// Value of the device ID register on every MCP9808.
pub const DEVICE_ID: u8 = 0x04;

/** A struct for describing how to read and write an MCP9808 temperature sensor's registers
via an [`embedded_hal`] implementation.

The struct holds no copy of any register. Construction reads the device ID once and fails
if it is not [DEVICE_ID]. */
pub struct Mcp9808<I2C> {
    i2c: I2C,
    address: u8,
}

#[derive(Debug, PartialEq, Eq)]
/// Enum for describing possible error conditions when reading/writing an MCP9808.
pub enum Error<E> {
    /// The I2C transaction failed. Contains the error from the [`embedded_hal`] implementation.
    Bus(E),
    /// The device ID register did not read as [DEVICE_ID].
    DeviceNotFound { id: u8 },
    /** A setting code or name was outside its domain, or a value did not fit its field. No
    bus traffic took place. */
    InvalidSetting,
    /// A limit was not a whole number of degrees in range. No bus traffic took place.
    InvalidArgument(LimitError),
}

impl<E> From<SettingError> for Error<E> {
    fn from(_: SettingError) -> Self {
        Error::InvalidSetting
    }
}

impl<E> From<LimitError> for Error<E> {
    fn from(e: LimitError) -> Self {
        Error::InvalidArgument(e)
    }
}

impl<E> From<Infallible> for Error<E> {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c bus error: {:?}", e),
            Error::DeviceNotFound { id } => {
                write!(f, "failed to find MCP9808 (device id {:#04x}, expected {:#04x})", id, DEVICE_ID)
            }
            Error::InvalidSetting => write!(f, "{}", SettingError),
            Error::InvalidArgument(e) => write!(f, "invalid limit: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for Error<E> where E: fmt::Debug {}

impl<I2C> Mcp9808<I2C>
where
    I2C: I2c,
{
    /// Bind to the sensor at `address`, checking the device ID (one bus read).
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut mcp = Mcp9808 { i2c, address };
        let id = mcp.device_id()?;

        #[cfg(feature = "log")]
        debug!("mcp9808 at {:#04x}: device id {:#04x}", address, id);

        if id != DEVICE_ID {
            return Err(Error::DeviceNotFound { id });
        }

        Ok(mcp)
    }

    /// [Mcp9808::new] at [DEFAULT_ADDRESS].
    pub fn new_default(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read the device ID register (one bus read).
    pub fn device_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_register(Register::DEVICE_ID)? as u8)
    }

    /// Read a full register as a big-endian integer (one bus read of `reg.width()` bytes).
    pub fn read_register(&mut self, reg: Register) -> Result<u16, Error<I2C::Error>> {
        let mut raw = [0u8; 2];
        let buf = &mut raw[..usize::from(reg.width())];

        self.i2c
            .write_read(self.address, &[reg.address()], buf)
            .map_err(Error::Bus)?;

        Ok(buf.iter().fold(0u16, |acc, b| (acc << 8) | u16::from(*b)))
    }

    /** Write a full register, MSB first (one bus write). Only the low byte of `value` is sent
    for 1-byte registers. */
    pub fn write_register(&mut self, reg: Register, value: u16) -> Result<(), Error<I2C::Error>> {
        let width = usize::from(reg.width());
        let bytes = value.to_be_bytes();
        let mut frame = [reg.address(), 0, 0];

        frame[1..=width].copy_from_slice(&bytes[2 - width..]);

        #[cfg(feature = "log")]
        debug!("mcp9808 at {:#04x}: write {:#04x} <- {:#06x}", self.address, reg.address(), value);

        self.i2c
            .write(self.address, &frame[..=width])
            .map_err(Error::Bus)
    }

    /// Read one field (one bus read of the field's register).
    pub fn read_field(&mut self, field: BitField) -> Result<u16, Error<I2C::Error>> {
        let raw = self.read_register(field.register())?;

        Ok(field.extract(raw))
    }

    /** Read-modify-write one field: one bus read, then one bus write of the whole register.

    A value too wide for the field fails with [Error::InvalidSetting] before the read. If the
    write fails after the read succeeded, the register keeps its old contents. */
    pub fn write_field(&mut self, field: BitField, value: u16) -> Result<(), Error<I2C::Error>> {
        if !field.fits(value) {
            return Err(Error::InvalidSetting);
        }

        let raw = self.read_register(field.register())?;
        self.write_register(field.register(), field.insert(raw, value))
    }

    /// Read an enumerated setting (one bus read).
    pub fn setting<S>(&mut self) -> Result<S, Error<I2C::Error>>
    where
        S: Setting,
    {
        let code = self.read_field(S::FIELD)?;

        Ok(S::try_from(code as u8)?)
    }

    /** Write an enumerated setting from the typed value, its `u8` code, or its name (one bus
    read, one bus write). Anything outside the domain fails with [Error::InvalidSetting]
    without touching the bus. */
    pub fn set_setting<S, V>(&mut self, value: V) -> Result<(), Error<I2C::Error>>
    where
        S: Setting,
        V: TryInto<S>,
        Error<I2C::Error>: From<V::Error>,
    {
        let setting: S = value.try_into()?;

        #[cfg(feature = "log")]
        debug!("mcp9808 at {:#04x}: setting {}", self.address, setting.name());

        let code: u8 = setting.into();
        self.write_field(S::FIELD, u16::from(code))
    }

    /// Read the ambient temperature (one 2-byte bus read).
    pub fn temperature(&mut self) -> Result<Temperature, Error<I2C::Error>> {
        let raw = self.read_field(BitField::TEMPERATURE_DATA)?;

        Ok(decode_temperature(raw))
    }

    /// Read one limit register (one 2-byte bus read).
    pub fn limit(&mut self, limit: Limit) -> Result<Temperature, Error<I2C::Error>> {
        let raw = self.read_register(limit.register())?;

        Ok(decode_limit(raw))
    }

    /** Program one limit register (one 2-byte bus write). `celsius` must be a whole number of
    degrees between -256 and 255, otherwise [Error::InvalidArgument] is returned and nothing
    is written. Writes are ignored by the device while the matching lock bit is set. */
    pub fn set_limit(&mut self, limit: Limit, celsius: I12F4) -> Result<(), Error<I2C::Error>> {
        let raw = encode_limit(celsius)?;

        self.write_register(limit.register(), raw)
    }

    /// Read all three limits (three bus reads).
    pub fn limits(&mut self) -> Result<(Temperature, Temperature, Temperature), Error<I2C::Error>> {
        Ok((
            self.limit(Limit::Lower)?,
            self.limit(Limit::Upper)?,
            self.limit(Limit::Critical)?,
        ))
    }

    /// Program all three limits, lower first (three bus writes).
    pub fn set_limits(&mut self, limits: Limits) -> Result<(), Error<I2C::Error>> {
        for limit in [Limit::Lower, Limit::Upper, Limit::Critical] {
            self.set_limit(limit, limits.get(limit).into())?;
        }

        Ok(())
    }

    /// One bus read.
    pub fn hysteresis(&mut self) -> Result<Hysteresis, Error<I2C::Error>> {
        self.setting()
    }

    /// One bus read, one bus write.
    pub fn set_hysteresis<V>(&mut self, hysteresis: V) -> Result<(), Error<I2C::Error>>
    where
        V: TryInto<Hysteresis>,
        Error<I2C::Error>: From<V::Error>,
    {
        self.set_setting::<Hysteresis, V>(hysteresis)
    }

    /// One bus read.
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<I2C::Error>> {
        self.setting()
    }

    /// One bus read, one bus write.
    pub fn set_power_mode<V>(&mut self, mode: V) -> Result<(), Error<I2C::Error>>
    where
        V: TryInto<PowerMode>,
        Error<I2C::Error>: From<V::Error>,
    {
        self.set_setting::<PowerMode, V>(mode)
    }

    /// One bus read.
    pub fn resolution(&mut self) -> Result<Resolution, Error<I2C::Error>> {
        self.setting()
    }

    /// One bus read, one bus write.
    pub fn set_resolution<V>(&mut self, resolution: V) -> Result<(), Error<I2C::Error>>
    where
        V: TryInto<Resolution>,
        Error<I2C::Error>: From<V::Error>,
    {
        self.set_setting::<Resolution, V>(resolution)
    }

    /// Read the whole configuration register (one 2-byte bus read).
    pub fn config(&mut self) -> Result<ConfigReg, Error<I2C::Error>> {
        Ok(ConfigReg::from(self.read_register(Register::CONFIG)?))
    }

    /// Overwrite the whole configuration register (one 2-byte bus write).
    pub fn set_config(&mut self, cfg: ConfigReg) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::CONFIG, u16::from(cfg))
    }

    /// Read the critical, high and low alert flags, in that order (three 1-byte bus reads).
    pub fn alert_status(&mut self) -> Result<AlertStatus, Error<I2C::Error>> {
        let critical = self.read_field(BitField::ALERT_CRITICAL)? != 0;
        let high = self.read_field(BitField::ALERT_HIGH)? != 0;
        let low = self.read_field(BitField::ALERT_LOW)? != 0;

        Ok(AlertStatus { critical, high, low })
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}
