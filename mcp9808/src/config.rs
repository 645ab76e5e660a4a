use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use fixed::types::I12F4;
use fixed_macro::fixed;
use modular_bitfield::prelude::*;

use crate::register::BitField;

/// A code or name outside the domain of an enumerated setting.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SettingError;

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "value is not a valid setting")
    }
}

/** An enumerated setting stored in a single [BitField].

The code of each variant is its position in [Setting::NAMES]; converting from a `u8` code or
from a name fails with [SettingError] for anything outside the table. */
pub trait Setting: private::Sealed + Copy + Into<u8> + TryFrom<u8, Error = SettingError> {
    const FIELD: BitField;
    const NAMES: &'static [&'static str];

    fn name(self) -> &'static str {
        let code: u8 = self.into();
        Self::NAMES[usize::from(code)]
    }
}

macro_rules! impl_setting {
    ( $(#[$meta:meta])* $type:ident, $field:expr, $( $(#[$vmeta:meta])* $variant:ident => $name:literal ),+ ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Clone, Copy, BitfieldSpecifier)]
        pub enum $type {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $type {
            pub const ALL: &'static [$type] = &[$( $type::$variant ),+];
        }

        impl Setting for $type {
            const FIELD: BitField = $field;
            const NAMES: &'static [&'static str] = &[$( $name ),+];
        }

        impl From<$type> for u8 {
            fn from(setting: $type) -> u8 {
                setting as u8
            }
        }

        impl TryFrom<u8> for $type {
            type Error = SettingError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                $type::ALL.get(usize::from(code)).copied().ok_or(SettingError)
            }
        }

        impl FromStr for $type {
            type Err = SettingError;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                <$type as Setting>::NAMES
                    .iter()
                    .position(|n| *n == name)
                    .map(|i| $type::ALL[i])
                    .ok_or(SettingError)
            }
        }

        impl TryFrom<&str> for $type {
            type Error = SettingError;

            fn try_from(name: &str) -> Result<Self, Self::Error> {
                name.parse()
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl private::Sealed for $type {}
    }
}

impl_setting!(
    /// Band below the upper and critical limits (and above the lower limit) that an alert must
    /// cross before it is released.
    Hysteresis, BitField::HYSTERESIS,
    Deg0 => "HYSTERESIS_0",
    Deg1_5 => "HYSTERESIS_1_5",
    Deg3 => "HYSTERESIS_3",
    Deg6 => "HYSTERESIS_6"
);
impl_setting!(
    /** Continuous conversion or shutdown. All registers stay readable and writable in
    shutdown. Shutdown cannot be entered while either lock bit is set. */
    PowerMode, BitField::POWER_MODE,
    Continuous => "CONTINUOUS",
    Shutdown => "SHUTDOWN"
);
impl_setting!(
    /// Step size of the ambient temperature register.
    Resolution, BitField::RESOLUTION,
    Deg0_5 => "RESOLUTION_0_5_C",
    Deg0_25 => "RESOLUTION_0_25_C",
    Deg0_125 => "RESOLUTION_0_125_C",
    Deg0_0625 => "RESOLUTION_0_0625_C"
);
impl_setting!(AlertMode, BitField::ALERT_MODE, Comparator => "COMPARATOR", Interrupt => "INTERRUPT");
impl_setting!(AlertPolarity, BitField::ALERT_POLARITY, ActiveLow => "ACTIVE_LOW", ActiveHigh => "ACTIVE_HIGH");
impl_setting!(
    /// Whether the alert pin follows all three limits or only the critical limit.
    AlertSelect, BitField::ALERT_SELECT,
    AllLimits => "ALL_LIMITS",
    CriticalOnly => "CRITICAL_ONLY"
);

impl Resolution {
    pub fn step(self) -> I12F4 {
        match self {
            Resolution::Deg0_5 => fixed!(0.5: I12F4),
            Resolution::Deg0_25 => fixed!(0.25: I12F4),
            Resolution::Deg0_125 => fixed!(0.125: I12F4),
            Resolution::Deg0_0625 => fixed!(0.0625: I12F4),
        }
    }

    /// Typical time for one conversion at this resolution.
    pub fn conversion_time_ms(self) -> u16 {
        match self {
            Resolution::Deg0_5 => 30,
            Resolution::Deg0_25 => 65,
            Resolution::Deg0_125 => 130,
            Resolution::Deg0_0625 => 250,
        }
    }
}

/** Snapshot of the whole configuration register.

Fields are listed from bit 0 upwards. `alert_status` is read-only on the device and
`int_clear` always reads back as zero. */
#[bitfield(bits = 16)]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigReg {
    pub alert_mode: AlertMode,
    pub alert_polarity: AlertPolarity,
    pub alert_select: AlertSelect,
    pub alert_control: bool,
    #[skip(setters)]
    pub alert_status: bool,
    pub int_clear: bool,
    pub win_lock: bool,
    pub crit_lock: bool,
    pub power_mode: PowerMode,
    pub hysteresis: Hysteresis,
    #[skip]
    __: B5,
}

/** Alert flags from the top of the ambient temperature register. The three flags are read
by separate transactions, so they are not guaranteed to describe the same conversion. */
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct AlertStatus {
    /// Ambient temperature at or above the critical limit.
    pub critical: bool,
    /// Above the upper limit.
    pub high: bool,
    /// Below the lower limit.
    pub low: bool,
}

impl AlertStatus {
    pub fn any(&self) -> bool {
        self.critical || self.high || self.low
    }
}

mod private {
    pub trait Sealed {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijection<S>()
    where
        S: Setting + FromStr<Err = SettingError> + PartialEq + fmt::Debug,
    {
        let domain = (1u16 << S::FIELD.width()) as u8;

        assert_eq!(S::NAMES.len(), usize::from(domain));

        for code in 0..domain {
            let setting = S::try_from(code).unwrap();
            let round_trip: u8 = setting.into();

            assert_eq!(round_trip, code);
            assert_eq!(setting.name(), S::NAMES[usize::from(code)]);
            assert_eq!(setting.name().parse::<S>(), Ok(setting));
        }

        assert_eq!(S::try_from(domain), Err(SettingError));
        assert_eq!(S::try_from(u8::MAX), Err(SettingError));
        assert_eq!("NOT_A_SETTING".parse::<S>(), Err(SettingError));
    }

    #[test]
    fn test_bijections() {
        assert_bijection::<Hysteresis>();
        assert_bijection::<PowerMode>();
        assert_bijection::<Resolution>();
        assert_bijection::<AlertMode>();
        assert_bijection::<AlertPolarity>();
        assert_bijection::<AlertSelect>();
    }

    #[test]
    fn test_codes() {
        assert_eq!(u8::from(Hysteresis::Deg1_5), 0b01);
        assert_eq!(u8::from(Hysteresis::Deg6), 0b11);
        assert_eq!(u8::from(PowerMode::Shutdown), 0b1);
        assert_eq!(u8::from(Resolution::Deg0_0625), 0b11);
        assert_eq!(Hysteresis::try_from(4u8), Err(SettingError));
        assert_eq!(PowerMode::try_from(2u8), Err(SettingError));
        assert_eq!(Resolution::try_from("RESOLUTION_0_25_C"), Ok(Resolution::Deg0_25));
    }

    #[test]
    fn test_resolution_step() {
        assert_eq!(Resolution::Deg0_0625.step(), fixed!(0.0625: I12F4));
        assert_eq!(Resolution::Deg0_5.conversion_time_ms(), 30);
    }

    #[test]
    fn test_reset_defaults() {
        let cfg = ConfigReg::new();

        assert_eq!(u16::from(cfg), 0);
        assert_eq!(cfg.power_mode(), PowerMode::Continuous);
        assert_eq!(cfg.hysteresis(), Hysteresis::Deg0);
        assert_eq!(cfg.alert_mode(), AlertMode::Comparator);
    }

    #[test]
    fn test_layout_matches_fields() {
        let cfg = ConfigReg::new().with_hysteresis(Hysteresis::Deg6);
        assert_eq!(u16::from(cfg), BitField::HYSTERESIS.mask());

        let cfg = ConfigReg::new().with_power_mode(PowerMode::Shutdown);
        assert_eq!(u16::from(cfg), BitField::POWER_MODE.mask());

        let cfg = ConfigReg::new()
            .with_alert_mode(AlertMode::Interrupt)
            .with_alert_polarity(AlertPolarity::ActiveHigh)
            .with_alert_select(AlertSelect::CriticalOnly)
            .with_alert_control(true);
        assert_eq!(u16::from(cfg), 0b1111);

        let cfg = ConfigReg::new().with_crit_lock(true);
        assert_eq!(u16::from(cfg), BitField::CRIT_LOCK.mask());
    }

    #[test]
    fn test_from_raw() {
        let cfg = ConfigReg::from(0b0000_0101_0001_0000u16);

        assert_eq!(cfg.hysteresis(), Hysteresis::Deg3);
        assert_eq!(cfg.power_mode(), PowerMode::Shutdown);
        assert!(cfg.alert_status());
        assert!(!cfg.alert_control());
    }

    #[test]
    fn test_alert_status_any() {
        assert!(!AlertStatus::default().any());
        assert!(AlertStatus { low: true, ..Default::default() }.any());
    }
}
