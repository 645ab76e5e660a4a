use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

#[allow(dead_code)]
pub struct UnimplementedHal;

impl ErrorType for UnimplementedHal {
    type Error = ErrorKind;
}

impl I2c for UnimplementedHal {
    fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use linux_embedded_hal::I2cdev;
        pub type HalImpl = I2cdev;
    } else {
        pub type HalImpl = UnimplementedHal;
    }
}

/// Bus named by `MCP9808_BUS` (e.g. `/dev/i2c-1`), if there is a sensor to talk to.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn setup() -> Option<HalImpl> {
    let bus = std::env::var("MCP9808_BUS").ok()?;

    I2cdev::new(bus).ok()
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn setup() -> Option<HalImpl> {
    std::env::var("MCP9808_BUS").ok().map(|_| UnimplementedHal {})
}
