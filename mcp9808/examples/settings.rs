use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use linux_embedded_hal::I2cdev;
        use mcp9808::*;
        use argh::FromArgs;
        use eyre::{eyre, Result};
        use std::thread::sleep;
        use std::time::Duration;

        #[derive(FromArgs)]
        #[argh(description = "cycle mcp9808 settings while sampling")]
        struct InputArgs {
            #[argh(positional)]
            bus: String,
            #[argh(positional, from_str_fn(from_base_16), default = "DEFAULT_ADDRESS")]
            addr: u8,
            #[argh(option, short='n', default = "5", description = "samples per setting")]
            num: u32,
        }

        fn from_base_16(val: &str) -> Result<u8, String> {
            let no_prefix = val.trim_start_matches("0x");

            u8::from_str_radix(no_prefix, 16).map_err(|_| "Unable to convert address from base 16".into())
        }

        fn cycle<S, I>(mcp: &mut Mcp9808<I>, num: u32) -> Result<()>
        where
            S: Setting + 'static,
            I: embedded_hal::i2c::I2c,
        {
            for code in 0..S::NAMES.len() as u8 {
                mcp.set_setting::<S, u8>(code).map_err(|e| eyre!("failed to write setting {}: {}", code, e))?;
                let current: S = mcp.setting().map_err(|e| eyre!("failed to read back setting: {}", e))?;
                println!("Current setting: {}", current.name());

                for _ in 0..num {
                    let temp = mcp
                        .temperature()
                        .map_err(|e| eyre!("failed to read a temperature: {}", e))?;
                    println!("Temperature: {:.2} C", temp.to_f32());
                    sleep(Duration::from_millis(500));
                }
            }

            Ok(())
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<()> {
    let args: InputArgs = argh::from_env();

    let i2c: I2cdev = I2cdev::new(args.bus)?;
    let mut mcp = Mcp9808::new(i2c, args.addr).map_err(|e| eyre!("failed to find sensor: {}", e))?;

    cycle::<Hysteresis, _>(&mut mcp, args.num)?;
    cycle::<Resolution, _>(&mut mcp, args.num)?;
    cycle::<PowerMode, _>(&mut mcp, args.num)?;

    mcp.set_power_mode(PowerMode::Continuous)
        .map_err(|e| eyre!("failed to leave shutdown: {}", e))?;

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
