use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use crossterm::{cursor, ExecutableCommand};
        use fixed::types::I12F4;
        use fixed_macro::fixed;
        use linux_embedded_hal::I2cdev;
        use mcp9808::*;
        use argh::FromArgs;
        // no_std crates don't have access to the Error trait. However, because mcp9808 crate
        // error types impl Display, we can use the eyre crate to ad-hoc convert our error types
        // to ones that impl Error via the eyre! macro.
        use eyre::{eyre, Result};
        use std::convert::TryInto;
        use std::io::{stdout, Write};
        use std::thread::sleep;
        use std::time::Duration;

        #[derive(FromArgs)]
        #[argh(description = "mcp9808 alert limits demo")]
        struct InputArgs {
            #[argh(positional)]
            bus: String,
            #[argh(positional, from_str_fn(from_base_16), default = "DEFAULT_ADDRESS")]
            addr: u8,
        }

        fn from_base_16(val: &str) -> Result<u8, String> {
            let no_prefix = val.trim_start_matches("0x");

            match u8::from_str_radix(no_prefix, 16) {
                Ok(v) => Ok(v),
                Err(_) => {
                    Err("Unable to convert address from base 16".into())
                }
            }
        }

        fn show<W: Write>(out: &mut W, temp: Temperature, status: AlertStatus) -> Result<()> {
            out.execute(cursor::SavePosition)?;
            out.write_all(
                format!(
                    "Current temp is {} C (low: {}, high: {}, critical: {}).\r",
                    temp, status.low, status.high, status.critical
                )
                .as_bytes(),
            )?;
            out.execute(cursor::RestorePosition)?;
            out.flush()?;

            Ok(())
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<()> {
    let args: InputArgs = argh::from_env();

    let i2c: I2cdev = I2cdev::new(args.bus)?;
    let mut mcp = Mcp9808::new(i2c, args.addr).map_err(|e| eyre!("failed to find sensor: {}", e))?;

    let cfg = ConfigReg::new()
        .with_alert_mode(AlertMode::Comparator)
        .with_alert_polarity(AlertPolarity::ActiveHigh)
        .with_alert_control(true)
        .with_hysteresis(Hysteresis::Deg0);
    mcp.set_config(cfg)
        .map_err(|e| eyre!("failed to set config reg: {}", e))?;

    let temp = mcp
        .temperature()
        .map_err(|e| eyre!("failed to read a temperature: {}", e))?;

    let temp_lo: I12F4 = I12F4::from(temp).floor() + fixed!(1: I12F4);
    let temp_hi: I12F4 = I12F4::from(temp).floor() + fixed!(2: I12F4);
    let temp_crit: I12F4 = I12F4::from(temp).floor() + fixed!(10: I12F4);
    let limits: Limits = (temp_lo, temp_hi, temp_crit)
        .try_into()
        .map_err(|e| eyre!("bad limits: {}", e))?;
    mcp.set_limits(limits)
        .map_err(|e| eyre!("failed to set temperature sensor limits: {}", e))?;

    println!(
        "Target temp is {} C! Press your finger against the sensor!",
        temp_hi
    );

    let mut stdout = stdout();

    loop {
        let temp = mcp
            .temperature()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;
        let status = mcp
            .alert_status()
            .map_err(|e| eyre!("failed to read alert status: {}", e))?;

        show(&mut stdout, temp, status)?;

        sleep(Duration::from_millis(250)); // Conversion time at the power-on resolution.

        if status.high {
            break;
        }
    }

    println!("\nRelease finger from sensor! Waiting for {} C!", temp_lo);

    loop {
        let temp = mcp
            .temperature()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;
        let status = mcp
            .alert_status()
            .map_err(|e| eyre!("failed to read alert status: {}", e))?;

        show(&mut stdout, temp, status)?;

        sleep(Duration::from_millis(250));

        if status.low {
            break;
        }
    }

    println!("\nLimits demo done!");

    let _i2c_old = mcp.free();

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
