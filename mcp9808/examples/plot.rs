use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use linux_embedded_hal::{I2cdev, I2CError, i2cdev::linux::LinuxI2CError};
        use mcp9808::*;
        use argh::FromArgs;
        use textplots::{Chart, Plot, Shape};
        use std::thread::sleep;
        use std::time::Duration;
        use indicatif::{ProgressBar, ProgressStyle};
        use std::fs::File;
        use std::io::Write;
        use std::error::Error as ErrorTrait;
        use std::convert::TryFrom;
        use std::iter;

        #[derive(FromArgs)]
        #[argh(description = "plot mcp9808 data")]
        struct InputArgs {
            #[argh(positional)]
            bus: String,
            #[argh(positional, from_str_fn(from_base_16))]
            addr: u8,
            #[argh(option, short='n', default = "default_num_samples()", description = "number of samples to take")]
            num: u32,
            #[argh(option, short='r', default = "default_resolution()", from_str_fn(get_resolution), description = "sample resolution")]
            res: Resolution,
            #[argh(option, short='o', description = "out json file")]
            out_file: Option<String>
        }

        #[derive(Debug)]
        #[allow(dead_code)]
        enum PlotError {
            I2c(LinuxI2CError),
            Mcp9808(mcp9808::Error<I2CError>),
            OutputError(Box<dyn ErrorTrait>)
        }

        impl From<LinuxI2CError> for PlotError {
            fn from(i2c_err: LinuxI2CError) -> PlotError {
                PlotError::I2c(i2c_err)
            }
        }

        impl From<mcp9808::Error<I2CError>> for PlotError {
            fn from(mcp9808_err: mcp9808::Error<I2CError>) -> PlotError {
                PlotError::Mcp9808(mcp9808_err)
            }
        }

        fn default_num_samples() -> u32 {
            100
        }

        fn default_resolution() -> Resolution {
            Resolution::Deg0_125
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

        fn get_resolution(val: &str) -> Result<Resolution, String> {
            if let Ok(res) = val.parse::<Resolution>() {
                return Ok(res);
            }

            match u8::from_str_radix(val, 10) {
                Ok(r) => {
                    Resolution::try_from(r).map_err(|_| "Invalid resolution (expected 0, 1, 2, or 3)".into())
                },
                _ => {
                    Err("Invalid resolution (not a base-10 number or a resolution name)".into())
                }
            }
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<(), PlotError> {
    let args: InputArgs = argh::from_env();

    let i2c: I2cdev = I2cdev::new(args.bus)?;
    let mut mcp = Mcp9808::new(i2c, args.addr)?;
    let mut points: Vec<(f32, f32)> = Vec::new();
    let mut data: Vec<f32> = Vec::new();

    let bar = ProgressBar::new(args.num as u64);
    bar.set_style(ProgressStyle::default_bar().progress_chars("#>-"));

    mcp.set_power_mode(PowerMode::Continuous)?;
    mcp.set_resolution(args.res)?;
    let sample_time = args.res.conversion_time_ms();

    println!(
        "Capturing data at {} C resolution (1 sample every {} milliseconds)",
        args.res.step(),
        sample_time
    );

    (0..args.num)
        .zip(iter::repeat_with(|| mcp.temperature()))
        .map(|(i, t)| (i as f32, t.map(f32::from)))
        .try_for_each(|(i, t)| {
            let temp = t?;

            points.push((i, temp));
            data.push(temp);

            sleep(Duration::from_millis((sample_time - 1).into())); // ~1 milli for i2c read.
            bar.inc(1);

            Ok::<_, PlotError>(())
        })?;

    bar.finish();

    println!(
        "\ny = {} temperature samples (1 every {} milliseconds)",
        args.num, sample_time
    );
    Chart::new(120, 60, 0.0, args.num as f32)
        .lineplot(&Shape::Steps(&points))
        .display();

    let json_str = serde_json::to_string(&data).map_err(|e| PlotError::OutputError(Box::new(e)))?;

    if let Some(out) = args.out_file {
        let mut file = File::create(out).map_err(|e| PlotError::OutputError(Box::new(e)))?;
        file.write_all(json_str.as_bytes())
            .map_err(|e| PlotError::OutputError(Box::new(e)))?;
    } else {
        println!("\n{}", json_str);
    }

    let _i2c_old = mcp.free();

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
