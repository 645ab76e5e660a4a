use std::thread;
use std::time::{Duration, SystemTime};

use argh::FromArgs;
use eyre::Result;
use tracing::{info, warn};

#[derive(FromArgs)]
#[argh(description = "log mcp9808 temperature readings")]
struct InputArgs {
    #[argh(option, default = "String::from(\"/dev/i2c-1\")", description = "i2c bus device")]
    bus: String,
    #[argh(option, default = "mcp9808::DEFAULT_ADDRESS", from_str_fn(from_base_16), description = "sensor address (hex)")]
    addr: u8,
    #[argh(option, default = "1000", description = "milliseconds between samples")]
    interval: u64,
}

fn from_base_16(val: &str) -> Result<u8, String> {
    u8::from_str_radix(val.trim_start_matches("0x"), 16)
        .map_err(|_| "Unable to convert address from base 16".into())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn sample(args: InputArgs) -> Result<()> {
    use linux_embedded_hal::I2cdev;
    use mcp9808::Mcp9808;

    let i2c = I2cdev::new(&args.bus)?;
    let mut mcp = Mcp9808::new(i2c, args.addr)?;

    info!(bus = %args.bus, addr = args.addr, "found mcp9808");

    loop {
        let cels = mcp.temperature()?.to_f32();
        let fahr = 1.8 * cels + 32.0;
        let alerts = mcp.alert_status()?;

        let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?.as_secs();
        info!(now, cels, fahr, "sample");

        if alerts.any() {
            warn!(critical = alerts.critical, high = alerts.high, low = alerts.low, "alert");
        }

        thread::sleep(Duration::from_millis(args.interval));
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn sample(_args: InputArgs) -> Result<()> {
    Err(eyre::eyre!("i2c sampling is only supported on linux"))
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    sample(argh::from_env())
}
