use std::error::Error;
use std::time::Duration;

use bpaf::{Bpaf, Parser};
use hidapi::HidApi;
use rgb_sync_core::Rgb;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::detection::{detect, device_kind, DeviceKind, SUPPORTED};

mod config;
mod daemon;
mod detection;
mod lock;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version, descr(env!("CARGO_PKG_DESCRIPTION")))]
struct Cli {
    #[bpaf(external(device_kind))]
    device: DeviceKind,
    #[bpaf(external(command))]
    command: Command,
}

#[derive(Clone, Debug)]
enum Command {
    /// Keep every device painted, following config changes (default).
    Run,
    /// Print supported devices and which are plugged in.
    List,
    /// Paint every device once, hold, then exit.
    /// Must not be used while rgb-sync is already running.
    Set { color: Rgb, hold: Duration },
}

fn set_command() -> impl Parser<Command> {
    let color = bpaf::positional::<Rgb>("COLOR").help("Fill color (hex: #RRGGBB or #RGB)");
    let hold = bpaf::long("hold")
        .help("How long to hold the color before releasing the devices")
        .argument::<humantime::Duration>("DURATION")
        .fallback(Duration::from_secs(1).into())
        .display_fallback()
        .map(Duration::from);
    bpaf::construct!(Command::Set { hold, color })
}

fn command() -> impl Parser<Command> {
    let run = bpaf::pure(Command::Run)
        .to_options()
        .descr("Keep every device painted, following config changes")
        .command("run")
        .help("Keep every device painted, following config changes (default)");

    let list = bpaf::pure(Command::List)
        .to_options()
        .descr("Print supported devices and which are plugged in")
        .command("list")
        .help("Print supported devices and which are plugged in");

    let set = set_command()
        .to_options()
        .descr("Paint every device once, hold, then exit")
        .command("set")
        .help("Paint every device once, hold, then exit");

    bpaf::construct!([run, list, set]).fallback(Command::Run)
}

fn list(kind: DeviceKind) -> Result<(), Box<dyn Error>> {
    println!("supported devices:");
    for info in SUPPORTED {
        println!(
            "  {:<16} {} ({}, {} updates/s)",
            info.cli_name,
            info.name,
            info.class.as_str(),
            info.updates_per_second
        );
    }

    let api = HidApi::new()?;
    let found = detect(&api, kind);
    if found.is_empty() {
        println!("no supported devices plugged in");
        return Ok(());
    }
    println!("plugged in:");
    for device in found {
        println!(
            "  {:<16} {} [{:04x}]",
            device.info.cli_name, device.product, device.product_id
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = cli().run();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::List => list(cli.device),
        Command::Run => {
            let _lock = lock::Lock::acquire()?;
            let config = Config::load_or_create()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(daemon::run(config, cli.device))
        },
        Command::Set { color, hold } => {
            let _lock = lock::Lock::acquire()?;
            let config = Config::load_or_create()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(daemon::set(config, cli.device, color, hold))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_valid() {
        cli().check_invariants(false);
    }

    #[test]
    fn run_is_default() {
        let parsed = cli().run_inner(&[] as &[&str]).unwrap();
        assert!(matches!(parsed.command, Command::Run));
        assert_eq!(parsed.device, DeviceKind::Auto);
    }

    #[test]
    fn set_takes_color_and_hold() {
        let parsed = cli()
            .run_inner(&["--drevo", "set", "#f00", "--hold", "250ms"])
            .unwrap();
        assert_eq!(parsed.device, DeviceKind::Drevo);
        match parsed.command {
            Command::Set { color, hold } => {
                assert_eq!(color, Rgb::new(255, 0, 0));
                assert_eq!(hold, Duration::from_millis(250));
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn set_hold_defaults_to_a_second() {
        let parsed = cli().run_inner(&["set", "00ff00"]).unwrap();
        assert!(matches!(
            parsed.command,
            Command::Set { hold, .. } if hold == Duration::from_secs(1)
        ));
    }
}
