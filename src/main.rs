use std::process;

use anyhow::Context;
use linux_embedded_hal::Delay;
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};

use epd_rolling_log::{
    hardware::{Epd2in13Panel, PinLayout},
    prelude::*,
    runner::finish,
    watch::DirectoryWatch,
};

// exit status of a process stopped by SIGINT
const INTERRUPTED: i32 = 130;

fn main() -> anyhow::Result<()> {
    SimpleLogger::init(LevelFilter::Debug, LogConfig::default())?;

    let config = Config::default();
    let pins = PinLayout::default();

    // before the pins are exported, so no interrupt can leave them behind
    let stuck_pins = pins.clone();
    let shutdown = Shutdown::install(move || {
        if let Err(err) = stuck_pins.release() {
            log::error!("{err}");
        }
        process::exit(INTERRUPTED);
    })?;

    let fields = StatusFields::probe(&config).context("reading network status")?;
    let mut panel = Epd2in13Panel::open(pins).context("opening the panel")?;
    let events = subscribe(DirectoryWatch::new(&config.watch_dir)?)?;

    let mut pager = Pager::for_panel(MonoTypeface::default(), fields, &panel, config.rotation);
    let mut delay = Delay {};

    let outcome = run(&mut panel, &mut pager, &events, &shutdown, &mut delay, &config);
    finish(&mut panel, outcome, &shutdown)?;
    Ok(())
}
