//! Waveshare 2.13" (B/C) HAT on a Raspberry Pi
//!
//! The controller protocol is the `epd-waveshare` driver's business; this
//! module only opens SPI and GPIO the way the HAT is wired and maps the
//! driver onto [`Panel`].
//!
//! activate spi, gpio in raspi-config. Needs to run with sudo because of
//! sysfs_gpio permissions.

use std::io;

use epd_waveshare::{
    epd2in13bc::{Epd2in13bc, HEIGHT, WIDTH},
    prelude::*,
};
use linux_embedded_hal::{
    spidev::{self, SpidevOptions},
    sysfs_gpio::{self, Direction, Pin},
    Delay, SpidevDevice, SysfsPin,
};

use crate::panel::Panel;

/// Error of the hardware panel
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// SPI transfer failed
    #[error("spi: {0}")]
    Spi(String),
    /// Exporting or driving a pin failed
    #[error("gpio: {0}")]
    Gpio(#[from] sysfs_gpio::Error),
    /// Opening or configuring the SPI device failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn spi_error<E: core::fmt::Debug>(err: E) -> HardwareError {
    HardwareError::Spi(format!("{err:?}"))
}

/// Where the HAT is connected
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinLayout {
    /// SPI device, chip select is handled by the kernel
    pub spi_path: String,
    /// SPI clock
    pub spi_hz: u32,
    /// BUSY, GPIO 24, board J-18
    pub busy: u64,
    /// DC, GPIO 25, board J-22
    pub dc: u64,
    /// RST, GPIO 17, board J-11
    pub rst: u64,
}

impl Default for PinLayout {
    fn default() -> Self {
        PinLayout {
            spi_path: "/dev/spidev0.0".to_string(),
            spi_hz: 10_000_000,
            busy: 24,
            dc: 25,
            rst: 17,
        }
    }
}

impl PinLayout {
    /// Drive RST and DC low and unexport all pins
    ///
    /// Works on the pin numbers alone, so it can run while the driver is
    /// stuck in a busy wait.
    pub fn release(&self) -> Result<(), HardwareError> {
        log::info!("releasing gpio {}, {}, {}", self.rst, self.dc, self.busy);
        for number in [self.rst, self.dc] {
            Pin::new(number).set_value(0)?;
        }
        for number in [self.rst, self.dc, self.busy] {
            Pin::new(number).unexport()?;
        }
        Ok(())
    }
}

type Driver = Epd2in13bc<SpidevDevice, SysfsPin, SysfsPin, SysfsPin, Delay>;

/// The 104x212 black/red/white panel
pub struct Epd2in13Panel {
    spi: SpidevDevice,
    delay: Delay,
    epd: Driver,
    pins: PinLayout,
}

impl Epd2in13Panel {
    /// Open SPI, export the pins and create the driver
    pub fn open(pins: PinLayout) -> Result<Self, HardwareError> {
        let busy = export(pins.busy, Direction::In)?;
        let dc = export(pins.dc, Direction::Out)?;
        let rst = export(pins.rst, Direction::Out)?;

        let mut spi = SpidevDevice::open(&pins.spi_path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(pins.spi_hz)
            .mode(spidev::SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;

        let mut delay = Delay {};
        let epd = Epd2in13bc::new(&mut spi, busy, dc, rst, &mut delay, None).map_err(spi_error)?;

        Ok(Epd2in13Panel {
            spi,
            delay,
            epd,
            pins,
        })
    }
}

fn export(number: u64, direction: Direction) -> Result<SysfsPin, HardwareError> {
    let pin = SysfsPin::new(number);
    pin.export()?;
    while !pin.is_exported() {}
    pin.set_direction(direction)?;
    Ok(pin)
}

impl Panel for Epd2in13Panel {
    type Error = HardwareError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.epd
            .wake_up(&mut self.spi, &mut self.delay)
            .map_err(spi_error)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.epd
            .clear_frame(&mut self.spi, &mut self.delay)
            .map_err(spi_error)?;
        self.epd
            .display_frame(&mut self.spi, &mut self.delay)
            .map_err(spi_error)
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.epd
            .sleep(&mut self.spi, &mut self.delay)
            .map_err(spi_error)
    }

    fn display(&mut self, primary: &[u8], secondary: &[u8]) -> Result<(), Self::Error> {
        self.epd
            .update_color_frame(&mut self.spi, &mut self.delay, primary, secondary)
            .map_err(spi_error)?;
        self.epd
            .display_frame(&mut self.spi, &mut self.delay)
            .map_err(spi_error)
    }

    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.pins.release()
    }
}
