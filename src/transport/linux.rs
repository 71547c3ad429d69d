//! Linux userspace backend: `/dev/spidevX.Y` for the bus and a sysfs GPIO
//! line for chip select.

use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{SpidevBus, SysfsPin};
use log::info;

use super::{BusConfig, SpiTransport, TransportError};

pub type LinuxSpiTransport = SpiTransport<SpidevBus, SysfsPin>;

fn mode_flags(mode: u8) -> Result<SpiModeFlags, TransportError> {
    match mode {
        0 => Ok(SpiModeFlags::SPI_MODE_0),
        1 => Ok(SpiModeFlags::SPI_MODE_1),
        2 => Ok(SpiModeFlags::SPI_MODE_2),
        3 => Ok(SpiModeFlags::SPI_MODE_3),
        other => Err(TransportError::Setup(format!("unsupported SPI mode {other}"))),
    }
}

pub fn open(config: &BusConfig) -> Result<LinuxSpiTransport, TransportError> {
    let mut bus = SpidevBus::open(&config.device).map_err(|e| {
        TransportError::Setup(format!("opening {}: {e:?}", config.device.display()))
    })?;

    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(config.clock_hz)
        .mode(mode_flags(config.mode)?)
        .build();
    bus.configure(&options)
        .map_err(|e| TransportError::Setup(format!("configuring bus: {e:?}")))?;

    let cs = SysfsPin::new(config.cs_gpio);
    cs.export()
        .map_err(|e| TransportError::Setup(format!("exporting GPIO {}: {e:?}", config.cs_gpio)))?;
    cs.set_direction(Direction::High)
        .map_err(|e| TransportError::Setup(format!("GPIO {} direction: {e:?}", config.cs_gpio)))?;

    info!(
        "SPI bus {} ready at {} Hz, mode {}, chip select on GPIO {}",
        config.device.display(),
        config.clock_hz,
        config.mode,
        config.cs_gpio
    );

    SpiTransport::new(bus, cs)
}
