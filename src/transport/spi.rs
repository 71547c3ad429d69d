//! Chip-select framed transport over an `embedded-hal` SPI bus.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use log::{debug, warn};

use super::{Transport, TransportError};
use crate::models::{Block, BLOCK_LEN};

/// Holds chip select low for the lifetime of one frame.
struct SelectGuard<'a, CS: OutputPin> {
    pin: &'a mut CS,
    released: bool,
}

impl<'a, CS: OutputPin> SelectGuard<'a, CS> {
    fn assert(pin: &'a mut CS) -> Result<Self, TransportError> {
        pin.set_low()
            .map_err(|e| TransportError::Select(format!("assert failed: {e:?}")))?;
        Ok(Self { pin, released: false })
    }

    fn release(mut self) -> Result<(), TransportError> {
        self.released = true;
        self.pin
            .set_high()
            .map_err(|e| TransportError::Select(format!("deassert failed: {e:?}")))
    }
}

impl<CS: OutputPin> Drop for SelectGuard<'_, CS> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.pin.set_high() {
                warn!("Failed to deassert chip select while unwinding: {:?}", e);
            }
        }
    }
}

pub struct SpiTransport<SPI, CS> {
    bus: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Takes ownership of the bus and drives chip select to its idle (high)
    /// level.
    pub fn new(bus: SPI, mut cs: CS) -> Result<Self, TransportError> {
        cs.set_high()
            .map_err(|e| TransportError::Select(format!("idle level: {e:?}")))?;
        Ok(Self { bus, cs })
    }

    pub fn release(self) -> (SPI, CS) {
        (self.bus, self.cs)
    }

    /// Runs `op` between chip-select assert and deassert. Deassert happens
    /// on every path; a bus error wins over a deassert error.
    fn frame<R>(
        &mut self,
        op: impl FnOnce(&mut SPI) -> Result<R, TransportError>,
    ) -> Result<R, TransportError> {
        let guard = SelectGuard::assert(&mut self.cs)?;
        let result = op(&mut self.bus).and_then(|value| {
            self.bus
                .flush()
                .map_err(|e| TransportError::Write(format!("flush: {e:?}")))?;
            Ok(value)
        });
        let released = guard.release();

        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                warn!("Chip select release also failed: {}", release_err);
                Err(e)
            }
        }
    }
}

impl<SPI, CS> Transport for SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn write_block(&mut self, block: &Block) -> Result<(), TransportError> {
        debug!("SPI write {}", block.to_hex());
        self.frame(|bus| {
            bus.write(block.as_bytes())
                .map_err(|e| TransportError::Write(format!("{e:?}")))
        })
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        let mut buf = [0u8; BLOCK_LEN];
        self.frame(|bus| {
            bus.read(&mut buf)
                .map_err(|e| TransportError::Read(format!("{e:?}")))
        })?;
        let block = Block::new(buf);
        debug!("SPI read {}", block.to_hex());
        Ok(block)
    }
}
