use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{BridgeError, Result};
use crate::models::BLOCK_LEN;
use crate::server::ServerSettings;
use crate::transport::BusConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// In-process XOR peripheral, no hardware needed
    Simulated,
    /// Linux spidev bus with a sysfs GPIO chip select
    Spidev,
}

/// HTTP front end for a block-cipher peripheral on an SPI bus
#[derive(Parser, Debug, Clone)]
#[command(name = "cipher-bridge", version)]
pub struct Config {
    /// Address the HTTP listener binds to
    #[arg(long, env = "BRIDGE_BIND_ADDRESS", default_value = "0.0.0.0:80")]
    pub bind_address: SocketAddr,

    /// Maximum bytes read from a client per request
    #[arg(long, env = "BRIDGE_REQUEST_BUFFER", default_value_t = 1024)]
    pub request_buffer: usize,

    /// Seconds to wait for a request after accepting; 0 waits forever
    #[arg(long, env = "BRIDGE_READ_TIMEOUT_SECS", default_value_t = 30)]
    pub read_timeout_secs: u64,

    /// Peripheral backend
    #[arg(long, value_enum, env = "BRIDGE_BACKEND", default_value_t = Backend::Simulated)]
    pub backend: Backend,

    /// spidev device node
    #[arg(long, env = "BRIDGE_SPI_DEVICE", default_value = "/dev/spidev0.0")]
    pub spi_device: PathBuf,

    /// Bus clock in Hz
    #[arg(long, env = "BRIDGE_SPI_CLOCK_HZ", default_value_t = 1_000_000)]
    pub spi_clock_hz: u32,

    /// SPI mode (0-3)
    #[arg(long, env = "BRIDGE_SPI_MODE", default_value_t = 0)]
    pub spi_mode: u8,

    /// GPIO line used as active-low chip select
    #[arg(long, env = "BRIDGE_CS_GPIO", default_value_t = 1)]
    pub cs_gpio: u64,

    /// 32 hex characters XORed into every block by the simulated backend
    #[arg(long, env = "BRIDGE_SIM_KEY")]
    pub sim_key: Option<String>,
}

impl Config {
    /// Parses the command line (with environment fallbacks) and validates it.
    pub fn load() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_buffer == 0 {
            return Err(BridgeError::ConfigError(
                "request buffer must be at least one byte".to_string(),
            ));
        }
        if self.spi_mode > 3 {
            return Err(BridgeError::ConfigError(format!(
                "SPI mode must be 0-3, got {}",
                self.spi_mode
            )));
        }
        if self.spi_clock_hz == 0 {
            return Err(BridgeError::ConfigError("SPI clock must be non-zero".to_string()));
        }
        self.simulation_key()?;
        Ok(())
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            request_buffer: self.request_buffer,
            read_timeout: (self.read_timeout_secs > 0)
                .then(|| Duration::from_secs(self.read_timeout_secs)),
        }
    }

    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            device: self.spi_device.clone(),
            clock_hz: self.spi_clock_hz,
            mode: self.spi_mode,
            cs_gpio: self.cs_gpio,
        }
    }

    /// Key for the simulated peripheral; all zeroes when unset.
    pub fn simulation_key(&self) -> Result<[u8; BLOCK_LEN]> {
        let mut key = [0u8; BLOCK_LEN];
        if let Some(text) = &self.sim_key {
            hex::decode_to_slice(text, &mut key).map_err(|e| {
                BridgeError::ConfigError(format!("sim key must be 32 hex characters: {e}"))
            })?;
        }
        Ok(key)
    }
}
