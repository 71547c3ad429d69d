//! Main entry point for the cipher bridge

use std::io::Write;

use chrono::Local;
use env_logger::fmt::Color;
use env_logger::Builder;
use log::{error, info, LevelFilter};

use cipher_bridge::config::{Backend, Config};
use cipher_bridge::server;
use cipher_bridge::transport::{SimulatedPeripheral, Transport};
use cipher_bridge::{BridgeError, BridgeServer, Result};

const BANNER: &str = r#"
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║   Cipher Bridge v0.1.0                                    ║
║   HTTP form  <->  SPI block-cipher peripheral             ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"#;

fn setup_logger() {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            let mut timestamp_style = buf.style();
            let mut level_style = buf.style();
            let mut target_style = buf.style();
            let mut message_style = buf.style();

            let level_color = match record.level() {
                log::Level::Error => Color::Red,
                log::Level::Warn => Color::Yellow,
                log::Level::Info => Color::Green,
                log::Level::Debug => Color::Cyan,
                log::Level::Trace => Color::White,
            };

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(
                buf,
                "{} {} [{}] {}",
                timestamp_style.set_color(Color::Rgb(100, 100, 100)).value(timestamp),
                level_style.set_color(level_color).value(record.level()),
                target_style.set_color(Color::Blue).value(record.target()),
                message_style.set_color(Color::White).value(record.args())
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn open_transport(config: &Config) -> Result<Box<dyn Transport>> {
    match config.backend {
        Backend::Simulated => {
            info!("Using simulated peripheral");
            Ok(Box::new(SimulatedPeripheral::new(config.simulation_key()?)))
        }
        #[cfg(target_os = "linux")]
        Backend::Spidev => {
            let transport = cipher_bridge::transport::linux::open(&config.bus_config())?;
            Ok(Box::new(transport))
        }
        #[cfg(not(target_os = "linux"))]
        Backend::Spidev => Err(BridgeError::ConfigError(
            "the spidev backend is only available on Linux".to_string(),
        )),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logger();

    println!("{}", BANNER);

    info!("Starting cipher bridge...");
    let config = Config::load().map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Configuration loaded successfully");

    let transport = open_transport(&config).map_err(|e| {
        error!("Failed to open peripheral: {}", e);
        e
    })?;
    info!("✓ Peripheral transport ready");

    let mut bridge = BridgeServer::new(transport, config.server_settings());
    let listener = server::bind(config.bind_address).await?;

    info!("Serving one connection at a time");
    bridge.run(listener).await.map_err(|e: BridgeError| {
        error!("Server stopped: {}", e);
        e
    })
}
