use log::{debug, warn};
use parking_lot::Mutex;
use std::{fmt::Display, sync::Arc};

use crate::{
    bus::{BusTransport, TransportError},
    config::MuxConfig,
};

pub const DEFAULT_I2C_ADDR: u8 = 0x70; // A0 = SCL, A1 = GND, unshifted

// The chip ID lives behind its own bus address, not behind a register
// offset on the main device address.
const DEVICE_ID_ADDR: u8 = 0x7C; // unshifted
const DEVICE_ID: u32 = 0x000858;

const PORT_COUNT: u8 = 4;
const MAX_PORT: u8 = PORT_COUNT - 1;

#[derive(Debug, PartialEq)]
pub enum MuxError {
    Transport(TransportError),
    UnknownChip { expected: u32, found: u32 },
    InvalidConfig(String),
}

impl Display for MuxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            MuxError::Transport(err) => format!("transport error: {}", err),
            MuxError::UnknownChip { expected, found } => format!(
                "unexpected chip ID: reported 0x{:06X} but expected 0x{:06X}",
                found, expected
            ),
            MuxError::InvalidConfig(msg) => format!("invalid config: {}", msg),
        })
    }
}

impl From<TransportError> for MuxError {
    fn from(err: TransportError) -> Self {
        MuxError::Transport(err)
    }
}

/// Driver for the PCA9846 4-port mux. The chip exposes a single offset-less
/// control register whose low 4 bits enable downstream ports 0..=3; every
/// operation here is one or two bus transactions, with no client-side copy
/// of the register.
pub struct Pca9846<T: BusTransport> {
    address: u8,
    bus: Arc<Mutex<T>>,
}

impl<T: BusTransport> Pca9846<T> {
    pub fn new(bus: Arc<Mutex<T>>) -> Self {
        Self::with_address(bus, DEFAULT_I2C_ADDR)
    }

    pub fn with_address(bus: Arc<Mutex<T>>, address: u8) -> Self {
        Pca9846 { address, bus }
    }

    pub fn from_config(bus: Arc<Mutex<T>>, config: &MuxConfig) -> Result<Self, MuxError> {
        config
            .validate()
            .map_err(|e| MuxError::InvalidConfig(e.to_string()))?;

        Ok(Self::with_address(bus, config.device_address))
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Pings the device, then verifies the chip ID. The ID is not read at
    /// all if the ping fails.
    pub fn initialize(&mut self) -> Result<(), MuxError> {
        {
            let mut bus = self.bus.lock();
            bus.ping(self.address)?;
        }

        let id = self.unique_id()?;
        if id != DEVICE_ID {
            warn!(
                "Address 0x{:02X} contains an invalid device - reported chip ID 0x{:06X} but expected 0x{:06X}",
                self.address, id, DEVICE_ID
            );
            return Err(MuxError::UnknownChip {
                expected: DEVICE_ID,
                found: id,
            });
        }

        debug!("PCA9846 at 0x{:02X} identified", self.address);
        Ok(())
    }

    /// Re-reads and compares the chip ID; no transport-level ping.
    pub fn is_connected(&mut self) -> bool {
        self.unique_id().map_or(false, |id| id == DEVICE_ID)
    }

    /// Reads the 24-bit chip ID, composed big-endian:
    /// 0b 0000 0000 0000 1000 0101 1000 = 0x000858
    pub fn unique_id(&mut self) -> Result<u32, MuxError> {
        let mut chip_id = [0u8; 3];
        self.bus
            .lock()
            .read_register(DEVICE_ID_ADDR, self.address << 1, &mut chip_id)?;

        Ok((chip_id[0] as u32) << 16 | (chip_id[1] as u32) << 8 | chip_id[2] as u32)
    }

    // Enables one port. Disables all others.
    // If the port number is out of range, all ports are turned off.
    pub fn set_port(&mut self, port: u8) -> Result<(), MuxError> {
        let mask = if port > MAX_PORT { 0 } else { 1 << port };
        self.set_port_state(mask)
    }

    /// Returns the lowest enabled port, or `None` if every port is off.
    pub fn first_port(&mut self) -> Result<Option<u8>, MuxError> {
        let bits = self.port_state()?;
        for port in 0..PORT_COUNT {
            if bits & (1 << port) != 0 {
                return Ok(Some(port));
            }
        }

        Ok(None)
    }

    // Overwrites the whole control register, so multiple ports can be
    // enabled or disabled in one call. Bits above 3 are reserved by the
    // hardware and written verbatim.
    pub fn set_port_state(&mut self, bits: u8) -> Result<(), MuxError> {
        self.bus.lock().write_byte(self.address, bits)?;
        debug!(
            "PCA9846 at 0x{:02X} control register set to {:#06b}",
            self.address, bits
        );
        Ok(())
    }

    pub fn port_state(&mut self) -> Result<u8, MuxError> {
        Ok(self.bus.lock().read_byte(self.address)?)
    }

    // Sets one port bit without touching the others. Port numbers above 3
    // are clamped to 3.
    pub fn enable_port(&mut self, port: u8) -> Result<(), MuxError> {
        let port = port.min(MAX_PORT);
        let bits = self.port_state()?;
        self.set_port_state(bits | 1 << port)
    }

    // Clears one port bit without touching the others. Port numbers above 3
    // are clamped to 3.
    pub fn disable_port(&mut self, port: u8) -> Result<(), MuxError> {
        let port = port.min(MAX_PORT);
        let bits = self.port_state()?;
        self.set_port_state(bits & !(1 << port))
    }
}
