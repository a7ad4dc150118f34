use std::fmt::Display;

#[derive(Debug, PartialEq)]
pub enum TransportError {
    NoAck(u8),
    ShortRead { expected: usize, actual: usize },
    InvalidAddress(u16),
    HardwareError(String),
    Other(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            TransportError::NoAck(address) => {
                format!("device at address 0x{:02X} did not acknowledge", address)
            }
            TransportError::ShortRead { expected, actual } => {
                format!("short read: expected {} byte(s), got {}", expected, actual)
            }
            TransportError::InvalidAddress(address) => {
                format!("invalid slave address: 0x{:02X}", address)
            }
            TransportError::HardwareError(msg) => format!("hardware error: {}", msg),
            TransportError::Other(msg) => format!("{}", msg),
        })
    }
}

/// Capability contract for the raw I2C transaction engine. The device layer
/// only depends on this trait, so any byte-level transport (or a mock) can
/// sit underneath it. All operations are synchronous and blocking; a failed
/// transaction is reported immediately, nothing is retried.
pub trait BusTransport: Send {
    /// Zero-length transaction; `Ok` iff the address acknowledges.
    fn ping(&mut self, address: u8) -> Result<(), TransportError>;

    /// Writes one byte with no register offset.
    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), TransportError>;

    /// Writes an offset byte followed by a data block.
    fn write_register(&mut self, address: u8, offset: u8, data: &[u8])
        -> Result<(), TransportError>;

    /// Reads exactly one byte, no register offset.
    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError>;

    /// Writes the offset, then reads `buf.len()` bytes without releasing the
    /// bus in between. Fails with `ShortRead` if fewer bytes come back.
    fn read_register(&mut self, address: u8, offset: u8, buf: &mut [u8])
        -> Result<(), TransportError>;
}

// Transport implementations
pub mod i2c_sysfs; // SysfsI2cTransport
