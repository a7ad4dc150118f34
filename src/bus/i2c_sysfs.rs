use super::{BusTransport, TransportError};
use i2c_linux::{I2c, ReadWrite};
use log::warn;
use std::{
    fs::File,
    io::{Error, Read, Write},
    os::fd::AsRawFd,
    path::Path,
};

const I2C_CLASS_PATH: &str = "/sys/class/i2c-dev";
const I2C_DEVICE_PATH: &str = "/dev";

// helper methods for interfacing with devices over I2C
pub fn ping_address<T: AsRawFd>(bus: &mut I2c<T>, address: u8) -> Result<(), Error> {
    bus.smbus_set_slave_address(address as u16, false)?;
    bus.smbus_write_quick(ReadWrite::Write)?;
    Ok(())
}

pub fn write_command<T: Write + AsRawFd>(
    bus: &mut I2c<T>,
    address: u8,
    command: u8,
) -> Result<(), Error> {
    bus.smbus_set_slave_address(address as u16, false)?;
    bus.write(&[command])?;
    Ok(())
}

pub fn write_register<T: Write + AsRawFd>(
    bus: &mut I2c<T>,
    address: u8,
    register: u8,
    data: &[u8],
) -> Result<(), Error> {
    bus.smbus_set_slave_address(address as u16, false)?;
    let mut frame = Vec::with_capacity(data.len() + 1);
    frame.push(register);
    frame.extend_from_slice(data);
    bus.write(&frame)?;
    Ok(())
}

pub fn read_command<T: Read + AsRawFd>(bus: &mut I2c<T>, address: u8) -> Result<u8, Error> {
    bus.smbus_set_slave_address(address as u16, false)?;
    let mut buf = [0u8; 1];
    bus.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn read_register<T: Read + Write + AsRawFd>(
    bus: &mut I2c<T>,
    address: u8,
    register: u8,
    buf: &mut [u8],
) -> Result<usize, Error> {
    bus.smbus_set_slave_address(address as u16, false)?;
    bus.write(&[register])?;
    bus.read(buf)
}

fn sysfs_map_err(err: std::io::Error, default_err_msg: &str) -> TransportError {
    TransportError::HardwareError(format!("{}: {}", default_err_msg, err))
}

/// Bus transport backed by a Linux i2c-dev character device. Owns the open
/// file handle; callers that share one physical bus between devices wrap
/// this in `Arc<Mutex<..>>` and hand out clones.
pub struct SysfsI2cTransport {
    bus: I2c<File>,
}

impl SysfsI2cTransport {
    pub fn from_bus_id(bus_id: u8) -> Result<Self, TransportError> {
        let path = Path::new(I2C_CLASS_PATH);
        if !path.exists() || !path.is_dir() {
            return Err(TransportError::Other(
                "I2C is not supported on this system".to_string(),
            ));
        }

        Self::from_path(Path::new(I2C_DEVICE_PATH).join(format!("i2c-{}", bus_id)))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TransportError> {
        let bus = I2c::from_path(path.as_ref()).map_err(|err| {
            sysfs_map_err(
                err,
                &format!("failed to open I2C device {}", path.as_ref().display()),
            )
        })?;

        Ok(SysfsI2cTransport { bus })
    }
}

impl BusTransport for SysfsI2cTransport {
    fn ping(&mut self, address: u8) -> Result<(), TransportError> {
        ping_address(&mut self.bus, address).map_err(|_| TransportError::NoAck(address))
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), TransportError> {
        write_command(&mut self.bus, address, value)
            .map_err(|err| sysfs_map_err(err, &format!("byte write to 0x{:02X} failed", address)))
    }

    fn write_register(
        &mut self,
        address: u8,
        offset: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        write_register(&mut self.bus, address, offset, data).map_err(|err| {
            sysfs_map_err(
                err,
                &format!(
                    "register write to 0x{:02X} offset 0x{:02X} failed",
                    address, offset
                ),
            )
        })
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        read_command(&mut self.bus, address)
            .map_err(|err| sysfs_map_err(err, &format!("byte read from 0x{:02X} failed", address)))
    }

    fn read_register(
        &mut self,
        address: u8,
        offset: u8,
        buf: &mut [u8],
    ) -> Result<(), TransportError> {
        let count = read_register(&mut self.bus, address, offset, buf).map_err(|err| {
            sysfs_map_err(
                err,
                &format!(
                    "register read from 0x{:02X} offset 0x{:02X} failed",
                    address, offset
                ),
            )
        })?;

        if count != buf.len() {
            warn!(
                "Register read from 0x{:02X} offset 0x{:02X} returned {} of {} byte(s)",
                address,
                offset,
                count,
                buf.len()
            );
            return Err(TransportError::ShortRead {
                expected: buf.len(),
                actual: count,
            });
        }

        Ok(())
    }
}
