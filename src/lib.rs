// Driver for the PCA9846 4-port I2C multiplexer. The mux routes one upstream
// I2C bus to any subset of four downstream ports through a single control
// register; this crate exposes that register behind a transport-agnostic
// device layer.

pub mod bus;
pub mod config;
pub mod mux;


pub use bus::{BusTransport, TransportError};
pub use config::{ConfigError, MuxConfig};
pub use mux::{MuxError, Pca9846};
