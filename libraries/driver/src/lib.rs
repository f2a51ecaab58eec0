//! Driver for the L76K GNSS positioning module over its I2C register bridge
//!
//! The module exposes date, UTC time, position and a few control registers
//! at a fixed 7-bit address (0x20 by default). [`L76k`] is the blocking
//! driver over `embedded-hal`; [`asynch::L76k`] is the same driver over
//! `embedded-hal-async`.
//!
//! ```ignore
//! let mut gps = l76k::L76k::new(i2c);
//! gps.enable_power()?;
//! gps.update_coordinates()?;
//! let lat = gps.get_latitude_degree();
//! ```

#![cfg_attr(not(test), no_std)]

pub mod decode;
pub mod error;
pub mod l76k;
pub mod registers;

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use decode::GnssState;
pub use error::Error;
pub use l76k::{L76k, L76kConfig};
pub use registers::DEFAULT_I2C_ADDRESS;

pub use hal::{CoordinateAxis, GnssMode, GpsDate, GpsPosition, GpsSensor, InvalidGnssMode, UtcTime};
