//! Platform-agnostic driver for the AllSensors AUAV differential/absolute
//! pressure and temperature sensor pair, based on the [`embedded-hal`] 1.0
//! traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! The AUAV family pairs a differential pressure die (I2C address `0x26`)
//! with an absolute pressure die (`0x27`). Each die is driven through the
//! same three fixed-length transactions: a one-byte measurement-start
//! command, a one-byte status read, and a seven-byte frame read carrying the
//! status byte plus two big-endian 24-bit codes which the driver converts
//! into calibrated pressure and temperature values.
//!
//! The blocking driver lives in [`blocking`]; with the `async` feature
//! (enabled by default) an `embedded-hal-async` twin is available in
//! [`r#async`].
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! use auav_embedded::{Channel, MeasurementMode, PressureRange, blocking::Auav};
//!
//! # let mut i2c = I2cMock::new(&[
//! #     I2cTransaction::write(0x26, vec![0xAA]),
//! #     I2cTransaction::read(0x26, vec![0x40, 0x80, 0x00, 0x00, 0x80, 0x00, 0x00]),
//! # ]);
//! // NOTE: use your platform's real I2C peripheral and delay here.
//! let mut sensor = Auav::new(i2c.clone(), NoopDelay::new(), PressureRange::L10D);
//! let measurement = sensor
//!     .measure(Channel::Differential, MeasurementMode::Single)
//!     .unwrap();
//! assert_eq!(measurement.pressure, 0.0);
//! # i2c.done();
//! ```

#![cfg_attr(not(test), no_std)]

pub mod blocking;
mod command;
mod error;
mod status;
pub mod transfer;
pub mod units;

#[cfg(feature = "async")]
pub mod r#async;

pub use command::MeasurementMode;
pub use error::Error;
pub use status::Status;
pub use transfer::PressureRange;
pub use units::{PressureUnit, TemperatureUnit, Units};

/// I2C address of the differential pressure die.
pub const I2C_ADDRESS_DIFF: u8 = 0x26;

/// I2C address of the absolute pressure die.
pub const I2C_ADDRESS_ABS: u8 = 0x27;

// Layout of the measurement frame: status byte, then the pressure and
// temperature codes as big-endian 24-bit fields.
pub(crate) const STATUS_LEN: usize = 1;
pub(crate) const PRESSURE_LEN: usize = 3;
pub(crate) const TEMPERATURE_LEN: usize = 3;
pub(crate) const FRAME_LEN: usize = STATUS_LEN + PRESSURE_LEN + TEMPERATURE_LEN;

// How often a late conversion is polled before the driver gives up with
// `Error::Busy`, and the pause between those polls.
pub(crate) const READY_POLL_ATTEMPTS: u32 = 5;
pub(crate) const READY_POLL_INTERVAL_US: u32 = 500;

/// Selects which of the two sensor dies a transaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Differential pressure die at [`I2C_ADDRESS_DIFF`].
    Differential,
    /// Absolute pressure die at [`I2C_ADDRESS_ABS`].
    Absolute,
}

impl Channel {
    /// The fixed I2C address of this channel.
    pub const fn address(self) -> u8 {
        match self {
            Self::Differential => I2C_ADDRESS_DIFF,
            Self::Absolute => I2C_ADDRESS_ABS,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Differential => 0,
            Self::Absolute => 1,
        }
    }
}

/// The 24-bit pressure and temperature codes of the last frame successfully
/// read from a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    pub pressure: u32,
    pub temperature: u32,
}

/// A decoded reading in the configured output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Pressure in the configured [`PressureUnit`].
    pub pressure: f32,
    /// Temperature in the configured [`TemperatureUnit`].
    pub temperature: f32,
}

impl Measurement {
    /// False until the channel's first successful read, and again after a
    /// failed read invalidated the outputs.
    pub fn is_valid(&self) -> bool {
        !self.pressure.is_nan() && !self.temperature.is_nan()
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            pressure: f32::NAN,
            temperature: f32::NAN,
        }
    }
}
