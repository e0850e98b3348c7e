//! Blocking driver, built on the `embedded-hal` 1.0 traits.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::transfer::{self, PressureRange};
use crate::units::Units;
use crate::{
    Channel, Error, FRAME_LEN, Measurement, MeasurementMode, RawReading, READY_POLL_ATTEMPTS,
    READY_POLL_INTERVAL_US, STATUS_LEN, Status,
};

/// Blocking driver for the AUAV differential/absolute sensor pair.
///
/// The driver is bound to one bus handle and one delay provider for its
/// lifetime and assumes exclusive single-owner use of the two fixed
/// addresses; it performs no locking of its own. Every bus operation blocks
/// until the transport completes or fails.
pub struct Auav<I2C, D> {
    i2c: I2C,
    delay: D,
    range: PressureRange,
    units: Units,
    status: Status,
    raw: [RawReading; 2],
    last: [Measurement; 2],
}

impl<I2C, D> Auav<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for a sensor pair of the given pressure range.
    ///
    /// Output units default to inH2O and degrees Celsius; see
    /// [`Auav::set_units`].
    pub fn new(i2c: I2C, delay: D, range: PressureRange) -> Self {
        Self {
            i2c,
            delay,
            range,
            units: Units::default(),
            status: Status::default(),
            raw: [RawReading::default(); 2],
            last: [Measurement::default(); 2],
        }
    }

    /// Select the units measurements are reported in.
    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Status byte of the most recent transaction that carried one.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Raw 24-bit codes of the channel's last successfully decoded frame.
    pub fn raw_reading(&self, channel: Channel) -> RawReading {
        self.raw[channel.index()]
    }

    /// The channel's last measurement. Both fields are NaN until a read
    /// succeeds, and again after one fails.
    pub fn measurement(&self, channel: Channel) -> Measurement {
        self.last[channel.index()]
    }

    /// Release the bus and delay handles, consuming the driver.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Command the channel to start a measurement.
    ///
    /// The conversion then runs on the sensor for
    /// [`MeasurementMode::conversion_time_us`]; poll [`Auav::read_status`]
    /// (or call [`Auav::read_measurement`] directly) once that has elapsed.
    pub fn start_measurement(
        &mut self,
        channel: Channel,
        mode: MeasurementMode,
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(channel.address(), &[mode.into()])?;
        Ok(())
    }

    /// Read the channel's status register without touching the data
    /// registers.
    pub fn read_status(&mut self, channel: Channel) -> Result<Status, Error<I2C::Error>> {
        let mut frame = [0u8; STATUS_LEN];
        self.i2c.read(channel.address(), &mut frame)?;
        self.status = Status::from_bits(frame[0]);
        Ok(self.status)
    }

    /// Whether the channel still reports a measurement in progress.
    pub fn is_busy(&mut self, channel: Channel) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_status(channel)?.is_busy())
    }

    /// Read and decode the channel's measurement frame.
    ///
    /// The full 7-byte frame (status plus two big-endian 24-bit codes) is
    /// always consumed in a single bus transaction. A fault or busy status
    /// aborts decoding, discards the payload bytes and invalidates the
    /// channel's [`Auav::measurement`] to NaN; the status stays available
    /// through [`Auav::status`]. A fault takes precedence over busy, since a
    /// faulted sensor may keep its busy bit set.
    pub fn read_measurement(&mut self, channel: Channel) -> Result<Measurement, Error<I2C::Error>> {
        let mut frame = [0u8; FRAME_LEN];
        self.i2c.read(channel.address(), &mut frame)?;

        let status = Status::from_bits(frame[0]);
        self.status = status;

        if status.is_error() {
            self.invalidate(channel);
            log::error!(
                "AUAV {:?}: ALU/memory fault, status {:#04x}",
                channel,
                status.bits()
            );
            return Err(Error::Fault { status });
        }
        if status.is_busy() {
            self.invalidate(channel);
            return Err(Error::Busy);
        }

        let raw = RawReading {
            pressure: transfer::be24([frame[1], frame[2], frame[3]]),
            temperature: transfer::be24([frame[4], frame[5], frame[6]]),
        };
        let measurement = transfer::decode_measurement(channel, raw, self.range, self.units);
        self.raw[channel.index()] = raw;
        self.last[channel.index()] = measurement;
        Ok(measurement)
    }

    /// Start a measurement, wait out the conversion time, then read the
    /// result, polling again a bounded number of times if the sensor runs
    /// late.
    ///
    /// After [`crate::READY_POLL_ATTEMPTS`] busy frames beyond the first
    /// read the call gives up with [`Error::Busy`] and the caller decides
    /// whether to retry.
    pub fn measure(
        &mut self,
        channel: Channel,
        mode: MeasurementMode,
    ) -> Result<Measurement, Error<I2C::Error>> {
        self.start_measurement(channel, mode)?;
        self.delay.delay_us(mode.conversion_time_us());

        let mut attempts = 0;
        loop {
            match self.read_measurement(channel) {
                Err(Error::Busy) if attempts < READY_POLL_ATTEMPTS => {
                    attempts += 1;
                    self.delay.delay_us(READY_POLL_INTERVAL_US);
                }
                result => return result,
            }
        }
    }

    fn invalidate(&mut self, channel: Channel) {
        self.last[channel.index()] = Measurement::default();
    }
}
