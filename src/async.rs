//! Async driver, built on the `embedded-hal-async` 1.0 traits.
//!
//! Same contract as [`crate::blocking::Auav`]; every bus operation awaits
//! the transport instead of blocking on it, so the executor stays free to
//! run other tasks while a transaction or a conversion delay is in flight.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::transfer::{self, PressureRange};
use crate::units::Units;
use crate::{
    Channel, Error, FRAME_LEN, Measurement, MeasurementMode, RawReading, READY_POLL_ATTEMPTS,
    READY_POLL_INTERVAL_US, STATUS_LEN, Status,
};

/// Async driver for the AUAV differential/absolute sensor pair.
pub struct AuavAsync<I2C, D> {
    i2c: I2C,
    delay: D,
    range: PressureRange,
    units: Units,
    status: Status,
    raw: [RawReading; 2],
    last: [Measurement; 2],
}

impl<I2C, D> AuavAsync<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for a sensor pair of the given pressure range.
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
    pub async fn start_measurement(
        &mut self,
        channel: Channel,
        mode: MeasurementMode,
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(channel.address(), &[mode.into()]).await?;
        Ok(())
    }

    /// Read the channel's status register without touching the data
    /// registers.
    pub async fn read_status(&mut self, channel: Channel) -> Result<Status, Error<I2C::Error>> {
        let mut frame = [0u8; STATUS_LEN];
        self.i2c.read(channel.address(), &mut frame).await?;
        self.status = Status::from_bits(frame[0]);
        Ok(self.status)
    }

    /// Whether the channel still reports a measurement in progress.
    pub async fn is_busy(&mut self, channel: Channel) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_status(channel).await?.is_busy())
    }

    /// Read and decode the channel's measurement frame.
    ///
    /// Byte consumption contract as in the blocking driver: the full 7-byte
    /// frame is consumed in one transaction; a fault or busy status aborts
    /// decoding, discards the payload and invalidates the channel's outputs
    /// to NaN. A fault takes precedence over busy.
    pub async fn read_measurement(
        &mut self,
        channel: Channel,
    ) -> Result<Measurement, Error<I2C::Error>> {
        let mut frame = [0u8; FRAME_LEN];
        self.i2c.read(channel.address(), &mut frame).await?;

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
    /// late. Gives up with [`Error::Busy`] once the attempts are exhausted.
    pub async fn measure(
        &mut self,
        channel: Channel,
        mode: MeasurementMode,
    ) -> Result<Measurement, Error<I2C::Error>> {
        self.start_measurement(channel, mode).await?;
        self.delay.delay_us(mode.conversion_time_us()).await;

        let mut attempts = 0;
        loop {
            match self.read_measurement(channel).await {
                Err(Error::Busy) if attempts < READY_POLL_ATTEMPTS => {
                    attempts += 1;
                    self.delay.delay_us(READY_POLL_INTERVAL_US).await;
                }
                result => return result,
            }
        }
    }

    fn invalidate(&mut self, channel: Channel) {
        self.last[channel.index()] = Measurement::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const DIFF: u8 = 0x26;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn measure_runs_the_full_cycle() {
        let busy = vec![0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let ready = vec![0x40, 0x80, 0x00, 0x00, 0x80, 0x00, 0x00];
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(DIFF, vec![0xAA]),
            I2cTransaction::read(DIFF, busy),
            I2cTransaction::read(DIFF, ready),
        ]);
        let mut sensor = AuavAsync::new(i2c.clone(), NoopDelay::new(), PressureRange::L10D);

        let measurement =
            block_on(sensor.measure(Channel::Differential, MeasurementMode::Single)).unwrap();
        assert_eq!(measurement.pressure, 0.0);
        assert!(close(measurement.temperature, 32.5));
        i2c.done();
    }

    #[test]
    fn fault_is_reported_and_invalidates_the_outputs() {
        let frame = vec![0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut i2c = I2cMock::new(&[I2cTransaction::read(DIFF, frame)]);
        let mut sensor = AuavAsync::new(i2c.clone(), NoopDelay::new(), PressureRange::L05D);

        let error = block_on(sensor.read_measurement(Channel::Differential)).unwrap_err();
        assert!(matches!(error, Error::Fault { status } if status.memory_error()));
        assert!(!sensor.measurement(Channel::Differential).is_valid());
        i2c.done();
    }

    #[test]
    fn status_poll_reads_one_byte() {
        let mut i2c = I2cMock::new(&[I2cTransaction::read(DIFF, vec![0x20])]);
        let mut sensor = AuavAsync::new(i2c.clone(), NoopDelay::new(), PressureRange::L05D);

        assert!(block_on(sensor.is_busy(Channel::Differential)).unwrap());
        i2c.done();
    }
}
