//! Fixed-point to physical-unit transfer functions.
//!
//! Both dies report their results as unsigned 24-bit codes, sent over the
//! bus most-significant byte first. The codes are assembled into the low 24
//! bits of a `u32` by explicit shift/OR so the value domain is `[0, 2^24)`
//! and the datasheet reference constants apply directly: full scale is
//! `2^24` and the zero-pressure offset sits at `2^23`.

use crate::units::{
    Units, convert_absolute_pressure, convert_differential_pressure, convert_temperature,
};
use crate::{Channel, Measurement, RawReading};

/// Full-scale reference code, 2^24.
pub const FULL_SCALE_CODE: u32 = 1 << 24;

/// Zero differential pressure reference code, 2^23.
pub const ZERO_PRESSURE_CODE: u32 = 1 << 23;

const FULL_SCALE_REF: f32 = FULL_SCALE_CODE as f32;
const ZERO_PRESSURE_REF: f32 = ZERO_PRESSURE_CODE as f32;

/// Full-scale pressure range of the differential die, fixed by the part
/// number at manufacture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureRange {
    /// 5 inH2O full scale.
    L05D,
    /// 10 inH2O full scale.
    L10D,
    /// 30 inH2O full scale.
    L30D,
}

impl PressureRange {
    /// Full-scale differential pressure in inH2O.
    pub const fn full_scale_in_h2o(self) -> f32 {
        match self {
            Self::L05D => 5.0,
            Self::L10D => 10.0,
            Self::L30D => 30.0,
        }
    }

    /// The ± span the transfer function scales over, twice the full scale.
    pub const fn span_in_h2o(self) -> f32 {
        2.0 * self.full_scale_in_h2o()
    }
}

/// Assemble a big-endian 24-bit bus field into the low bits of a `u32`.
pub(crate) fn be24(bytes: [u8; 3]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32
}

/// Differential pressure in inH2O, per the datasheet transfer function
/// `Pressure(inH2O) = 1.25 x ((P_out_dig - OS_dig) / 2^24) x FSS(inH2O)`.
pub fn differential_pressure_in_h2o(raw: u32, range: PressureRange) -> f32 {
    1.25 * ((raw as f32 - ZERO_PRESSURE_REF) / FULL_SCALE_REF) * range.span_in_h2o()
}

/// Absolute pressure in mbar over the die's 250-875 mbar span.
pub fn absolute_pressure_mbar(raw: u32) -> f32 {
    250.0 + 1.25 * ((raw as f32 - ZERO_PRESSURE_REF) / FULL_SCALE_REF) * 1000.0
}

/// Temperature in degrees Celsius, per the datasheet transfer function
/// `Temperature(degC) = ((T_out_dig x 155) / 2^24) - 45`.
pub fn temperature_celsius(raw: u32) -> f32 {
    (raw as f32 * 155.0) / FULL_SCALE_REF - 45.0
}

/// Decode a channel's raw codes into the configured output units.
pub(crate) fn decode_measurement(
    channel: Channel,
    raw: RawReading,
    range: PressureRange,
    units: Units,
) -> Measurement {
    let pressure = match channel {
        Channel::Differential => convert_differential_pressure(
            differential_pressure_in_h2o(raw.pressure, range),
            units.pressure,
        ),
        Channel::Absolute => {
            convert_absolute_pressure(absolute_pressure_mbar(raw.pressure), units.pressure)
        }
    };
    Measurement {
        pressure,
        temperature: convert_temperature(temperature_celsius(raw.temperature), units.temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{PressureUnit, TemperatureUnit};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn differential_zero_reference_holds_for_every_range() {
        for range in [PressureRange::L05D, PressureRange::L10D, PressureRange::L30D] {
            assert_eq!(differential_pressure_in_h2o(ZERO_PRESSURE_CODE, range), 0.0);
        }
    }

    #[test]
    fn differential_end_points() {
        // +/- 1.25x the configured full scale at the code extremes.
        assert!(close(
            differential_pressure_in_h2o(0, PressureRange::L10D),
            -12.5
        ));
        assert!(close(
            differential_pressure_in_h2o(FULL_SCALE_CODE, PressureRange::L10D),
            12.5
        ));
        assert!(close(
            differential_pressure_in_h2o(0, PressureRange::L30D),
            -37.5
        ));
    }

    #[test]
    fn differential_is_monotonic() {
        let mut previous = differential_pressure_in_h2o(0, PressureRange::L05D);
        for raw in (0..=FULL_SCALE_CODE).step_by(1 << 18) {
            let value = differential_pressure_in_h2o(raw, PressureRange::L05D);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn absolute_span() {
        assert!(close(absolute_pressure_mbar(ZERO_PRESSURE_CODE), 250.0));
        assert!(close(absolute_pressure_mbar(FULL_SCALE_CODE), 875.0));
    }

    #[test]
    fn temperature_end_points() {
        assert!(close(temperature_celsius(0), -45.0));
        assert!(close(temperature_celsius(FULL_SCALE_CODE), 110.0));
        assert!(close(temperature_celsius(ZERO_PRESSURE_CODE), 32.5));
    }

    #[test]
    fn be24_is_big_endian() {
        assert_eq!(be24([0x12, 0x34, 0x56]), 0x12_34_56);
        assert_eq!(be24([0x80, 0x00, 0x00]), ZERO_PRESSURE_CODE);
        assert_eq!(be24([0xFF, 0xFF, 0xFF]), FULL_SCALE_CODE - 1);
    }

    #[test]
    fn decode_applies_the_channel_transfer_and_units() {
        let raw = RawReading {
            pressure: ZERO_PRESSURE_CODE,
            temperature: 0,
        };
        let units = Units {
            pressure: PressureUnit::Pascal,
            temperature: TemperatureUnit::Kelvin,
        };

        let decoded = decode_measurement(Channel::Differential, raw, PressureRange::L05D, units);
        assert_eq!(decoded.pressure, 0.0);
        assert!(close(decoded.temperature, 228.15));

        let decoded = decode_measurement(Channel::Absolute, raw, PressureRange::L05D, units);
        assert!(close(decoded.pressure, 25_000.0));
    }
}
