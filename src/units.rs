//! Output unit selection and conversion.
//!
//! The transfer functions in [`crate::transfer`] produce inH2O for the
//! differential die, mbar for the absolute die, and degrees Celsius for both
//! temperature codes. The helpers here map those canonical units onto the
//! configured output units. Everything is pure: the conversion math takes
//! its configuration explicitly instead of reading driver state.

/// Pascals per inch of water column.
pub const PASCAL_PER_IN_H2O: f32 = 249.08;

/// Millibar per inch of water column.
pub const MBAR_PER_IN_H2O: f32 = 2.4908;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnit {
    /// Inches of water column.
    #[default]
    InH2o,
    /// Pascal.
    Pascal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

/// Output unit configuration for decoded measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Units {
    pub pressure: PressureUnit,
    pub temperature: TemperatureUnit,
}

/// Convert a differential pressure in inH2O to the requested unit.
pub fn convert_differential_pressure(in_h2o: f32, unit: PressureUnit) -> f32 {
    match unit {
        PressureUnit::InH2o => in_h2o,
        PressureUnit::Pascal => in_h2o * PASCAL_PER_IN_H2O,
    }
}

/// Convert an absolute pressure in mbar to the requested unit.
pub fn convert_absolute_pressure(mbar: f32, unit: PressureUnit) -> f32 {
    match unit {
        PressureUnit::InH2o => mbar / MBAR_PER_IN_H2O,
        PressureUnit::Pascal => mbar * 100.0,
    }
}

/// Convert a temperature in degrees Celsius to the requested unit.
pub fn convert_temperature(degree_c: f32, unit: TemperatureUnit) -> f32 {
    match unit {
        TemperatureUnit::Celsius => degree_c,
        TemperatureUnit::Fahrenheit => degree_c * 1.8 + 32.0,
        TemperatureUnit::Kelvin => degree_c + 273.15,
    }
}
