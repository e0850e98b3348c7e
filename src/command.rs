//! Measurement-start commands.

/// Averaging depth of a measurement command.
///
/// The opcode written to a channel selects how many conversions the sensor
/// takes and averages on-chip before its result registers update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementMode {
    /// One 16-bit conversion.
    #[default]
    Single,
    /// Average of 2 conversions at 18-bit resolution.
    Average2,
    /// Average of 4 conversions at 18-bit resolution.
    Average4,
    /// Average of 8 conversions at 18-bit resolution.
    Average8,
    /// Average of 16 conversions at 18-bit resolution.
    Average16,
}

impl From<MeasurementMode> for u8 {
    fn from(mode: MeasurementMode) -> u8 {
        match mode {
            MeasurementMode::Single => 0xAA,
            MeasurementMode::Average2 => 0xAC,
            MeasurementMode::Average4 => 0xAD,
            MeasurementMode::Average8 => 0xAE,
            MeasurementMode::Average16 => 0xAF,
        }
    }
}

impl MeasurementMode {
    /// Worst-case on-sensor conversion time for this mode.
    ///
    /// The datasheet window runs from 2.8 ms (single, 16-bit) to 61.9 ms
    /// (16x average, 18-bit); the averaged modes scale with the number of
    /// 18-bit conversions taken.
    pub const fn conversion_time_us(self) -> u32 {
        match self {
            Self::Single => 2_800,
            Self::Average2 => 7_740,
            Self::Average4 => 15_480,
            Self::Average8 => 30_960,
            Self::Average16 => 61_900,
        }
    }
}
