use thiserror_no_std::Error;

use crate::Status;

/// Driver errors, generic over the bus transport error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The I2C transport failed. The bus error is passed through
    /// uninterpreted.
    #[error("I2C transport error")]
    I2c(E),
    /// The sensor reported an ALU or memory fault. The channel's outputs are
    /// invalidated; a new measurement must be started to recover.
    #[error("sensor ALU/memory fault")]
    Fault {
        /// Status byte of the failed frame, kept for diagnostics.
        status: Status,
    },
    /// The measurement has not completed yet. Recoverable: retry once the
    /// conversion time has elapsed.
    #[error("sensor busy")]
    Busy,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2c(error)
    }
}
