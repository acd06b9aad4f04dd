//! Our error types for the TEC controller board.

use thiserror::Error;

use crate::limits::{Gain, Setpoint};

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// A physical value was rejected before anything was encoded.
///
/// These are always recoverable: correct the value and try again.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    #[error("{setpoint} must be within {min} to {max}, got {value}")]
    OutOfRange {
        setpoint: Setpoint,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("PID sampling interval must be larger than 0 ms, got {value}")]
    NotPositive { value: i32 },
    #[error("{gain} must be a finite number, got {value}")]
    NotFinite { gain: Gain, value: f32 },
}

/// Framing errors on either side of the wire.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The parameter does not fit in the outbound report after the opcode byte.
    #[error("command payload of {len} bytes does not fit in the output report")]
    PayloadTooLarge { len: usize },
    /// The inbound report ended before every monitored field was read.
    #[error("monitoring report too short: need {needed} bytes, got {actual}")]
    FrameTooShort { needed: usize, actual: usize },
}

/// Custom error type for TEC controller communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Transport error")]
    TransportError(I),
    #[error("Invalid parameter: {0}")]
    Validation(#[from] ValidationError),
    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),
}
