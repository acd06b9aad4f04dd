//! Physical bounds of the board's setpoints and the conversion of physical
//! values into the fixed point integers the firmware expects.

use core::fmt;

use crate::error::ValidationError;

/// A setpoint with declared physical bounds and a wire resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Setpoint {
    /// TEC target temperature, °C. Sent as centi-degrees.
    TargetTemperature,
    /// Drain voltage (VD), V. Sent as millivolts.
    DrainVoltage,
    /// Auxiliary negative voltage (VEA), V. Sent as millivolts.
    AuxNegativeVoltage,
    /// Bias current (IBias), mA. Sent in units of 10 µA.
    BiasCurrent,
}

impl Setpoint {
    /// Inclusive `(min, max)` bounds in the setpoint's physical unit.
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Setpoint::TargetTemperature => (-60.0, 120.0),
            Setpoint::DrainVoltage => (0.0, 2.5),
            Setpoint::AuxNegativeVoltage => (-3.0, 0.0),
            Setpoint::BiasCurrent => (0.0, 150.0),
        }
    }

    /// Multiplier from the physical unit to the wire integer.
    ///
    /// This must match the divisor the monitoring decoder applies to the
    /// same quantity.
    pub const fn scale(self) -> f64 {
        match self {
            Setpoint::TargetTemperature => 100.0,
            Setpoint::DrainVoltage | Setpoint::AuxNegativeVoltage => 1000.0,
            Setpoint::BiasCurrent => 100.0,
        }
    }

    /// Return `value` unchanged if it lies within [`Self::bounds`].
    ///
    /// NaN is never within bounds.
    pub fn validate(self, value: f64) -> Result<f64, ValidationError> {
        let (min, max) = self.bounds();
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(ValidationError::OutOfRange {
                setpoint: self,
                value,
                min,
                max,
            })
        }
    }

    /// Validate `value` and convert it to its wire integer, rounding to the
    /// nearest step.
    pub fn to_wire(self, value: f64) -> Result<i32, ValidationError> {
        let value = self.validate(value)?;
        Ok(round_to_i32(value * self.scale()))
    }

    /// As [`Self::to_wire`], for the 16 bit fields of sub-channel commands.
    pub fn to_wire_i16(self, value: f64) -> Result<i16, ValidationError> {
        let wire = self.to_wire(value)?;
        let (min, max) = self.bounds();
        i16::try_from(wire).map_err(|_| ValidationError::OutOfRange {
            setpoint: self,
            value,
            min,
            max,
        })
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setpoint::TargetTemperature => write!(f, "target temperature (°C)"),
            Setpoint::DrainVoltage => write!(f, "VD (V)"),
            Setpoint::AuxNegativeVoltage => write!(f, "VEA (V)"),
            Setpoint::BiasCurrent => write!(f, "IBias (mA)"),
        }
    }
}

/// The three PID gains. Any finite value is accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gain {
    P,
    I,
    D,
}

impl Gain {
    pub fn validate(self, value: f32) -> Result<f32, ValidationError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::NotFinite { gain: self, value })
        }
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gain::P => write!(f, "PID P gain"),
            Gain::I => write!(f, "PID I gain"),
            Gain::D => write!(f, "PID D gain"),
        }
    }
}

/// The PID sampling interval must be strictly positive.
pub fn validate_sampling_interval(millis: i32) -> Result<i32, ValidationError> {
    if millis > 0 {
        Ok(millis)
    } else {
        Err(ValidationError::NotPositive { value: millis })
    }
}

/// Round half away from zero. `f64::round` is not available in `core`.
fn round_to_i32(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}
