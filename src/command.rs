//! This module defines the command catalog of the TEC controller board.
//!
//! Every value here is a wire byte. Commands are grouped by their high nibble
//! and the gaps between groups are part of the protocol, so all discriminants
//! are spelled out explicitly.

use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Top-level command selector, the first byte of every output report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, EnumCountMacro)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// Temperature control level.
    SetTempControlLevel = 0x01,
    /// TEC voltage limit.
    SetVLim = 0x02,
    /// TEC current limit.
    SetILim = 0x03,
    /// Target temperature in centi-degrees celsius.
    ///
    /// Value is i32. E.g. 45.6°C => `4560`.
    SetTargetTemp = 0x04,
    /// Start (`1`) or stop (`0`) PID auto-tuning.
    SetAutotuning = 0x05,
    /// TEC operating mode.
    SetTecMode = 0x06,
    /// PID proportional gain, f32.
    SetPidP = 0x10,
    /// PID integral gain, f32.
    SetPidI = 0x11,
    /// PID derivative gain, f32.
    SetPidD = 0x12,
    /// PID sampling interval in milliseconds, i32.
    SetSamplingInterval = 0x13,
    /// Persist the current parameters to the board's non-volatile memory.
    SaveParameters = 0x20,
    /// Restore the persisted parameters.
    RestoreParameters = 0x21,
    /// Per-channel power supply operation. Payload is built with a [`VoltageSubcommand`].
    SetPsValues = 0x30,
    /// Per-channel bias current operation. Payload is built with a [`CurrentSubcommand`].
    SetIBiasValues = 0x31,
}

impl From<Opcode> for u8 {
    fn from(value: Opcode) -> Self {
        value as u8
    }
}

/// One of the four physical output channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, EnumCountMacro)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    Ch1 = 0,
    Ch2 = 1,
    Ch3 = 2,
    Ch4 = 3,
}

impl Channel {
    /// Position of this channel in the per-channel arrays of a snapshot.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Channel {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Channel::Ch1),
            1 => Ok(Channel::Ch2),
            2 => Ok(Channel::Ch3),
            3 => Ok(Channel::Ch4),
            _ => Err(()),
        }
    }
}

/// Which voltage rail of a channel a [`Opcode::SetPsValues`] command addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoltageSubcommand {
    /// Drain voltage, millivolts.
    Vd = 1,
    /// Gate voltage, millivolts.
    Vg = 2,
    /// Common voltage, millivolts.
    Vc = 3,
    /// Auxiliary negative voltage, millivolts.
    Vea = 4,
    /// Power off every rail of the channel.
    ///
    /// __Note:__ The board sequences VD, VC, VG and VEA down internally, which
    /// takes about a second. See [`crate::controller::POWER_OFF_SETTLE_TIME`].
    Shutdown = 10,
    /// Power on the channel.
    PowerOn = 11,
}

impl From<VoltageSubcommand> for u8 {
    fn from(value: VoltageSubcommand) -> Self {
        value as u8
    }
}

/// Which bias current operation a [`Opcode::SetIBiasValues`] command performs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CurrentSubcommand {
    /// Bias current, units of 10 µA.
    Current = 1,
    /// Switch the current source off.
    Shutdown = 10,
    /// Switch the current source on.
    PowerOn = 11,
}

impl From<CurrentSubcommand> for u8 {
    fn from(value: CurrentSubcommand) -> Self {
        value as u8
    }
}
