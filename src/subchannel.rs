//! Payloads addressing one rail of one channel.
//!
//! These are never sent on their own. They are the [`Parameter::Raw`] of a
//! [`Opcode::SetPsValues`] or [`Opcode::SetIBiasValues`] command.

use crate::{
    command::{Channel, CurrentSubcommand, Opcode, VoltageSubcommand},
    error::FrameError,
    frame::{self, CommandFrame, Parameter},
};

/// Largest sub-channel payload: channel, subcommand and a 4 byte float.
pub const MAX_SUBCHANNEL_PAYLOAD_LEN: usize = 6;

/// Encoded sub-channel payload, 4 or 6 bytes long.
pub type SubChannelPayload = heapless::Vec<u8, MAX_SUBCHANNEL_PAYLOAD_LEN>;

/// The value following the channel and subcommand bytes.
///
/// Wire scaling is up to the caller, e.g. volts to millivolts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SubChannelValue {
    /// Written as 2 little endian bytes.
    Short(i16),
    /// Written as 4 little endian IEEE-754 bytes.
    Float(f32),
}

impl From<i16> for SubChannelValue {
    fn from(value: i16) -> Self {
        SubChannelValue::Short(value)
    }
}

impl From<f32> for SubChannelValue {
    fn from(value: f32) -> Self {
        SubChannelValue::Float(value)
    }
}

/// A subcommand of one of the per-channel command families.
pub trait Subcommand: Copy + Into<u8> {
    /// The top-level opcode that carries this subcommand family.
    const OPCODE: Opcode;
}

impl Subcommand for VoltageSubcommand {
    const OPCODE: Opcode = Opcode::SetPsValues;
}

impl Subcommand for CurrentSubcommand {
    const OPCODE: Opcode = Opcode::SetIBiasValues;
}

/// Build the channel, subcommand, value payload.
pub fn build_sub_channel_payload(
    channel: Channel,
    subcommand: impl Into<u8>,
    value: impl Into<SubChannelValue>,
) -> SubChannelPayload {
    let mut payload = SubChannelPayload::new();
    // Capacity covers the largest variant, so none of these can overflow.
    let _ = payload.push(channel.into());
    let _ = payload.push(subcommand.into());
    let _ = match value.into() {
        SubChannelValue::Short(value) => payload.extend_from_slice(&value.to_le_bytes()),
        SubChannelValue::Float(value) => payload.extend_from_slice(&value.to_le_bytes()),
    };
    payload
}

/// Build the sub-channel payload and wrap it in the command frame of its family.
pub fn encode_sub_channel<C: Subcommand>(
    channel: Channel,
    subcommand: C,
    value: impl Into<SubChannelValue>,
) -> Result<CommandFrame, FrameError> {
    let payload = build_sub_channel_payload(channel, subcommand, value);
    frame::encode(C::OPCODE, Parameter::Raw(&payload))
}
