//! Encoding of the fixed size output report sent to the board.

use crate::{command::Opcode, error::FrameError};

/// Size of the output report, opcode included.
pub const COMMAND_FRAME_SIZE: usize = 8;

/// Bytes left for the parameter after the opcode.
pub const MAX_PARAMETER_LEN: usize = COMMAND_FRAME_SIZE - 1;

/// An encoded output report.
pub type CommandFrame = [u8; COMMAND_FRAME_SIZE];

/// The parameter carried by a command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Parameter<'a> {
    /// Written as 4 little endian bytes.
    Int(i32),
    /// Written as 4 little endian IEEE-754 bytes.
    Float(f32),
    /// Copied verbatim. This is how sub-channel payloads are sent.
    Raw(&'a [u8]),
}

impl Parameter<'_> {
    /// Number of bytes this parameter occupies on the wire.
    pub fn len(&self) -> usize {
        match self {
            Parameter::Int(_) | Parameter::Float(_) => 4,
            Parameter::Raw(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<i32> for Parameter<'_> {
    fn from(value: i32) -> Self {
        Parameter::Int(value)
    }
}

impl From<f32> for Parameter<'_> {
    fn from(value: f32) -> Self {
        Parameter::Float(value)
    }
}

impl<'a> From<&'a [u8]> for Parameter<'a> {
    fn from(value: &'a [u8]) -> Self {
        Parameter::Raw(value)
    }
}

/// Build an output report: opcode, parameter bytes, then zero padding.
pub fn encode<'a>(
    opcode: Opcode,
    parameter: impl Into<Parameter<'a>>,
) -> Result<CommandFrame, FrameError> {
    let parameter = parameter.into();
    let len = parameter.len();
    if len > MAX_PARAMETER_LEN {
        return Err(FrameError::PayloadTooLarge { len });
    }

    let mut frame: CommandFrame = [0x00; COMMAND_FRAME_SIZE];
    frame[0] = opcode.into();
    let body = &mut frame[1..=len];
    match parameter {
        Parameter::Int(value) => body.copy_from_slice(&value.to_le_bytes()),
        Parameter::Float(value) => body.copy_from_slice(&value.to_le_bytes()),
        Parameter::Raw(bytes) => body.copy_from_slice(bytes),
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn integer_parameter() {
        let frame = encode(Opcode::SetTargetTemp, 4560i32).unwrap();
        assert_eq!(frame, [0x04, 0xD0, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn negative_integer_parameter() {
        let frame = encode(Opcode::SetTargetTemp, -1i32).unwrap();
        assert_eq!(frame, [0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn float_parameter() {
        let frame = encode(Opcode::SetPidP, 1.0f32).unwrap();
        // 1.0f32 == 0x3F800000
        assert_eq!(frame, [0x10, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn raw_parameter_is_copied_and_padded() {
        let payload = [0xAAu8, 0xBB, 0xCC];
        let frame = encode(Opcode::SetPsValues, payload.as_slice()).unwrap();
        assert_eq!(frame, [0x30, 0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn empty_raw_parameter() {
        let frame = encode(Opcode::SaveParameters, Parameter::Raw(&[])).unwrap();
        assert_eq!(frame, [0x20, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn seven_byte_payload_fills_the_frame() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7];
        let frame = encode(Opcode::SetIBiasValues, payload.as_slice()).unwrap();
        assert_eq!(frame, [0x31, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = [0u8; 8];
        assert_eq!(
            encode(Opcode::SetPsValues, payload.as_slice()),
            Err(FrameError::PayloadTooLarge { len: 8 })
        );
    }

    proptest! {
        #[test]
        fn int_frames(opcode_idx in 0..Opcode::COUNT, value in any::<i32>()) {
            let opcode = Opcode::iter().nth(opcode_idx).unwrap();
            let frame = encode(opcode, value).unwrap();
            prop_assert_eq!(frame.len(), COMMAND_FRAME_SIZE);
            prop_assert_eq!(frame[0], opcode as u8);
            prop_assert_eq!(&frame[1..5], &value.to_le_bytes()[..]);
            prop_assert_eq!(&frame[5..], &[0u8; 3][..]);
        }

        #[test]
        fn float_frames(opcode_idx in 0..Opcode::COUNT, value in any::<f32>()) {
            let opcode = Opcode::iter().nth(opcode_idx).unwrap();
            let frame = encode(opcode, value).unwrap();
            prop_assert_eq!(frame[0], opcode as u8);
            prop_assert_eq!(&frame[1..5], &value.to_le_bytes()[..]);
            prop_assert_eq!(&frame[5..], &[0u8; 3][..]);
        }

        #[test]
        fn long_raw_payloads_fail(payload in proptest::collection::vec(any::<u8>(), 8..32)) {
            prop_assert_eq!(
                encode(Opcode::SetPsValues, payload.as_slice()),
                Err(FrameError::PayloadTooLarge { len: payload.len() })
            );
        }
    }
}
