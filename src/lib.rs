//! This crate provides an interface for controlling the EML TEC controller board: a thermoelectric
//! cooler (TEC) driver with PID temperature control, four power supply channels and four bias
//! current sources.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The board is a USB HID device. This crate does not open it, instead [`controller::TecController`]
//! works on any interface implementing [`embedded_io::Read`] & [`embedded_io::Write`] where:
//! * Every write carries one output report of [`OUTPUT_REPORT_SIZE`] bytes. The interface is
//!   responsible for prefixing [`OUTPUT_REPORT_ID`] if the HID stack needs it.
//! * Every read returns one input report of [`INPUT_REPORT_SIZE`] bytes, report id included.
//!
//! The board can be found with:
//! * Vendor ID: [`USB_VID`]
//! * Product ID: [`USB_PID`]
//! * Serial number: e.g. [`DEFAULT_SERIAL_NUMBER`]
//!
//! The lower level pieces are public too:
//! * [`command`] - opcodes, channels and subcommands.
//! * [`limits`] - setpoint bounds and physical to wire scaling.
//! * [`frame`] - output report encoding.
//! * [`subchannel`] - per-channel payloads.
//! * [`monitor`] - input report decoding.

#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

pub mod command;
pub mod controller;
pub mod error;
pub mod frame;
pub mod limits;
pub mod monitor;
pub mod subchannel;

#[cfg(test)]
mod mock_transport;

pub use command::{Channel, CurrentSubcommand, Opcode, VoltageSubcommand};
pub use controller::{POWER_OFF_SETTLE_TIME, TecController};
pub use error::{Error, FrameError, ValidationError};
pub use monitor::MonitoringSnapshot;

pub const USB_VID: u16 = 0x0483;
pub const USB_PID: u16 = 0x5750;
pub const DEFAULT_SERIAL_NUMBER: &str = "EMLTEC0003A1";

/// Report id the board expects on output reports.
pub const OUTPUT_REPORT_ID: u8 = 0x01;
pub const OUTPUT_REPORT_SIZE: usize = frame::COMMAND_FRAME_SIZE;
pub const INPUT_REPORT_SIZE: usize = monitor::MONITOR_REPORT_SIZE;
