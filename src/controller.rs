use fugit::MillisDurationU32;
use tracing::debug;

use crate::{
    command::{Channel, CurrentSubcommand, Opcode, VoltageSubcommand},
    error::{Error, Result},
    frame::{self, CommandFrame, Parameter},
    limits::{self, Gain, Setpoint},
    monitor::{MONITOR_REPORT_SIZE, MonitoringSnapshot},
    subchannel::{self, Subcommand, SubChannelValue},
};

/// How long the board needs after a voltage source power off before it will
/// accept another command.
///
/// The board shuts VD, VC, VG and VEA down in sequence. Waiting is up to the
/// caller, [`TecController`] never blocks on it.
pub const POWER_OFF_SETTLE_TIME: MillisDurationU32 = MillisDurationU32::millis(1000);

/// You can create a TecController using any interface which implements
/// [embedded_io::Read] & [embedded_io::Write].
///
/// Every write is exactly one output report. Every read is expected to return
/// exactly one input report. Report ids below the byte layer are the
/// interface's business.
///
/// Methods named "set" validate a physical value and send it. "read" returns
/// measured values.
pub struct TecController<S: embedded_io::Read + embedded_io::Write> {
    interface: S,
}

impl<S: embedded_io::Read + embedded_io::Write> TecController<S> {
    /// Create a new TecController on an already opened interface.
    pub fn new(interface: S) -> Self {
        Self { interface }
    }

    /// Give the interface back.
    pub fn into_inner(self) -> S {
        self.interface
    }

    /// Set the TEC target temperature in °C. Range -60 to 120.
    pub fn set_target_temperature(&mut self, celsius: f64) -> Result<(), S::Error> {
        let centi = Setpoint::TargetTemperature.to_wire(celsius)?;
        self.send_command(Opcode::SetTargetTemp, centi)
    }

    /// Set the PID proportional gain.
    pub fn set_pid_p(&mut self, value: f32) -> Result<(), S::Error> {
        self.send_command(Opcode::SetPidP, Gain::P.validate(value)?)
    }

    /// Set the PID integral gain.
    pub fn set_pid_i(&mut self, value: f32) -> Result<(), S::Error> {
        self.send_command(Opcode::SetPidI, Gain::I.validate(value)?)
    }

    /// Set the PID derivative gain.
    pub fn set_pid_d(&mut self, value: f32) -> Result<(), S::Error> {
        self.send_command(Opcode::SetPidD, Gain::D.validate(value)?)
    }

    /// Set the PID sampling interval in milliseconds. Must be larger than 0.
    pub fn set_pid_sampling_interval(&mut self, millis: i32) -> Result<(), S::Error> {
        let millis = limits::validate_sampling_interval(millis)?;
        self.send_command(Opcode::SetSamplingInterval, millis)
    }

    pub fn start_pid_autotuning(&mut self) -> Result<(), S::Error> {
        self.send_command(Opcode::SetAutotuning, Parameter::Int(1))
    }

    pub fn stop_pid_autotuning(&mut self) -> Result<(), S::Error> {
        self.send_command(Opcode::SetAutotuning, Parameter::Int(0))
    }

    /// Persist the current PID parameters on the board.
    pub fn save_parameters(&mut self) -> Result<(), S::Error> {
        self.send_command(Opcode::SaveParameters, Parameter::Int(1))
    }

    /// Reload the persisted PID parameters.
    pub fn restore_parameters(&mut self) -> Result<(), S::Error> {
        self.send_command(Opcode::RestoreParameters, Parameter::Int(1))
    }

    /// Set the drain voltage of a channel in volts. Range 0 to 2.5.
    pub fn set_drain_voltage(&mut self, channel: Channel, volts: f64) -> Result<(), S::Error> {
        let millivolts = Setpoint::DrainVoltage.to_wire_i16(volts)?;
        self.send_sub_channel(channel, VoltageSubcommand::Vd, millivolts)
    }

    /// Set the auxiliary negative voltage of a channel in volts. Range -3 to 0.
    pub fn set_aux_negative_voltage(
        &mut self,
        channel: Channel,
        volts: f64,
    ) -> Result<(), S::Error> {
        let millivolts = Setpoint::AuxNegativeVoltage.to_wire_i16(volts)?;
        self.send_sub_channel(channel, VoltageSubcommand::Vea, millivolts)
    }

    /// Power on the voltage source of a channel.
    pub fn voltage_source_on(&mut self, channel: Channel) -> Result<(), S::Error> {
        self.send_sub_channel(channel, VoltageSubcommand::PowerOn, 0i16)
    }

    /// Power off the voltage source of a channel.
    ///
    /// __Note:__ Wait [`POWER_OFF_SETTLE_TIME`] before sending anything else.
    pub fn voltage_source_off(&mut self, channel: Channel) -> Result<(), S::Error> {
        self.send_sub_channel(channel, VoltageSubcommand::Shutdown, 0i16)
    }

    /// Set the bias current of a channel in milliamps. Range 0 to 150.
    pub fn set_bias_current(&mut self, channel: Channel, milliamps: f64) -> Result<(), S::Error> {
        let raw = Setpoint::BiasCurrent.to_wire_i16(milliamps)?;
        self.send_sub_channel(channel, CurrentSubcommand::Current, raw)
    }

    /// Switch on the bias current source of a channel.
    pub fn current_source_on(&mut self, channel: Channel) -> Result<(), S::Error> {
        self.send_sub_channel(channel, CurrentSubcommand::PowerOn, 0i16)
    }

    /// Switch off the bias current source of a channel.
    pub fn current_source_off(&mut self, channel: Channel) -> Result<(), S::Error> {
        self.send_sub_channel(channel, CurrentSubcommand::Shutdown, 0i16)
    }

    /// Read one monitoring report and decode it.
    ///
    /// A report shorter than [`MONITOR_REPORT_SIZE`] is an error, it is never
    /// padded.
    pub fn read_monitoring_data(&mut self) -> Result<MonitoringSnapshot, S::Error> {
        let mut buff = [0u8; MONITOR_REPORT_SIZE];
        let bytes_read = self
            .interface
            .read(&mut buff)
            .map_err(Error::TransportError)?;
        debug!("{} bytes read", bytes_read);

        let snapshot = MonitoringSnapshot::decode(&buff[..bytes_read])?;
        Ok(snapshot)
    }

    /// Send any command in the catalog with an unchecked parameter.
    ///
    /// Prefer the dedicated methods, they validate and scale the value.
    pub fn send_command<'a>(
        &mut self,
        opcode: Opcode,
        parameter: impl Into<Parameter<'a>>,
    ) -> Result<(), S::Error> {
        let frame = frame::encode(opcode, parameter)?;
        self.write_frame(&frame)
    }

    fn send_sub_channel<C: Subcommand>(
        &mut self,
        channel: Channel,
        subcommand: C,
        value: impl Into<SubChannelValue>,
    ) -> Result<(), S::Error> {
        let frame = subchannel::encode_sub_channel(channel, subcommand, value)?;
        self.write_frame(&frame)
    }

    fn write_frame(&mut self, frame: &CommandFrame) -> Result<(), S::Error> {
        debug!("sending {:02x?}", frame);
        self.interface
            .write_all(frame)
            .map_err(Error::TransportError)?;
        self.interface.flush().map_err(Error::TransportError)
    }
}
