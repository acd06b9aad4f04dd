//! Decoding of the monitoring input report.
//!
//! The report carries no tags or lengths, so the order of the tables below
//! is the whole schema. Fields are read strictly in sequence after the
//! leading report id:
//!
//! 1. [`BOARD_FIELDS`] once.
//! 2. [`SUPPLY_FIELDS`] for each channel in turn.
//! 3. [`BIAS_FIELDS`] for each channel in turn.

use strum::{EnumCount, IntoEnumIterator};
use tracing::{trace, warn};

use crate::{command::Channel, error::FrameError};

/// Size of the input report, report id included.
pub const MONITOR_REPORT_SIZE: usize = 100;

/// How a field is stored on the wire.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Encoding {
    /// Little endian i16, divided by `divisor` to get the physical value.
    Scaled { divisor: f64 },
    /// Little endian i16, used as is.
    Word,
    /// Little endian IEEE-754 f32, used as is.
    Float,
}

impl Encoding {
    /// Width of the field in bytes.
    pub const fn width(self) -> usize {
        match self {
            Encoding::Scaled { .. } | Encoding::Word => 2,
            Encoding::Float => 4,
        }
    }
}

/// Every field of the monitoring report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    /// Measured temperature, °C.
    RealTimeTemp,
    /// TEC voltage, V.
    VTec,
    /// TEC current, A.
    ITec,
    /// Obsolete manual control word. Still on the wire, never exposed.
    Reserved,
    VLim,
    ILim,
    /// Target temperature, °C.
    TargetTemp,
    /// PID sampling interval, ms.
    PidSamplingInterval,
    PidP,
    PidI,
    PidD,
    /// Drain voltage, V.
    Vd,
    /// Common voltage, V.
    Vc,
    /// Gate voltage, V.
    Vg,
    /// Auxiliary negative voltage, V.
    Vea,
    /// Auxiliary negative current, A.
    Iea,
    /// Forward voltage of the bias current source, V.
    Vf,
    /// Bias current, mA.
    IBias,
}

impl Field {
    pub const fn encoding(self) -> Encoding {
        use Field as F;
        match self {
            F::RealTimeTemp | F::TargetTemp => Encoding::Scaled { divisor: 100.0 },
            F::VTec | F::ITec => Encoding::Scaled { divisor: 1000.0 },
            F::Reserved | F::VLim | F::ILim | F::PidSamplingInterval => Encoding::Word,
            F::PidP | F::PidI | F::PidD | F::Iea => Encoding::Float,
            F::Vd | F::Vc | F::Vg | F::Vea | F::Vf => Encoding::Scaled { divisor: 1000.0 },
            F::IBias => Encoding::Scaled { divisor: 100.0 },
        }
    }
}

/// TEC and PID state, read once.
pub const BOARD_FIELDS: [Field; 11] = [
    Field::RealTimeTemp,
    Field::VTec,
    Field::ITec,
    Field::Reserved,
    Field::VLim,
    Field::ILim,
    Field::TargetTemp,
    Field::PidSamplingInterval,
    Field::PidP,
    Field::PidI,
    Field::PidD,
];

/// Power supply block, repeated for each channel.
pub const SUPPLY_FIELDS: [Field; 5] = [Field::Vd, Field::Vc, Field::Vg, Field::Vea, Field::Iea];

/// Bias current source block, repeated for each channel.
pub const BIAS_FIELDS: [Field; 2] = [Field::Vf, Field::IBias];

const fn fields_width(fields: &[Field]) -> usize {
    let mut width = 0;
    let mut i = 0;
    while i < fields.len() {
        width += fields[i].encoding().width();
        i += 1;
    }
    width
}

/// Bytes consumed by the schema, report id included.
pub const SCHEMA_LEN: usize = 1
    + fields_width(&BOARD_FIELDS)
    + Channel::COUNT * (fields_width(&SUPPLY_FIELDS) + fields_width(&BIAS_FIELDS));

const _: () = assert!(SCHEMA_LEN <= MONITOR_REPORT_SIZE);

/// A decoded field value.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Reading {
    Scaled(f64),
    Word(i16),
    Float(f32),
}

impl Reading {
    fn scaled(self) -> f64 {
        match self {
            Reading::Scaled(value) => value,
            Reading::Word(value) => value as f64,
            Reading::Float(value) => value as f64,
        }
    }

    fn word(self) -> i16 {
        match self {
            Reading::Word(value) => value,
            Reading::Scaled(value) => value as i16,
            Reading::Float(value) => value as i16,
        }
    }

    fn float(self) -> f32 {
        match self {
            Reading::Float(value) => value,
            Reading::Scaled(value) => value as f32,
            Reading::Word(value) => value as f32,
        }
    }
}

/// Sequential little endian reader over an input report.
struct ReportReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ReportReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        let end = self.position + N;
        let chunk = self
            .bytes
            .get(self.position..end)
            .ok_or(FrameError::FrameTooShort {
                needed: end,
                actual: self.bytes.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.position = end;
        Ok(out)
    }

    fn read(&mut self, encoding: Encoding) -> Result<Reading, FrameError> {
        let reading = match encoding {
            Encoding::Scaled { divisor } => {
                Reading::Scaled(i16::from_le_bytes(self.take()?) as f64 / divisor)
            }
            Encoding::Word => Reading::Word(i16::from_le_bytes(self.take()?)),
            Encoding::Float => Reading::Float(f32::from_le_bytes(self.take()?)),
        };
        Ok(reading)
    }
}

/// The state of the whole board at one instant.
///
/// Per-channel arrays are indexed by [`Channel::index`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoringSnapshot {
    /// Measured temperature, °C.
    pub real_time_temp: f64,
    /// TEC voltage, V.
    pub v_tec: f64,
    /// TEC current, A.
    pub i_tec: f64,
    /// TEC voltage limit, raw.
    pub v_lim: i16,
    /// TEC current limit, raw.
    pub i_lim: i16,
    /// Target temperature, °C.
    pub target_temp: f64,
    /// PID sampling interval, ms.
    pub pid_sampling_interval: i16,
    pub pid_p: f32,
    pub pid_i: f32,
    pub pid_d: f32,
    /// Drain voltage per channel, V.
    pub vd: [f64; Channel::COUNT],
    /// Common voltage per channel, V.
    pub vc: [f64; Channel::COUNT],
    /// Gate voltage per channel, V.
    pub vg: [f64; Channel::COUNT],
    /// Auxiliary negative voltage per channel, V.
    pub vea: [f64; Channel::COUNT],
    /// Auxiliary negative current per channel, A.
    pub iea: [f32; Channel::COUNT],
    /// Bias source forward voltage per channel, V.
    pub vf: [f64; Channel::COUNT],
    /// Bias current per channel, mA.
    pub ibias: [f64; Channel::COUNT],
}

impl MonitoringSnapshot {
    /// Decode a complete input report. Nothing is returned unless every field
    /// was read.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < MONITOR_REPORT_SIZE {
            warn!(
                "monitoring report has {} bytes, expected {}",
                bytes.len(),
                MONITOR_REPORT_SIZE
            );
            return Err(FrameError::FrameTooShort {
                needed: MONITOR_REPORT_SIZE,
                actual: bytes.len(),
            });
        }

        let mut reader = ReportReader::new(bytes);
        // Report id.
        reader.take::<1>()?;

        let mut snapshot = Self::default();
        for field in BOARD_FIELDS {
            snapshot.store(field, None, reader.read(field.encoding())?);
        }
        for channel in Channel::iter() {
            for field in SUPPLY_FIELDS {
                snapshot.store(field, Some(channel), reader.read(field.encoding())?);
            }
        }
        for channel in Channel::iter() {
            for field in BIAS_FIELDS {
                snapshot.store(field, Some(channel), reader.read(field.encoding())?);
            }
        }
        Ok(snapshot)
    }

    fn store(&mut self, field: Field, channel: Option<Channel>, reading: Reading) {
        trace!("{:?} {:?} = {:?}", field, channel, reading);
        let ch = channel.map_or(0, Channel::index);
        use Field as F;
        match field {
            F::RealTimeTemp => self.real_time_temp = reading.scaled(),
            F::VTec => self.v_tec = reading.scaled(),
            F::ITec => self.i_tec = reading.scaled(),
            F::Reserved => {}
            F::VLim => self.v_lim = reading.word(),
            F::ILim => self.i_lim = reading.word(),
            F::TargetTemp => self.target_temp = reading.scaled(),
            F::PidSamplingInterval => self.pid_sampling_interval = reading.word(),
            F::PidP => self.pid_p = reading.float(),
            F::PidI => self.pid_i = reading.float(),
            F::PidD => self.pid_d = reading.float(),
            F::Vd => self.vd[ch] = reading.scaled(),
            F::Vc => self.vc[ch] = reading.scaled(),
            F::Vg => self.vg[ch] = reading.scaled(),
            F::Vea => self.vea[ch] = reading.scaled(),
            F::Iea => self.iea[ch] = reading.float(),
            F::Vf => self.vf[ch] = reading.scaled(),
            F::IBias => self.ibias[ch] = reading.scaled(),
        }
    }
}
