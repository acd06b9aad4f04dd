use std::{
    env,
    fs::{File, OpenOptions},
    io::{Read, Write},
};

use eml_tec_controller::{
    Channel, OUTPUT_REPORT_ID, OUTPUT_REPORT_SIZE, POWER_OFF_SETTLE_TIME, TecController,
};
use inquire::Select;
use tracing_subscriber::EnvFilter;

// Configuration constants - adjust these for your setup
const DRAIN_VOLTAGE_V: f64 = 1.761;
const AUX_NEGATIVE_VOLTAGE_V: f64 = -1.35;
const TARGET_TEMPERATURE_C: f64 = 45.6;
const POWER_ON_TIME_MS: u64 = 500;

/// A Linux hidraw node. Output reports go out with their report id prefixed,
/// input reports come back with theirs.
pub struct HidrawWrapper(File);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for HidrawWrapper {
    type Error = IoError;
}

impl embedded_io::Read for HidrawWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf).map_err(IoError)
    }
}

impl embedded_io::Write for HidrawWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut report = [0u8; OUTPUT_REPORT_SIZE + 1];
        let len = buf.len().min(OUTPUT_REPORT_SIZE);
        report[0] = OUTPUT_REPORT_ID;
        report[1..=len].copy_from_slice(&buf[..len]);
        self.0.write_all(&report).map_err(IoError)?;
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush().map_err(IoError)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Get hidraw node from command line arg or interactive selection
    let node = env::args().nth(1).unwrap_or_else(|| {
        let mut nodes: Vec<String> = std::fs::read_dir("/dev")
            .expect("Failed to list /dev")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path().display().to_string())
            .filter(|path| path.starts_with("/dev/hidraw"))
            .collect();
        nodes.sort();

        if nodes.is_empty() {
            eprintln!("No hidraw devices found!");
            std::process::exit(1);
        }

        Select::new("Select the TEC controller's hidraw node:", nodes)
            .prompt()
            .expect("Failed to select device")
    });

    println!("Using device: {}", node);

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&node)
        .expect("Failed to open hidraw device");

    let mut tec = TecController::new(HidrawWrapper(file));

    let snapshot = tec.read_monitoring_data().unwrap();
    println!("Target Temp: {}℃", snapshot.target_temp);
    println!("RT-Temp: {}℃", snapshot.real_time_temp);
    println!("VD1: {}V", snapshot.vd[Channel::Ch1.index()]);

    tec.set_drain_voltage(Channel::Ch1, DRAIN_VOLTAGE_V).unwrap();
    tec.set_aux_negative_voltage(Channel::Ch1, AUX_NEGATIVE_VOLTAGE_V)
        .unwrap();
    tec.set_target_temperature(TARGET_TEMPERATURE_C).unwrap();

    tec.voltage_source_on(Channel::Ch1).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(POWER_ON_TIME_MS));
    tec.voltage_source_off(Channel::Ch1).unwrap();

    // The board sequences the rails down before it listens again.
    std::thread::sleep(std::time::Duration::from_millis(
        POWER_OFF_SETTLE_TIME.to_millis() as u64,
    ));

    let snapshot = tec.read_monitoring_data().unwrap();
    println!("{:#?}", snapshot);
}
