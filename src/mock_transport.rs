//! We use this mocking module in unit tests to emulate the board's HID endpoint.
//!
//! Unlike a serial port, every read hands back at most one whole report.

use thiserror::Error;

use crate::frame::{COMMAND_FRAME_SIZE, CommandFrame};

const MAX_REPORT_LEN: usize = 128;
const MAX_QUEUED_REPORTS: usize = 4;

/// Our mock type used to emulate the board.
pub struct MockTransport {
    /// Every byte written to the mock, in order.
    write_buffer: heapless::Vec<u8, 256>,
    /// Pre-configured input reports, returned one per read.
    reports: heapless::Vec<heapless::Vec<u8, MAX_REPORT_LEN>, MAX_QUEUED_REPORTS>,
    /// Index of the next report to return.
    next_report: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Error, Debug)]
pub enum MockTransportError {
    #[error("mock buffer overflow")]
    BufferOverflow,
    #[error("simulated transport error")]
    SimulatedError,
    #[error("no report queued")]
    WouldBlock,
}

impl embedded_io::Error for MockTransportError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockTransportError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockTransportError::SimulatedError => embedded_io::ErrorKind::Other,
            MockTransportError::WouldBlock => embedded_io::ErrorKind::TimedOut,
        }
    }
}

impl embedded_io::ErrorType for MockTransport {
    type Error = MockTransportError;
}

impl embedded_io::Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockTransportError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockTransportError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockTransportError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockTransportError::SimulatedError);
        }

        let report = self
            .reports
            .get(self.next_report)
            .ok_or(MockTransportError::WouldBlock)?;
        self.next_report += 1;

        // Like a HID read, anything that doesn't fit is dropped.
        let len = core::cmp::min(buf.len(), report.len());
        buf[..len].copy_from_slice(&report[..len]);
        Ok(len)
    }
}

impl MockTransport {
    /// Create a new MockTransport instance with nothing queued
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            reports: heapless::Vec::new(),
            next_report: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Queue an input report to be returned by a later read()
    pub fn push_report(&mut self, data: &[u8]) -> Result<(), MockTransportError> {
        let report = heapless::Vec::from_slice(data)
            .map_err(|_| MockTransportError::BufferOverflow)?;
        self.reports
            .push(report)
            .map_err(|_| MockTransportError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// The written data split into output reports.
    pub fn written_frames(&self) -> heapless::Vec<CommandFrame, 32> {
        self.write_buffer
            .chunks_exact(COMMAND_FRAME_SIZE)
            .filter_map(|chunk| CommandFrame::try_from(chunk).ok())
            .collect()
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error as _, ErrorKind, Read, Write};

    #[test]
    fn test_new_mock_transport() {
        let mock = MockTransport::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.next_report, 0);
        assert!(!mock.should_error_on_write);
        assert!(!mock.should_error_on_read);
    }

    #[test]
    fn test_written_frames() {
        let mut mock = MockTransport::new();
        mock.write_all(&[0x20, 1, 0, 0, 0, 0, 0, 0]).unwrap();
        mock.write_all(&[0x21, 1, 0, 0, 0, 0, 0, 0]).unwrap();

        let frames = mock.written_frames();
        assert_eq!(
            frames.as_slice(),
            [[0x20, 1, 0, 0, 0, 0, 0, 0], [0x21, 1, 0, 0, 0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockTransport::new();
        let result = mock.write(&[0u8; 300]);
        assert!(matches!(result, Err(MockTransportError::BufferOverflow)));
    }

    #[test]
    fn test_one_report_per_read() {
        let mut mock = MockTransport::new();
        mock.push_report(b"first").unwrap();
        mock.push_report(b"second").unwrap();

        let mut buffer = [0u8; 20];
        assert_eq!(mock.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer[..5], b"first");
        assert_eq!(mock.read(&mut buffer).unwrap(), 6);
        assert_eq!(&buffer[..6], b"second");
    }

    #[test]
    fn test_read_truncates_to_buffer() {
        let mut mock = MockTransport::new();
        mock.push_report(b"Long report").unwrap();

        let mut buffer = [0u8; 4];
        assert_eq!(mock.read(&mut buffer).unwrap(), 4);
        assert_eq!(&buffer, b"Long");
    }

    #[test]
    fn test_read_timeout_when_no_data() {
        let mut mock = MockTransport::new();
        let mut buffer = [0u8; 10];

        let result = mock.read(&mut buffer);
        assert!(matches!(result, Err(MockTransportError::WouldBlock)));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn test_simulated_errors() {
        let mut mock = MockTransport::new();
        mock.set_write_error(true);
        mock.set_read_error(true);

        assert!(mock.write(b"x").is_err());
        assert!(mock.flush().is_err());
        assert!(mock.read(&mut [0u8; 4]).is_err());
    }
}
