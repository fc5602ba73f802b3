//! Binary UART transport backed by a host serial port.

use std::io::{self, Read, Write};
use std::time::Duration;

use log::{debug, trace};
use serialport::{DataBits, Parity, SerialPort, StopBits};

use super::{Transport, TransportError};
use crate::command::Baud;

/// Rate the robot talks at straight out of power-on.
pub const DEFAULT_BAUD: u32 = 57_600;

/// Read timeout applied when none is given. The protocol defines no timeout
/// of its own; how long to wait on a stalled line is transport policy.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Opens `path` 8N1 at the robot's power-on default of 57600 baud.
    pub fn open(path: &str) -> Result<Self, TransportError> {
        Self::open_with(path, DEFAULT_BAUD, DEFAULT_TIMEOUT)
    }

    pub fn open_with(path: &str, baud: u32, timeout: Duration) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(timeout)
            .open()?;
        debug!("opened {path} at {baud} baud");
        Ok(Self { port })
    }

    /// Changes how long reads wait before reporting exhaustion.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), TransportError> {
        self.port.set_timeout(timeout)?;
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.port.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::TimedOut => TransportError::UnexpectedEnd,
            _ => TransportError::Io(e),
        })
    }
}

impl Transport for SerialTransport {
    fn send_byte(&mut self, value: u8) -> Result<(), TransportError> {
        trace!("serial tx {value:#04x}");
        self.port.write_all(&[value])?;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        trace!("serial rx {:#04x}", buf[0]);
        Ok(buf[0])
    }

    fn end_frame(&mut self) -> Result<(), TransportError> {
        self.port.flush()?;
        Ok(())
    }

    fn baud_changed(&mut self, baud: Baud) -> Result<(), TransportError> {
        // Let the payload drain at the old rate, and give the robot the
        // 100 ms it needs to switch, before retuning the host port.
        self.port.flush()?;
        self.wait_ms(100);
        self.port.set_baud_rate(baud.bits_per_second())?;
        debug!("serial link retuned to {} baud", baud.bits_per_second());
        Ok(())
    }
}
