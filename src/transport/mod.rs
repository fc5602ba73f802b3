//! Byte-level links the protocol runs over.
//!
//! The encoder and decoder are written once against the [`Transport`] trait;
//! the binary UART backend and the text console backend implement it. Words
//! always travel big-endian (high byte first), no matter what the host or the
//! backend look like.

use std::io;
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::command::Baud;

pub mod console;
#[cfg(feature = "serial")]
pub mod serial;

#[derive(Error, Debug)]
pub enum TransportError {
    /// The link ran out of data before a read completed. Decoding never
    /// guesses or zero-fills; the partial read is reported instead.
    #[error("transport ran out of data mid-read")]
    UnexpectedEnd,

    #[error("expected a hexadecimal token, found {found:?}")]
    InvalidToken { found: String },

    #[error("this transport has no {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[cfg(feature = "serial")]
    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

/// A byte-oriented link to the robot.
///
/// The four data operations are all the protocol layer needs. The framing
/// hooks exist for transports where command boundaries are visible (the text
/// console puts one command per line); on a raw binary link they stay no-ops.
pub trait Transport {
    fn send_byte(&mut self, value: u8) -> Result<(), TransportError>;

    fn read_byte(&mut self) -> Result<u8, TransportError>;

    /// Sends a 16-bit value high byte first.
    fn send_word(&mut self, value: u16) -> Result<(), TransportError> {
        self.send_byte((value >> 8) as u8)?;
        self.send_byte((value & 0xff) as u8)
    }

    /// Reads a 16-bit value transmitted high byte first.
    fn read_word(&mut self) -> Result<u16, TransportError> {
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Marks the start of one logical command.
    fn begin_frame(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Separates two tokens within a command.
    fn separator(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Terminates one logical command.
    fn end_frame(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Runs the power-on sequence, where the link can reach the power rail.
    /// A plain serial port cannot; the robot must already be switched on.
    fn power_on(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Unsupported("power control"))
    }

    fn power_off(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Unsupported("power control"))
    }

    fn power_status(&mut self) -> Result<bool, TransportError> {
        Err(TransportError::Unsupported("power sensing"))
    }

    /// Blocks the calling thread for `ms` milliseconds. Embedded backends may
    /// override this with a hardware timer; the contract is only that the
    /// call does not return early.
    fn wait_ms(&mut self, ms: u16) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    /// Called after a baud-change command has been sent so the link can
    /// follow the robot to the new rate.
    fn baud_changed(&mut self, baud: Baud) -> Result<(), TransportError> {
        let _ = baud;
        Ok(())
    }
}
