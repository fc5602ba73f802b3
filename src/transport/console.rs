//! Text-console transport for local debugging.
//!
//! Commands are printed as hexadecimal tokens separated by spaces, one
//! command per line, so a human (or a repeater process on the other end of a
//! pipe) can follow the session. Replies are read back as whitespace-separated
//! hex tokens. A drive command looks like `0x89 0x01F4 0xFFFF` on its line;
//! a word is one four-digit token, not two bytes.

use std::io;
use std::io::{BufRead, Write};

use log::trace;

use super::{Transport, TransportError};

/// Directive asking the repeater to switch the robot on.
const POWER_ON_DIRECTIVE: &str = "PowerOn";
/// Directive asking the repeater to switch the robot off.
const POWER_OFF_DIRECTIVE: &str = "PowerOff";
/// Directive asking the repeater whether the robot is powered.
const POWER_STATUS_DIRECTIVE: &str = "RobotIsOn";

/// Transport that speaks hexadecimal tokens over any reader/writer pair.
pub struct TextTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TextTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Scans past whitespace (including line ends) and returns the next
    /// token. Exhaustion of the reader is exhaustion of the transport.
    fn next_token(&mut self) -> Result<String, TransportError> {
        let mut token = String::new();
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                if token.is_empty() {
                    return Err(TransportError::UnexpectedEnd);
                }
                return Ok(token);
            }

            let mut consumed = 0;
            let mut complete = false;
            for &byte in available {
                if byte.is_ascii_whitespace() {
                    consumed += 1;
                    if !token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    token.push(byte as char);
                    consumed += 1;
                }
            }
            self.reader.consume(consumed);
            if complete {
                return Ok(token);
            }
        }
    }
}

impl TextTransport<io::StdinLock<'static>, io::StdoutLock<'static>> {
    /// Console transport over the process's own stdin and stdout, the way a
    /// repeater-driven debug session runs.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

/// Parses a hex token with an optional `0x` prefix, capped at `max`.
fn parse_token(token: &str, max: u32) -> Result<u16, TransportError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    match u32::from_str_radix(digits, 16) {
        Ok(value) if value <= max => Ok(value as u16),
        _ => Err(TransportError::InvalidToken {
            found: token.to_string(),
        }),
    }
}

impl<R: BufRead, W: Write> Transport for TextTransport<R, W> {
    fn send_byte(&mut self, value: u8) -> Result<(), TransportError> {
        write!(self.writer, "0x{value:02X}")?;
        Ok(())
    }

    // A word is one token here, unlike the two bytes a binary link sends.
    fn send_word(&mut self, value: u16) -> Result<(), TransportError> {
        write!(self.writer, "0x{value:04X}")?;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let token = self.next_token()?;
        let value = parse_token(&token, 0xff)? as u8;
        trace!("console rx {value:#04x}");
        Ok(value)
    }

    fn read_word(&mut self) -> Result<u16, TransportError> {
        let token = self.next_token()?;
        let value = parse_token(&token, 0xffff)?;
        trace!("console rx {value:#06x}");
        Ok(value)
    }

    fn separator(&mut self) -> Result<(), TransportError> {
        write!(self.writer, " ")?;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), TransportError> {
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn power_on(&mut self) -> Result<(), TransportError> {
        writeln!(self.writer, "{POWER_ON_DIRECTIVE}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), TransportError> {
        writeln!(self.writer, "{POWER_OFF_DIRECTIVE}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn power_status(&mut self) -> Result<bool, TransportError> {
        writeln!(self.writer, "{POWER_STATUS_DIRECTIVE}")?;
        self.writer.flush()?;
        Ok(self.read_byte()? != 0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::command::{Command, Opcode};

    fn written(transport: TextTransport<impl BufRead, Vec<u8>>) -> String {
        let (_, writer) = transport.into_inner();
        String::from_utf8(writer).unwrap()
    }

    #[test]
    fn a_command_occupies_exactly_one_line() {
        let mut transport = TextTransport::new(io::empty(), Vec::new());
        Command::new(Opcode::Drive)
            .signed_word(500)
            .signed_word(-1)
            .transmit(&mut transport)
            .unwrap();

        assert_eq!(written(transport), "0x89 0x01F4 0xFFFF\n");
    }

    #[test]
    fn byte_operands_are_two_digit_tokens() {
        let mut transport = TextTransport::new(io::empty(), Vec::new());
        Command::new(Opcode::Demo)
            .byte(255)
            .transmit(&mut transport)
            .unwrap();

        assert_eq!(written(transport), "0x88 0xFF\n");
    }

    #[test]
    fn tokens_are_read_across_line_boundaries() {
        let input = Cursor::new(b"0x1F 0xFF\n0x01F4\n".to_vec());
        let mut transport = TextTransport::new(input, Vec::new());

        assert_eq!(transport.read_byte().unwrap(), 0x1f);
        assert_eq!(transport.read_byte().unwrap(), 0xff);
        assert_eq!(transport.read_word().unwrap(), 0x01f4);
    }

    #[test]
    fn unprefixed_hex_is_accepted() {
        let mut transport = TextTransport::new(Cursor::new(b"2A".to_vec()), Vec::new());
        assert_eq!(transport.read_byte().unwrap(), 0x2a);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let mut transport = TextTransport::new(Cursor::new(b"banana".to_vec()), Vec::new());
        assert!(matches!(
            transport.read_byte(),
            Err(TransportError::InvalidToken { .. })
        ));
    }

    #[test]
    fn oversized_byte_tokens_are_rejected() {
        let mut transport = TextTransport::new(Cursor::new(b"0x1FF".to_vec()), Vec::new());
        assert!(matches!(
            transport.read_byte(),
            Err(TransportError::InvalidToken { .. })
        ));
    }

    #[test]
    fn exhausted_input_is_reported_not_invented() {
        let mut transport = TextTransport::new(io::empty(), Vec::new());
        assert!(matches!(
            transport.read_byte(),
            Err(TransportError::UnexpectedEnd)
        ));
    }

    #[test]
    fn power_directives_use_their_own_lines() {
        let input = Cursor::new(b"0x01\n".to_vec());
        let mut transport = TextTransport::new(input, Vec::new());

        assert!(transport.power_status().unwrap());
        transport.power_on().unwrap();
        assert_eq!(written(transport), "RobotIsOn\nPowerOn\n");
    }
}
