//! Open Interface commands and their wire framing.

use bitflags::bitflags;

use crate::transport::{Transport, TransportError};

/// Single-byte opcodes defined by the Open Interface.
///
/// Operand count and order are fixed per opcode and are part of the protocol
/// contract; see [`Robot`](crate::robot::Robot) for the operand layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Opens the OI session. Must be the first command after power-up.
    Start = 128,
    Baud = 129,
    Safe = 131,
    Full = 132,
    /// Starts the spot-clean demo directly.
    Spot = 134,
    /// Starts the cover demo directly.
    Cover = 135,
    Demo = 136,
    Drive = 137,
    Leds = 139,
    Song = 140,
    PlaySong = 141,
    Sensors = 142,
    /// Starts the cover demo with docking directly.
    CoverAndDock = 143,
    DriveDirect = 145,
    DigitalOutputs = 147,
    SendIr = 151,
}

/// Built-in demo programs, selected by one byte after [`Opcode::Demo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Demo {
    /// The basic room-clean program.
    Cover = 0,
    /// Room clean with automatic docking when the battery runs low.
    CoverAndDock = 1,
    /// Spirals outward and back in to clean one spot.
    Spot = 2,
    /// Finds a wall and follows it.
    Mouse = 3,
    FigureEight = 4,
    /// Drives forward when pushed from behind and away from anything it bumps.
    Wimp = 5,
    /// Homes in on a virtual wall until it bumps into it.
    Home = 6,
    /// Like [`Demo::Home`], but keeps looking for further virtual walls.
    Tag = 7,
    Pachelbel = 8,
    Banjo = 9,
    /// Aborts the running demo. This is also how the robot is returned to
    /// passive mode; there is no dedicated opcode for that.
    Abort = 255,
}

/// Baud-rate codes accepted by [`Opcode::Baud`].
///
/// The wire carries the code, not the rate. Only codes 0 through 11 exist;
/// anything else must be rejected before a single byte is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Baud {
    B300 = 0,
    B600 = 1,
    B1200 = 2,
    B2400 = 3,
    B4800 = 4,
    B9600 = 5,
    B14400 = 6,
    B19200 = 7,
    B28800 = 8,
    B38400 = 9,
    B57600 = 10,
    B115200 = 11,
}

impl Baud {
    /// Looks up the code a caller passed in. Returns `None` above 11.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::B300,
            1 => Self::B600,
            2 => Self::B1200,
            3 => Self::B2400,
            4 => Self::B4800,
            5 => Self::B9600,
            6 => Self::B14400,
            7 => Self::B19200,
            8 => Self::B28800,
            9 => Self::B38400,
            10 => Self::B57600,
            11 => Self::B115200,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// The serial rate this code selects.
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::B300 => 300,
            Self::B600 => 600,
            Self::B1200 => 1200,
            Self::B2400 => 2400,
            Self::B4800 => 4800,
            Self::B9600 => 9600,
            Self::B14400 => 14400,
            Self::B19200 => 19200,
            Self::B28800 => 28800,
            Self::B38400 => 38400,
            Self::B57600 => 57600,
            Self::B115200 => 115_200,
        }
    }
}

bitflags! {
    /// Flag bits packed into the first payload byte of [`Opcode::Leds`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LedFlags: u8 {
        const PLAY = 1 << 1;
        const ADVANCE = 1 << 3;
    }
}

/// Radius operand that drives as straight as the drivetrain manages.
pub const RADIUS_STRAIGHT: i16 = 0x7fff;
/// Radius operand that spins the robot in place, clockwise.
pub const RADIUS_SPIN_CLOCKWISE: i16 = -1;
/// Radius operand that spins the robot in place, counter-clockwise.
pub const RADIUS_SPIN_COUNTERCLOCKWISE: i16 = 1;

/// A single framed value following an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Byte(u8),
    /// Travels high byte first, regardless of host byte order.
    Word(u16),
}

/// One Open Interface command: an opcode and its operands, in wire order.
///
/// A command is built immediately before transmission and lives only for the
/// duration of one [`transmit`](Command::transmit) call. Signed operands are
/// carried as their unsigned bit pattern; the bits on the wire do not change,
/// only their interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    opcode: Opcode,
    operands: Vec<Operand>,
}

impl Command {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
        }
    }

    pub fn byte(mut self, value: u8) -> Self {
        self.operands.push(Operand::Byte(value));
        self
    }

    pub fn word(mut self, value: u16) -> Self {
        self.operands.push(Operand::Word(value));
        self
    }

    pub fn signed_word(self, value: i16) -> Self {
        self.word(value as u16)
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Sends the command through `transport` as one frame: the opcode byte,
    /// then each operand preceded by a separator, then the frame terminator.
    pub fn transmit<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<(), TransportError> {
        transport.begin_frame()?;
        transport.send_byte(self.opcode as u8)?;
        for operand in &self.operands {
            transport.separator()?;
            match *operand {
                Operand::Byte(value) => transport.send_byte(value)?,
                Operand::Word(value) => transport.send_word(value)?,
            }
        }
        transport.end_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockTransport, Token};

    #[test]
    fn operands_travel_in_declared_order() {
        let mut transport = MockTransport::new();
        Command::new(Opcode::Drive)
            .signed_word(500)
            .signed_word(-1)
            .transmit(&mut transport)
            .unwrap();

        assert_eq!(
            transport.sent,
            vec![
                Token::Begin,
                Token::Byte(137),
                Token::Sep,
                Token::Word(0x01f4),
                Token::Sep,
                Token::Word(0xffff),
                Token::End,
            ]
        );
    }

    #[test]
    fn bare_command_is_a_single_framed_opcode() {
        let mut transport = MockTransport::new();
        Command::new(Opcode::Start).transmit(&mut transport).unwrap();
        assert_eq!(
            transport.sent,
            vec![Token::Begin, Token::Byte(128), Token::End]
        );
    }

    #[test]
    fn baud_codes_stop_at_eleven() {
        assert_eq!(Baud::from_code(11), Some(Baud::B115200));
        assert_eq!(Baud::from_code(11).unwrap().bits_per_second(), 115_200);
        assert_eq!(Baud::from_code(0), Some(Baud::B300));
        assert_eq!(Baud::from_code(12), None);
        assert_eq!(Baud::from_code(255), None);
    }

    #[test]
    fn led_flag_bits_match_the_protocol() {
        assert_eq!(LedFlags::PLAY.bits(), 0b0000_0010);
        assert_eq!(LedFlags::ADVANCE.bits(), 0b0000_1000);
    }
}
