//! Sensor packets and their wire formats.
//!
//! Every sensor query is one request/response exchange: a sensors command
//! carrying the packet id, then a reply whose width and signedness come from
//! the packet's [`SensorDescriptor`]. The table is fixed protocol data; it is
//! never mutated at runtime.

use bitflags::bitflags;
use log::debug;
use thiserror::Error;

use crate::command::{Command, Opcode};
use crate::transport::{Transport, TransportError};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not decode byte with unexpected value. Found {value:#04x}, expected one of: {expected:x?}")]
    UnexpectedValue { value: u8, expected: &'static [u8] },
}

/// Telemetry values the robot can be asked for, keyed by packet id.
///
/// The single-value packets are listed here; the OI also defines grouped
/// packets 0 through 6 that bundle several of these into one reply, which
/// this layer does not request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorPacket {
    /// Bumper and wheel-drop switches, packed into one byte.
    BumpsWheelDrops = 7,
    Wall = 8,
    CliffFarLeft = 9,
    CliffFrontLeft = 10,
    CliffFrontRight = 11,
    CliffFarRight = 12,
    VirtualWall = 13,
    /// Wheel and low-side-driver overcurrent flags, packed into one byte.
    Overcurrents = 14,
    /// Last byte seen by the IR receiver; see the [`ir`](crate::ir) catalogue.
    IrByte = 17,
    Buttons = 18,
    /// Millimeters traveled since last asked.
    Distance = 19,
    /// Degrees turned since last asked; positive is to the right.
    Angle = 20,
    ChargingState = 21,
    /// Battery voltage in millivolts.
    Voltage = 22,
    /// Battery current in milliamps; negative while discharging.
    Current = 23,
    /// Battery temperature in degrees Celsius.
    BatteryTemperature = 24,
    /// Battery charge in milliamp-hours.
    BatteryCharge = 25,
    /// Estimated battery capacity in milliamp-hours.
    BatteryCapacity = 26,
    WallSignal = 27,
    CliffFarLeftSignal = 28,
    CliffFrontLeftSignal = 29,
    CliffFrontRightSignal = 30,
    CliffFarRightSignal = 31,
    CargoBayDigitalInputs = 32,
    /// Cargo-bay analog pin, a 10-bit reading.
    CargoBayAnalogSignal = 33,
    ChargingSourcesAvailable = 34,
    OiMode = 35,
    SongNumber = 36,
    SongPlaying = 37,
    /// Most recently requested drive speed, in mm/s.
    RequestedVelocity = 39,
    /// Most recently requested drive radius, in mm.
    RequestedRadius = 40,
    RequestedRightVelocity = 41,
    RequestedLeftVelocity = 42,
}

/// How a sensor reply travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    UnsignedByte,
    SignedByte,
    /// Two bytes, high byte first.
    UnsignedWord,
    /// Two bytes, high byte first, two's complement.
    SignedWord,
    /// One byte carrying several independent boolean flags.
    PackedByte,
}

impl SensorKind {
    /// Reply width in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::UnsignedByte | Self::SignedByte | Self::PackedByte => 1,
            Self::UnsignedWord | Self::SignedWord => 2,
        }
    }
}

/// Static wire metadata for one sensor packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    pub kind: SensorKind,
    /// Lowest value the hardware can actually produce.
    pub min: i32,
    /// Highest value the hardware can actually produce. The cliff and wall
    /// signal strengths top out at 4095 even though two bytes arrive.
    pub max: i32,
}

impl SensorDescriptor {
    const fn new(kind: SensorKind, min: i32, max: i32) -> Self {
        Self { kind, min, max }
    }

    /// Whether `value` is inside the range the hardware can produce. The
    /// decoder never clamps; this is advisory metadata for a higher layer.
    pub fn plausible(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl SensorPacket {
    /// The packet id sent on the wire.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub const fn descriptor(self) -> SensorDescriptor {
        use SensorKind::*;
        match self {
            Self::BumpsWheelDrops => SensorDescriptor::new(PackedByte, 0, 0b1_1111),
            Self::Wall => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::CliffFarLeft => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::CliffFrontLeft => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::CliffFrontRight => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::CliffFarRight => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::VirtualWall => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::Overcurrents => SensorDescriptor::new(PackedByte, 0, 0b1_1111),
            Self::IrByte => SensorDescriptor::new(UnsignedByte, 0, 255),
            Self::Buttons => SensorDescriptor::new(PackedByte, 0, 0b101),
            Self::Distance => SensorDescriptor::new(SignedWord, i16::MIN as i32, i16::MAX as i32),
            Self::Angle => SensorDescriptor::new(SignedWord, i16::MIN as i32, i16::MAX as i32),
            Self::ChargingState => SensorDescriptor::new(UnsignedByte, 0, 5),
            Self::Voltage => SensorDescriptor::new(UnsignedWord, 0, u16::MAX as i32),
            Self::Current => SensorDescriptor::new(SignedWord, i16::MIN as i32, i16::MAX as i32),
            Self::BatteryTemperature => SensorDescriptor::new(SignedByte, -128, 127),
            Self::BatteryCharge => SensorDescriptor::new(UnsignedWord, 0, u16::MAX as i32),
            Self::BatteryCapacity => SensorDescriptor::new(UnsignedWord, 0, u16::MAX as i32),
            Self::WallSignal => SensorDescriptor::new(UnsignedWord, 0, 4095),
            Self::CliffFarLeftSignal => SensorDescriptor::new(UnsignedWord, 0, 4095),
            Self::CliffFrontLeftSignal => SensorDescriptor::new(UnsignedWord, 0, 4095),
            Self::CliffFrontRightSignal => SensorDescriptor::new(UnsignedWord, 0, 4095),
            Self::CliffFarRightSignal => SensorDescriptor::new(UnsignedWord, 0, 4095),
            Self::CargoBayDigitalInputs => SensorDescriptor::new(PackedByte, 0, 0b1_1111),
            Self::CargoBayAnalogSignal => SensorDescriptor::new(UnsignedWord, 0, 1023),
            Self::ChargingSourcesAvailable => SensorDescriptor::new(PackedByte, 0, 0b11),
            Self::OiMode => SensorDescriptor::new(UnsignedByte, 0, 3),
            Self::SongNumber => SensorDescriptor::new(UnsignedByte, 0, 15),
            Self::SongPlaying => SensorDescriptor::new(UnsignedByte, 0, 1),
            Self::RequestedVelocity => SensorDescriptor::new(SignedWord, -500, 500),
            Self::RequestedRadius => SensorDescriptor::new(SignedWord, i16::MIN as i32, i16::MAX as i32),
            Self::RequestedRightVelocity => SensorDescriptor::new(SignedWord, -500, 500),
            Self::RequestedLeftVelocity => SensorDescriptor::new(SignedWord, -500, 500),
        }
    }

    /// Issues the sensor request and blocks until the full reply has been
    /// read and decoded. The exchange is stateless: asking again means a
    /// fresh request, and a second command must never be issued before this
    /// returns or the byte stream desynchronizes.
    pub fn query<T: Transport + ?Sized>(self, transport: &mut T) -> Result<SensorValue, DecodeError> {
        Command::new(Opcode::Sensors)
            .byte(self.id())
            .transmit(transport)?;

        let descriptor = self.descriptor();
        let value = match descriptor.kind {
            SensorKind::UnsignedByte => SensorValue::Unsigned(u16::from(transport.read_byte()?)),
            SensorKind::SignedByte => SensorValue::Signed(i16::from(transport.read_byte()? as i8)),
            SensorKind::UnsignedWord => SensorValue::Unsigned(transport.read_word()?),
            SensorKind::SignedWord => SensorValue::Signed(transport.read_word()? as i16),
            SensorKind::PackedByte => SensorValue::Packed(transport.read_byte()?),
        };

        if !descriptor.plausible(value.as_i32()) {
            debug!("implausible reading {} for sensor packet {:?}", value.as_i32(), self);
        }
        Ok(value)
    }
}

/// A decoded sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorValue {
    Unsigned(u16),
    Signed(i16),
    Packed(u8),
}

impl SensorValue {
    /// Widens any reading losslessly.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unsigned(value) => i32::from(value),
            Self::Signed(value) => i32::from(value),
            Self::Packed(value) => i32::from(value),
        }
    }
}

bitflags! {
    /// The combined bumper and wheel-drop byte at [`SensorPacket::BumpsWheelDrops`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BumpsWheelDrops: u8 {
        const BUMP_RIGHT = 1 << 0;
        const BUMP_LEFT = 1 << 1;
        const WHEEL_DROP_RIGHT = 1 << 2;
        const WHEEL_DROP_LEFT = 1 << 3;
        const WHEEL_DROP_CASTER = 1 << 4;
    }
}

bitflags! {
    /// The Play and Advance buttons on top of the robot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const PLAY = 1 << 0;
        const ADVANCE = 1 << 2;
    }
}

bitflags! {
    /// Overcurrent flags for the wheels and the three low-side drivers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Overcurrents: u8 {
        const LOW_SIDE_DRIVER_1 = 1 << 0;
        const LOW_SIDE_DRIVER_0 = 1 << 1;
        const LOW_SIDE_DRIVER_2 = 1 << 2;
        const RIGHT_WHEEL = 1 << 3;
        const LEFT_WHEEL = 1 << 4;
    }
}

bitflags! {
    /// Digital input pins on the cargo-bay connector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CargoBayDigitalInputs: u8 {
        const INPUT_0 = 1 << 0;
        const INPUT_1 = 1 << 1;
        const INPUT_2 = 1 << 2;
        const INPUT_3 = 1 << 3;
        const DEVICE_DETECT = 1 << 4;
    }
}

bitflags! {
    /// Charge sources the robot can currently see.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChargingSources: u8 {
        const INTERNAL_CHARGER = 1 << 0;
        const HOME_BASE = 1 << 1;
    }
}

/// Battery charging states reported by [`SensorPacket::ChargingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChargingState {
    NotCharging = 0,
    ReconditioningCharging = 1,
    FullCharging = 2,
    TrickleCharging = 3,
    Waiting = 4,
    ChargingFault = 5,
}

impl ChargingState {
    pub(crate) fn from_wire(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::NotCharging),
            1 => Ok(Self::ReconditioningCharging),
            2 => Ok(Self::FullCharging),
            3 => Ok(Self::TrickleCharging),
            4 => Ok(Self::Waiting),
            5 => Ok(Self::ChargingFault),
            v => Err(DecodeError::UnexpectedValue {
                value: v,
                expected: &[0, 1, 2, 3, 4, 5],
            }),
        }
    }
}
