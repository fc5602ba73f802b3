//! The high-level command surface over a [`Transport`].

use log::debug;
use thiserror::Error;

use crate::command::{Baud, Command, Demo, LedFlags, Opcode};
use crate::sensor::{
    BumpsWheelDrops, Buttons, CargoBayDigitalInputs, ChargingSources, ChargingState, DecodeError,
    Overcurrents, SensorPacket, SensorValue,
};
use crate::transport::{Transport, TransportError};

#[derive(Error, Debug)]
pub enum OiError {
    /// Baud codes run 0 through 11. Anything else is rejected before a
    /// single byte goes out.
    #[error("baud code {0} is outside the valid range 0-11")]
    InvalidBaudCode(u8),

    /// A song's note and duration slices must be the same length.
    #[error("song has {notes} notes but {durations} durations")]
    SongLengthMismatch { notes: usize, durations: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Open Interface modes.
///
/// The protocol carries no acknowledgement bytes, so the mode a [`Robot`]
/// tracks is the client's view of the last transition it requested, not
/// verified truth. Motion and actuator commands only take effect in Safe or
/// Full mode; this layer does not pre-validate that, and the real robot
/// simply ignores such commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Passive = 1,
    Safe = 2,
    Full = 3,
}

impl Mode {
    pub(crate) fn from_wire(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Passive),
            2 => Ok(Self::Safe),
            3 => Ok(Self::Full),
            v => Err(DecodeError::UnexpectedValue {
                value: v,
                expected: &[0, 1, 2, 3],
            }),
        }
    }
}

/// A robot on the other end of a [`Transport`].
///
/// The robot owns its transport for the whole session, which is what keeps
/// the strict request/response ordering honest: there is no way to issue a
/// second command while a sensor reply is still in flight.
pub struct Robot<T: Transport> {
    transport: T,
    mode: Mode,
}

impl<T: Transport> Robot<T> {
    /// Wraps a transport. The robot is treated as off until [`power_on`]
    /// or [`start`] runs.
    ///
    /// [`power_on`]: Robot::power_on
    /// [`start`]: Robot::start
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            mode: Mode::Off,
        }
    }

    /// Gives the transport back, ending the session.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// The last mode this side requested. See [`Mode`] for why this is
    /// optimistic rather than authoritative.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches the robot on through the transport's power rail, then opens
    /// the OI session. Toggles the rail until the robot reports powered, as
    /// many pulses as it takes.
    ///
    /// Links without power-rail access (a bare serial port) cannot do this;
    /// call [`start`](Robot::start) on those instead.
    pub fn power_on(&mut self) -> Result<(), OiError> {
        while !self.transport.power_status()? {
            self.transport.power_on()?;
            self.transport.wait_ms(500);
        }
        self.start()
    }

    /// Switches the robot off. Not a protocol byte; the transport's power
    /// rail does the work.
    pub fn power_off(&mut self) -> Result<(), OiError> {
        self.transport.power_off()?;
        self.mode = Mode::Off;
        Ok(())
    }

    /// Opens the OI session. This must be the first command after power-up
    /// and leaves the robot in passive mode.
    pub fn start(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::Start).transmit(&mut self.transport)?;
        self.mode = Mode::Passive;
        debug!("OI session started");
        Ok(())
    }

    /// The robot's power state, where the transport can sense it.
    pub fn robot_power_status(&mut self) -> Result<bool, OiError> {
        Ok(self.transport.power_status()?)
    }

    /// Blocks the calling thread for `ms` milliseconds.
    pub fn wait_ms(&mut self, ms: u16) {
        self.transport.wait_ms(ms);
    }

    /// Grants full control of the robot, and all consequences, to the
    /// calling program. Cliff and wheel-drop safeguards are off.
    pub fn full_mode(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::Full).transmit(&mut self.transport)?;
        self.mode = Mode::Full;
        Ok(())
    }

    /// Grants control of the robot, but the robot returns itself to passive
    /// mode if it detects a danger condition.
    pub fn safe_mode(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::Safe).transmit(&mut self.transport)?;
        self.mode = Mode::Safe;
        Ok(())
    }

    /// Returns the robot to passive mode, where sensors can be queried but
    /// the robot cannot be driven.
    ///
    /// The OI has no dedicated opcode for this; aborting the demo player is
    /// the documented way back in, so this is exactly
    /// `play_demo(Demo::Abort)`.
    pub fn passive_mode(&mut self) -> Result<(), OiError> {
        self.play_demo(Demo::Abort)
    }

    /// Starts the given built-in demo. Demos take the robot over, so the
    /// tracked mode drops to passive.
    pub fn play_demo(&mut self, demo: Demo) -> Result<(), OiError> {
        Command::new(Opcode::Demo)
            .byte(demo as u8)
            .transmit(&mut self.transport)?;
        self.mode = Mode::Passive;
        Ok(())
    }

    /// Runs the cover demo. A Roomba will clean the floor.
    pub fn demo_cover(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::Cover).transmit(&mut self.transport)?;
        self.mode = Mode::Passive;
        Ok(())
    }

    /// Runs the cover demo, docking with the charging station when the
    /// battery runs low.
    pub fn demo_cover_and_dock(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::CoverAndDock).transmit(&mut self.transport)?;
        self.mode = Mode::Passive;
        Ok(())
    }

    /// Runs the spot-clean demo.
    pub fn demo_spot(&mut self) -> Result<(), OiError> {
        Command::new(Opcode::Spot).transmit(&mut self.transport)?;
        self.mode = Mode::Passive;
        Ok(())
    }

    /// Asks the robot to switch serial rates, then retunes the local link to
    /// follow it. Codes above 11 are rejected before any byte is sent.
    pub fn set_baud(&mut self, code: u8) -> Result<(), OiError> {
        let baud = Baud::from_code(code).ok_or(OiError::InvalidBaudCode(code))?;
        Command::new(Opcode::Baud)
            .byte(code)
            .transmit(&mut self.transport)?;
        self.transport.baud_changed(baud)?;
        Ok(())
    }

    /// Drives at `speed` mm/s along a curve of `radius` mm to the left.
    ///
    /// [`RADIUS_STRAIGHT`](crate::command::RADIUS_STRAIGHT) drives as
    /// straight as the drivetrain manages; the spin sentinels turn in place.
    pub fn drive(&mut self, speed: i16, radius: i16) -> Result<(), OiError> {
        Command::new(Opcode::Drive)
            .signed_word(speed)
            .signed_word(radius)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    /// Drives each wheel at its own speed in mm/s.
    pub fn direct_drive(&mut self, right_speed: i16, left_speed: i16) -> Result<(), OiError> {
        Command::new(Opcode::DriveDirect)
            .signed_word(right_speed)
            .signed_word(left_speed)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    /// Stops driving. Direct-drive with both wheels at zero; the OI has no
    /// stop opcode.
    pub fn stop_driving(&mut self) -> Result<(), OiError> {
        self.direct_drive(0, 0)
    }

    /// Controls the LEDs on top of the robot. `power_color` runs green (0)
    /// to orange (255); `power_intensity` runs off (0) to full (255).
    pub fn set_leds(
        &mut self,
        play: bool,
        advance: bool,
        power_color: u8,
        power_intensity: u8,
    ) -> Result<(), OiError> {
        let mut flags = LedFlags::empty();
        if play {
            flags |= LedFlags::PLAY;
        }
        if advance {
            flags |= LedFlags::ADVANCE;
        }
        Command::new(Opcode::Leds)
            .byte(flags.bits())
            .byte(power_color)
            .byte(power_intensity)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    /// Sets the three digital output pins on the cargo-bay connector.
    /// Create only; a Roomba ignores this.
    pub fn digital_outputs(&mut self, pin0: bool, pin1: bool, pin2: bool) -> Result<(), OiError> {
        let mut bits = 0u8;
        if pin0 {
            bits |= 0x01;
        }
        if pin1 {
            bits |= 0x02;
        }
        if pin2 {
            bits |= 0x04;
        }
        Command::new(Opcode::DigitalOutputs)
            .byte(bits)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    /// Sends one byte out over IR. See the [`ir`](crate::ir) catalogue for
    /// the values a stock remote or home base uses.
    pub fn send_ir(&mut self, data: u8) -> Result<(), OiError> {
        Command::new(Opcode::SendIr)
            .byte(data)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    /// Stores a song under `number` for later playback. Notes are MIDI
    /// numbers, durations are in 64ths of a second; the slices must be the
    /// same length.
    pub fn store_song(&mut self, number: u8, notes: &[u8], durations: &[u8]) -> Result<(), OiError> {
        if notes.len() != durations.len() {
            return Err(OiError::SongLengthMismatch {
                notes: notes.len(),
                durations: durations.len(),
            });
        }

        let mut command = Command::new(Opcode::Song)
            .byte(number)
            .byte(notes.len() as u8);
        for (&note, &duration) in notes.iter().zip(durations) {
            command = command.byte(note).byte(duration);
        }
        command.transmit(&mut self.transport)?;
        Ok(())
    }

    /// Plays the song stored under `number`.
    pub fn play_song(&mut self, number: u8) -> Result<(), OiError> {
        Command::new(Opcode::PlaySong)
            .byte(number)
            .transmit(&mut self.transport)?;
        Ok(())
    }

    fn sensor(&mut self, packet: SensorPacket) -> Result<SensorValue, OiError> {
        Ok(packet.query(&mut self.transport)?)
    }

    fn sensor_bool(&mut self, packet: SensorPacket) -> Result<bool, OiError> {
        Ok(self.sensor(packet)?.as_i32() != 0)
    }

    fn sensor_u8(&mut self, packet: SensorPacket) -> Result<u8, OiError> {
        Ok(self.sensor(packet)?.as_i32() as u8)
    }

    fn sensor_u16(&mut self, packet: SensorPacket) -> Result<u16, OiError> {
        Ok(self.sensor(packet)?.as_i32() as u16)
    }

    fn sensor_i16(&mut self, packet: SensorPacket) -> Result<i16, OiError> {
        Ok(self.sensor(packet)?.as_i32() as i16)
    }

    /// Reads the combined bumper and wheel-drop byte in one exchange.
    pub fn read_bumps_and_wheel_drops(&mut self) -> Result<BumpsWheelDrops, OiError> {
        let byte = self.sensor_u8(SensorPacket::BumpsWheelDrops)?;
        Ok(BumpsWheelDrops::from_bits_truncate(byte))
    }

    /// Whether the right bumper is pressed. Each of the five bump and
    /// wheel-drop queries re-reads the combined byte; the session is
    /// stateless, so one query never satisfies another.
    pub fn read_right_bumper(&mut self) -> Result<bool, OiError> {
        Ok(self
            .read_bumps_and_wheel_drops()?
            .contains(BumpsWheelDrops::BUMP_RIGHT))
    }

    /// Whether the left bumper is pressed.
    pub fn read_left_bumper(&mut self) -> Result<bool, OiError> {
        Ok(self
            .read_bumps_and_wheel_drops()?
            .contains(BumpsWheelDrops::BUMP_LEFT))
    }

    /// Whether the right wheel has dropped.
    pub fn read_right_wheel_drop(&mut self) -> Result<bool, OiError> {
        Ok(self
            .read_bumps_and_wheel_drops()?
            .contains(BumpsWheelDrops::WHEEL_DROP_RIGHT))
    }

    /// Whether the left wheel has dropped.
    pub fn read_left_wheel_drop(&mut self) -> Result<bool, OiError> {
        Ok(self
            .read_bumps_and_wheel_drops()?
            .contains(BumpsWheelDrops::WHEEL_DROP_LEFT))
    }

    /// Whether the front caster wheel has dropped.
    pub fn read_caster_wheel_drop(&mut self) -> Result<bool, OiError> {
        Ok(self
            .read_bumps_and_wheel_drops()?
            .contains(BumpsWheelDrops::WHEEL_DROP_CASTER))
    }

    /// Whether the robot currently sees a wall on its right side. There is
    /// only one wall sensor.
    pub fn read_wall(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::Wall)
    }

    pub fn read_far_left_cliff(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::CliffFarLeft)
    }

    pub fn read_front_left_cliff(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::CliffFrontLeft)
    }

    pub fn read_front_right_cliff(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::CliffFrontRight)
    }

    pub fn read_far_right_cliff(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::CliffFarRight)
    }

    /// Whether the robot currently sees a virtual wall beacon.
    pub fn read_virtual_wall(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::VirtualWall)
    }

    /// Overcurrent flags for the wheels and low-side drivers.
    pub fn read_overcurrents(&mut self) -> Result<Overcurrents, OiError> {
        let byte = self.sensor_u8(SensorPacket::Overcurrents)?;
        Ok(Overcurrents::from_bits_truncate(byte))
    }

    /// The byte last received from the IR sensor, or
    /// [`ir::REMOTE_NO_BUTTON`](crate::ir::REMOTE_NO_BUTTON) when nothing is
    /// in view.
    pub fn read_ir(&mut self) -> Result<u8, OiError> {
        self.sensor_u8(SensorPacket::IrByte)
    }

    /// The Play and Advance button states.
    pub fn read_buttons(&mut self) -> Result<Buttons, OiError> {
        let byte = self.sensor_u8(SensorPacket::Buttons)?;
        Ok(Buttons::from_bits_truncate(byte))
    }

    /// Millimeters traveled since the last time this was asked.
    pub fn read_distance(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::Distance)
    }

    /// Degrees turned since the last time this was asked; positive to the
    /// right, negative to the left.
    pub fn read_angle(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::Angle)
    }

    /// The battery's charging state.
    pub fn read_charging_state(&mut self) -> Result<ChargingState, OiError> {
        let byte = self.sensor_u8(SensorPacket::ChargingState)?;
        Ok(ChargingState::from_wire(byte)?)
    }

    /// Battery voltage in millivolts.
    pub fn read_battery_voltage(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::Voltage)
    }

    /// Current into (positive) or out of (negative) the battery, in
    /// milliamps.
    pub fn read_battery_current(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::Current)
    }

    /// Battery temperature in degrees Celsius.
    pub fn read_battery_temperature(&mut self) -> Result<i8, OiError> {
        Ok(self.sensor(SensorPacket::BatteryTemperature)?.as_i32() as i8)
    }

    /// Battery charge in milliamp-hours. Not accurate on alkaline packs.
    pub fn read_battery_charge(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::BatteryCharge)
    }

    /// Estimated battery capacity in milliamp-hours. Not accurate on
    /// alkaline packs.
    pub fn read_battery_capacity(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::BatteryCapacity)
    }

    /// Wall-sensor signal strength, nominally 0 to 4095.
    pub fn read_wall_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::WallSignal)
    }

    /// Far-left cliff-sensor signal strength, nominally 0 to 4095.
    pub fn read_far_left_cliff_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::CliffFarLeftSignal)
    }

    pub fn read_front_left_cliff_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::CliffFrontLeftSignal)
    }

    pub fn read_front_right_cliff_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::CliffFrontRightSignal)
    }

    pub fn read_far_right_cliff_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::CliffFarRightSignal)
    }

    /// Digital input pins on the cargo-bay connector.
    pub fn read_cargo_bay_digital_inputs(&mut self) -> Result<CargoBayDigitalInputs, OiError> {
        let byte = self.sensor_u8(SensorPacket::CargoBayDigitalInputs)?;
        Ok(CargoBayDigitalInputs::from_bits_truncate(byte))
    }

    /// The cargo-bay analog pin, a 10-bit reading.
    pub fn read_cargo_bay_analog_signal(&mut self) -> Result<u16, OiError> {
        self.sensor_u16(SensorPacket::CargoBayAnalogSignal)
    }

    /// Charge sources the robot can currently see.
    pub fn read_charging_sources(&mut self) -> Result<ChargingSources, OiError> {
        let byte = self.sensor_u8(SensorPacket::ChargingSourcesAvailable)?;
        Ok(ChargingSources::from_bits_truncate(byte))
    }

    /// The mode the robot itself reports. This is the ground truth the
    /// optimistic tracked mode lacks, so the tracked mode is refreshed from
    /// the reply.
    pub fn read_oi_mode(&mut self) -> Result<Mode, OiError> {
        let byte = self.sensor_u8(SensorPacket::OiMode)?;
        let mode = Mode::from_wire(byte)?;
        self.mode = mode;
        Ok(mode)
    }

    /// The number of the currently-selected song, 0 to 15.
    pub fn read_current_song_number(&mut self) -> Result<u8, OiError> {
        self.sensor_u8(SensorPacket::SongNumber)
    }

    /// Whether a song is currently playing.
    pub fn read_is_song_playing(&mut self) -> Result<bool, OiError> {
        self.sensor_bool(SensorPacket::SongPlaying)
    }

    /// The last-requested drive speed, -500 to 500 mm/s.
    pub fn read_requested_speed(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::RequestedVelocity)
    }

    /// The last-requested drive radius in mm.
    pub fn read_requested_radius(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::RequestedRadius)
    }

    /// The last-requested right-wheel speed, -500 to 500 mm/s.
    pub fn read_requested_right_speed(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::RequestedRightVelocity)
    }

    /// The last-requested left-wheel speed, -500 to 500 mm/s.
    pub fn read_requested_left_speed(&mut self) -> Result<i16, OiError> {
        self.sensor_i16(SensorPacket::RequestedLeftVelocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RADIUS_SPIN_CLOCKWISE;
    use crate::ir;
    use crate::transport::mock::{MockTransport, Token};

    fn new_robot() -> Robot<MockTransport> {
        Robot::new(MockTransport::new())
    }

    fn robot_with_replies(replies: &[u8]) -> Robot<MockTransport> {
        Robot::new(MockTransport::with_replies(replies))
    }

    #[test]
    fn out_of_range_baud_codes_send_nothing() {
        let mut robot = new_robot();
        assert!(matches!(robot.set_baud(12), Err(OiError::InvalidBaudCode(12))));
        assert!(matches!(robot.set_baud(255), Err(OiError::InvalidBaudCode(255))));
        assert!(robot.into_transport().sent.is_empty());
    }

    #[test]
    fn valid_baud_codes_send_opcode_and_payload_only() {
        for code in 0..=11u8 {
            let mut robot = new_robot();
            robot.set_baud(code).unwrap();
            let transport = robot.into_transport();
            assert_eq!(transport.values(), vec![Token::Byte(129), Token::Byte(code)]);
            assert_eq!(transport.frames(), 1);
        }
    }

    #[test]
    fn led_flags_pack_play_and_advance_bits() {
        let mut robot = new_robot();
        robot.set_leds(true, false, 128, 255).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![
                Token::Byte(139),
                Token::Byte(0b0000_0010),
                Token::Byte(128),
                Token::Byte(255),
            ]
        );

        let mut robot = new_robot();
        robot.set_leds(false, true, 0, 0).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![
                Token::Byte(139),
                Token::Byte(0b0000_1000),
                Token::Byte(0),
                Token::Byte(0),
            ]
        );
    }

    #[test]
    fn songs_interleave_notes_and_durations() {
        let mut robot = new_robot();
        robot.store_song(5, &[60, 62, 64], &[16, 16, 32]).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![
                Token::Byte(140),
                Token::Byte(5),
                Token::Byte(3),
                Token::Byte(60),
                Token::Byte(16),
                Token::Byte(62),
                Token::Byte(16),
                Token::Byte(64),
                Token::Byte(32),
            ]
        );
    }

    #[test]
    fn mismatched_song_slices_send_nothing() {
        let mut robot = new_robot();
        let result = robot.store_song(0, &[60, 62], &[16]);
        assert!(matches!(
            result,
            Err(OiError::SongLengthMismatch { notes: 2, durations: 1 })
        ));
        assert!(robot.into_transport().sent.is_empty());
    }

    #[test]
    fn passive_mode_is_the_demo_abort_command() {
        let mut via_passive = new_robot();
        via_passive.passive_mode().unwrap();

        let mut via_demo = new_robot();
        via_demo.play_demo(Demo::Abort).unwrap();

        assert_eq!(
            via_passive.into_transport().sent,
            via_demo.into_transport().sent
        );
    }

    #[test]
    fn drive_sends_speed_then_radius_as_signed_words() {
        let mut robot = new_robot();
        robot.drive(500, RADIUS_SPIN_CLOCKWISE).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![Token::Byte(137), Token::Word(0x01f4), Token::Word(0xffff)]
        );
    }

    #[test]
    fn stop_driving_is_direct_drive_at_zero() {
        let mut stopped = new_robot();
        stopped.stop_driving().unwrap();
        assert_eq!(
            stopped.into_transport().values(),
            vec![Token::Byte(145), Token::Word(0), Token::Word(0)]
        );

        let mut explicit = new_robot();
        explicit.direct_drive(0, 0).unwrap();
        let mut stopped_again = new_robot();
        stopped_again.stop_driving().unwrap();
        assert_eq!(
            explicit.into_transport().sent,
            stopped_again.into_transport().sent
        );
    }

    #[test]
    fn digital_outputs_pack_three_pins() {
        let mut robot = new_robot();
        robot.digital_outputs(true, false, true).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![Token::Byte(147), Token::Byte(0b101)]
        );
    }

    #[test]
    fn send_ir_carries_the_raw_byte() {
        let mut robot = new_robot();
        robot.send_ir(ir::REMOTE_FORWARD).unwrap();
        assert_eq!(
            robot.into_transport().values(),
            vec![Token::Byte(151), Token::Byte(130)]
        );
    }

    #[test]
    fn every_sensor_request_has_the_same_shape() {
        let mut robot = robot_with_replies(&[0]);
        robot.read_wall().unwrap();
        let transport = robot.into_transport();
        assert_eq!(transport.values(), vec![Token::Byte(142), Token::Byte(8)]);
        assert_eq!(transport.frames(), 1);

        let mut robot = robot_with_replies(&[0, 0]);
        robot.read_distance().unwrap();
        let transport = robot.into_transport();
        assert_eq!(transport.values(), vec![Token::Byte(142), Token::Byte(19)]);
        assert_eq!(transport.frames(), 1);

        let mut robot = robot_with_replies(&[0, 0]);
        robot.read_battery_voltage().unwrap();
        let transport = robot.into_transport();
        assert_eq!(transport.values(), vec![Token::Byte(142), Token::Byte(22)]);
        assert_eq!(transport.frames(), 1);
    }

    #[test]
    fn each_bump_query_reissues_the_exchange() {
        let mut robot = robot_with_replies(&[0b0001_1111; 5]);
        assert!(robot.read_right_bumper().unwrap());
        assert!(robot.read_left_bumper().unwrap());
        assert!(robot.read_right_wheel_drop().unwrap());
        assert!(robot.read_left_wheel_drop().unwrap());
        assert!(robot.read_caster_wheel_drop().unwrap());

        let transport = robot.into_transport();
        assert_eq!(transport.frames(), 5);
        assert!(transport.replies.is_empty());
    }

    #[test]
    fn a_clear_bump_byte_reads_all_false() {
        let mut robot = robot_with_replies(&[0; 5]);
        assert!(!robot.read_right_bumper().unwrap());
        assert!(!robot.read_left_bumper().unwrap());
        assert!(!robot.read_right_wheel_drop().unwrap());
        assert!(!robot.read_left_wheel_drop().unwrap());
        assert!(!robot.read_caster_wheel_drop().unwrap());
    }

    #[test]
    fn button_byte_decodes_both_buttons() {
        let mut robot = robot_with_replies(&[0b101]);
        let buttons = robot.read_buttons().unwrap();
        assert!(buttons.contains(Buttons::PLAY));
        assert!(buttons.contains(Buttons::ADVANCE));
    }

    #[test]
    fn mode_tracking_follows_issued_commands() {
        let mut robot = new_robot();
        assert_eq!(robot.mode(), Mode::Off);

        robot.start().unwrap();
        assert_eq!(robot.mode(), Mode::Passive);

        robot.full_mode().unwrap();
        assert_eq!(robot.mode(), Mode::Full);

        robot.safe_mode().unwrap();
        assert_eq!(robot.mode(), Mode::Safe);

        robot.passive_mode().unwrap();
        assert_eq!(robot.mode(), Mode::Passive);

        robot.power_off().unwrap();
        assert_eq!(robot.mode(), Mode::Off);
    }

    #[test]
    fn power_on_pulses_the_rail_then_opens_the_session() {
        let mut robot = new_robot();
        robot.power_on().unwrap();
        assert_eq!(robot.mode(), Mode::Passive);

        let transport = robot.into_transport();
        assert!(transport.powered);
        assert_eq!(transport.waited_ms, 500);
        assert_eq!(transport.values(), vec![Token::Byte(128)]);
    }

    #[test]
    fn power_on_skips_the_rail_when_already_on() {
        let mut transport = MockTransport::new();
        transport.powered = true;
        let mut robot = Robot::new(transport);
        robot.power_on().unwrap();

        let transport = robot.into_transport();
        assert_eq!(transport.waited_ms, 0);
        assert_eq!(transport.values(), vec![Token::Byte(128)]);
    }

    #[test]
    fn oi_mode_reply_refreshes_the_tracked_mode() {
        let mut robot = robot_with_replies(&[2]);
        assert_eq!(robot.read_oi_mode().unwrap(), Mode::Safe);
        assert_eq!(robot.mode(), Mode::Safe);
    }

    #[test]
    fn out_of_band_mode_bytes_are_rejected() {
        let mut robot = robot_with_replies(&[7]);
        assert!(matches!(
            robot.read_oi_mode(),
            Err(OiError::Decode(DecodeError::UnexpectedValue { value: 7, .. }))
        ));
    }

    #[test]
    fn charging_state_reply_decodes_or_rejects() {
        let mut robot = robot_with_replies(&[4]);
        assert_eq!(robot.read_charging_state().unwrap(), ChargingState::Waiting);

        let mut robot = robot_with_replies(&[9]);
        assert!(matches!(
            robot.read_charging_state(),
            Err(OiError::Decode(DecodeError::UnexpectedValue { value: 9, .. }))
        ));
    }

    #[test]
    fn battery_temperature_is_signed() {
        let mut robot = robot_with_replies(&[0xf6]);
        assert_eq!(robot.read_battery_temperature().unwrap(), -10);
    }

    #[test]
    fn a_short_reply_surfaces_exhaustion() {
        let mut robot = robot_with_replies(&[0x01]);
        assert!(matches!(
            robot.read_distance(),
            Err(OiError::Decode(DecodeError::Transport(
                TransportError::UnexpectedEnd
            )))
        ));
    }

    #[test]
    fn power_status_comes_from_the_transport() {
        let mut robot = new_robot();
        assert!(!robot.robot_power_status().unwrap());

        let mut transport = MockTransport::new();
        transport.powered = true;
        let mut robot = Robot::new(transport);
        assert!(robot.robot_power_status().unwrap());
    }
}
