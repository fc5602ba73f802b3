use create_oi::command::{RADIUS_SPIN_COUNTERCLOCKWISE, RADIUS_STRAIGHT};
use create_oi::robot::{OiError, Robot};
use create_oi::transport::serial::SerialTransport;
use log::info;

fn main() -> Result<(), OiError> {
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let mut robot = Robot::new(SerialTransport::open(&port)?);
    robot.start()?;
    robot.safe_mode()?;

    info!("battery at {} mV", robot.read_battery_voltage()?);
    info!("driving a square");

    for leg in 1..=4 {
        robot.drive(200, RADIUS_STRAIGHT)?;
        robot.wait_ms(3000);
        robot.stop_driving()?;

        // Quarter turn in place, then let the wheels settle.
        robot.drive(100, RADIUS_SPIN_COUNTERCLOCKWISE)?;
        robot.wait_ms(2000);
        robot.stop_driving()?;

        info!("leg {leg} done, turned {} degrees", robot.read_angle()?);

        if robot.read_left_bumper()? || robot.read_right_bumper()? {
            info!("bumped into something, giving up");
            break;
        }
    }

    robot.passive_mode()?;
    Ok(())
}
