//! Interactive console session: type operations, watch the command lines they
//! become on stdout. Runs against the text transport, so it needs no robot.

use std::io;

use create_oi::command::{Demo, RADIUS_STRAIGHT};
use create_oi::ir;
use create_oi::robot::{OiError, Robot};
use create_oi::transport::console::TextTransport;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

type ConsoleRobot = Robot<TextTransport<io::Empty, io::Stdout>>;

fn main() {
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    let mut robot = Robot::new(TextTransport::new(io::empty(), io::stdout()));
    let mut editor = DefaultEditor::new().unwrap();

    println!("operations: start | safe | full | passive | demo <cover|dock|spot|abort>");
    println!("            drive <speed> [radius] | stop | leds <play> <advance> <color> <brightness>");
    println!("            outputs <p0> <p1> <p2> | ir [byte] | song | quit");

    loop {
        match editor.readline("oi> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" {
                    break;
                }
                editor.add_history_entry(&line).ok();
                if let Err(error) = dispatch(&mut robot, &line) {
                    eprintln!("error: {error}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("error: {error}");
                break;
            }
        }
    }
}

fn dispatch(robot: &mut ConsoleRobot, line: &str) -> Result<(), OiError> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("start") => robot.start(),
        Some("safe") => robot.safe_mode(),
        Some("full") => robot.full_mode(),
        Some("passive") => robot.passive_mode(),
        Some("stop") => robot.stop_driving(),
        Some("demo") => {
            let demo = match parts.next() {
                Some("cover") => Demo::Cover,
                Some("dock") => Demo::CoverAndDock,
                Some("spot") => Demo::Spot,
                _ => Demo::Abort,
            };
            robot.play_demo(demo)
        }
        Some("drive") => {
            let speed = parts.next().and_then(|s| s.parse().ok()).unwrap_or(200);
            let radius = parts
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(RADIUS_STRAIGHT);
            robot.drive(speed, radius)
        }
        Some("leds") => {
            let mut flag = || {
                parts
                    .next()
                    .map(|s| s == "on" || s == "1")
                    .unwrap_or(false)
            };
            let play = flag();
            let advance = flag();
            let color = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            let brightness = parts.next().and_then(|s| s.parse().ok()).unwrap_or(255);
            robot.set_leds(play, advance, color, brightness)
        }
        Some("outputs") => {
            let mut pin = || {
                parts
                    .next()
                    .map(|s| s == "on" || s == "1")
                    .unwrap_or(false)
            };
            let pin0 = pin();
            let pin1 = pin();
            let pin2 = pin();
            robot.digital_outputs(pin0, pin1, pin2)
        }
        Some("ir") => {
            let byte = parts
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(ir::REMOTE_FORWARD);
            robot.send_ir(byte)
        }
        Some("song") => {
            robot.store_song(0, &[60, 64, 67, 72], &[16, 16, 16, 32])?;
            robot.play_song(0)
        }
        Some(other) => {
            eprintln!("unknown operation {other:?}");
            Ok(())
        }
        None => Ok(()),
    }
}
