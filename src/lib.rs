//! Crate for driving iRobot Create and Roomba robots over the Open Interface (OI)
//! serial protocol. Not affiliated with iRobot Corporation.
//!
//! The crate is structured around three layers. A [`Transport`](transport::Transport)
//! is the byte-level link to the robot: either a binary UART port, or a text console
//! that prints and reads hexadecimal tokens for debugging. A [`Command`](command::Command)
//! is one OI command (an opcode plus its operands in wire order) and knows how to
//! frame itself through any transport. On top of both, [`Robot`](robot::Robot) is the
//! operation surface application code actually calls. Every sensor query on [`Robot`](robot::Robot)
//! is a blocking request/response exchange that returns only once the full reply has
//! been consumed, so the byte stream cannot desynchronize between commands.

pub mod command;
pub mod ir;
pub mod robot;
pub mod sensor;
pub mod transport;
