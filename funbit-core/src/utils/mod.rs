//! Utility re-exports and helper macros for the Funbit board.
//!
//! This module re-exports the board configuration, protocol framing, bus
//! controllers and sensor drivers:
//!
//! - `board`: per-variant configuration (address, capabilities, pin map)
//! - `controllers`: I2C command emitter and the async command loop
//! - `platform`: traits for the pin and capture primitives the host provides
//! - `protocol`: fixed-length command frames
//! - `sensors`: ultrasonic ranger, line tracker and IR remote receiver
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod board;
pub mod controllers;
pub mod platform;
pub mod protocol;
pub mod sensors;

pub use board::BoardConfig;
pub use controllers::BoardController;
pub use embassy_time::*;
pub use sensors::ir::IR_RECEIVER;

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
