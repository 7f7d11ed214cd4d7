//! Sensor drivers read directly from edge-connector pins.
//!
//! - `ultrasonic`: HC-SR04 style echo ranging
//! - `tracking`: left/right line-tracking sensors
//! - `ir`: background IR remote receiver and button table

pub mod ir;
pub mod tracking;
pub mod ultrasonic;

pub use ir::{Button, IrEvent, IrReceiver};
pub use tracking::{LineColor, LineTracker, Side};
pub use ultrasonic::{PingUnit, Ultrasonic};
