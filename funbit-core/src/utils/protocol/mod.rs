//! Wire protocol for the expansion board's command processor.
//!
//! - `frame`: fixed-length command frames and the selector enums they address

pub mod frame;

pub use frame::*;
