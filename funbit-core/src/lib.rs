//! Core drivers for the Funbit expansion board on no-std embedded platforms.
//!
//! For a runnable host simulation, see the `funbit-app/mock-board` crate.
#![no_std]

pub mod utils;
