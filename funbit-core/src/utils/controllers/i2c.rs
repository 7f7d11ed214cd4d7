//! I2C command emitter for the expansion board.
//!
//! This module turns actuator commands into fixed-length frames and writes them
//! to the board's command processor over a shared I2C bus. Commands can also
//! be queued on `BOARD_CHANNEL` for the async controller loop.
//!
//! Writes are fire-and-forget: a failed transfer is logged and otherwise
//! invisible to the caller, and parameter values are sent without clamping.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use serde::{Deserialize, Serialize};
use smart_leds_trait::RGB8;

use crate::utils::{
    board::{BoardConfig, Capability, MotorProtocol},
    protocol::{Dir, Frame, LedMode, Motor, Select, Servo, Stepper},
};

/// Channel used to receive board commands (`BoardCommand` messages).
pub static BOARD_CHANNEL: embassy_sync::channel::Channel<
    CriticalSectionRawMutex,
    BoardCommand,
    16,
> = embassy_sync::channel::Channel::new();

/// Errors that can occur when driving the board.
#[derive(Debug)]
pub enum DeviceError<E: core::fmt::Debug> {
    /// The bus transfer failed (only surfaced by [`I2CBoard::try_write`]).
    Bus(E),
    /// The configured variant has no such peripheral block.
    Unsupported(Capability),
}

/// Board command variants.
///
/// Serialized as JSON with tag `"bc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "bc", rename_all = "snake_case")]
pub enum BoardCommand {
    // Motors
    /// Run a DC motor; `s` is the 0..=255 speed.
    MotorRun { m: Motor, d: Dir, s: u8 },
    /// Stop one motor or all of them.
    MotorStop { m: Select<Motor> },

    // Servos and LED
    /// Move a servo to `deg` (0..=180).
    Servo { s: Servo, deg: u8 },
    /// Light the RGB LED.
    Rgb { r: u8, g: u8, b: u8, mode: LedMode },
    /// Switch the RGB LED off.
    RgbOff,

    // Steppers
    /// Turn a stepper `steps` steps at speed `s` (0..=10).
    StepperRun {
        st: Stepper,
        d: Dir,
        s: u8,
        steps: u16,
    },
    /// Stop one stepper or all of them.
    StepperStop { st: Select<Stepper> },
}

/// High-level driver for the board's command processor on a shared I2C bus.
pub struct I2CBoard<'a, I2C: 'static> {
    dev: RefCellDevice<'a, I2C>,
    config: BoardConfig,
}

impl<'a, I2C, E> I2CBoard<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    /// Create a board driver for the given variant.
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        config: BoardConfig,
    ) -> Self {
        I2CBoard {
            dev: RefCellDevice::new(i2c_bus),
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Write one frame to the board and report the bus result.
    pub fn try_write(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DeviceError<E>> {
        self.dev
            .write(self.config.address, frame.as_bytes())
            .map_err(DeviceError::Bus)
    }

    /// Write one frame to the board, logging and discarding bus errors.
    pub fn emit(
        &mut self,
        frame: Frame,
    ) {
        tracing::trace!(?frame, addr = self.config.address, "emit");
        if let Err(e) = self.try_write(&frame) {
            tracing::warn!("I2C write of {:?} to 0x{:02X} failed: {:?}", frame, self.config.address, e);
        }
    }

    fn require(
        &self,
        cap: Capability,
    ) -> Result<(), DeviceError<E>> {
        if self.config.supports(cap) {
            Ok(())
        } else {
            tracing::warn!(?cap, "command not supported by this board variant");
            Err(DeviceError::Unsupported(cap))
        }
    }

    /// Execute a high-level `BoardCommand`.
    pub fn execute_command(
        &mut self,
        command: BoardCommand,
    ) -> Result<(), DeviceError<E>> {
        match command {
            BoardCommand::MotorRun { m, d, s } => {
                self.motor_run(m, d, s);
                Ok(())
            }
            BoardCommand::MotorStop { m: Select::One(m) } => {
                self.motor_stop(m);
                Ok(())
            }
            BoardCommand::MotorStop { m: Select::All } => {
                self.motor_stop_all();
                Ok(())
            }
            BoardCommand::Servo { s, deg } => {
                self.servo(s, deg);
                Ok(())
            }
            BoardCommand::Rgb { r, g, b, mode } => {
                self.rgb_led(RGB8 { r, g, b }, mode);
                Ok(())
            }
            BoardCommand::RgbOff => {
                self.rgb_led_off();
                Ok(())
            }
            BoardCommand::StepperRun { st, d, s, steps } => self.stepper_run(st, d, s, steps),
            BoardCommand::StepperStop { st: Select::One(st) } => self.stepper_stop(st),
            BoardCommand::StepperStop { st: Select::All } => self.stepper_stop_all(),
        }
    }

    /// Run a motor in `dir` at `speed`.
    ///
    /// On the legacy variant the board only understands a constant frame, so
    /// `motor`, `dir` and `speed` do not reach the wire.
    pub fn motor_run(
        &mut self,
        motor: Motor,
        dir: Dir,
        speed: u8,
    ) {
        let frame = match self.config.motor_protocol {
            MotorProtocol::Standard => Frame::motor_run(motor, dir, speed),
            MotorProtocol::LegacyConstant => {
                tracing::debug!(?motor, ?dir, speed, "legacy board: sending constant motor frame");
                Frame::legacy_motor_run()
            }
        };
        self.emit(frame);
    }

    pub fn motor_stop(
        &mut self,
        motor: Motor,
    ) {
        self.emit(Frame::motor_stop(Select::One(motor)));
    }

    pub fn motor_stop_all(&mut self) {
        self.emit(Frame::motor_stop(Select::All));
    }

    /// Move a servo to `degree`.
    pub fn servo(
        &mut self,
        servo: Servo,
        degree: u8,
    ) {
        self.emit(Frame::servo(servo, degree));
    }

    pub fn rgb_led(
        &mut self,
        color: RGB8,
        mode: LedMode,
    ) {
        self.emit(Frame::rgb_led(color, mode));
    }

    pub fn rgb_led_off(&mut self) {
        self.emit(Frame::rgb_led_off());
    }

    /// Turn a stepper by `steps` steps; the count goes out high byte first.
    pub fn stepper_run(
        &mut self,
        stepper: Stepper,
        dir: Dir,
        speed: u8,
        steps: u16,
    ) -> Result<(), DeviceError<E>> {
        self.require(Capability::Stepper)?;
        self.emit(Frame::stepper_run(stepper, dir, speed, steps));
        Ok(())
    }

    pub fn stepper_stop(
        &mut self,
        stepper: Stepper,
    ) -> Result<(), DeviceError<E>> {
        self.require(Capability::Stepper)?;
        self.emit(Frame::stepper_stop(Select::One(stepper)));
        Ok(())
    }

    pub fn stepper_stop_all(&mut self) -> Result<(), DeviceError<E>> {
        self.require(Capability::Stepper)?;
        self.emit(Frame::stepper_stop(Select::All));
        Ok(())
    }
}
