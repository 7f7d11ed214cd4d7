//! Fixed-length command frames written to the board over I2C.
//!
//! Every frame starts with a command-kind byte followed by kind-specific
//! fields. Frames are never length-prefixed and carry no checksum; the bus
//! address is the only addressing. Parameter ranges (speed, degree, steps)
//! are documented but never clamped here, the board firmware validates them.

use serde::{Deserialize, Serialize};
use smart_leds_trait::RGB8;

/// Longest frame the board accepts (stepper commands).
pub const MAX_FRAME_LEN: usize = 6;

/// Selector value addressing every actuator of a kind (stop commands only).
pub const TARGET_ALL: u8 = 0xFF;
/// Direction/field value meaning "stop".
pub const CMD_STOP: u8 = 0x00;

/// Constant frame the legacy board emits for any motor run command.
pub const LEGACY_MOTOR_FRAME: [u8; 4] = [0x00, 0x01, 0x01, 0xFF];

/// Command-kind discriminant in byte 0 of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    Motor = 0x10,
    Servo = 0x11,
    RgbLed = 0x12,
    Stepper = 0x19,
    /// Opcode 0x00 of the legacy board's constant motor frame.
    Legacy = 0x00,
}

impl CommandKind {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(Self::Motor),
            0x11 => Some(Self::Servo),
            0x12 => Some(Self::RgbLed),
            0x19 => Some(Self::Stepper),
            0x00 => Some(Self::Legacy),
            _ => None,
        }
    }
}

/// DC motor outputs M1..M4.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Motor {
    M1 = 0x1,
    M2 = 0x2,
    M3 = 0x3,
    M4 = 0x4,
}

/// Servo outputs S1..S8.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Servo {
    S1 = 0x1,
    S2 = 0x2,
    S3 = 0x3,
    S4 = 0x4,
    S5 = 0x5,
    S6 = 0x6,
    S7 = 0x7,
    S8 = 0x8,
}

/// 28BYJ-48 stepper outputs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stepper {
    B1 = 0x1,
    B2 = 0x2,
}

/// Rotation direction for motors and steppers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Dir {
    Forward = 0x1,
    Backward = 0x2,
}

/// RGB LED behaviour.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LedMode {
    On = 0x1,
    Blinking = 0x2,
}

/// Either one actuator or all of them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Select<T> {
    One(T),
    All,
}

impl Select<Motor> {
    pub const fn byte(self) -> u8 {
        match self {
            Select::One(m) => m as u8,
            Select::All => TARGET_ALL,
        }
    }
}

impl Select<Stepper> {
    pub const fn byte(self) -> u8 {
        match self {
            Select::One(s) => s as u8,
            Select::All => TARGET_ALL,
        }
    }
}

/// One encoded command, ready to be written to the bus as-is.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_LEN],
    len: u8,
}

impl Frame {
    const fn from_parts<const N: usize>(bytes: [u8; N]) -> Self {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let mut i = 0;
        while i < N {
            buf[i] = bytes[i];
            i += 1;
        }
        Frame { buf, len: N as u8 }
    }

    /// `[0x10, motor, dir, speed]`
    pub const fn motor_run(motor: Motor, dir: Dir, speed: u8) -> Self {
        Self::from_parts([CommandKind::Motor as u8, motor as u8, dir as u8, speed])
    }

    /// `[0x10, target, 0, 0]`
    pub const fn motor_stop(target: Select<Motor>) -> Self {
        Self::from_parts([CommandKind::Motor as u8, target.byte(), CMD_STOP, 0x00])
    }

    /// `[0x00, 0x01, 0x01, 0xFF]`, whatever the motor arguments were.
    pub const fn legacy_motor_run() -> Self {
        Self::from_parts(LEGACY_MOTOR_FRAME)
    }

    /// `[0x11, servo, degree, 0]`
    pub const fn servo(servo: Servo, degree: u8) -> Self {
        Self::from_parts([CommandKind::Servo as u8, servo as u8, degree, 0x00])
    }

    /// `[0x12, r, g, b, mode]`
    pub const fn rgb_led(color: RGB8, mode: LedMode) -> Self {
        Self::from_parts([
            CommandKind::RgbLed as u8,
            color.r,
            color.g,
            color.b,
            mode as u8,
        ])
    }

    /// `[0x12, 0, 0, 0, 0]`
    pub const fn rgb_led_off() -> Self {
        Self::from_parts([CommandKind::RgbLed as u8, 0, 0, 0, 0])
    }

    /// `[0x19, stepper, dir, speed, steps_hi, steps_lo]`
    pub const fn stepper_run(stepper: Stepper, dir: Dir, speed: u8, steps: u16) -> Self {
        Self::from_parts([
            CommandKind::Stepper as u8,
            stepper as u8,
            dir as u8,
            speed,
            (steps / 256) as u8,
            (steps & 0xFF) as u8,
        ])
    }

    /// `[0x19, target, 0, 0, 0, 0]`
    pub const fn stepper_stop(target: Select<Stepper>) -> Self {
        Self::from_parts([CommandKind::Stepper as u8, target.byte(), 0, 0, 0, 0])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_byte(self.buf[0])
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame({:02X?})", self.as_bytes())
    }
}
