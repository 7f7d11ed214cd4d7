//! Board variant configuration.
//!
//! The expansion board ships in several variants that share one command set
//! but differ in bus address, pin wiring and which peripheral blocks are
//! populated. A `BoardConfig` chosen at start-up describes one variant.

use serde::{Deserialize, Serialize};

/// Optional peripheral blocks a variant may carry.
///
/// Motors, servos and the RGB LED are present on every variant.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Stepper,
    Ir,
}

/// How the variant's firmware expects motor run commands.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MotorProtocol {
    /// `[0x10, motor, dir, speed]`
    Standard,
    /// Constant `[0x00, 0x01, 0x01, 0xFF]`; direction and speed are ignored.
    LegacyConstant,
}

/// Capability set of a variant.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub stepper: bool,
    pub ir: bool,
}

impl Capabilities {
    pub const fn has(&self, cap: Capability) -> bool {
        match cap {
            Capability::Stepper => self.stepper,
            Capability::Ir => self.ir,
        }
    }
}

/// Edge-connector pin numbers used by the on-board sensors.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub line_left: u8,
    pub line_right: u8,
    pub ir: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// 7-bit I2C address of the board's command processor.
    pub address: u8,
    pub motor_protocol: MotorProtocol,
    pub capabilities: Capabilities,
    pub pins: PinMap,
}

impl BoardConfig {
    /// Funbit board: motors, servos, RGB LED and line sensors on P13/P14.
    pub const FUNBIT: Self = Self {
        address: 0x10,
        motor_protocol: MotorProtocol::Standard,
        capabilities: Capabilities {
            stepper: false,
            ir: false,
        },
        pins: PinMap {
            line_left: 13,
            line_right: 14,
            ir: None,
        },
    };

    /// Full-feature board: everything the Funbit has plus steppers and IR.
    pub const FULL: Self = Self {
        address: 0x10,
        motor_protocol: MotorProtocol::Standard,
        capabilities: Capabilities {
            stepper: true,
            ir: true,
        },
        pins: PinMap {
            line_left: 13,
            line_right: 14,
            ir: Some(16),
        },
    };

    /// Reduced legacy board at 0x20 with the constant motor frame.
    pub const LEGACY: Self = Self {
        address: 0x20,
        motor_protocol: MotorProtocol::LegacyConstant,
        capabilities: Capabilities {
            stepper: false,
            ir: false,
        },
        pins: PinMap {
            line_left: 13,
            line_right: 14,
            ir: None,
        },
    };

    pub const fn supports(&self, cap: Capability) -> bool {
        self.capabilities.has(cap)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::FUNBIT
    }
}
