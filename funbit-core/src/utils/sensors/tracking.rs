//! Line-tracking sensor pair.
//!
//! Each sensor reads low over a white (reflective) surface and high over a
//! black one.

use embedded_hal::digital::InputPin;
use serde::{Deserialize, Serialize};

use crate::utils::platform::{Pull, PullMode};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Line colour and the pin level it reads as.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LineColor {
    White = 0,
    Black = 1,
}

pub struct LineTracker<L, R> {
    left: L,
    right: R,
}

impl<L, R> LineTracker<L, R>
where
    L: InputPin + PullMode,
    R: InputPin + PullMode,
{
    pub fn new(
        left: L,
        right: R,
    ) -> Self {
        Self { left, right }
    }

    /// Whether the sensor on `side` currently sees `color`.
    ///
    /// Both pins are set to no-pull on every call. A failed read counts as no
    /// match.
    pub fn is_line(
        &mut self,
        side: Side,
        color: LineColor,
    ) -> bool {
        self.left.set_pull(Pull::None);
        self.right.set_pull(Pull::None);

        let level = match side {
            Side::Left => self.left.is_high().map_err(|e| {
                tracing::warn!("left line sensor read failed: {:?}", e);
            }),
            Side::Right => self.right.is_high().map_err(|e| {
                tracing::warn!("right line sensor read failed: {:?}", e);
            }),
        };

        level.is_ok_and(|high| u8::from(high) == color as u8)
    }

    pub fn release(self) -> (L, R) {
        (self.left, self.right)
    }
}
