//! Host-provided primitives that `embedded-hal` does not cover.
//!
//! Bus writes, digital I/O and microsecond delays come from `embedded-hal`
//! directly. Pull configuration, pulse capture and the raw IR decoder are
//! HAL-specific, so the drivers reach them through these traits.

/// Pull resistor setting for a GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Reconfigure a pin's pull resistor at runtime.
pub trait PullMode {
    fn set_pull(&mut self, pull: Pull);
}

/// Level of the pulse a capture waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseLevel {
    Low,
    High,
}

/// Returned by [`PulseCapture::pulse_in`] when no complete pulse arrived in time.
pub const PULSE_TIMEOUT: u32 = 0;

/// Blocking pulse-width measurement on an input pin.
pub trait PulseCapture {
    /// Wait for a pulse of `level` and return its width in microseconds.
    ///
    /// Gives up after `timeout_us` and returns [`PULSE_TIMEOUT`].
    fn pulse_in(
        &mut self,
        level: PulseLevel,
        timeout_us: u32,
    ) -> u32;
}

/// Decoded output of the infrared receiver front end.
pub trait IrFrontEnd {
    /// Last received 16-bit code, `0` if nothing was ever received.
    fn last_code(&mut self) -> u16;
}

impl<T: PullMode + ?Sized> PullMode for &mut T {
    fn set_pull(&mut self, pull: Pull) {
        (**self).set_pull(pull)
    }
}

impl<T: PulseCapture + ?Sized> PulseCapture for &mut T {
    fn pulse_in(
        &mut self,
        level: PulseLevel,
        timeout_us: u32,
    ) -> u32 {
        (**self).pulse_in(level, timeout_us)
    }
}

impl<T: IrFrontEnd + ?Sized> IrFrontEnd for &mut T {
    fn last_code(&mut self) -> u16 {
        (**self).last_code()
    }
}
