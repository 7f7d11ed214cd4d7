//! Ultrasonic ranger.
//!
//! Ranging starts with a 10 µs high pulse on the trigger pin; the sensor then
//! holds its echo pin high for the sound's round-trip time. Sound covers one
//! centimetre there and back in about 58 µs (one inch in 148 µs).

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::utils::platform::{Pull, PullMode, PulseCapture, PulseLevel};

/// Round-trip microseconds per centimetre.
pub const US_PER_CM: u32 = 58;
/// Round-trip microseconds per inch.
pub const US_PER_INCH: u32 = 148;
/// Default range limit used to derive the echo timeout.
pub const DEFAULT_MAX_DISTANCE_CM: u32 = 500;

/// Unit of the value returned by [`Ultrasonic::ping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingUnit {
    /// Raw echo width in microseconds.
    MicroSeconds,
    Centimeters,
    Inches,
}

impl PingUnit {
    /// Convert an echo width with truncating division.
    pub const fn convert(self, echo_us: u32) -> u32 {
        match self {
            PingUnit::Centimeters => echo_us / US_PER_CM,
            PingUnit::Inches => echo_us / US_PER_INCH,
            PingUnit::MicroSeconds => echo_us,
        }
    }
}

/// Trigger/echo pin pair plus a microsecond delay.
pub struct Ultrasonic<Trig, Echo, D> {
    trig: Trig,
    echo: Echo,
    delay: D,
}

impl<Trig, Echo, D> Ultrasonic<Trig, Echo, D>
where
    Trig: OutputPin + PullMode,
    Echo: PulseCapture,
    D: DelayNs,
{
    pub fn new(
        trig: Trig,
        echo: Echo,
        delay: D,
    ) -> Self {
        Self { trig, echo, delay }
    }

    /// Measure once with the default 500 cm range.
    pub fn ping(
        &mut self,
        unit: PingUnit,
    ) -> u32 {
        self.measure_distance(unit, DEFAULT_MAX_DISTANCE_CM)
    }

    /// Send a trigger pulse and time the echo.
    ///
    /// Blocks for at most `max_distance_cm * 58` µs. A missing echo comes back
    /// as the capture primitive's timeout value, converted like any other
    /// reading.
    pub fn measure_distance(
        &mut self,
        unit: PingUnit,
        max_distance_cm: u32,
    ) -> u32 {
        self.trigger();

        let timeout_us = max_distance_cm.saturating_mul(US_PER_CM);
        let echo_us = self.echo.pulse_in(PulseLevel::High, timeout_us);
        tracing::trace!(echo_us, timeout_us, "echo captured");

        unit.convert(echo_us)
    }

    fn trigger(&mut self) {
        self.trig.set_pull(Pull::None);
        if self.trig.set_low().is_err() {
            tracing::warn!("trigger pin write failed");
        }
        self.delay.delay_us(2);
        if self.trig.set_high().is_err() {
            tracing::warn!("trigger pin write failed");
        }
        self.delay.delay_us(10);
        if self.trig.set_low().is_err() {
            tracing::warn!("trigger pin write failed");
        }
    }

    /// Release the pins and delay.
    pub fn release(self) -> (Trig, Echo, D) {
        (self.trig, self.echo, self.delay)
    }
}
