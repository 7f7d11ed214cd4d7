use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTrans};
use funbit_core::utils::{
    platform::{Pull, PullMode, PulseCapture, PulseLevel, PULSE_TIMEOUT},
    sensors::{LineColor, LineTracker, PingUnit, Side, Ultrasonic},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Pull(Pull),
    Low,
    High,
    DelayUs(u32),
    Capture(PulseLevel, u32),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct TrigPin(Log);

impl ErrorType for TrigPin {
    type Error = Infallible;
}

impl OutputPin for TrigPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(Event::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(Event::High);
        Ok(())
    }
}

impl PullMode for TrigPin {
    fn set_pull(&mut self, pull: Pull) {
        self.0.borrow_mut().push(Event::Pull(pull));
    }
}

/// Echo simulator: answers with a fixed pulse width, or times out when the
/// width exceeds the requested timeout.
struct EchoPin {
    log: Log,
    width_us: u32,
}

impl PulseCapture for EchoPin {
    fn pulse_in(
        &mut self,
        level: PulseLevel,
        timeout_us: u32,
    ) -> u32 {
        self.log.borrow_mut().push(Event::Capture(level, timeout_us));
        if self.width_us > timeout_us {
            PULSE_TIMEOUT
        } else {
            self.width_us
        }
    }
}

struct RecordingDelay(Log);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(Event::DelayUs(us));
    }
}

fn ranger(width_us: u32) -> (Ultrasonic<TrigPin, EchoPin, RecordingDelay>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sonar = Ultrasonic::new(
        TrigPin(log.clone()),
        EchoPin {
            log: log.clone(),
            width_us,
        },
        RecordingDelay(log.clone()),
    );
    (sonar, log)
}

#[test]
fn ping_converts_echo_width() {
    let (mut sonar, _) = ranger(580);
    assert_eq!(sonar.ping(PingUnit::Centimeters), 10);
    assert_eq!(sonar.ping(PingUnit::Inches), 3);
    assert_eq!(sonar.ping(PingUnit::MicroSeconds), 580);
}

#[test]
fn ping_truncates() {
    let (mut sonar, _) = ranger(1_000);
    assert_eq!(sonar.ping(PingUnit::Centimeters), 17);
    assert_eq!(sonar.ping(PingUnit::Inches), 6);
}

#[test]
fn trigger_pulse_shape_and_timeout() {
    let (mut sonar, log) = ranger(580);
    sonar.measure_distance(PingUnit::Centimeters, 200);

    assert_eq!(
        *log.borrow(),
        vec![
            Event::Pull(Pull::None),
            Event::Low,
            Event::DelayUs(2),
            Event::High,
            Event::DelayUs(10),
            Event::Low,
            Event::Capture(PulseLevel::High, 200 * 58),
        ]
    );
}

#[test]
fn default_range_is_500_cm() {
    let (mut sonar, log) = ranger(580);
    sonar.ping(PingUnit::MicroSeconds);
    assert_eq!(
        log.borrow().last(),
        Some(&Event::Capture(PulseLevel::High, 29_000))
    );
}

#[test]
fn timeout_passes_sentinel_through() {
    let (mut sonar, _) = ranger(40_000);
    assert_eq!(sonar.measure_distance(PingUnit::MicroSeconds, 100), PULSE_TIMEOUT);
    assert_eq!(sonar.measure_distance(PingUnit::Centimeters, 100), 0);
}

/// Line sensor backed by the digital mock; counts pull reconfigurations.
struct Sensor {
    pin: PinMock,
    pulls: Rc<RefCell<Vec<Pull>>>,
}

impl ErrorType for Sensor {
    type Error = <PinMock as ErrorType>::Error;
}

impl InputPin for Sensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl PullMode for Sensor {
    fn set_pull(&mut self, pull: Pull) {
        self.pulls.borrow_mut().push(pull);
    }
}

fn tracker(
    left: &[PinTrans],
    right: &[PinTrans],
) -> (LineTracker<Sensor, Sensor>, Rc<RefCell<Vec<Pull>>>) {
    let pulls = Rc::new(RefCell::new(Vec::new()));
    let tracker = LineTracker::new(
        Sensor {
            pin: PinMock::new(left),
            pulls: pulls.clone(),
        },
        Sensor {
            pin: PinMock::new(right),
            pulls: pulls.clone(),
        },
    );
    (tracker, pulls)
}

#[test]
fn left_sensor_matches_black() {
    let (mut tracker, _) = tracker(
        &[PinTrans::get(State::High), PinTrans::get(State::Low)],
        &[],
    );
    assert!(tracker.is_line(Side::Left, LineColor::Black));
    assert!(!tracker.is_line(Side::Left, LineColor::Black));

    let (mut left, mut right) = tracker.release();
    left.pin.done();
    right.pin.done();
}

#[test]
fn right_sensor_matches_white() {
    let (mut tracker, pulls) = tracker(
        &[],
        &[PinTrans::get(State::Low), PinTrans::get(State::High)],
    );
    assert!(tracker.is_line(Side::Right, LineColor::White));
    assert!(!tracker.is_line(Side::Right, LineColor::White));

    // both pins reconfigured on each call
    assert_eq!(*pulls.borrow(), vec![Pull::None; 4]);

    let (mut left, mut right) = tracker.release();
    left.pin.done();
    right.pin.done();
}
