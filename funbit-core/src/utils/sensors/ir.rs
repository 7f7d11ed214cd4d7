//! Infrared remote receiver.
//!
//! A background task polls the IR front end every 20 ms, latches the last
//! code it read and publishes an [`IrEvent`] for every code that is not the
//! idle/repeat sentinel. Handlers subscribe to the event channel and then ask
//! [`IrReceiver::is_button_pressed`] which key the latched code belongs to.
//!
//! # Example
//! ```rust,ignore
//! #[embassy_executor::task]
//! async fn ir_poll(front: MyFrontEnd) {
//!     IR_RECEIVER.run(front).await
//! }
//!
//! #[embassy_executor::task]
//! async fn ir_handler() -> ! {
//!     let sub = IR_RECEIVER.subscribe().unwrap();
//!     dispatch(sub, |_| {
//!         if IR_RECEIVER.is_button_pressed(Button::Ok) {
//!             // ...
//!         }
//!     })
//!     .await
//! }
//! ```

use core::cell::Cell;

use embassy_sync::{
    blocking_mutex::{
        raw::{CriticalSectionRawMutex, RawMutex},
        Mutex,
    },
    pubsub::{Error as PubSubError, PubSubChannel, Subscriber},
};
use embassy_time::{Duration, Timer};
use serde::{Deserialize, Serialize};

use crate::utils::platform::IrFrontEnd;

/// Code the front end reports when no new key was decoded.
pub const IR_IDLE: u16 = 0xFF00;
/// Delay between two reads of the front end.
pub const POLL_PERIOD: Duration = Duration::from_millis(20);
/// Maximum number of concurrent event subscribers.
pub const MAX_HANDLERS: usize = 4;

/// Receiver shared by the poll task and the application.
pub static IR_RECEIVER: IrReceiver<CriticalSectionRawMutex> = IrReceiver::new();

/// Keys of the kit's remote control and their one-byte codes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Button {
    Menu = 2,
    Plus = 4,
    Up = 5,
    Back = 6,
    Left = 8,
    Ok = 9,
    Right = 10,
    Minus = 12,
    Down = 13,
    Num0 = 14,
    Num1 = 16,
    Num2 = 17,
    Num3 = 18,
    Num4 = 20,
    Num5 = 21,
    Num6 = 22,
    Num7 = 24,
    Num8 = 25,
    Num9 = 26,
}

impl Button {
    pub const ALL: [Button; 19] = [
        Button::Menu,
        Button::Plus,
        Button::Up,
        Button::Back,
        Button::Left,
        Button::Ok,
        Button::Right,
        Button::Minus,
        Button::Down,
        Button::Num0,
        Button::Num1,
        Button::Num2,
        Button::Num3,
        Button::Num4,
        Button::Num5,
        Button::Num6,
        Button::Num7,
        Button::Num8,
        Button::Num9,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.code() == code)
    }
}

/// Raised once per poll that read something other than [`IR_IDLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrEvent {
    pub code: u16,
}

impl IrEvent {
    pub fn button(&self) -> Option<Button> {
        Button::from_code((self.code & 0xFF) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Armed,
    Stopping,
}

pub type IrEvents<M> = PubSubChannel<M, IrEvent, 1, MAX_HANDLERS, 1>;
pub type IrSubscriber<'a, M> = Subscriber<'a, M, IrEvent, 1, MAX_HANDLERS, 1>;

/// Latched IR code plus the single-slot event channel fed by the poll loop.
pub struct IrReceiver<M: RawMutex> {
    latch: Mutex<M, Cell<u16>>,
    state: Mutex<M, Cell<State>>,
    events: IrEvents<M>,
}

impl<M: RawMutex> IrReceiver<M> {
    pub const fn new() -> Self {
        Self {
            latch: Mutex::new(Cell::new(0)),
            state: Mutex::new(Cell::new(State::Idle)),
            events: PubSubChannel::new(),
        }
    }

    /// Register a handler; it sees events published after this call.
    pub fn subscribe(&self) -> Result<IrSubscriber<'_, M>, PubSubError> {
        self.events.subscriber()
    }

    /// One poll cycle: read, latch, publish unless idle.
    pub fn poll_once<F: IrFrontEnd>(
        &self,
        front_end: &mut F,
    ) -> Option<IrEvent> {
        let code = front_end.last_code();
        self.latch.lock(|latch| latch.set(code));

        if code == IR_IDLE {
            return None;
        }

        let event = IrEvent { code };
        tracing::debug!(code, button = ?event.button(), "IR code received");
        self.events.immediate_publisher().publish_immediate(event);
        Some(event)
    }

    /// Arm the receiver and poll `front_end` until [`IrReceiver::stop`] is called.
    ///
    /// Returns at once if another loop is already armed or still stopping.
    pub async fn run<F: IrFrontEnd>(
        &self,
        mut front_end: F,
    ) {
        let armed = self.state.lock(|s| {
            if s.get() == State::Idle {
                s.set(State::Armed);
                true
            } else {
                false
            }
        });
        if !armed {
            tracing::warn!("IR receiver already running");
            return;
        }
        tracing::info!("IR receiver armed");

        while self.state.lock(|s| s.get()) == State::Armed {
            self.poll_once(&mut front_end);
            Timer::after(POLL_PERIOD).await;
        }

        self.state.lock(|s| s.set(State::Idle));
        tracing::info!("IR receiver stopped");
    }

    /// Ask a running poll loop to exit after its current cycle.
    pub fn stop(&self) {
        self.state.lock(|s| {
            if s.get() == State::Armed {
                s.set(State::Stopping);
            }
        });
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock(|s| s.get()) == State::Armed
    }

    /// Raw latched code (`0` before the first poll).
    pub fn latched(&self) -> u16 {
        self.latch.lock(|latch| latch.get())
    }

    /// Whether the low byte of the latched code is `button`'s code.
    pub fn is_button_pressed(
        &self,
        button: Button,
    ) -> bool {
        (self.latched() & 0xFF) as u8 == button.code()
    }
}

impl<M: RawMutex> Default for IrReceiver<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deliver every event seen by `subscriber` to `handler`, in publish order.
///
/// A handler that falls behind skips straight to the newest event.
pub async fn dispatch<M, H>(
    mut subscriber: IrSubscriber<'_, M>,
    mut handler: H,
) -> !
where
    M: RawMutex,
    H: FnMut(IrEvent),
{
    loop {
        let event = subscriber.next_message_pure().await;
        handler(event);
    }
}
