use clap::{Parser, ValueEnum};
use core::cell::RefCell;
use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration, Timer};
use embedded_hal::{
    digital::{ErrorType, InputPin, OutputPin},
    i2c::{self, I2c, Operation, SevenBitAddress},
};
use funbit_core::mk_static;
use funbit_core::utils::{
    BoardConfig, BoardController, IR_RECEIVER,
    board::Capability,
    controllers::{BOARD_CHANNEL, BoardCommand},
    platform::{IrFrontEnd, Pull, PullMode, PulseCapture, PulseLevel, PULSE_TIMEOUT},
    protocol::{Dir, LedMode, Motor, Select},
    sensors::{
        Button, IrEvent, LineColor, LineTracker, PingUnit, Side, Ultrasonic,
        ir::{IR_IDLE, IrSubscriber, dispatch},
    },
};
use static_cell::StaticCell;
use std::convert::Infallible;
use tracing::{error, info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Funbit,
    Full,
    Legacy,
}

impl From<Variant> for BoardConfig {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Funbit => BoardConfig::FUNBIT,
            Variant::Full => BoardConfig::FULL,
            Variant::Legacy => BoardConfig::LEGACY,
        }
    }
}

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// Board variant to simulate
    #[clap(long, value_enum, default_value = "full")]
    board: Variant,
    /// JSON-lines file of board commands to send at start-up
    #[clap(long)]
    commands: Option<std::path::PathBuf>,
    /// IR codes the remote front end reports, one per 20 ms poll (hex)
    #[clap(long, value_delimiter = ',', default_value = "ff00,0009,ff00,0005,ff00")]
    ir_codes: Vec<String>,
    /// Simulated ultrasonic echo width in microseconds
    #[clap(long, default_value_t = 580)]
    echo_us: u32,
    /// Level read by the left line sensor
    #[clap(long, default_value_t = 1)]
    left_level: u8,
    /// Level read by the right line sensor
    #[clap(long, default_value_t = 0)]
    right_level: u8,
    /// Stop after this many milliseconds (runs forever if absent)
    #[clap(long)]
    run_ms: Option<u64>,
}

/// I2C bus that logs every frame instead of driving hardware.
struct LoggingBus;

impl i2c::ErrorType for LoggingBus {
    type Error = Infallible;
}

impl I2c<SevenBitAddress> for LoggingBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => info!("I2C 0x{:02X} <- {:02X?}", address, bytes),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// Trigger pin that only logs.
struct SimTrigger;

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl PullMode for SimTrigger {
    fn set_pull(&mut self, _pull: Pull) {}
}

/// Echo pin reporting a fixed pulse width.
struct SimEcho(u32);

impl PulseCapture for SimEcho {
    fn pulse_in(
        &mut self,
        _level: PulseLevel,
        timeout_us: u32,
    ) -> u32 {
        if self.0 > timeout_us { PULSE_TIMEOUT } else { self.0 }
    }
}

/// Line sensor stuck at one level.
struct SimSensor(bool);

impl ErrorType for SimSensor {
    type Error = Infallible;
}

impl InputPin for SimSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0)
    }
}

impl PullMode for SimSensor {
    fn set_pull(&mut self, _pull: Pull) {}
}

/// IR front end replaying a code list, then reporting idle.
struct ScriptedIr {
    codes: heapless::Vec<u16, 64>,
    next: usize,
}

impl IrFrontEnd for ScriptedIr {
    fn last_code(&mut self) -> u16 {
        let code = self.codes.get(self.next).copied().unwrap_or(IR_IDLE);
        self.next += 1;
        code
    }
}

/// Remote key bindings for the demo.
fn command_for(button: Button) -> Option<BoardCommand> {
    match button {
        Button::Up => Some(BoardCommand::MotorRun { m: Motor::M1, d: Dir::Forward, s: 200 }),
        Button::Down => Some(BoardCommand::MotorRun { m: Motor::M1, d: Dir::Backward, s: 200 }),
        Button::Ok => Some(BoardCommand::MotorStop { m: Select::All }),
        Button::Menu => Some(BoardCommand::Rgb { r: 0, g: 0, b: 255, mode: LedMode::Blinking }),
        Button::Back => Some(BoardCommand::RgbOff),
        _ => None,
    }
}

#[embassy_executor::task]
async fn board_task(mut ctrl: BoardController<LoggingBus>) -> ! {
    ctrl.board_ch().await
}

#[embassy_executor::task]
async fn ir_poll_task(front_end: ScriptedIr) {
    IR_RECEIVER.run(front_end).await
}

#[embassy_executor::task]
async fn ir_handler_task(sub: IrSubscriber<'static, CriticalSectionRawMutex>) -> ! {
    dispatch(sub, |event: IrEvent| {
        let Some(button) = Button::ALL
            .into_iter()
            .find(|&b| IR_RECEIVER.is_button_pressed(b))
        else {
            info!("IR code 0x{:04X} is not a known key", event.code);
            return;
        };
        info!(?button, "remote key pressed");
        if let Some(cmd) = command_for(button) {
            if BOARD_CHANNEL.try_send(cmd).is_err() {
                warn!("board command queue full, dropping {:?}", cmd);
            }
        }
    })
    .await
}

fn parse_ir_code(raw: &str) -> Result<u16, std::num::ParseIntError> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u16::from_str_radix(digits, 16)
}

fn parse_ir_codes(raw: &[String]) -> heapless::Vec<u16, 64> {
    let mut codes = heapless::Vec::new();
    for s in raw {
        match parse_ir_code(s) {
            Ok(code) => {
                if codes.push(code).is_err() {
                    warn!("IR script truncated to {} codes", codes.capacity());
                    break;
                }
            }
            Err(e) => error!("invalid IR code {:?}: {}", s, e),
        }
    }
    codes
}

fn load_commands(path: &std::path::Path) -> Vec<BoardCommand> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<BoardCommand>(line) {
            Ok(cmd) => Some(cmd),
            Err(error) => {
                error!(?error, "error deserializing BoardCommand: {}", line);
                None
            }
        })
        .collect()
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner) {
    let opts: Opts = Opts::parse();
    let config: BoardConfig = opts.board.into();

    let i2c_bus = mk_static!(RefCell<LoggingBus>, RefCell::new(LoggingBus));

    let ctrl = BoardController::new(i2c_bus, Some(config));
    spawner.spawn(board_task(ctrl)).unwrap();

    if config.supports(Capability::Ir) {
        match IR_RECEIVER.subscribe() {
            Ok(sub) => spawner.spawn(ir_handler_task(sub)).unwrap(),
            Err(e) => error!("IR subscribe failed: {:?}", e),
        }
        let front_end = ScriptedIr {
            codes: parse_ir_codes(&opts.ir_codes),
            next: 0,
        };
        spawner.spawn(ir_poll_task(front_end)).unwrap();
    } else {
        info!("board has no IR receiver, remote disabled");
    }

    if let Some(path) = &opts.commands {
        for cmd in load_commands(path) {
            BOARD_CHANNEL.send(cmd).await;
        }
    }

    let mut sonar = Ultrasonic::new(SimTrigger, SimEcho(opts.echo_us), Delay);
    let cm = sonar.ping(PingUnit::Centimeters);
    let inches = sonar.ping(PingUnit::Inches);
    info!(cm, inches, "ultrasonic reading");

    let mut tracker = LineTracker::new(SimSensor(opts.left_level != 0), SimSensor(opts.right_level != 0));
    for side in [Side::Left, Side::Right] {
        let black = tracker.is_line(side, LineColor::Black);
        info!(?side, black, "line sensor");
    }

    if let Some(ms) = opts.run_ms {
        Timer::after(Duration::from_millis(ms)).await;
        IR_RECEIVER.stop();
        info!("simulation finished");
        std::process::exit(0);
    }
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner)).unwrap();
    });
}
