//! Module Exports
//!
//! This file exports the bus-side controllers of the expansion board.
//!
//! - `i2c`: encodes actuator commands and writes them to the board.

/// Module for the board's I2C command processor.
pub mod i2c;

use core::cell::RefCell;

pub use i2c::{BoardCommand, DeviceError, I2CBoard, BOARD_CHANNEL};

use crate::utils::board::BoardConfig;

/// Owns the board driver and executes queued `BoardCommand`s.
pub struct BoardController<I2C: 'static> {
    pub board: I2CBoard<'static, I2C>,
}

impl<I2C> BoardController<I2C>
where
    I2C: embedded_hal::i2c::I2c + 'static,
{
    /// Build a controller for `config`, defaulting to the Funbit board.
    pub fn new(
        i2c_bus: &'static RefCell<I2C>,
        config: Option<BoardConfig>,
    ) -> Self {
        let config = config.unwrap_or_default();
        tracing::info!(
            "Board at 0x{:02X}, capabilities {:?}, line sensors P{}/P{}",
            config.address,
            config.capabilities,
            config.pins.line_left,
            config.pins.line_right
        );
        match config.pins.ir {
            Some(pin) => tracing::info!("IR receiver on P{}", pin),
            None => tracing::info!("no IR receiver"),
        }

        BoardController {
            board: I2CBoard::new(i2c_bus, config),
        }
    }

    /// Receive commands from `BOARD_CHANNEL` forever and execute them.
    pub async fn board_ch(&mut self) -> ! {
        loop {
            let command = BOARD_CHANNEL.receiver().receive().await;
            tracing::info!("Received board command: {:?}", command);
            match self.board.execute_command(command) {
                Ok(()) => tracing::debug!("board command sent"),
                Err(e) => tracing::error!("board command rejected: {:?}", e),
            }
        }
    }
}
