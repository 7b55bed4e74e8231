//! Macropad - input firmware for the Adafruit MacroPad RP2040
//!
//! Turns the rotary encoder, its push button and the twelve key switches
//! into a stream of typed events, and listens on UART1 for host data.
//! Both are logged over RTT.
//!
//! Holding KEY1 during reset enters development mode, which waits a few
//! seconds before starting so a debug probe can attach.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use macropad_core::config::{BootMode, PadConfig};
use macropad_core::input::{DebouncedInput, DirectPinScanner, QuadratureDecoder};
use macropad_core::serial::SerialChannel;
use macropad_core::EventMultiplexer;
use macropad_hal::ActiveLevel;
use macropad_hal_rp2040::pins::{UART_RX_GPIO, UART_TX_GPIO};
use macropad_hal_rp2040::uart::{gpio_to_uart, is_uart_pair, to_embassy_config};
use macropad_hal_rp2040::{BufferedSerial, EmbassyClock, MacropadPins, PadInput};

use crate::tasks::pad_task;
use crate::timers::{FirmwareTimer, HEARTBEAT_INTERVAL_MS};

mod tasks;
mod timers;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Macropad firmware starting...");

    let p = embassy_rp::init(Default::default());
    let pins = MacropadPins::take(p);
    let config = PadConfig::default();
    if !config.is_valid() {
        warn!("Pad configuration out of range: {}", config);
    }

    // Keys are configured first so KEY1 can select the boot mode
    let keys = pins.keys.map(PadInput::pull_up);
    // Let the pull-ups settle before sampling
    Timer::after_micros(100).await;

    let boot_mode = BootMode::from_key_held(ActiveLevel::Low.sample(&keys[0]));
    match boot_mode {
        BootMode::Development => {
            info!("Dev Mode: Active");
            Timer::after_millis(boot_mode.startup_delay_ms()).await;
        }
        BootMode::Normal => info!("Normal mode"),
    }

    // UART1 on GPIO20/21 for host communication
    debug_assert!(is_uart_pair(UART_TX_GPIO, UART_RX_GPIO));
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(
        pins.uart,
        pins.uart_tx,
        pins.uart_rx,
        to_embassy_config(&config.serial.uart),
    );
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let serial = SerialChannel::new(BufferedSerial::new(uart), config.serial.uart);
    info!(
        "UART initialized: {} on GPIO{}/{} at {} baud",
        gpio_to_uart(UART_TX_GPIO),
        UART_TX_GPIO,
        UART_RX_GPIO,
        serial.baudrate()
    );

    let encoder = QuadratureDecoder::new(
        PadInput::pull_up(pins.encoder_a),
        PadInput::pull_up(pins.encoder_b),
    );
    let button = DebouncedInput::new(
        PadInput::pull_up(pins.encoder_button),
        ActiveLevel::Low,
        config.debounce_ms,
    );
    let scanner = DirectPinScanner::new(keys, ActiveLevel::Low, config.debounce_ms);

    let mut mux = EventMultiplexer::new(encoder, button, scanner, EmbassyClock);
    if mux
        .schedule(HEARTBEAT_INTERVAL_MS, FirmwareTimer::Heartbeat { count: 0 })
        .is_err()
    {
        warn!("No room for the heartbeat timer");
    }

    let snapshot = mux.snapshot();
    info!(
        "Inputs ready: encoder at {}, button {}",
        snapshot.position,
        if snapshot.button { "held" } else { "up" }
    );

    spawner.must_spawn(pad_task(mux, serial, config));
}
