//! Pad task
//!
//! The single cooperative loop that owns every input source and the serial
//! link. Each tick polls the multiplexer once, drains one chunk from the
//! serial port, logs whatever came in, then sleeps until the next tick.

use defmt::*;
use embassy_rp::uart::BufferedUart;
use embassy_time::{Duration, Ticker};

use macropad_core::config::{PadConfig, NUM_KEYS};
use macropad_core::input::{DirectPinScanner, QuadratureDecoder};
use macropad_core::serial::SerialChannel;
use macropad_core::EventMultiplexer;
use macropad_hal_rp2040::{BufferedSerial, EmbassyClock, PadInput};

use crate::timers::FirmwareTimer;

/// Multiplexer over the MacroPad's encoder, button and key switches
pub type PadMux = EventMultiplexer<
    QuadratureDecoder<PadInput<'static>, PadInput<'static>>,
    PadInput<'static>,
    DirectPinScanner<PadInput<'static>, NUM_KEYS>,
    EmbassyClock,
    FirmwareTimer,
>;

/// Serial channel on UART1
pub type PadSerial = SerialChannel<BufferedSerial<BufferedUart>>;

/// Pad task - polls inputs and serial forever
#[embassy_executor::task]
pub async fn pad_task(mut mux: PadMux, mut serial: PadSerial, config: PadConfig) {
    info!(
        "Pad task started (poll every {} ms, serial {} baud)",
        config.poll_interval_ms,
        serial.baudrate()
    );

    if serial.write(b"macropad ready\r\n").is_err() || serial.flush().is_err() {
        warn!("Failed to send ready banner");
    }

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.poll_interval_ms)));
    let polls = mux.events();
    let reads = serial.read_stream(config.serial.read_chunk);

    for (batch, chunk) in polls.zip(reads) {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                error!("Timer callback failed: {}", e.source);
                e.events
            }
        };
        for event in events {
            info!("{}", event);
        }

        if !chunk.is_empty() {
            info!("Serial rx: {=[u8]:x}", chunk.as_slice());
        }

        ticker.next().await;
    }
}
