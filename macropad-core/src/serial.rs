//! Serial byte channel
//!
//! Non-blocking wrapper over a UART that the main loop polls alongside the
//! event multiplexer. Receive failures are absorbed and counted: the
//! caller just sees "no data". Transmit failures are reported.

use heapless::Vec;
use macropad_hal::{UartConfig, UartRx, UartTx};

/// Largest chunk [`SerialChannel::read_chunk`] can return
pub const MAX_CHUNK_SIZE: usize = 64;

/// One received chunk
pub type Chunk = Vec<u8, MAX_CHUNK_SIZE>;

/// Serial transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// The driver rejected the data
    Write,
    /// Draining the transmit buffer failed
    Flush,
}

/// Byte channel over a configured UART
pub struct SerialChannel<U> {
    uart: U,
    config: UartConfig,
    read_errors: u32,
}

impl<U: UartRx + UartTx> SerialChannel<U> {
    /// Wrap a UART that was already set up with `config`
    pub fn new(uart: U, config: UartConfig) -> Self {
        Self {
            uart,
            config,
            read_errors: 0,
        }
    }

    /// Copy whatever is buffered into `buf`
    ///
    /// Returns the number of bytes read, 0 when nothing is waiting or the
    /// driver reported an error.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        match self.uart.read_available(buf) {
            Ok(n) => n,
            Err(_) => {
                self.read_errors = self.read_errors.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("serial read failed ({} so far)", self.read_errors);
                0
            }
        }
    }

    /// Read at most `size` bytes (capped at [`MAX_CHUNK_SIZE`])
    ///
    /// The chunk is empty when no data was waiting.
    pub fn read_chunk(&mut self, size: usize) -> Chunk {
        let mut buf = [0u8; MAX_CHUNK_SIZE];
        let size = size.min(MAX_CHUNK_SIZE);
        let n = self.read(&mut buf[..size]);

        let mut chunk = Chunk::new();
        // n <= size <= capacity
        let _ = chunk.extend_from_slice(&buf[..n]);
        chunk
    }

    /// Queue bytes for transmission
    pub fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        self.uart.write_all(data).map_err(|_| SerialError::Write)
    }

    /// Wait for queued bytes to leave the driver buffer
    pub fn flush(&mut self) -> Result<(), SerialError> {
        self.uart.flush().map_err(|_| SerialError::Flush)
    }

    /// Endless stream of chunks of at most `size` bytes
    ///
    /// Yields an empty chunk whenever no data is waiting, so each step
    /// returns immediately. Never ends.
    pub fn read_stream(&mut self, size: usize) -> ReadStream<'_, U> {
        ReadStream {
            channel: self,
            size,
        }
    }
}

impl<U> SerialChannel<U> {
    /// Configuration the UART was set up with
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn baudrate(&self) -> u32 {
        self.config.baudrate
    }

    /// Receive failures absorbed since construction
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// Give the UART back
    pub fn release(self) -> U {
        self.uart
    }
}

/// Iterator returned by [`SerialChannel::read_stream`]
pub struct ReadStream<'a, U> {
    channel: &'a mut SerialChannel<U>,
    size: usize,
}

impl<U: UartRx + UartTx> Iterator for ReadStream<'_, U> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        Some(self.channel.read_chunk(self.size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Deque;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct LineFault;

    /// Scripted loopback UART
    #[derive(Default)]
    struct ScriptedUart {
        rx: Deque<u8, 128>,
        tx: Vec<u8, 128>,
        fail_next_read: bool,
        fail_writes: bool,
    }

    impl ScriptedUart {
        fn feed(&mut self, data: &[u8]) {
            for &b in data {
                self.rx.push_back(b).unwrap();
            }
        }
    }

    impl UartRx for ScriptedUart {
        type Error = LineFault;

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, LineFault> {
            if core::mem::take(&mut self.fail_next_read) {
                return Err(LineFault);
            }
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl UartTx for ScriptedUart {
        type Error = LineFault;

        fn write_all(&mut self, data: &[u8]) -> Result<(), LineFault> {
            if self.fail_writes {
                return Err(LineFault);
            }
            self.tx.extend_from_slice(data).map_err(|_| LineFault)
        }

        fn flush(&mut self) -> Result<(), LineFault> {
            if self.fail_writes {
                Err(LineFault)
            } else {
                Ok(())
            }
        }
    }

    fn channel() -> SerialChannel<ScriptedUart> {
        SerialChannel::new(ScriptedUart::default(), UartConfig::default())
    }

    #[test]
    fn test_read_empty() {
        let mut serial = channel();
        let mut buf = [0u8; 8];
        assert_eq!(serial.read(&mut buf), 0);
        assert!(serial.read_chunk(32).is_empty());
    }

    #[test]
    fn test_read_partial() {
        let mut serial = channel();
        serial.uart.feed(b"hello");

        let mut buf = [0u8; 3];
        assert_eq!(serial.read(&mut buf), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(serial.read_chunk(32).as_slice(), b"lo");
    }

    #[test]
    fn test_chunk_size_capped() {
        let mut serial = channel();
        serial.uart.feed(&[0xAA; 100]);

        assert_eq!(serial.read_chunk(1000).len(), MAX_CHUNK_SIZE);
        assert_eq!(serial.read_chunk(16).len(), 16);
        assert_eq!(serial.read_chunk(32).len(), 100 - MAX_CHUNK_SIZE - 16);
    }

    #[test]
    fn test_read_error_absorbed() {
        let mut serial = channel();
        serial.uart.feed(b"x");
        serial.uart.fail_next_read = true;

        assert!(serial.read_chunk(32).is_empty());
        assert_eq!(serial.read_errors(), 1);
        assert_eq!(serial.read_chunk(32).as_slice(), b"x");
    }

    #[test]
    fn test_write_and_flush() {
        let mut serial = channel();
        assert_eq!(serial.write(b"ping"), Ok(()));
        assert_eq!(serial.flush(), Ok(()));
        assert_eq!(serial.uart.tx.as_slice(), b"ping");
    }

    #[test]
    fn test_write_errors_reported() {
        let mut serial = channel();
        serial.uart.fail_writes = true;
        assert_eq!(serial.write(b"ping"), Err(SerialError::Write));
        assert_eq!(serial.flush(), Err(SerialError::Flush));
    }

    #[test]
    fn test_read_stream_yields_empty_chunks() {
        let mut serial = channel();
        serial.uart.feed(b"abcdef");

        let mut stream = serial.read_stream(4);
        assert_eq!(stream.next().unwrap().as_slice(), b"abcd");
        assert_eq!(stream.next().unwrap().as_slice(), b"ef");
        for _ in 0..10 {
            assert_eq!(stream.next().map(|c| c.len()), Some(0));
        }
    }

    #[test]
    fn test_config() {
        let serial = SerialChannel::new(ScriptedUart::default(), UartConfig::with_baudrate(9600));
        assert_eq!(serial.baudrate(), 9600);
        assert_eq!(channel().baudrate(), 115200);
    }
}
