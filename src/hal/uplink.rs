//! Serial link to a PC for test download.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

/// Byte-oriented transmit-only serial port.
#[cfg_attr(test, mockall::automock)]
pub trait Uplink {
    /// Transmit one byte, blocking until it is sent.
    fn send(&mut self, byte: u8);
}

impl<T: Uplink + ?Sized> Uplink for Box<T> {
    fn send(&mut self, byte: u8) {
        (**self).send(byte)
    }
}

/// Uplink that collects transmitted bytes for inspection.
#[derive(Debug, Clone, Default)]
pub struct CaptureUplink {
    sent: Arc<Mutex<Vec<u8>>>,
}

impl CaptureUplink {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes transmitted so far.
    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().clone()
    }

    /// Take and clear the transmitted bytes.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl Uplink for CaptureUplink {
    fn send(&mut self, byte: u8) {
        self.sent.lock().push(byte);
    }
}

/// Uplink over any `std::io::Write`, such as a serial port device file.
#[derive(Debug)]
pub struct WriterUplink<W: Write> {
    writer: W,
}

impl<W: Write> WriterUplink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Uplink for WriterUplink<W> {
    fn send(&mut self, byte: u8) {
        if let Err(e) = self.writer.write_all(&[byte]) {
            warn!("Uplink write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_uplink() {
        let handle = CaptureUplink::new();
        let mut uplink = handle.clone();
        uplink.send(b'1');
        uplink.send(b'2');
        assert_eq!(handle.take(), b"12".to_vec());
        assert!(handle.sent().is_empty());
    }

    #[test]
    fn test_writer_uplink() {
        let mut uplink = WriterUplink::new(Vec::new());
        uplink.send(0x30);
        assert_eq!(uplink.into_inner(), vec![0x30]);
    }
}
