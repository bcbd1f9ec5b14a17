use heapless::Deque;

use crate::FrameError;
use crate::packet::{FRAME_LEN, Packet, START};

// Sets the capacity of the receive ringbuffer
const MAX_BUFFERED_BYTES: usize = 64;

/// Sans-io receiver for motor frames.
///
/// Feed raw serial bytes with [PacketDecoder::handle_receive] and drain frames
/// with [PacketDecoder::poll_receive]. Garbage before a start byte is skipped;
/// a frame that fails its checks costs only its start byte, so decoding
/// resynchronizes on the next 0xFF.
pub struct PacketDecoder {
    buffer: Deque<u8, MAX_BUFFERED_BYTES>,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketDecoder {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
        }
    }

    /// Receive raw bytes
    pub fn handle_receive(&mut self, bytes: &[u8]) {
        // Push the received bytes into the buffer, dropping the oldest byte if
        // the buffer is full
        for &byte in bytes {
            if self.buffer.is_full() {
                self.buffer.pop_front();
            }
            let _ = self.buffer.push_back(byte);
        }
    }

    /// Poll for the next frame. `Ok(None)` means more bytes are needed.
    pub fn poll_receive(&mut self) -> Result<Option<Packet>, FrameError> {
        while let Some(&byte) = self.buffer.front() {
            if byte == START {
                break;
            }
            self.buffer.pop_front();
        }

        if self.buffer.len() < FRAME_LEN {
            return Ok(None);
        }

        let mut frame = [0u8; FRAME_LEN];
        for (slot, byte) in frame.iter_mut().zip(self.buffer.iter()) {
            *slot = *byte;
        }

        match Packet::from_bytes(&frame) {
            Ok(packet) => {
                for _ in 0..FRAME_LEN {
                    self.buffer.pop_front();
                }
                Ok(Some(packet))
            }
            Err(err) => {
                self.buffer.pop_front();
                Err(err)
            }
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
