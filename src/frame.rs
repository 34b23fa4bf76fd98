use crate::pulse::{PulseTable, TIMEOUT};

/// Number of bytes in a frame: four data bytes and a checksum.
pub const FRAME_LEN: usize = 5;

/// The 5-byte payload sent by the sensor for one reading.
///
/// Byte layout: humidity high, humidity low, temperature high,
/// temperature low, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Frame(bytes)
    }

    /// Decodes the captured pulse durations into a frame.
    ///
    /// Each bit is a low pulse followed by a high pulse. The bit is `1` when
    /// the high pulse lasted longer than the low pulse and `0` otherwise
    /// (equal durations included). Only the ratio is used, never an
    /// absolute duration, so the result does not depend on the polling speed.
    ///
    /// Returns `None` if any pulse timed out.
    pub fn decode(pulses: &PulseTable) -> Option<Self> {
        let mut data = [0u8; FRAME_LEN];

        for (bit, pair) in pulses.chunks_exact(2).enumerate() {
            let (low, high) = (pair[0], pair[1]);
            if low == TIMEOUT || high == TIMEOUT {
                warn!("pulse timeout at bit {}", bit);
                return None;
            }

            let byte = &mut data[bit / 8];
            *byte <<= 1;
            if high > low {
                *byte |= 1;
            }
        }

        trace!("decoded bytes: {}", data);
        Some(Frame(data))
    }

    /// Raw frame bytes, checksum last.
    pub fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// The checksum byte as received.
    pub fn checksum(&self) -> u8 {
        self.0[FRAME_LEN - 1]
    }

    /// Whether the received checksum matches the four data bytes.
    pub fn checksum_valid(&self) -> bool {
        self.checksum() == checksum(&self.0[..FRAME_LEN - 1])
    }

    /// Bytes 0 and 1 as a big-endian integer, in tenths of a percent.
    pub fn humidity_raw(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.humidity_raw() as f32 / 10.0
    }
}

/// Low 8 bits of the sum of `data`.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}
