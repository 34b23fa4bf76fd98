/// Possible errors from an acquisition.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DhtError<E> {
    /// A pulse did not end within the polling budget.
    ///
    /// During the handshake this means no sensor answered.
    #[error("timed out waiting for a pulse to end")]
    Timeout,
    /// The full frame was received but its checksum does not match.
    #[error("checksum mismatch: expected {expected:#04x}, received {received:#04x}")]
    ChecksumMismatch { expected: u8, received: u8 },
    /// Error from the data line.
    #[error("data line error: {0:?}")]
    Pin(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}
