//! Response frame buffer.
//!
//! Accumulates everything the module sent since the last [`reset`]. The
//! buffer is fixed-size and NUL-terminated: at most `N - 1` payload bytes
//! are kept, the last slot is reserved for the sentinel.  Bytes that do not
//! fit are dropped silently (counted in [`dropped`] for diagnostics), which
//! can hide a success marker that arrives after the buffer filled up.
//!
//! [`reset`]: ResponseFrame::reset
//! [`dropped`]: ResponseFrame::dropped

/// Raw response capacity of the Grove module driver, sentinel included.
pub const RESPONSE_CAPACITY: usize = 200;

const SENTINEL: u8 = 0;

/// Fixed-capacity response accumulator.
pub struct ResponseFrame<const N: usize = RESPONSE_CAPACITY> {
    data: [u8; N],
    len: usize,
    dropped: usize,
}

impl<const N: usize> ResponseFrame<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "frame needs room for the sentinel");
        Self {
            data: [SENTINEL; N],
            len: 0,
            dropped: 0,
        }
    }

    /// Copy as much of `bytes` as fits and re-terminate.
    ///
    /// Returns the number of bytes actually stored; the rest are discarded.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let room = N - 1 - self.len;
        let num = bytes.len().min(room);
        self.data[self.len..self.len + num].copy_from_slice(&bytes[..num]);
        self.len += num;
        self.data[self.len] = SENTINEL;
        self.dropped += bytes.len() - num;
        num
    }

    /// Empty the frame and write the sentinel at offset 0.
    pub fn reset(&mut self) {
        self.len = 0;
        self.dropped = 0;
        self.data[0] = SENTINEL;
    }

    /// Bytes received since the last reset (sentinel excluded).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Payload plus the terminating sentinel.
    pub fn as_bytes_with_sentinel(&self) -> &[u8] {
        &self.data[..=self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Usable payload capacity (`N - 1`).
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    pub fn is_full(&self) -> bool {
        self.len == N - 1
    }

    /// Bytes discarded since the last reset because the frame was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<const N: usize> Default for ResponseFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}
