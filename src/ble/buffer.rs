//! Backing store of the RX characteristic value

use crate::error::AttrError;

/// Fixed-capacity buffer holding the last value written to RX.
///
/// Writes that would run past the end are rejected whole; the buffer is
/// never partially updated.
pub struct RxBuffer<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> RxBuffer<N> {
    /// Create a zero-filled buffer
    pub const fn new() -> Self {
        Self { data: [0u8; N] }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Copy `data` in at `offset`.
    ///
    /// Returns the written region at its final position in the buffer.
    pub fn write(&mut self, offset: u16, data: &[u8]) -> Result<&[u8], AttrError> {
        let start = offset as usize;
        let end = start + data.len();
        if end > N {
            return Err(AttrError::InvalidOffset);
        }
        self.data[start..end].copy_from_slice(data);
        Ok(&self.data[start..end])
    }

    /// Copy the contents from `offset` into `out`, returning the byte count
    pub fn read(&self, offset: u16, out: &mut [u8]) -> usize {
        read_at(&self.data, offset, out)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute read semantics: start at `offset`, stop at the end of `value`
/// or of `out`. An offset past the end yields an empty read.
pub(crate) fn read_at(value: &[u8], offset: u16, out: &mut [u8]) -> usize {
    let start = offset as usize;
    if start >= value.len() {
        return 0;
    }
    let len = (value.len() - start).min(out.len());
    out[..len].copy_from_slice(&value[start..start + len]);
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_returns_written_region() {
        let mut buf: RxBuffer<8> = RxBuffer::new();
        let written = buf.write(3, b"abc").unwrap();
        assert_eq!(written, b"abc");
        assert_eq!(buf.as_slice(), &[0, 0, 0, b'a', b'b', b'c', 0, 0]);
    }

    #[test]
    fn test_write_to_exact_end() {
        let mut buf: RxBuffer<4> = RxBuffer::new();
        assert!(buf.write(2, &[1, 2]).is_ok());
        assert_eq!(buf.as_slice(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_overflow_rejected_unchanged() {
        let mut buf: RxBuffer<4> = RxBuffer::new();
        buf.write(0, &[9, 9, 9, 9]).unwrap();

        assert_eq!(buf.write(3, &[1, 2]), Err(AttrError::InvalidOffset));
        assert_eq!(buf.write(5, &[]), Err(AttrError::InvalidOffset));
        assert_eq!(buf.as_slice(), &[9, 9, 9, 9]);
    }

    #[test]
    fn test_empty_write_at_end() {
        let mut buf: RxBuffer<4> = RxBuffer::new();
        assert_eq!(buf.write(4, &[]).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_max_offset_does_not_overflow() {
        let mut buf: RxBuffer<26> = RxBuffer::new();
        assert_eq!(buf.write(u16::MAX, &[1]), Err(AttrError::InvalidOffset));
    }

    #[test]
    fn test_read_truncates() {
        let mut buf: RxBuffer<6> = RxBuffer::new();
        buf.write(0, b"hello!").unwrap();

        let mut out = [0u8; 3];
        assert_eq!(buf.read(1, &mut out), 3);
        assert_eq!(&out, b"ell");

        let mut out = [0u8; 16];
        assert_eq!(buf.read(4, &mut out), 2);
        assert_eq!(&out[..2], b"o!");
    }

    #[test]
    fn test_read_past_end_is_empty() {
        let buf: RxBuffer<6> = RxBuffer::new();
        let mut out = [0u8; 4];
        assert_eq!(buf.read(6, &mut out), 0);
        assert_eq!(buf.read(200, &mut out), 0);
    }
}
