//! Cursor over ROOT's big-endian streamer encoding.

use crate::error::{Result, RootError};

/// `kByteCountMask`: set on the leading u32 of a streamed object when a byte
/// count precedes the class version.
pub const BYTE_COUNT_MASK: u32 = 0x4000_0000;

const IS_REFERENCED: u32 = 0x0800_0000;

/// Big-endian reader over a borrowed byte slice.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RBuffer<'a> {
    /// Start reading `data` at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading `data` at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute offset.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Advance `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Borrow the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len()).ok_or(
            RootError::BufferUnderflow { offset: self.pos, need: n, have: self.remaining() },
        )?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// One byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    /// Big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.array().map(u16::from_be_bytes)
    }

    /// Big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.array().map(i16::from_be_bytes)
    }

    /// Big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_be_bytes)
    }

    /// Big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.array().map(i32::from_be_bytes)
    }

    /// Big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.array().map(u64::from_be_bytes)
    }

    /// Big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.array().map(f32::from_be_bytes)
    }

    /// Big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.array().map(f64::from_be_bytes)
    }

    /// A 32-bit seek pointer, or a 64-bit one when `large`.
    pub fn read_seek(&mut self, large: bool) -> Result<u64> {
        if large { self.read_u64() } else { self.read_u32().map(u64::from) }
    }

    /// A ROOT string: one length byte, or `255` followed by a u32 length.
    pub fn read_string(&mut self) -> Result<String> {
        let len = match self.read_u8()? {
            255 => self.read_u32()? as usize,
            n => n as usize,
        };
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    /// Streamer version header.
    ///
    /// Returns the class version and, when a byte count is present, the
    /// absolute offset at which the streamed object ends. The byte count
    /// covers everything after the leading u32, version included.
    pub fn read_version(&mut self) -> Result<(u16, Option<usize>)> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK == 0 {
            // Old-style header: only a u16 version was written.
            self.pos = start + 2;
            return Ok(((raw >> 16) as u16, None));
        }
        let count = (raw & !BYTE_COUNT_MASK) as usize;
        let version = self.read_u16()?;
        Ok((version, Some(start + 4 + count)))
    }

    /// Skip an embedded object by its byte count.
    ///
    /// Objects written without a byte count are version-only (old
    /// `TAttLine`-style members) and nothing further is skipped.
    pub fn skip_object(&mut self) -> Result<()> {
        if let (_, Some(end)) = self.read_version()? {
            self.jump_to(end)?;
        }
        Ok(())
    }

    /// Move forward to `end`, failing if it lies outside the buffer.
    pub fn jump_to(&mut self, end: usize) -> Result<()> {
        if end > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: end.saturating_sub(self.pos),
                have: self.remaining(),
            });
        }
        self.pos = end;
        Ok(())
    }

    /// `TObject` body: version, fUniqueID, fBits (+ pidf when referenced).
    pub fn read_tobject(&mut self) -> Result<u32> {
        let _version = self.read_u16()?;
        let _unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?;
        }
        Ok(bits)
    }

    /// `TNamed`: versioned `TObject` followed by fName and fTitle.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let (_, end) = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        if let Some(end) = end {
            self.jump_to(end)?;
        }
        Ok((name, title))
    }

    /// `n` big-endian f64 values.
    pub fn read_f64s(&mut self, n: usize) -> Result<Vec<f64>> {
        let raw = self.take(n.checked_mul(8).ok_or_else(|| too_long(n))?)?;
        Ok(raw.chunks_exact(8).map(|c| f64::from_be_bytes(c.try_into().unwrap_or([0; 8]))).collect())
    }

    /// `n` big-endian f32 values widened to f64.
    pub fn read_f32s(&mut self, n: usize) -> Result<Vec<f64>> {
        let raw = self.take(n.checked_mul(4).ok_or_else(|| too_long(n))?)?;
        Ok(raw
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes(c.try_into().unwrap_or([0; 4])) as f64)
            .collect())
    }

    /// A `TArrayD`: u32 length followed by the values.
    pub fn read_array_d(&mut self) -> Result<Vec<f64>> {
        let n = self.read_u32()? as usize;
        self.read_f64s(n)
    }
}

fn too_long(n: usize) -> RootError {
    RootError::Deserialization(format!("array length {n} overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_primitives() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0102_0304u32.to_be_bytes());
        data.extend_from_slice(&std::f64::consts::E.to_be_bytes());
        data.extend_from_slice(&(-7i16).to_be_bytes());
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
        assert!((r.read_f64().unwrap() - std::f64::consts::E).abs() < 1e-15);
        assert_eq!(r.read_i16().unwrap(), -7);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn long_string_uses_u32_length() {
        let body = "x".repeat(300);
        let mut data = vec![255u8];
        data.extend_from_slice(&300u32.to_be_bytes());
        data.extend_from_slice(body.as_bytes());
        assert_eq!(RBuffer::new(&data).read_string().unwrap(), body);
    }

    #[test]
    fn version_with_byte_count_reports_end() {
        let mut data = Vec::new();
        data.extend_from_slice(&(BYTE_COUNT_MASK | 10).to_be_bytes());
        data.extend_from_slice(&8u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 8]);
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_version().unwrap(), (8, Some(14)));
        assert_eq!(r.pos(), 6);
    }

    #[test]
    fn version_without_byte_count_rewinds() {
        let data = [0x00, 0x02, 0xAA, 0xBB];
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_version().unwrap(), (2, None));
        assert_eq!(r.pos(), 2);
    }

    #[test]
    fn underflow_is_reported() {
        let mut r = RBuffer::new(&[1, 2]);
        match r.read_u32() {
            Err(RootError::BufferUnderflow { offset: 0, need: 4, have: 2 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn f32_arrays_widen() {
        let mut data = Vec::new();
        for v in [1.5f32, -2.0, 0.25] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        assert_eq!(RBuffer::new(&data).read_f32s(3).unwrap(), vec![1.5, -2.0, 0.25]);
    }
}
