use crate::marshal::{MarshalError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Whether the cursor has consumed the whole buffer.
	pub fn at_end(&self) -> bool {
		self.remaining() == 0
	}

	/// Return the next byte without consuming it.
	pub fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(MarshalError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a single byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a single byte as a signed value.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_u8()? as i8)
	}

	/// Read a little-endian `i16`.
	pub fn read_i16_le(&mut self) -> Result<i16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(i16::from_le_bytes(buf))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(i32::from_le_bytes(buf))
	}

	/// Read a little-endian IEEE-754 `f64`.
	pub fn read_f64_le(&mut self) -> Result<f64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(f64::from_le_bytes(buf))
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;
	use crate::marshal::MarshalError;

	#[test]
	fn read_exact_advances_and_bounds_checks() {
		let mut cursor = Cursor::new(b"abcd");
		assert_eq!(cursor.read_exact(2).unwrap(), b"ab");
		assert_eq!(cursor.pos(), 2);
		assert_eq!(cursor.remaining(), 2);

		let err = cursor.read_exact(3).unwrap_err();
		assert!(matches!(err, MarshalError::UnexpectedEof { at: 2, need: 3, rem: 2 }));
		assert_eq!(cursor.pos(), 2, "failed read must not advance");
	}

	#[test]
	fn peek_does_not_consume() {
		let mut cursor = Cursor::new(b"xy");
		assert_eq!(cursor.peek(), Some(b'x'));
		assert_eq!(cursor.read_u8().unwrap(), b'x');
		assert_eq!(cursor.peek(), Some(b'y'));
		assert_eq!(cursor.read_u8().unwrap(), b'y');
		assert_eq!(cursor.peek(), None);
		assert!(cursor.at_end());
	}

	#[test]
	fn fixed_width_little_endian_reads() {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&(-7_i16).to_le_bytes());
		bytes.extend_from_slice(&300_i32.to_le_bytes());
		bytes.extend_from_slice(&2.5_f64.to_le_bytes());

		let mut cursor = Cursor::new(&bytes);
		assert_eq!(cursor.read_i16_le().unwrap(), -7);
		assert_eq!(cursor.read_i32_le().unwrap(), 300);
		assert_eq!(cursor.read_f64_le().unwrap(), 2.5);
		assert!(cursor.at_end());
	}
}
