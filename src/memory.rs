//! Byte-addressed interpreter memory.

use primitive_types::U256;

use crate::error::VmError;

/// Hard cap on memory growth, in bytes. A safety quota for a sandboxed
/// interpreter, not an EVM protocol quantity.
pub const MEMORY_LIMIT: usize = 10_000_000;

/// Zero-extending, grow-only byte memory. Touching an offset beyond the
/// current length first expands the buffer with zero bytes; the buffer is
/// never shrunk within one execution.
#[derive(Clone, Debug, Default)]
pub struct Memory {
	data: Vec<u8>,
}

impl Memory {
	/// Create an empty memory.
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	/// Current byte length.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[inline]
	/// Whether nothing has been touched yet.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Raw memory contents.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Convert a word into a memory offset or length. Anything past the
	/// quota cannot name a live byte.
	pub fn to_offset(v: U256) -> Result<usize, VmError> {
		if v > U256::from(MEMORY_LIMIT) {
			return Err(VmError::OutOfMemory);
		}
		Ok(v.low_u64() as usize)
	}

	/// Grow to at least `size` bytes, zero-filled. No-op when already large
	/// enough.
	pub fn expand(&mut self, size: usize) -> Result<(), VmError> {
		if size > MEMORY_LIMIT {
			return Err(VmError::OutOfMemory);
		}
		if self.data.len() < size {
			self.data.resize(size, 0);
		}
		Ok(())
	}

	/// Read `count` bytes at `offset`, expanding first. A zero-length read
	/// still expands to `offset`.
	pub fn read(&mut self, offset: usize, count: usize) -> Result<Vec<u8>, VmError> {
		let end = offset.checked_add(count).ok_or(VmError::OutOfMemory)?;
		self.expand(end)?;
		Ok(self.data[offset..end].to_vec())
	}

	/// Overwrite the region at `offset` with `bytes`, expanding first.
	pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), VmError> {
		let end = offset.checked_add(bytes.len()).ok_or(VmError::OutOfMemory)?;
		self.expand(end)?;
		self.data[offset..end].copy_from_slice(bytes);
		Ok(())
	}

	/// Copy `len` bytes into memory at `offset` from an external byte source
	/// (calldata, code, return data). Source reads past the end of `src` are
	/// zeros.
	pub fn copy_from(
		&mut self,
		offset: usize,
		src_offset: U256,
		len: usize,
		src: &[u8],
	) -> Result<(), VmError> {
		let end = offset.checked_add(len).ok_or(VmError::OutOfMemory)?;
		self.expand(end)?;

		for i in 0..len {
			self.data[offset + i] = match src_offset.checked_add(U256::from(i)) {
				Some(p) if p < U256::from(src.len()) => src[p.low_u64() as usize],
				_ => 0,
			};
		}
		Ok(())
	}

	/// Copy `len` bytes from `src` to `dst` within memory, as `MCOPY`. Both
	/// ranges are expanded first, so out-of-range source bytes read as
	/// zeros.
	pub fn copy_within(&mut self, dst: usize, src: usize, len: usize) -> Result<(), VmError> {
		let src_end = src.checked_add(len).ok_or(VmError::OutOfMemory)?;
		let dst_end = dst.checked_add(len).ok_or(VmError::OutOfMemory)?;
		self.expand(src_end.max(dst_end))?;
		self.data.copy_within(src..src_end, dst);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_expand_with_zeros() {
		let mut memory = Memory::new();
		assert_eq!(memory.read(10, 4).unwrap(), vec![0; 4]);
		assert_eq!(memory.len(), 14);
	}

	#[test]
	fn zero_length_read_still_expands() {
		let mut memory = Memory::new();
		memory.read(32, 0).unwrap();
		assert_eq!(memory.len(), 32);
	}

	#[test]
	fn never_shrinks() {
		let mut memory = Memory::new();
		memory.expand(100).unwrap();
		memory.expand(10).unwrap();
		assert_eq!(memory.len(), 100);
	}

	#[test]
	fn quota_is_enforced() {
		let mut memory = Memory::new();
		assert_eq!(memory.expand(MEMORY_LIMIT + 1), Err(VmError::OutOfMemory));
		assert_eq!(
			memory.write(MEMORY_LIMIT - 16, &[0u8; 32]),
			Err(VmError::OutOfMemory)
		);
		assert!(memory.write(MEMORY_LIMIT - 32, &[0u8; 32]).is_ok());
	}

	#[test]
	fn copy_from_zero_extends_source() {
		let mut memory = Memory::new();
		memory
			.copy_from(0, U256::from(2u64), 4, &[1, 2, 3, 4])
			.unwrap();
		assert_eq!(memory.data(), &[3, 4, 0, 0]);

		memory.copy_from(0, U256::MAX, 2, &[1, 2, 3, 4]).unwrap();
		assert_eq!(&memory.data()[..2], &[0, 0]);
	}

	#[test]
	fn copy_within_expands_both_ranges() {
		let mut memory = Memory::new();
		memory.write(0, &[1, 2, 3, 4]).unwrap();
		memory.copy_within(8, 2, 4).unwrap();
		assert_eq!(memory.data(), &[1, 2, 3, 4, 0, 0, 0, 0, 3, 4, 0, 0]);
	}
}
