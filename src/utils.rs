//! Word views and signed 256-bit arithmetic.

use core::cmp::Ordering;
use core::ops::{Div, Rem};

use primitive_types::{H160, H256, U256};

use crate::error::VmError;

/// Convert [U256] into [H256].
pub fn u256_to_h256(v: U256) -> H256 {
	let mut ret = H256::zero();
	v.to_big_endian(ret.as_bytes_mut());
	ret
}

/// Convert [H256] to [U256].
pub fn h256_to_u256(v: H256) -> U256 {
	U256::from_big_endian(v.as_bytes())
}

/// Take the low 20 bytes of a word as an address, discarding the high 12.
pub fn u256_to_h160(v: U256) -> H160 {
	let word = u256_to_h256(v);
	H160::from_slice(&word.as_bytes()[12..32])
}

/// Left-pad `bytes` with zeros to a full word. Fails when more than 32
/// bytes are given.
pub fn pad_to_word(bytes: &[u8]) -> Result<H256, VmError> {
	if bytes.len() > 32 {
		return Err(VmError::ValueOverflow);
	}
	let mut ret = H256::zero();
	ret.as_bytes_mut()[32 - bytes.len()..].copy_from_slice(bytes);
	Ok(ret)
}

/// Encode a signed integer into a word. Fails when the value lies outside
/// `[-2^255, 2^255)`.
pub fn i256_to_h256(v: I256) -> Result<H256, VmError> {
	let bound = U256::MAX >> 1;
	match v.0 {
		Sign::Zero => Ok(H256::zero()),
		Sign::Plus => {
			if v.1 > bound {
				return Err(VmError::SignedIntegerOutOfBounds);
			}
			Ok(u256_to_h256(v.1))
		}
		Sign::Minus => {
			if v.1 > bound + U256::one() {
				return Err(VmError::SignedIntegerOutOfBounds);
			}
			Ok(u256_to_h256(U256::from(v)))
		}
	}
}

/// Sign of [I256].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Sign {
	/// Plus
	Plus,
	/// Minus
	Minus,
	/// Zero
	Zero,
}

/// Signed 256-bit integer as a sign and magnitude pair.
///
/// Division and remainder round toward negative infinity (floor division),
/// so `SDIV`/`SMOD` built on them diverge from the mainnet EVM's
/// truncation-toward-zero on negative operands.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct I256(pub Sign, pub U256);

impl I256 {
	/// Zero value of I256.
	pub fn zero() -> I256 {
		I256(Sign::Zero, U256::zero())
	}

	/// Minimum value of I256, `-2^255`.
	pub fn min_value() -> I256 {
		I256(Sign::Minus, (U256::MAX >> 1) + U256::one())
	}
}

impl Ord for I256 {
	fn cmp(&self, other: &I256) -> Ordering {
		match (self.0, other.0) {
			(Sign::Zero, Sign::Zero) => Ordering::Equal,
			(Sign::Zero, Sign::Plus) => Ordering::Less,
			(Sign::Zero, Sign::Minus) => Ordering::Greater,
			(Sign::Minus, Sign::Zero) => Ordering::Less,
			(Sign::Minus, Sign::Plus) => Ordering::Less,
			(Sign::Minus, Sign::Minus) => self.1.cmp(&other.1).reverse(),
			(Sign::Plus, Sign::Minus) => Ordering::Greater,
			(Sign::Plus, Sign::Zero) => Ordering::Greater,
			(Sign::Plus, Sign::Plus) => self.1.cmp(&other.1),
		}
	}
}

impl PartialOrd for I256 {
	fn partial_cmp(&self, other: &I256) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Default for I256 {
	fn default() -> I256 {
		I256::zero()
	}
}

impl From<U256> for I256 {
	fn from(val: U256) -> I256 {
		if val == U256::zero() {
			I256::zero()
		} else if val & (U256::MAX >> 1) == val {
			I256(Sign::Plus, val)
		} else {
			I256(Sign::Minus, !val + U256::one())
		}
	}
}

impl From<I256> for U256 {
	fn from(value: I256) -> U256 {
		match value.0 {
			Sign::Zero => U256::zero(),
			Sign::Plus => value.1,
			Sign::Minus => !value.1 + U256::one(),
		}
	}
}

impl Div for I256 {
	type Output = I256;

	fn div(self, other: I256) -> I256 {
		if other == I256::zero() {
			return I256::zero();
		}

		// MIN / -1 exceeds the positive range and wraps back to MIN.
		if self == I256::min_value() && other == I256(Sign::Minus, U256::one()) {
			return I256::min_value();
		}

		let quotient = self.1 / other.1;
		let remainder = self.1 % other.1;
		let negative = matches!(
			(self.0, other.0),
			(Sign::Plus, Sign::Minus) | (Sign::Minus, Sign::Plus)
		);

		// Floor rounding: a negative quotient with a nonzero remainder moves
		// away from zero.
		let magnitude = if negative && !remainder.is_zero() {
			quotient + U256::one()
		} else {
			quotient
		};

		if magnitude.is_zero() {
			return I256::zero();
		}

		I256(if negative { Sign::Minus } else { Sign::Plus }, magnitude)
	}
}

impl Rem for I256 {
	type Output = I256;

	fn rem(self, other: I256) -> I256 {
		if other == I256::zero() {
			return I256::zero();
		}

		let remainder = self.1 % other.1;
		if remainder.is_zero() {
			return I256::zero();
		}

		// Floor remainder carries the sign of the divisor.
		let opposite = matches!(
			(self.0, other.0),
			(Sign::Plus, Sign::Minus) | (Sign::Minus, Sign::Plus)
		);

		if opposite {
			I256(other.0, other.1 - remainder)
		} else {
			I256(self.0, remainder)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn i256(v: i64) -> I256 {
		if v >= 0 {
			I256::from(U256::from(v as u64))
		} else {
			I256(Sign::Minus, U256::from(v.unsigned_abs()))
		}
	}

	#[test]
	fn div_i256_floors() {
		// Same signs behave like plain integer division.
		assert_eq!(i256(100) / i256(2), i256(50));
		assert_eq!(i256(-100) / i256(-2), i256(50));
		assert_eq!(i256(7) / i256(3), i256(2));

		// Opposite signs round toward negative infinity.
		assert_eq!(i256(7) / i256(-3), i256(-3));
		assert_eq!(i256(-7) / i256(3), i256(-3));
		assert_eq!(i256(-6) / i256(3), i256(-2));

		assert_eq!(i256(5) / i256(0), I256::zero());
		assert_eq!(I256::min_value() / i256(-1), I256::min_value());
		assert_eq!(I256::min_value() / i256(1), I256::min_value());
	}

	#[test]
	fn rem_i256_follows_divisor() {
		assert_eq!(i256(7) % i256(3), i256(1));
		assert_eq!(i256(-7) % i256(-3), i256(-1));
		assert_eq!(i256(7) % i256(-3), i256(-2));
		assert_eq!(i256(-7) % i256(3), i256(2));
		assert_eq!(i256(6) % i256(3), I256::zero());
		assert_eq!(i256(5) % i256(0), I256::zero());
	}

	#[test]
	fn i256_roundtrips_through_u256() {
		for v in [0i64, 1, -1, 42, -42, i64::MAX, i64::MIN] {
			assert_eq!(I256::from(U256::from(i256(v))), i256(v));
		}
	}

	#[test]
	fn signed_word_bounds() {
		assert!(i256_to_h256(I256(Sign::Plus, U256::MAX >> 1)).is_ok());
		assert_eq!(
			i256_to_h256(I256(Sign::Plus, (U256::MAX >> 1) + U256::one())),
			Err(VmError::SignedIntegerOutOfBounds)
		);
		assert!(i256_to_h256(I256::min_value()).is_ok());
		assert_eq!(
			i256_to_h256(I256(Sign::Minus, (U256::MAX >> 1) + U256::from(2u64))),
			Err(VmError::SignedIntegerOutOfBounds)
		);
	}

	#[test]
	fn pad_to_word_bounds() {
		let padded = pad_to_word(&[0x2a]).unwrap();
		assert_eq!(h256_to_u256(padded), U256::from(0x2au64));
		assert_eq!(pad_to_word(&[0u8; 33]), Err(VmError::ValueOverflow));
	}
}
