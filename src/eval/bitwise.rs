//! Comparison and bitwise opcodes.

use primitive_types::U256;

use super::Control;
use crate::error::VmError;
use crate::machine::Machine;
use crate::utils::{I256, Sign};

fn bool_to_u256(b: bool) -> U256 {
	if b {
		U256::one()
	} else {
		U256::zero()
	}
}

pub fn lt(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, bool_to_u256(op1 < op2));
	Ok(Control::Continue)
}

pub fn gt(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, bool_to_u256(op1 > op2));
	Ok(Control::Continue)
}

pub fn slt(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, bool_to_u256(I256::from(op1) < I256::from(op2)));
	Ok(Control::Continue)
}

pub fn sgt(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, bool_to_u256(I256::from(op1) > I256::from(op2)));
	Ok(Control::Continue)
}

pub fn eq(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, bool_to_u256(op1 == op2));
	Ok(Control::Continue)
}

pub fn iszero(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1);
	push_u256!(machine, bool_to_u256(op1.is_zero()));
	Ok(Control::Continue)
}

pub fn and(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1 & op2);
	Ok(Control::Continue)
}

pub fn or(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1 | op2);
	Ok(Control::Continue)
}

pub fn xor(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1 ^ op2);
	Ok(Control::Continue)
}

pub fn not(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1);
	push_u256!(machine, !op1);
	Ok(Control::Continue)
}

pub fn byte(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	// Byte index 0 is the most significant; anything past 31 reads zero.
	let ret = if op1 >= U256::from(32u64) {
		U256::zero()
	} else {
		U256::from(op2.byte(31 - op1.low_u64() as usize))
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn shl(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, shift, value);
	let ret = if value.is_zero() || shift >= U256::from(256u64) {
		U256::zero()
	} else {
		value << (shift.low_u64() as usize)
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn shr(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, shift, value);
	let ret = if value.is_zero() || shift >= U256::from(256u64) {
		U256::zero()
	} else {
		value >> (shift.low_u64() as usize)
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn sar(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, shift, value);
	let value = I256::from(value);

	let ret = if value == I256::zero() || shift >= U256::from(256u64) {
		match value.0 {
			// value is 0 or >= 1, saturating to 0
			Sign::Plus | Sign::Zero => U256::zero(),
			// value is < 0, saturating to -1
			Sign::Minus => I256(Sign::Minus, U256::one()).into(),
		}
	} else {
		let shift = shift.low_u64() as usize;

		match value.0 {
			Sign::Plus | Sign::Zero => value.1 >> shift,
			Sign::Minus => {
				let shifted = ((value.1.overflowing_sub(U256::one()).0) >> shift)
					.overflowing_add(U256::one())
					.0;
				I256(Sign::Minus, shifted).into()
			}
		}
	};

	push_u256!(machine, ret);
	Ok(Control::Continue)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::{h256_to_u256, u256_to_h256};
	use crate::ExecConfig;

	fn binary(
		f: fn(&mut Machine) -> Result<Control, VmError>,
		a: U256,
		b: U256,
	) -> U256 {
		let mut machine = Machine::new(Vec::new(), Vec::new(), Vec::new(), ExecConfig::default());
		machine.stack.push(u256_to_h256(b)).unwrap();
		machine.stack.push(u256_to_h256(a)).unwrap();
		f(&mut machine).unwrap();
		h256_to_u256(machine.stack.pop().unwrap())
	}

	fn neg(v: u64) -> U256 {
		U256::zero().overflowing_sub(U256::from(v)).0
	}

	#[test]
	fn signed_comparisons() {
		assert_eq!(binary(slt, neg(1), U256::from(1u64)), U256::one());
		assert_eq!(binary(slt, U256::from(1u64), neg(1)), U256::zero());
		assert_eq!(binary(sgt, U256::from(1u64), neg(1)), U256::one());
	}

	#[test]
	fn byte_boundaries() {
		let x = h256_to_u256(crate::utils::pad_to_word(&[0xab]).unwrap());
		// Least significant byte is index 31.
		assert_eq!(binary(byte, U256::from(31u64), x), U256::from(0xabu64));
		// Most significant byte of a small value is zero.
		assert_eq!(binary(byte, U256::from(0u64), x), U256::zero());
		assert_eq!(binary(byte, U256::from(32u64), U256::MAX), U256::zero());

		let top = U256::from(0x80u64) << 248usize;
		assert_eq!(binary(byte, U256::from(0u64), top), U256::from(0x80u64));
	}

	#[test]
	fn shifts_cap_at_256() {
		assert_eq!(binary(shl, U256::from(256u64), U256::MAX), U256::zero());
		assert_eq!(binary(shr, U256::from(256u64), U256::MAX), U256::zero());
		assert_eq!(
			binary(shl, U256::from(1u64), U256::from(1u64)),
			U256::from(2u64)
		);
		assert_eq!(
			binary(shr, U256::from(1u64), U256::from(4u64)),
			U256::from(2u64)
		);
	}

	#[test]
	fn sar_saturates() {
		// Negative values saturate to -1, non-negative to 0.
		assert_eq!(binary(sar, U256::from(256u64), neg(5)), U256::MAX);
		assert_eq!(binary(sar, U256::from(256u64), U256::from(5u64)), U256::zero());
		// Arithmetic shift keeps the sign.
		assert_eq!(binary(sar, U256::from(1u64), neg(4)), neg(2));
		assert_eq!(binary(sar, U256::from(1u64), neg(5)), neg(3));
		assert_eq!(
			binary(sar, U256::from(1u64), U256::from(4u64)),
			U256::from(2u64)
		);
	}
}
