//! Arithmetic opcodes. Unsigned operations are closed mod 2^256; the
//! signed pair rounds toward negative infinity.

use primitive_types::{U256, U512};

use super::Control;
use crate::error::VmError;
use crate::machine::Machine;
use crate::utils::{i256_to_h256, I256};

pub fn add(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1.overflowing_add(op2).0);
	Ok(Control::Continue)
}

pub fn mul(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1.overflowing_mul(op2).0);
	Ok(Control::Continue)
}

pub fn sub(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	push_u256!(machine, op1.overflowing_sub(op2).0);
	Ok(Control::Continue)
}

pub fn div(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	let ret = if op2.is_zero() {
		U256::zero()
	} else {
		op1 / op2
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn rem(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	let ret = if op2.is_zero() {
		U256::zero()
	} else {
		op1 % op2
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn sdiv(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	let ret = I256::from(op1) / I256::from(op2);
	push!(machine, i256_to_h256(ret)?);
	Ok(Control::Continue)
}

pub fn srem(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	let ret = I256::from(op1) % I256::from(op2);
	push!(machine, i256_to_h256(ret)?);
	Ok(Control::Continue)
}

pub fn addmod(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2, op3);
	let ret = if op3.is_zero() {
		U256::zero()
	} else {
		// The sum exceeds a word, so widen before reducing.
		let v = (U512::from(op1) + U512::from(op2)) % U512::from(op3);
		v.try_into()
			.expect("the remainder is below the modulus which fits a word; qed")
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn mulmod(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2, op3);
	let ret = if op3.is_zero() {
		U256::zero()
	} else {
		let v = (U512::from(op1) * U512::from(op2)) % U512::from(op3);
		v.try_into()
			.expect("the remainder is below the modulus which fits a word; qed")
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}

pub fn exp(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	// Repeated squaring, wrapping each step mod 2^256. The naive power is
	// unrepresentable for large exponents.
	push_u256!(machine, op1.overflowing_pow(op2).0);
	Ok(Control::Continue)
}

pub fn signextend(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, op1, op2);
	let ret = if op1 >= U256::from(31u64) {
		op2
	} else {
		// Highest bit of the value being extended.
		let bit = op1.low_u64() as usize * 8 + 7;
		let mask = (U256::one() << (bit + 1)) - U256::one();
		if op2.bit(bit) {
			op2 | !mask
		} else {
			op2 & mask
		}
	};
	push_u256!(machine, ret);
	Ok(Control::Continue)
}
