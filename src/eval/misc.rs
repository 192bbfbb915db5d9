//! Stack, memory, control flow and termination opcodes.

use primitive_types::{H256, U256};

use super::Control;
use crate::error::VmError;
use crate::machine::Machine;
use crate::memory::Memory;
use crate::utils::pad_to_word;

#[inline]
pub fn stop(machine: &mut Machine) -> Result<Control, VmError> {
	machine.halt(Vec::new());
	Ok(Control::Continue)
}

#[inline]
pub fn pop(machine: &mut Machine) -> Result<Control, VmError> {
	pop!(machine, _val);
	Ok(Control::Continue)
}

#[inline]
pub fn mload(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, index);
	let index = Memory::to_offset(index)?;
	let value = machine.memory.read(index, 32)?;
	push!(machine, H256::from_slice(&value));
	Ok(Control::Continue)
}

#[inline]
pub fn mstore(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, index);
	pop!(machine, value);
	let index = Memory::to_offset(index)?;
	machine.memory.write(index, value.as_bytes())?;
	Ok(Control::Continue)
}

#[inline]
pub fn mstore8(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, index, value);
	let index = Memory::to_offset(index)?;
	machine.memory.write(index, &[value.byte(0)])?;
	Ok(Control::Continue)
}

#[inline]
pub fn mcopy(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, dst, src, len);
	machine.memory.copy_within(
		Memory::to_offset(dst)?,
		Memory::to_offset(src)?,
		Memory::to_offset(len)?,
	)?;
	Ok(Control::Continue)
}

#[inline]
pub fn msize(machine: &mut Machine) -> Result<Control, VmError> {
	// The raw byte length, not rounded up to a word boundary.
	push_u256!(machine, U256::from(machine.memory.len()));
	Ok(Control::Continue)
}

#[inline]
pub fn jump(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, dest);
	Ok(Control::Jump(machine.validate_jump(dest)?))
}

#[inline]
pub fn jumpi(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, dest);
	pop!(machine, value);

	if value == H256::zero() {
		Ok(Control::Continue)
	} else {
		Ok(Control::Jump(machine.validate_jump(dest)?))
	}
}

#[inline]
pub fn pc(machine: &mut Machine, position: usize) -> Result<Control, VmError> {
	push_u256!(machine, U256::from(position));
	Ok(Control::Continue)
}

#[inline]
pub fn push(machine: &mut Machine, n: usize, bytes: &[u8]) -> Result<Control, VmError> {
	if bytes.len() > n {
		return Err(VmError::InvalidPush(n, bytes.to_vec()));
	}
	push!(machine, pad_to_word(bytes)?);
	Ok(Control::Continue)
}

#[inline]
pub fn dup(machine: &mut Machine, n: usize) -> Result<Control, VmError> {
	let value = machine.stack.peek(n - 1)?;
	push!(machine, value);
	Ok(Control::Continue)
}

#[inline]
pub fn swap(machine: &mut Machine, n: usize) -> Result<Control, VmError> {
	let val1 = machine.stack.peek(0)?;
	let val2 = machine.stack.peek(n)?;
	machine.stack.set(0, val2)?;
	machine.stack.set(n, val1)?;
	Ok(Control::Continue)
}

#[inline]
pub fn ret(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, start, len);
	let data = machine
		.memory
		.read(Memory::to_offset(start)?, Memory::to_offset(len)?)?;
	machine.halt(data);
	Ok(Control::Continue)
}

#[inline]
pub fn revert(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, start, len);
	let data = machine
		.memory
		.read(Memory::to_offset(start)?, Memory::to_offset(len)?)?;
	machine.revert(data);
	Ok(Control::Continue)
}
