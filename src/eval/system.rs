//! Hashing, environment, transient storage and FFI dispatch.

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

use super::Control;
use crate::error::VmError;
use crate::ffi::FfiOutcome;
use crate::machine::Machine;
use crate::memory::Memory;
use crate::utils::u256_to_h160;

/// Fixed value pushed by `GAS`. Gas is not metered here.
pub const GAS_STUB: u64 = 4_000_000;

pub fn sha3(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, from, len);
	let data = machine
		.memory
		.read(Memory::to_offset(from)?, Memory::to_offset(len)?)?;
	let ret = Keccak256::digest(data.as_slice());
	push!(machine, H256::from_slice(ret.as_slice()));
	Ok(Control::Continue)
}

pub fn callvalue(machine: &mut Machine) -> Result<Control, VmError> {
	push_u256!(machine, machine.value);
	Ok(Control::Continue)
}

pub fn calldataload(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, index);

	// Calldata reads are zero-extended past the end.
	let mut load = [0u8; 32];
	#[allow(clippy::needless_range_loop)]
	for i in 0..32 {
		if let Some(p) = index.checked_add(U256::from(i)) {
			if p < U256::from(machine.data.len()) {
				load[i] = machine.data[p.low_u64() as usize];
			}
		}
	}

	push!(machine, H256::from(load));
	Ok(Control::Continue)
}

pub fn calldatasize(machine: &mut Machine) -> Result<Control, VmError> {
	push_u256!(machine, U256::from(machine.data.len()));
	Ok(Control::Continue)
}

pub fn calldatacopy(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, memory_offset, data_offset, len);
	machine.memory.copy_from(
		Memory::to_offset(memory_offset)?,
		data_offset,
		Memory::to_offset(len)?,
		&machine.data,
	)?;
	Ok(Control::Continue)
}

pub fn codesize(machine: &mut Machine) -> Result<Control, VmError> {
	// Size of the encoded bytecode, not the instruction count.
	push_u256!(machine, U256::from(machine.code.len()));
	Ok(Control::Continue)
}

pub fn codecopy(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, memory_offset, code_offset, len);
	machine.memory.copy_from(
		Memory::to_offset(memory_offset)?,
		code_offset,
		Memory::to_offset(len)?,
		&machine.code,
	)?;
	Ok(Control::Continue)
}

pub fn returndatasize(machine: &mut Machine) -> Result<Control, VmError> {
	push_u256!(machine, U256::from(machine.return_data.len()));
	Ok(Control::Continue)
}

pub fn returndatacopy(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, memory_offset, data_offset, len);
	machine.memory.copy_from(
		Memory::to_offset(memory_offset)?,
		data_offset,
		Memory::to_offset(len)?,
		&machine.return_data,
	)?;
	Ok(Control::Continue)
}

pub fn gas(machine: &mut Machine) -> Result<Control, VmError> {
	push_u256!(machine, U256::from(GAS_STUB));
	Ok(Control::Continue)
}

pub fn tload(machine: &mut Machine) -> Result<Control, VmError> {
	pop!(machine, key);
	let value = machine.transient.get(&key).copied().unwrap_or_default();
	push!(machine, value);
	Ok(Control::Continue)
}

pub fn tstore(machine: &mut Machine) -> Result<Control, VmError> {
	pop!(machine, key, value);
	machine.transient.insert(key, value);
	Ok(Control::Continue)
}

/// `STATICCALL`, restricted to the FFI registry. `gas` is popped and
/// ignored. A reverting handler halts the whole execution: the machine's
/// revert flag is raised alongside the pushed 0, unlike a mainnet call
/// where only the inner frame aborts.
pub fn staticcall(machine: &mut Machine) -> Result<Control, VmError> {
	pop_u256!(machine, _gas, addr, args_offset, args_size, ret_offset, ret_size);

	let address = u256_to_h160(addr);
	let args = machine
		.memory
		.read(Memory::to_offset(args_offset)?, Memory::to_offset(args_size)?)?;

	let handler = machine
		.ffis
		.get(&address)
		.ok_or(VmError::UnknownFfi(address))?
		.clone();

	match handler(&args) {
		FfiOutcome::Return(data) => {
			let ret_offset = Memory::to_offset(ret_offset)?;
			let ret_size = Memory::to_offset(ret_size)?;

			// Copy out the first `ret_size` bytes, right-padded with zeros
			// when the handler returned fewer.
			let mut out = vec![0u8; ret_size];
			let n = ret_size.min(data.len());
			out[..n].copy_from_slice(&data[..n]);
			machine.memory.write(ret_offset, &out)?;

			machine.return_data = data;
			push_u256!(machine, U256::one());
		}
		FfiOutcome::Revert(data) => {
			machine.revert(data);
			push_u256!(machine, U256::zero());
		}
	}

	Ok(Control::Continue)
}
