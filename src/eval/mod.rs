//! Per-opcode state transitions.

#[macro_use]
mod macros;
mod arithmetic;
mod bitwise;
mod misc;
mod system;

use crate::error::VmError;
use crate::machine::Machine;
use crate::opcode::Opcode;

/// Control flow directive an opcode hands back to the driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Control {
	/// Proceed past this instruction. Termination is not a `Control`
	/// variant: `STOP`, `RETURN`, `REVERT` and a reverting `STATICCALL`
	/// raise the machine's halt flag instead, which the driver observes
	/// after the step.
	Continue,
	/// Proceed from a validated jump destination.
	Jump(usize),
}

/// Evaluate a single opcode against the machine. `position` is the byte
/// offset of the opcode, as `PC` observes it.
pub fn eval(machine: &mut Machine, opcode: &Opcode, position: usize) -> Result<Control, VmError> {
	match opcode {
		Opcode::STOP => misc::stop(machine),
		Opcode::ADD => arithmetic::add(machine),
		Opcode::MUL => arithmetic::mul(machine),
		Opcode::SUB => arithmetic::sub(machine),
		Opcode::DIV => arithmetic::div(machine),
		Opcode::SDIV => arithmetic::sdiv(machine),
		Opcode::MOD => arithmetic::rem(machine),
		Opcode::SMOD => arithmetic::srem(machine),
		Opcode::ADDMOD => arithmetic::addmod(machine),
		Opcode::MULMOD => arithmetic::mulmod(machine),
		Opcode::EXP => arithmetic::exp(machine),
		Opcode::SIGNEXTEND => arithmetic::signextend(machine),

		Opcode::LT => bitwise::lt(machine),
		Opcode::GT => bitwise::gt(machine),
		Opcode::SLT => bitwise::slt(machine),
		Opcode::SGT => bitwise::sgt(machine),
		Opcode::EQ => bitwise::eq(machine),
		Opcode::ISZERO => bitwise::iszero(machine),
		Opcode::AND => bitwise::and(machine),
		Opcode::OR => bitwise::or(machine),
		Opcode::XOR => bitwise::xor(machine),
		Opcode::NOT => bitwise::not(machine),
		Opcode::BYTE => bitwise::byte(machine),
		Opcode::SHL => bitwise::shl(machine),
		Opcode::SHR => bitwise::shr(machine),
		Opcode::SAR => bitwise::sar(machine),

		Opcode::SHA3 => system::sha3(machine),

		Opcode::CALLVALUE => system::callvalue(machine),
		Opcode::CALLDATALOAD => system::calldataload(machine),
		Opcode::CALLDATASIZE => system::calldatasize(machine),
		Opcode::CALLDATACOPY => system::calldatacopy(machine),
		Opcode::CODESIZE => system::codesize(machine),
		Opcode::CODECOPY => system::codecopy(machine),
		Opcode::RETURNDATASIZE => system::returndatasize(machine),
		Opcode::RETURNDATACOPY => system::returndatacopy(machine),
		Opcode::GAS => system::gas(machine),
		Opcode::TLOAD => system::tload(machine),
		Opcode::TSTORE => system::tstore(machine),
		Opcode::STATICCALL => system::staticcall(machine),

		Opcode::POP => misc::pop(machine),
		Opcode::MLOAD => misc::mload(machine),
		Opcode::MSTORE => misc::mstore(machine),
		Opcode::MSTORE8 => misc::mstore8(machine),
		Opcode::MCOPY => misc::mcopy(machine),
		Opcode::MSIZE => misc::msize(machine),
		Opcode::JUMP => misc::jump(machine),
		Opcode::JUMPI => misc::jumpi(machine),
		Opcode::PC => misc::pc(machine, position),
		Opcode::JUMPDEST => Ok(Control::Continue),

		Opcode::PUSH(n, bytes) => misc::push(machine, *n, bytes),
		Opcode::DUP(n) => misc::dup(machine, *n),
		Opcode::SWAP(n) => misc::swap(machine, *n),

		Opcode::RETURN => misc::ret(machine),
		Opcode::REVERT => misc::revert(machine),
		Opcode::INVALID(_) => Err(VmError::InvalidOperation),

		op if op.is_impure() => Err(VmError::Impure(op.clone())),
		op => Err(VmError::NotImplemented(op.clone())),
	}
}
