//! Interpreter errors.

use primitive_types::H160;

use crate::opcode::Opcode;

/// Errors that abort the current execution. All of them are fatal: the
/// machine is discarded and the error unwinds to the caller of `exec`.
///
/// `REVERT` is deliberately not among them. Reverting is a normal terminal
/// state, reported through the execution result together with the revert
/// bytes.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum VmError {
	/// The program counter does not point at an instruction, either because
	/// execution ran off the end of the code or because it landed inside a
	/// push immediate.
	#[error("program counter out of bounds")]
	PcOutOfBounds,
	/// Popped an empty stack.
	#[error("stack underflow")]
	StackUnderflow,
	/// Pushed past the 1024-item stack limit.
	#[error("stack overflow")]
	StackOverflow,
	/// A byte string longer than 32 bytes was forced into a word.
	#[error("value overflows a 256-bit word")]
	ValueOverflow,
	/// A signed value lies outside `[-2^255, 2^255)`.
	#[error("signed integer out of word bounds")]
	SignedIntegerOutOfBounds,
	/// Memory would grow past the byte quota.
	#[error("out of memory")]
	OutOfMemory,
	/// Jump target is not a `JUMPDEST`.
	#[error("invalid jump destination")]
	InvalidJumpDest,
	/// Executed the designated `INVALID` opcode.
	#[error("invalid operation")]
	InvalidOperation,
	/// A `PUSH` carried an immediate longer than its declared width.
	#[error("push immediate {1:?} exceeds width {0}")]
	InvalidPush(usize, Vec<u8>),
	/// `STATICCALL` to an address with no registered handler.
	#[error("no FFI registered at {0:?}")]
	UnknownFfi(H160),
	/// The opcode would observe or mutate state outside the sandbox.
	#[error("impure opcode {0:?}")]
	Impure(Opcode),
	/// The opcode is recognized but outside the implemented set.
	#[error("opcode {0:?} is not implemented")]
	NotImplemented(Opcode),
}
