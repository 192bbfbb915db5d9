//! Pure-function EVM interpreter.
//!
//! Executes EVM bytecode against calldata and returns either return data or
//! revert data. Every opcode that would observe or mutate chain state —
//! accounts, storage, balances, logs, blocks, external calls — is rejected
//! with [VmError::Impure]. The sandbox supports computation, memory,
//! transient storage, and `STATICCALL` dispatched to host-registered FFI
//! handlers keyed by 20-byte address.
//!
//! Gas is not metered: `GAS` pushes a fixed constant, and execution is
//! bounded only by opcode errors and the memory quota. Callers that need
//! timeouts must wrap the call.
//!
//! ```
//! use purevm::{exec, ExecConfig};
//!
//! // PUSH1 0x2a, PUSH1 0x00, MSTORE, PUSH1 0x20, PUSH1 0x00, RETURN
//! let code = hex::decode("602a60005260206000f3").unwrap();
//! let result = exec(code, Vec::new(), ExecConfig::default()).unwrap();
//! assert!(!result.reverted);
//! assert_eq!(result.return_data[31], 0x2a);
//! ```

pub mod asm;
mod console;
mod error;
mod eval;
mod ffi;
mod machine;
mod memory;
mod opcode;
mod program;
mod stack;
pub mod utils;

pub use crate::error::VmError;
pub use crate::ffi::{FfiHandler, FfiOutcome, FfiTable, CONSOLE_ADDRESS};
pub use crate::machine::{ExecutionResult, Machine};
pub use crate::memory::{Memory, MEMORY_LIMIT};
pub use crate::opcode::Opcode;
pub use crate::program::Program;
pub use crate::stack::{Stack, STACK_LIMIT};

use primitive_types::U256;

/// Program code accepted by [exec]: raw bytecode, or an already decoded
/// opcode sequence.
#[derive(Clone, Debug)]
pub enum Code {
	/// Raw bytes, disassembled on entry.
	Raw(Vec<u8>),
	/// Decoded instructions, assembled on entry so `CODESIZE`/`CODECOPY`
	/// can observe the encoded form.
	Listing(Vec<Opcode>),
}

impl From<Vec<u8>> for Code {
	fn from(bytes: Vec<u8>) -> Self {
		Code::Raw(bytes)
	}
}

impl From<&[u8]> for Code {
	fn from(bytes: &[u8]) -> Self {
		Code::Raw(bytes.to_vec())
	}
}

impl From<Vec<Opcode>> for Code {
	fn from(instructions: Vec<Opcode>) -> Self {
		Code::Listing(instructions)
	}
}

impl From<&[Opcode]> for Code {
	fn from(instructions: &[Opcode]) -> Self {
		Code::Listing(instructions.to_vec())
	}
}

/// Per-execution options.
#[derive(Clone, Debug, Default)]
pub struct ExecConfig {
	/// Value exposed via `CALLVALUE`.
	pub callvalue: U256,
	/// Caller FFI handlers, merged over the built-ins (caller wins).
	pub ffis: FfiTable,
	/// Emit a trace line per step through the `log` facade.
	pub verbose: bool,
}

/// Execute `code` against `calldata` and return the full execution result,
/// or the error that aborted it.
pub fn exec(
	code: impl Into<Code>,
	calldata: Vec<u8>,
	config: ExecConfig,
) -> Result<ExecutionResult, VmError> {
	let (encoded, instructions) = match code.into() {
		Code::Raw(bytes) => {
			let instructions = asm::disassemble(&bytes);
			(bytes, instructions)
		}
		Code::Listing(instructions) => {
			let encoded = asm::assemble(&instructions)?;
			(encoded, instructions)
		}
	};

	let mut machine = Machine::new(encoded, instructions, calldata, config);
	machine.run()?;
	Ok(machine.into_result())
}

/// Outcome of [exec_call]: the return-or-revert collapse of an execution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallOutcome {
	/// The code returned with the given bytes.
	Returned(Vec<u8>),
	/// The code reverted with the given bytes.
	Reverted(Vec<u8>),
}

/// Execute `code` against `calldata` and collapse the result to
/// return-or-revert bytes. Interpreter errors surface through the outer
/// `Result`.
pub fn exec_call(
	code: impl Into<Code>,
	calldata: Vec<u8>,
	config: ExecConfig,
) -> Result<CallOutcome, VmError> {
	let result = exec(code, calldata, config)?;
	Ok(if result.reverted {
		CallOutcome::Reverted(result.return_data)
	} else {
		CallOutcome::Returned(result.return_data)
	})
}
