//! The interpreter machine and its driver loop.

use std::collections::BTreeMap;
use std::rc::Rc;

use primitive_types::{H256, U256};

use crate::error::VmError;
use crate::eval::{self, Control};
use crate::ffi::FfiTable;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::program::Program;
use crate::stack::Stack;
use crate::ExecConfig;

/// Core interpreter state for one execution.
pub struct Machine {
	/// Encoded program code, as `CODESIZE`/`CODECOPY` observe it.
	pub(crate) code: Rc<Vec<u8>>,
	/// Program map over the decoded code.
	program: Rc<Program>,
	/// Call data.
	pub(crate) data: Rc<Vec<u8>>,
	/// Apparent value, as `CALLVALUE` observes it.
	pub(crate) value: U256,
	/// Byte position of the next instruction.
	position: usize,
	/// Word stack.
	pub stack: Stack,
	/// Byte memory.
	pub memory: Memory,
	/// Transient storage, scoped to this execution.
	pub(crate) transient: BTreeMap<H256, H256>,
	/// Return buffer: what `RETURN`/`REVERT` produced, or what the last
	/// `STATICCALL` handed back.
	pub(crate) return_data: Vec<u8>,
	halted: bool,
	reverted: bool,
	/// FFI registry consulted by `STATICCALL`.
	pub(crate) ffis: FfiTable,
	verbose: bool,
}

/// What an execution left behind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionResult {
	/// Final stack, top of stack first.
	pub stack: Vec<H256>,
	/// Whether the execution ended via `REVERT` (or a reverting
	/// `STATICCALL`).
	pub reverted: bool,
	/// Return or revert bytes.
	pub return_data: Vec<u8>,
}

impl Machine {
	/// Create a machine over decoded instructions and their encoded form.
	/// The configured FFI table is merged over the built-ins, caller
	/// entries winning.
	pub fn new(
		code: Vec<u8>,
		instructions: Vec<Opcode>,
		data: Vec<u8>,
		config: ExecConfig,
	) -> Self {
		let mut ffis = FfiTable::builtin();
		ffis.merge(config.ffis);

		Self {
			code: Rc::new(code),
			program: Rc::new(Program::new(instructions)),
			data: Rc::new(data),
			value: config.callvalue,
			position: 0,
			stack: Stack::new(),
			memory: Memory::new(),
			transient: BTreeMap::new(),
			return_data: Vec::new(),
			halted: false,
			reverted: false,
			ffis,
			verbose: config.verbose,
		}
	}

	/// Byte position of the next instruction.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Whether the machine reached a terminal state.
	pub fn halted(&self) -> bool {
		self.halted
	}

	/// Whether the machine ended via `REVERT`.
	pub fn reverted(&self) -> bool {
		self.reverted
	}

	/// The program being executed.
	pub fn program(&self) -> &Program {
		&self.program
	}

	/// Halt with the given return bytes.
	pub(crate) fn halt(&mut self, return_data: Vec<u8>) {
		self.return_data = return_data;
		self.halted = true;
	}

	/// Halt reverted with the given revert bytes.
	pub(crate) fn revert(&mut self, return_data: Vec<u8>) {
		self.halt(return_data);
		self.reverted = true;
	}

	/// Check a jump destination: it must name a `JUMPDEST` in the program
	/// map.
	pub(crate) fn validate_jump(&self, dest: U256) -> Result<usize, VmError> {
		if dest > U256::from(usize::MAX) {
			return Err(VmError::InvalidJumpDest);
		}
		let dest = dest.as_usize();
		if self.program.is_jumpdest(dest) {
			Ok(dest)
		} else {
			Err(VmError::InvalidJumpDest)
		}
	}

	/// Execute one instruction.
	pub fn step(&mut self) -> Result<(), VmError> {
		let program = Rc::clone(&self.program);
		let position = self.position;
		let opcode = program.fetch(position).ok_or(VmError::PcOutOfBounds)?;

		if self.verbose {
			log::debug!(
				target: "purevm",
				"{:>5}: {:?} [stack {}, memory {}]",
				position,
				opcode,
				self.stack.len(),
				self.memory.len(),
			);
		}

		// The position advances by the encoded size even after a jump: the
		// landing spot is the instruction after the `JUMPDEST`, which is
		// equivalent since `JUMPDEST` is a no-op.
		match eval::eval(self, opcode, position)? {
			Control::Continue => self.position = position + opcode.size(),
			Control::Jump(dest) => self.position = dest + opcode.size(),
		}
		Ok(())
	}

	/// Drive the machine to a terminal state.
	pub fn run(&mut self) -> Result<(), VmError> {
		while !self.halted {
			self.step()?;
		}
		Ok(())
	}

	/// Consume the machine into its execution result.
	pub fn into_result(self) -> ExecutionResult {
		ExecutionResult {
			stack: self.stack.into_top_first(),
			reverted: self.reverted,
			return_data: self.return_data,
		}
	}
}
