//! Program map: program counter to decoded instruction.

use crate::opcode::Opcode;

/// Mapping from byte position to instruction, built once from the decoded
/// code by accumulating encoded sizes. Positions inside a push immediate
/// (and past the end of code) map to nothing and are invalid both as jump
/// targets and when reached by sequential execution.
#[derive(Clone, Debug)]
pub struct Program {
	instructions: Vec<Opcode>,
	map: Vec<Option<u32>>,
}

impl Program {
	/// Build the map for a decoded instruction sequence.
	pub fn new(instructions: Vec<Opcode>) -> Self {
		let len: usize = instructions.iter().map(Opcode::size).sum();
		let mut map = vec![None; len];

		let mut position = 0;
		for (index, instruction) in instructions.iter().enumerate() {
			map[position] = Some(index as u32);
			position += instruction.size();
		}

		Self { instructions, map }
	}

	/// The instruction at `position`, if any.
	pub fn fetch(&self, position: usize) -> Option<&Opcode> {
		self.map
			.get(position)
			.copied()
			.flatten()
			.map(|index| &self.instructions[index as usize])
	}

	/// Whether `position` holds a `JUMPDEST`.
	pub fn is_jumpdest(&self, position: usize) -> bool {
		matches!(self.fetch(position), Some(Opcode::JUMPDEST))
	}

	/// The decoded instruction sequence.
	pub fn instructions(&self) -> &[Opcode] {
		&self.instructions
	}

	/// Total encoded length in bytes.
	pub fn encoded_len(&self) -> usize {
		self.map.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positions_skip_push_immediates() {
		// PUSH2 0x5b5b, JUMPDEST, STOP
		let program = Program::new(vec![
			Opcode::PUSH(2, vec![0x5b, 0x5b]),
			Opcode::JUMPDEST,
			Opcode::STOP,
		]);

		assert_eq!(program.fetch(0), Some(&Opcode::PUSH(2, vec![0x5b, 0x5b])));
		assert_eq!(program.fetch(1), None);
		assert_eq!(program.fetch(2), None);
		assert_eq!(program.fetch(3), Some(&Opcode::JUMPDEST));
		assert_eq!(program.fetch(4), Some(&Opcode::STOP));
		assert_eq!(program.fetch(5), None);
	}

	#[test]
	fn jumpdest_bytes_inside_immediates_do_not_count() {
		let program = Program::new(vec![
			Opcode::PUSH(2, vec![0x5b, 0x5b]),
			Opcode::JUMPDEST,
		]);

		assert!(!program.is_jumpdest(1));
		assert!(!program.is_jumpdest(2));
		assert!(program.is_jumpdest(3));
		assert!(!program.is_jumpdest(100));
	}

	#[test]
	fn empty_code_has_no_positions() {
		let program = Program::new(Vec::new());
		assert_eq!(program.fetch(0), None);
		assert_eq!(program.encoded_len(), 0);
	}
}
