//! Bytecode assembler and disassembler.
//!
//! Standard EVM byte encoding: every opcode is one byte, except `PUSHn`
//! (`0x60 + (n - 1)`) which is followed by `n` immediate bytes.

use core::cmp::min;

use crate::error::VmError;
use crate::opcode::Opcode;

/// Decode raw bytecode into an opcode sequence. Total: bytes outside the
/// opcode table become [Opcode::INVALID], and a push immediate cut short by
/// the end of code keeps whatever bytes are present.
pub fn disassemble(code: &[u8]) -> Vec<Opcode> {
	let mut instructions = Vec::new();
	let mut position = 0;

	while position < code.len() {
		let instruction = decode_at(code, position);
		position += instruction.size();
		instructions.push(instruction);
	}

	instructions
}

/// Encode an opcode sequence back into bytecode. `PUSH` immediates are
/// emitted left-padded with zeros to exactly their declared width, so the
/// program counter map of the encoded form matches the decoded one.
pub fn assemble(instructions: &[Opcode]) -> Result<Vec<u8>, VmError> {
	let mut code = Vec::new();

	for instruction in instructions {
		match instruction {
			Opcode::PUSH(n, bytes) => {
				if *n == 0 || *n > 32 || bytes.len() > *n {
					return Err(VmError::InvalidPush(*n, bytes.clone()));
				}
				code.push(instruction.as_byte());
				code.resize(code.len() + n - bytes.len(), 0);
				code.extend_from_slice(bytes);
			}
			Opcode::DUP(n) | Opcode::SWAP(n) if !(1..=16).contains(n) => {
				return Err(VmError::NotImplemented(instruction.clone()));
			}
			Opcode::LOG(n) if *n > 4 => {
				return Err(VmError::NotImplemented(instruction.clone()));
			}
			_ => code.push(instruction.as_byte()),
		}
	}

	Ok(code)
}

fn decode_at(code: &[u8], position: usize) -> Opcode {
	match code[position] {
		0x00 => Opcode::STOP,
		0x01 => Opcode::ADD,
		0x02 => Opcode::MUL,
		0x03 => Opcode::SUB,
		0x04 => Opcode::DIV,
		0x05 => Opcode::SDIV,
		0x06 => Opcode::MOD,
		0x07 => Opcode::SMOD,
		0x08 => Opcode::ADDMOD,
		0x09 => Opcode::MULMOD,
		0x0a => Opcode::EXP,
		0x0b => Opcode::SIGNEXTEND,

		0x10 => Opcode::LT,
		0x11 => Opcode::GT,
		0x12 => Opcode::SLT,
		0x13 => Opcode::SGT,
		0x14 => Opcode::EQ,
		0x15 => Opcode::ISZERO,
		0x16 => Opcode::AND,
		0x17 => Opcode::OR,
		0x18 => Opcode::XOR,
		0x19 => Opcode::NOT,
		0x1a => Opcode::BYTE,
		0x1b => Opcode::SHL,
		0x1c => Opcode::SHR,
		0x1d => Opcode::SAR,

		0x20 => Opcode::SHA3,

		0x30 => Opcode::ADDRESS,
		0x31 => Opcode::BALANCE,
		0x32 => Opcode::ORIGIN,
		0x33 => Opcode::CALLER,
		0x34 => Opcode::CALLVALUE,
		0x35 => Opcode::CALLDATALOAD,
		0x36 => Opcode::CALLDATASIZE,
		0x37 => Opcode::CALLDATACOPY,
		0x38 => Opcode::CODESIZE,
		0x39 => Opcode::CODECOPY,
		0x3a => Opcode::GASPRICE,
		0x3b => Opcode::EXTCODESIZE,
		0x3c => Opcode::EXTCODECOPY,
		0x3d => Opcode::RETURNDATASIZE,
		0x3e => Opcode::RETURNDATACOPY,
		0x3f => Opcode::EXTCODEHASH,

		0x40 => Opcode::BLOCKHASH,
		0x41 => Opcode::COINBASE,
		0x42 => Opcode::TIMESTAMP,
		0x43 => Opcode::NUMBER,
		0x44 => Opcode::PREVRANDAO,
		0x45 => Opcode::GASLIMIT,
		0x46 => Opcode::CHAINID,
		0x47 => Opcode::SELFBALANCE,
		0x48 => Opcode::BASEFEE,
		0x49 => Opcode::BLOBHASH,
		0x4a => Opcode::BLOBBASEFEE,

		0x50 => Opcode::POP,
		0x51 => Opcode::MLOAD,
		0x52 => Opcode::MSTORE,
		0x53 => Opcode::MSTORE8,
		0x54 => Opcode::SLOAD,
		0x55 => Opcode::SSTORE,
		0x56 => Opcode::JUMP,
		0x57 => Opcode::JUMPI,
		0x58 => Opcode::PC,
		0x59 => Opcode::MSIZE,
		0x5a => Opcode::GAS,
		0x5b => Opcode::JUMPDEST,
		0x5c => Opcode::TLOAD,
		0x5d => Opcode::TSTORE,
		0x5e => Opcode::MCOPY,

		byte @ 0x60..=0x7f => {
			let n = (byte - 0x5f) as usize;
			let end = min(position + 1 + n, code.len());
			Opcode::PUSH(n, code[position + 1..end].to_vec())
		}
		byte @ 0x80..=0x8f => Opcode::DUP((byte - 0x7f) as usize),
		byte @ 0x90..=0x9f => Opcode::SWAP((byte - 0x8f) as usize),
		byte @ 0xa0..=0xa4 => Opcode::LOG((byte - 0xa0) as usize),

		0xf0 => Opcode::CREATE,
		0xf1 => Opcode::CALL,
		0xf2 => Opcode::CALLCODE,
		0xf3 => Opcode::RETURN,
		0xf4 => Opcode::DELEGATECALL,
		0xf5 => Opcode::CREATE2,
		0xfa => Opcode::STATICCALL,
		0xfd => Opcode::REVERT,
		0xff => Opcode::SELFDESTRUCT,

		byte => Opcode::INVALID(byte),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn disassemble_push_and_stop() {
		let code = [0x60, 0x2a, 0x61, 0x01, 0x02, 0x00];
		assert_eq!(
			disassemble(&code),
			vec![
				Opcode::PUSH(1, vec![0x2a]),
				Opcode::PUSH(2, vec![0x01, 0x02]),
				Opcode::STOP,
			]
		);
	}

	#[test]
	fn disassemble_truncated_push() {
		// PUSH4 with only two immediate bytes left in the code.
		let code = [0x63, 0xde, 0xad];
		assert_eq!(disassemble(&code), vec![Opcode::PUSH(4, vec![0xde, 0xad])]);
	}

	#[test]
	fn disassemble_unknown_byte() {
		assert_eq!(disassemble(&[0x5f]), vec![Opcode::INVALID(0x5f)]);
		assert_eq!(disassemble(&[0xfe]), vec![Opcode::INVALID(0xfe)]);
	}

	#[test]
	fn assemble_pads_short_immediates() {
		let code = assemble(&[Opcode::PUSH(4, vec![0xde, 0xad]), Opcode::STOP]).unwrap();
		assert_eq!(code, vec![0x63, 0x00, 0x00, 0xde, 0xad, 0x00]);
	}

	#[test]
	fn assemble_rejects_oversized_immediate() {
		assert_eq!(
			assemble(&[Opcode::PUSH(1, vec![1, 2])]),
			Err(VmError::InvalidPush(1, vec![1, 2]))
		);
	}

	#[test]
	fn roundtrip_keeps_positions() {
		let code = hex::decode("602a60005260206000f35b80").unwrap();
		let instructions = disassemble(&code);
		assert_eq!(assemble(&instructions).unwrap(), code);
	}
}
