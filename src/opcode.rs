//! Decoded EVM opcodes.

/// Opcode enum. One-to-one corresponding to an `u8` value, except `PUSH`,
/// which carries its immediate bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(missing_docs, clippy::upper_case_acronyms)]
pub enum Opcode {
	STOP, ADD, MUL, SUB, DIV, SDIV, MOD, SMOD, ADDMOD, MULMOD, EXP,
	SIGNEXTEND,

	LT, GT, SLT, SGT, EQ, ISZERO, AND, OR, XOR, NOT, BYTE, SHL, SHR, SAR,

	SHA3,

	ADDRESS, BALANCE, ORIGIN, CALLER, CALLVALUE, CALLDATALOAD,
	CALLDATASIZE, CALLDATACOPY, CODESIZE, CODECOPY, GASPRICE,
	EXTCODESIZE, EXTCODECOPY, RETURNDATASIZE, RETURNDATACOPY, EXTCODEHASH,

	BLOCKHASH, COINBASE, TIMESTAMP, NUMBER, PREVRANDAO, GASLIMIT,
	CHAINID, SELFBALANCE, BASEFEE, BLOBHASH, BLOBBASEFEE,

	POP, MLOAD, MSTORE, MSTORE8, SLOAD, SSTORE, JUMP, JUMPI, PC, MSIZE,
	GAS, JUMPDEST, TLOAD, TSTORE, MCOPY,

	/// `PUSHn` with its immediate. The declared width `n` is `1..=32`; the
	/// immediate may be shorter when the end of code truncated it.
	PUSH(usize, Vec<u8>),
	/// `DUPn`, `1..=16`.
	DUP(usize),
	/// `SWAPn`, `1..=16`.
	SWAP(usize),
	/// `LOGn`, `0..=4`.
	LOG(usize),

	CREATE, CALL, CALLCODE, RETURN, DELEGATECALL, CREATE2, STATICCALL,
	REVERT, SELFDESTRUCT,

	/// Any byte the disassembler does not recognize, including the
	/// designated invalid opcode `0xfe`.
	INVALID(u8),
}

impl Opcode {
	/// Encoded size in bytes: `1 + n` for `PUSH(n, _)`, 1 for everything
	/// else. The declared push width counts even when the immediate itself
	/// was truncated by the end of code.
	pub fn size(&self) -> usize {
		match self {
			Opcode::PUSH(n, _) => 1 + n,
			_ => 1,
		}
	}

	/// Whether executing this opcode would observe or mutate state outside
	/// the sandbox (accounts, storage, balances, logs, blocks, calls).
	pub fn is_impure(&self) -> bool {
		matches!(
			self,
			Opcode::ADDRESS
				| Opcode::BALANCE
				| Opcode::ORIGIN
				| Opcode::CALLER
				| Opcode::GASPRICE
				| Opcode::EXTCODESIZE
				| Opcode::EXTCODECOPY
				| Opcode::EXTCODEHASH
				| Opcode::BLOCKHASH
				| Opcode::COINBASE
				| Opcode::TIMESTAMP
				| Opcode::NUMBER
				| Opcode::PREVRANDAO
				| Opcode::GASLIMIT
				| Opcode::CHAINID
				| Opcode::SELFBALANCE
				| Opcode::BASEFEE
				| Opcode::BLOBHASH
				| Opcode::BLOBBASEFEE
				| Opcode::SLOAD
				| Opcode::SSTORE
				| Opcode::LOG(_)
				| Opcode::CREATE
				| Opcode::CALL
				| Opcode::CALLCODE
				| Opcode::DELEGATECALL
				| Opcode::CREATE2
				| Opcode::SELFDESTRUCT
		)
	}

	/// The opcode byte this variant encodes to.
	pub fn as_byte(&self) -> u8 {
		match self {
			Opcode::STOP => 0x00,
			Opcode::ADD => 0x01,
			Opcode::MUL => 0x02,
			Opcode::SUB => 0x03,
			Opcode::DIV => 0x04,
			Opcode::SDIV => 0x05,
			Opcode::MOD => 0x06,
			Opcode::SMOD => 0x07,
			Opcode::ADDMOD => 0x08,
			Opcode::MULMOD => 0x09,
			Opcode::EXP => 0x0a,
			Opcode::SIGNEXTEND => 0x0b,

			Opcode::LT => 0x10,
			Opcode::GT => 0x11,
			Opcode::SLT => 0x12,
			Opcode::SGT => 0x13,
			Opcode::EQ => 0x14,
			Opcode::ISZERO => 0x15,
			Opcode::AND => 0x16,
			Opcode::OR => 0x17,
			Opcode::XOR => 0x18,
			Opcode::NOT => 0x19,
			Opcode::BYTE => 0x1a,
			Opcode::SHL => 0x1b,
			Opcode::SHR => 0x1c,
			Opcode::SAR => 0x1d,

			Opcode::SHA3 => 0x20,

			Opcode::ADDRESS => 0x30,
			Opcode::BALANCE => 0x31,
			Opcode::ORIGIN => 0x32,
			Opcode::CALLER => 0x33,
			Opcode::CALLVALUE => 0x34,
			Opcode::CALLDATALOAD => 0x35,
			Opcode::CALLDATASIZE => 0x36,
			Opcode::CALLDATACOPY => 0x37,
			Opcode::CODESIZE => 0x38,
			Opcode::CODECOPY => 0x39,
			Opcode::GASPRICE => 0x3a,
			Opcode::EXTCODESIZE => 0x3b,
			Opcode::EXTCODECOPY => 0x3c,
			Opcode::RETURNDATASIZE => 0x3d,
			Opcode::RETURNDATACOPY => 0x3e,
			Opcode::EXTCODEHASH => 0x3f,

			Opcode::BLOCKHASH => 0x40,
			Opcode::COINBASE => 0x41,
			Opcode::TIMESTAMP => 0x42,
			Opcode::NUMBER => 0x43,
			Opcode::PREVRANDAO => 0x44,
			Opcode::GASLIMIT => 0x45,
			Opcode::CHAINID => 0x46,
			Opcode::SELFBALANCE => 0x47,
			Opcode::BASEFEE => 0x48,
			Opcode::BLOBHASH => 0x49,
			Opcode::BLOBBASEFEE => 0x4a,

			Opcode::POP => 0x50,
			Opcode::MLOAD => 0x51,
			Opcode::MSTORE => 0x52,
			Opcode::MSTORE8 => 0x53,
			Opcode::SLOAD => 0x54,
			Opcode::SSTORE => 0x55,
			Opcode::JUMP => 0x56,
			Opcode::JUMPI => 0x57,
			Opcode::PC => 0x58,
			Opcode::MSIZE => 0x59,
			Opcode::GAS => 0x5a,
			Opcode::JUMPDEST => 0x5b,
			Opcode::TLOAD => 0x5c,
			Opcode::TSTORE => 0x5d,
			Opcode::MCOPY => 0x5e,

			Opcode::PUSH(n, _) => 0x60 + (*n as u8) - 1,
			Opcode::DUP(n) => 0x80 + (*n as u8) - 1,
			Opcode::SWAP(n) => 0x90 + (*n as u8) - 1,
			Opcode::LOG(n) => 0xa0 + (*n as u8),

			Opcode::CREATE => 0xf0,
			Opcode::CALL => 0xf1,
			Opcode::CALLCODE => 0xf2,
			Opcode::RETURN => 0xf3,
			Opcode::DELEGATECALL => 0xf4,
			Opcode::CREATE2 => 0xf5,
			Opcode::STATICCALL => 0xfa,
			Opcode::REVERT => 0xfd,
			Opcode::SELFDESTRUCT => 0xff,

			Opcode::INVALID(byte) => *byte,
		}
	}
}
