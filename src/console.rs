//! The built-in console.log FFI handler.
//!
//! Decodes the hardhat-style `log(...)` calling convention — a four-byte
//! selector followed by ABI-encoded arguments — and emits one diagnostic
//! line per call through the `log` facade. The handler never fails:
//! payloads it cannot decode are hex-dumped at debug level, and the call
//! always returns empty bytes.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use primitive_types::U256;
use sha3::{Digest, Keccak256};

use crate::ffi::FfiOutcome;
use crate::utils::{I256, Sign};

/// Argument types the console ABI uses.
#[derive(Clone, Copy, Debug)]
enum Param {
	String,
	Uint,
	Int,
	Bool,
	Address,
	Bytes,
	Bytes32,
}

lazy_static! {
	/// Selector table over the common `log(...)` signatures, keyed by the
	/// first four bytes of the Keccak-256 of the canonical signature.
	static ref SIGNATURES: BTreeMap<[u8; 4], Vec<Param>> = {
		use self::Param::*;

		let signatures: Vec<(&str, Vec<Param>)> = vec![
			("log()", vec![]),
			("log(string)", vec![String]),
			("log(uint256)", vec![Uint]),
			("log(int256)", vec![Int]),
			("log(bool)", vec![Bool]),
			("log(address)", vec![Address]),
			("log(bytes)", vec![Bytes]),
			("log(bytes32)", vec![Bytes32]),
			("log(string,string)", vec![String, String]),
			("log(string,uint256)", vec![String, Uint]),
			("log(string,int256)", vec![String, Int]),
			("log(string,bool)", vec![String, Bool]),
			("log(string,address)", vec![String, Address]),
			("log(uint256,uint256)", vec![Uint, Uint]),
			("log(uint256,string)", vec![Uint, String]),
			("log(address,uint256)", vec![Address, Uint]),
			("log(bool,bool)", vec![Bool, Bool]),
			("log(string,string,string)", vec![String, String, String]),
			("log(string,uint256,uint256)", vec![String, Uint, Uint]),
			("log(uint256,uint256,uint256)", vec![Uint, Uint, Uint]),
			("log(string,address,uint256)", vec![String, Address, Uint]),
		];

		signatures
			.into_iter()
			.map(|(signature, params)| (selector(signature), params))
			.collect()
	};
}

/// First four bytes of the Keccak-256 of a canonical signature.
fn selector(signature: &str) -> [u8; 4] {
	let digest = Keccak256::digest(signature.as_bytes());
	[digest[0], digest[1], digest[2], digest[3]]
}

/// The console.log handler. Always returns empty bytes.
pub fn handle(input: &[u8]) -> FfiOutcome {
	match render(input) {
		Some(line) => log::info!(target: "console.log", "{}", line),
		None => log::debug!(
			target: "console.log",
			"undecoded call 0x{}",
			hex_string(input)
		),
	}
	FfiOutcome::Return(Vec::new())
}

fn render(input: &[u8]) -> Option<String> {
	let selector: [u8; 4] = input.get(0..4)?.try_into().ok()?;
	let params = SIGNATURES.get(&selector)?;
	let data = &input[4..];

	let mut parts = Vec::with_capacity(params.len());
	for (slot, param) in params.iter().enumerate() {
		parts.push(decode_param(*param, data, slot)?);
	}
	Some(parts.join(" "))
}

fn decode_param(param: Param, data: &[u8], slot: usize) -> Option<String> {
	let word = data.get(slot * 32..slot * 32 + 32)?;

	match param {
		Param::Uint => Some(U256::from_big_endian(word).to_string()),
		Param::Int => {
			let value = I256::from(U256::from_big_endian(word));
			Some(match value.0 {
				Sign::Minus => format!("-{}", value.1),
				_ => value.1.to_string(),
			})
		}
		Param::Bool => Some((word[31] != 0).to_string()),
		Param::Address => Some(format!("0x{}", hex_string(&word[12..]))),
		Param::Bytes32 => Some(format!("0x{}", hex_string(word))),
		Param::String => String::from_utf8(tail(data, word)?).ok(),
		Param::Bytes => Some(format!("0x{}", hex_string(&tail(data, word)?))),
	}
}

/// Chase a dynamic head word into the tail: a length word followed by the
/// payload.
fn tail(data: &[u8], head: &[u8]) -> Option<Vec<u8>> {
	let offset = checked_usize(U256::from_big_endian(head))?;
	let length_end = offset.checked_add(32)?;
	let len = checked_usize(U256::from_big_endian(data.get(offset..length_end)?))?;
	Some(data.get(length_end..length_end.checked_add(len)?)?.to_vec())
}

fn checked_usize(v: U256) -> Option<usize> {
	if v > U256::from(u32::MAX) {
		return None;
	}
	Some(v.low_u64() as usize)
}

fn hex_string(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn abi_uint(v: u64) -> Vec<u8> {
		let mut word = [0u8; 32];
		U256::from(v).to_big_endian(&mut word);
		word.to_vec()
	}

	fn abi_string(s: &str) -> Vec<u8> {
		// Single dynamic argument: head offset 0x20, then length and
		// payload padded to a word boundary.
		let mut out = abi_uint(0x20);
		out.extend(abi_uint(s.len() as u64));
		out.extend(s.as_bytes());
		out.resize((out.len() + 31) / 32 * 32, 0);
		out
	}

	#[test]
	fn renders_uint() {
		let mut input = selector("log(uint256)").to_vec();
		input.extend(abi_uint(42));
		assert_eq!(render(&input), Some("42".to_string()));
	}

	#[test]
	fn renders_string_and_uint() {
		let mut input = selector("log(string,uint256)").to_vec();
		// Two head slots: offset of the string tail, then the uint.
		input.extend(abi_uint(0x40));
		input.extend(abi_uint(7));
		input.extend(abi_uint(5));
		input.extend(b"gas =");
		input.extend([0u8; 27]);
		assert_eq!(render(&input), Some("gas = 7".to_string()));
	}

	#[test]
	fn renders_plain_string() {
		let mut input = selector("log(string)").to_vec();
		input.extend(abi_string("hello"));
		assert_eq!(render(&input), Some("hello".to_string()));
	}

	#[test]
	fn renders_negative_int() {
		let mut input = selector("log(int256)").to_vec();
		let mut word = [0xffu8; 32];
		word[31] = 0xfe; // -2
		input.extend(word);
		assert_eq!(render(&input), Some("-2".to_string()));
	}

	#[test]
	fn unknown_selector_is_not_rendered() {
		assert_eq!(render(&[0xde, 0xad, 0xbe, 0xef]), None);
		assert_eq!(render(&[]), None);
	}

	#[test]
	fn handler_always_returns_empty() {
		assert_eq!(handle(&[]), FfiOutcome::Return(Vec::new()));
		let mut input = selector("log(uint256)").to_vec();
		input.extend(abi_uint(1));
		assert_eq!(handle(&input), FfiOutcome::Return(Vec::new()));
	}
}
