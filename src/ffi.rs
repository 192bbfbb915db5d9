//! Host foreign-function interfaces for `STATICCALL`.
//!
//! The registry maps 20-byte addresses to pure handlers, the sandboxed
//! counterpart of a precompile set. The built-in table holds exactly one
//! handler, the console.log diagnostic sink; caller-supplied entries are
//! layered on top and win on collision.

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

use primitive_types::H160;

/// Outcome of an FFI handler: the callee either returned or reverted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FfiOutcome {
	/// Call succeeded with the given return bytes.
	Return(Vec<u8>),
	/// Call reverted with the given revert bytes.
	Revert(Vec<u8>),
}

/// An FFI handler. Must be deterministic and non-blocking; side effects are
/// restricted to out-of-band diagnostics.
pub type FfiHandler = Rc<dyn Fn(&[u8]) -> FfiOutcome>;

/// The reserved console.log address: the ASCII bytes of `"console.log"`
/// left-padded with zeros to 20 bytes.
pub const CONSOLE_ADDRESS: H160 = H160([
	0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x63, 0x6f, 0x6e,
	0x73, 0x6f, 0x6c, 0x65, 0x2e, 0x6c, 0x6f, 0x67,
]);

/// Address-keyed registry of FFI handlers.
#[derive(Clone, Default)]
pub struct FfiTable {
	handlers: BTreeMap<H160, FfiHandler>,
}

impl FfiTable {
	/// An empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// The built-in table: the console.log handler and nothing else.
	pub fn builtin() -> Self {
		let mut table = Self::new();
		table.register(CONSOLE_ADDRESS, Rc::new(crate::console::handle));
		table
	}

	/// Register a handler, replacing any previous one at the address.
	pub fn register(&mut self, address: H160, handler: FfiHandler) {
		self.handlers.insert(address, handler);
	}

	/// Lay `overlay` over this table; overlay entries win on collision.
	pub fn merge(&mut self, overlay: FfiTable) {
		self.handlers.extend(overlay.handlers);
	}

	/// The handler registered at `address`, if any.
	pub fn get(&self, address: &H160) -> Option<&FfiHandler> {
		self.handlers.get(address)
	}

	/// Number of registered handlers.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	/// Whether no handler is registered.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

impl fmt::Debug for FfiTable {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set()
			.entries(self.handlers.keys())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn console_address_spells_console_log() {
		assert_eq!(&CONSOLE_ADDRESS.as_bytes()[9..], b"console.log");
		assert_eq!(&CONSOLE_ADDRESS.as_bytes()[..9], &[0u8; 9]);
	}

	#[test]
	fn merge_prefers_overlay() {
		let mut base = FfiTable::builtin();
		let mut overlay = FfiTable::new();
		overlay.register(CONSOLE_ADDRESS, Rc::new(|_: &[u8]| FfiOutcome::Revert(vec![1])));
		base.merge(overlay);

		let handler = base.get(&CONSOLE_ADDRESS).unwrap();
		assert_eq!(handler(&[]), FfiOutcome::Revert(vec![1]));
	}
}
