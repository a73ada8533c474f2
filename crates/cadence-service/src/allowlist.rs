//! Filler admission at the service boundary.
//!
//! The engine itself does not know which fillers are welcome; admission is an
//! externally-owned lookup applied before any authorization runs. The default
//! is permissive.

use alloy_primitives::Address;

/// Decides whether a filler may submit orders.
pub trait Allowlist: Send + Sync {
	fn is_allowed(&self, filler: Address) -> bool;
}

/// Admits every filler.
pub struct AllowAll;

impl Allowlist for AllowAll {
	fn is_allowed(&self, _filler: Address) -> bool {
		true
	}
}

/// Admits only a fixed set of fillers.
pub struct StaticAllowlist {
	/// Sorted for binary search.
	fillers: Vec<Address>,
}

impl StaticAllowlist {
	pub fn new(mut fillers: Vec<Address>) -> Self {
		fillers.sort();
		fillers.dedup();
		Self { fillers }
	}
}

impl Allowlist for StaticAllowlist {
	fn is_allowed(&self, filler: Address) -> bool {
		self.fillers.binary_search(&filler).is_ok()
	}
}
