//! Intent types for recurring dollar-cost-averaging trades.
//!
//! An [`Intent`] is a long-lived, once-signed authorization for a series of
//! future chunk executions. The swapper signs it exactly once; every chunk is
//! then additionally scoped by a per-chunk [`CosignerAuthorization`] from the
//! designated cosigner.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Basis-points denominator; 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale for execution prices (10^18).
pub const PRICE_SCALE: u64 = 1_000_000_000_000_000_000;

/// Trade direction for a chunk: which leg of the trade is the contractual
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
	/// The input amount is fixed; the cosigner's limit is the minimum
	/// acceptable output.
	ExactInput,
	/// The output amount is fixed; the cosigner's limit is the maximum
	/// acceptable input.
	ExactOutput,
}

/// A long-lived DCA trading intent signed once by the swapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
	/// Engine deployment this intent is bound to.
	pub engine: Address,
	/// Chain the engine deployment lives on.
	pub chain_id: u64,
	/// The authorizing party.
	pub swapper: Address,
	/// Monotonically-unique nonce; `(swapper, nonce)` derives the intent id.
	pub nonce: U256,
	/// Second authorizing party scoping each chunk's economics.
	pub cosigner: Address,
	/// Trade direction for every chunk of this intent.
	pub direction: TradeDirection,
	/// Asset sold on every chunk.
	pub input_token: Address,
	/// Asset bought on every chunk.
	pub output_token: Address,
	/// Minimum seconds between chunk executions (after the first).
	pub min_period: u64,
	/// Maximum seconds between chunk executions; 0 = unbounded.
	pub max_period: u64,
	/// Unix deadline after which no chunk may execute; 0 = no deadline.
	pub deadline: u64,
	/// Inclusive lower bound on a chunk's contractual amount.
	pub min_chunk_size: U256,
	/// Inclusive upper bound on a chunk's contractual amount.
	pub max_chunk_size: U256,
	/// Minimum acceptable execution price, scaled by 10^18.
	pub min_price: U256,
	/// How chunk output is split between recipients; must sum to 10_000 bps.
	pub allocations: Vec<OutputAllocation>,
	/// Terms the swapper keeps off the public record.
	pub private_terms: PrivateTerms,
}

impl Intent {
	/// Derived identifier for this intent.
	pub fn intent_id(&self) -> B256 {
		compute_intent_id(self.swapper, self.nonce)
	}

	/// Copy of this intent with the private terms zeroed, as carried on the
	/// public record after first disclosure.
	pub fn with_zeroed_private_terms(&self) -> Self {
		Self {
			private_terms: PrivateTerms::default(),
			..self.clone()
		}
	}
}

/// Computes `intent_id = keccak256(swapper ‖ nonce)`.
pub fn compute_intent_id(swapper: Address, nonce: U256) -> B256 {
	let mut buf = [0u8; 52];
	buf[..20].copy_from_slice(swapper.as_slice());
	buf[20..].copy_from_slice(&nonce.to_be_bytes::<32>());
	keccak256(buf)
}

/// Terms the swapper wants to keep private. Only the commitment over this
/// record is carried on the public record; the raw fields never reappear
/// after the intent is first disclosed to the cosigner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTerms {
	/// Aggregate amount across all chunks.
	pub total_amount: U256,
	/// Intended execution frequency in seconds.
	pub frequency: u64,
	/// Intended total number of chunks.
	pub total_chunks: u64,
	/// Random salt so identical terms commit to distinct values.
	pub salt: B256,
	/// Auxiliary price-feed metadata for the cosigner.
	pub feed_data: Bytes,
}

/// One recipient's share of a chunk's output, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAllocation {
	pub recipient: Address,
	pub basis_points: U256,
}

/// Per-chunk authorization signed by the cosigner.
///
/// Binds one specific chunk's economics so neither a filler nor the swapper
/// can unilaterally decide them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosignerAuthorization {
	/// Must match the intent's swapper.
	pub swapper: Address,
	/// Must match the intent's nonce.
	pub intent_nonce: U256,
	/// The contractual amount: input for exact-input chunks, output for
	/// exact-output chunks.
	pub exec_amount: U256,
	/// The chunk sequence number this authorization is scoped to.
	pub order_nonce: u64,
	/// The economic limit: minimum output for exact-input chunks, maximum
	/// input for exact-output chunks.
	pub limit_amount: U256,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_intent_id_is_deterministic() {
		let swapper = Address::repeat_byte(0x11);
		let id1 = compute_intent_id(swapper, U256::from(7));
		let id2 = compute_intent_id(swapper, U256::from(7));
		assert_eq!(id1, id2);
	}

	#[test]
	fn test_intent_id_depends_on_both_inputs() {
		let swapper = Address::repeat_byte(0x11);
		let other = Address::repeat_byte(0x22);
		let base = compute_intent_id(swapper, U256::from(7));
		assert_ne!(base, compute_intent_id(other, U256::from(7)));
		assert_ne!(base, compute_intent_id(swapper, U256::from(8)));
	}

	#[test]
	fn test_zeroed_private_terms_keeps_public_fields() {
		let intent = Intent {
			engine: Address::repeat_byte(0xee),
			chain_id: 1,
			swapper: Address::repeat_byte(0x11),
			nonce: U256::from(1),
			cosigner: Address::repeat_byte(0x22),
			direction: TradeDirection::ExactInput,
			input_token: Address::repeat_byte(0x33),
			output_token: Address::repeat_byte(0x44),
			min_period: 60,
			max_period: 0,
			deadline: 0,
			min_chunk_size: U256::from(1),
			max_chunk_size: U256::from(100),
			min_price: U256::ZERO,
			allocations: vec![],
			private_terms: PrivateTerms {
				total_amount: U256::from(1000),
				frequency: 3600,
				total_chunks: 10,
				salt: B256::repeat_byte(0xab),
				feed_data: Bytes::from(vec![1, 2, 3]),
			},
		};

		let public = intent.with_zeroed_private_terms();
		assert_eq!(public.private_terms, PrivateTerms::default());
		assert_eq!(public.swapper, intent.swapper);
		assert_eq!(public.intent_id(), intent.intent_id());
	}
}
