//! The authorization failure taxonomy.
//!
//! Every failure is parameterized with the offending values so a caller can
//! distinguish "resubmit with the correct nonce" from "this intent is dead"
//! without re-deriving anything.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad failure categories for callers and observers.
///
/// `State` failures are expected in normal operation (a bot racing an
/// already-used chunk nonce); the other kinds indicate a bad payload or bad
/// chunk economics and are not worth resubmitting unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
	/// Bad or mismatched signatures; never retried.
	Authorization,
	/// Malformed payload or allocations; the intent is corrupt or malicious.
	Structural,
	/// Cancelled, expired, or out-of-sequence; re-fetch state and resubmit.
	State,
	/// Chunk parameters offered by the filler/cosigner were invalid.
	Economic,
}

/// Why a chunk authorization was refused. No state is mutated on any of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
	// Stage 0: payload decoding
	#[error("Malformed hook data: {0}")]
	MalformedPayload(String),

	// Stage 1: swapper signature
	#[error("Invalid swapper signature: {0}")]
	InvalidSwapperSignature(String),

	// Stage 2: static binding
	#[error("Intent targets engine {intent}, executing as {executing}")]
	WrongEngine { intent: Address, executing: Address },
	#[error("Intent targets chain {intent}, executing on {executing}")]
	WrongChain { intent: u64, executing: u64 },
	#[error("Order swapper {order} does not match intent swapper {intent}")]
	SwapperMismatch { intent: Address, order: Address },
	#[error("Order input token {order} does not match intent input token {intent}")]
	InputTokenMismatch { intent: Address, order: Address },
	#[error("Order output token {order} does not match intent output token {intent}")]
	OutputTokenMismatch { intent: Address, order: Address },

	// Stage 3: allocation structure
	#[error("Intent has no output allocations")]
	EmptyAllocations,
	#[error("Zero allocation for recipient {recipient}")]
	ZeroAllocation { recipient: Address },
	#[error("Allocations exceed 100 percent: running total {total} bps")]
	AllocationsExceed100Percent { total: U256 },
	#[error("Allocations sum to {total} bps, expected 10000")]
	AllocationsNot100Percent { total: U256 },

	// Stage 4: cosigner signature and binding
	#[error("Invalid cosigner signature: {0}")]
	InvalidCosignerSignature(String),
	#[error("Cosigner authorization swapper {authorization} does not match intent swapper {intent}")]
	CosignerSwapperMismatch {
		intent: Address,
		authorization: Address,
	},
	#[error("Cosigner authorization nonce {authorization} does not match intent nonce {intent}")]
	CosignerNonceMismatch { intent: U256, authorization: U256 },

	// Stage 5: state and timing
	#[error("Intent is cancelled")]
	IntentIsCancelled,
	#[error("Intent expired at {deadline}, now {now}")]
	IntentExpired { deadline: u64, now: u64 },
	#[error("Wrong chunk nonce: expected {expected}, got {actual}")]
	WrongChunkNonce { expected: u64, actual: u64 },
	#[error("Too soon: {elapsed}s elapsed, min period {min_period}s")]
	TooSoon { elapsed: u64, min_period: u64 },
	#[error("Too late: {elapsed}s elapsed, max period {max_period}s")]
	TooLate { elapsed: u64, max_period: u64 },

	// Stage 6: chunk size
	#[error("Chunk size {amount} below minimum {min}")]
	ChunkSizeBelowMin { amount: U256, min: U256 },
	#[error("Chunk size {amount} above maximum {max}")]
	ChunkSizeAboveMax { amount: U256, max: U256 },
	#[error("Order input {actual} does not match authorized amount {expected}")]
	InputAmountMismatch { expected: U256, actual: U256 },
	#[error("Order input is zero")]
	ZeroInput,
	#[error("Order input {amount} above cosigner limit {limit}")]
	InputAboveLimit { amount: U256, limit: U256 },

	// Stage 7: price floor
	#[error("Execution price {price} below minimum {min_price}")]
	PriceBelowMin { price: U256, min_price: U256 },

	// Stage 8: output distribution
	#[error("Output for {recipient} is {actual}, expected {expected}")]
	AllocationMismatch {
		recipient: Address,
		actual: U256,
		expected: U256,
	},
	#[error("Total output {total} below required {required}")]
	InsufficientOutput { total: U256, required: U256 },
	#[error("Total output {total} does not equal required {expected}")]
	WrongTotalOutput { total: U256, expected: U256 },
}

impl AuthorizationError {
	/// Categorizes this failure per the caller-facing taxonomy.
	pub fn kind(&self) -> FailureKind {
		use AuthorizationError::*;
		match self {
			InvalidSwapperSignature(_)
			| InvalidCosignerSignature(_)
			| CosignerSwapperMismatch { .. }
			| CosignerNonceMismatch { .. } => FailureKind::Authorization,

			MalformedPayload(_)
			| WrongEngine { .. }
			| WrongChain { .. }
			| SwapperMismatch { .. }
			| InputTokenMismatch { .. }
			| OutputTokenMismatch { .. }
			| EmptyAllocations
			| ZeroAllocation { .. }
			| AllocationsExceed100Percent { .. }
			| AllocationsNot100Percent { .. } => FailureKind::Structural,

			IntentIsCancelled
			| IntentExpired { .. }
			| WrongChunkNonce { .. }
			| TooSoon { .. }
			| TooLate { .. } => FailureKind::State,

			ChunkSizeBelowMin { .. }
			| ChunkSizeAboveMax { .. }
			| InputAmountMismatch { .. }
			| ZeroInput
			| InputAboveLimit { .. }
			| PriceBelowMin { .. }
			| AllocationMismatch { .. }
			| InsufficientOutput { .. }
			| WrongTotalOutput { .. } => FailureKind::Economic,
		}
	}
}
