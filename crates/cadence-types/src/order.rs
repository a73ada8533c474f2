//! Order types at the collaborator boundaries.
//!
//! The engine consumes a [`ResolvedOrder`] from the order-resolution layer
//! (which has already selected a filler and resolved amounts) and, on success,
//! produces a [`SettlementInstruction`] for the token-custody layer. The
//! resolution layer never interprets `hook_data`; it is decoded into a
//! [`ChunkPayload`] by the hashing crate.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{CosignerAuthorization, Intent};

/// An asset and an amount of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
	pub token: Address,
	pub amount: U256,
}

/// One observed output leg of a resolved order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFill {
	pub token: Address,
	pub amount: U256,
	pub recipient: Address,
}

/// A fully resolved order handed to the engine by the resolution layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedOrder {
	/// The party the resolution layer believes is the swapper.
	pub swapper: Address,
	/// Input asset and amount the filler will pull.
	pub input: AssetAmount,
	/// Output legs the filler will deliver.
	pub outputs: Vec<OutputFill>,
	/// The outer order's fill deadline, enforced by the resolution layer.
	pub deadline: u64,
	/// Opaque engine payload; ABI-encoded [`ChunkPayload`].
	pub hook_data: Bytes,
}

/// Decoded form of a resolved order's `hook_data`.
///
/// Carries the intent with its private terms zeroed plus everything needed
/// to authorize exactly one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
	/// The intent, private terms zeroed.
	pub intent: Intent,
	/// Swapper's standing signature over the full intent digest.
	pub swapper_signature: Bytes,
	/// Commitment over the original private terms.
	pub private_terms_commitment: B256,
	/// The per-chunk cosigner authorization.
	pub cosigner_auth: CosignerAuthorization,
	/// Cosigner's signature over the authorization digest.
	pub cosigner_signature: Bytes,
	/// Optional pre-authorized transfer data for the custody layer; empty
	/// means a standing allowance is in place.
	pub transfer_authorization: Bytes,
}

/// One transfer the custody layer must perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTransfer {
	pub recipient: Address,
	pub token: Address,
	pub amount: U256,
}

/// Authorization signal produced to the token-custody layer after a chunk
/// commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInstruction {
	pub intent_id: B256,
	pub order_nonce: u64,
	pub swapper: Address,
	pub filler: Address,
	pub input_token: Address,
	pub input_amount: U256,
	pub outputs: Vec<OutputTransfer>,
	/// Forwarded verbatim from the chunk payload.
	pub transfer_authorization: Bytes,
}
