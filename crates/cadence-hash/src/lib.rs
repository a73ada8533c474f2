//! Deterministic commitments over DCA intents.
//!
//! Intents commit under EIP-712: a versioned struct schema (see
//! [`schema`]), a domain bound to the verifying deployment and chain, and a
//! two-stage `\x19\x01` signing digest. The private terms inside an intent
//! hash to a single inner commitment so the raw fields can stay off the
//! public record: [`hash_intent`] over the full intent and
//! [`hash_intent_with_commitment`] over the public part plus the precomputed
//! inner commitment produce the identical struct hash.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{eip712_domain, Eip712Domain, SolStruct, SolValue};
use thiserror::Error;

use cadence_types::{ChunkPayload, CosignerAuthorization, Intent};

mod schema;

pub use schema::{
	CancelIntentsV1, ChunkPayloadV1, CosignerAuthorizationV1, DcaIntentV1, OutputAllocationV1,
	PrivateTermsV1,
};

/// Errors produced while decoding a chunk payload blob.
#[derive(Debug, Error)]
pub enum PayloadError {
	#[error("Malformed chunk payload: {0}")]
	Decode(String),
}

/// EIP-712 domain binding commitments to one engine deployment on one chain.
pub fn domain(chain_id: u64, engine: Address) -> Eip712Domain {
	eip712_domain! {
		name: "Cadence",
		version: "1",
		chain_id: chain_id,
		verifying_contract: engine,
	}
}

/// Hashes the private terms into their inner commitment.
pub fn hash_private_terms(terms: &cadence_types::PrivateTerms) -> B256 {
	PrivateTermsV1::from(terms).eip712_hash_struct()
}

/// Struct hash over the full intent, private terms included.
pub fn hash_intent(intent: &Intent) -> B256 {
	DcaIntentV1::from(intent).eip712_hash_struct()
}

/// Struct hash over an intent whose private terms have been zeroed, with the
/// inner commitment supplied separately.
///
/// Assembled manually from the same schema, substituting the private-terms
/// word with `commitment`. Equals [`hash_intent`] on the full intent when
/// `commitment == hash_private_terms(..)`; the equivalence is a tested
/// property, not a structural consequence of this code.
pub fn hash_intent_with_commitment(intent: &Intent, commitment: B256) -> B256 {
	let type_hash = keccak256(DcaIntentV1::eip712_encode_type().as_bytes());

	let allocations_hash = {
		let mut data = Vec::with_capacity(intent.allocations.len() * 32);
		for alloc in &intent.allocations {
			data.extend_from_slice(
				OutputAllocationV1::from(alloc).eip712_hash_struct().as_slice(),
			);
		}
		keccak256(&data)
	};

	let mut buf = Vec::with_capacity(17 * 32);
	buf.extend_from_slice(type_hash.as_slice());
	buf.extend_from_slice(&address_word(intent.engine));
	buf.extend_from_slice(&uint_word(U256::from(intent.chain_id)));
	buf.extend_from_slice(&address_word(intent.swapper));
	buf.extend_from_slice(&uint_word(intent.nonce));
	buf.extend_from_slice(&address_word(intent.cosigner));
	buf.extend_from_slice(&bool_word(
		intent.direction == cadence_types::TradeDirection::ExactInput,
	));
	buf.extend_from_slice(&address_word(intent.input_token));
	buf.extend_from_slice(&address_word(intent.output_token));
	buf.extend_from_slice(&uint_word(U256::from(intent.min_period)));
	buf.extend_from_slice(&uint_word(U256::from(intent.max_period)));
	buf.extend_from_slice(&uint_word(U256::from(intent.deadline)));
	buf.extend_from_slice(&uint_word(intent.min_chunk_size));
	buf.extend_from_slice(&uint_word(intent.max_chunk_size));
	buf.extend_from_slice(&uint_word(intent.min_price));
	buf.extend_from_slice(allocations_hash.as_slice());
	buf.extend_from_slice(commitment.as_slice());

	keccak256(&buf)
}

/// Struct hash over a cosigner authorization.
pub fn hash_cosigner_auth(auth: &CosignerAuthorization) -> B256 {
	CosignerAuthorizationV1::from(auth).eip712_hash_struct()
}

/// Struct hash over a swapper's cancellation of one or more intents.
///
/// Single cancellations hash as a one-element batch.
pub fn hash_cancellation(swapper: Address, nonces: &[U256]) -> B256 {
	CancelIntentsV1 {
		swapper,
		nonces: nonces.to_vec(),
	}
	.eip712_hash_struct()
}

/// Final signing digest: `keccak256(0x1901 ‖ domainSeparator ‖ structHash)`.
pub fn signing_digest(domain: &Eip712Domain, struct_hash: B256) -> B256 {
	let mut buf = [0u8; 66];
	buf[0] = 0x19;
	buf[1] = 0x01;
	buf[2..34].copy_from_slice(domain.hash_struct().as_slice());
	buf[34..66].copy_from_slice(struct_hash.as_slice());
	keccak256(buf)
}

/// ABI-encodes a chunk payload into the `hook_data` blob.
pub fn encode_payload(payload: &ChunkPayload) -> Bytes {
	ChunkPayloadV1::from(payload).abi_encode().into()
}

/// Decodes a `hook_data` blob back into a chunk payload.
pub fn decode_payload(data: &[u8]) -> Result<ChunkPayload, PayloadError> {
	let decoded = ChunkPayloadV1::abi_decode(data, true)
		.map_err(|e| PayloadError::Decode(e.to_string()))?;
	Ok(decoded.into())
}

fn address_word(addr: Address) -> [u8; 32] {
	B256::left_padding_from(addr.as_slice()).0
}

fn uint_word(value: U256) -> [u8; 32] {
	value.to_be_bytes::<32>()
}

fn bool_word(flag: bool) -> [u8; 32] {
	uint_word(U256::from(flag as u8))
}
