//! Fixed wire schema for intents and chunk payloads.
//!
//! The `sol!` block below is the layout contract: field order and canonical
//! widths here must stay byte-for-byte compatible with off-chain signers.
//! Everything the hashing functions do is derived from these definitions,
//! never from call sites.

use alloy_primitives::U256;
use alloy_sol_types::sol;

use cadence_types::{
	ChunkPayload, CosignerAuthorization, Intent, OutputAllocation, PrivateTerms, TradeDirection,
};

sol! {
	/// Terms the swapper keeps off the public record; hashed once into a
	/// single commitment.
	#[derive(Debug, PartialEq, Eq)]
	struct PrivateTermsV1 {
		uint256 totalAmount;
		uint64 frequency;
		uint64 totalChunks;
		bytes32 salt;
		bytes feedData;
	}

	/// One recipient's share of chunk output, in basis points.
	#[derive(Debug, PartialEq, Eq)]
	struct OutputAllocationV1 {
		address recipient;
		uint256 basisPoints;
	}

	/// The signed DCA intent.
	#[derive(Debug, PartialEq, Eq)]
	struct DcaIntentV1 {
		address engine;
		uint256 chainId;
		address swapper;
		uint256 nonce;
		address cosigner;
		bool isExactIn;
		address inputToken;
		address outputToken;
		uint64 minPeriod;
		uint64 maxPeriod;
		uint64 deadline;
		uint256 minChunkSize;
		uint256 maxChunkSize;
		uint256 minPrice;
		OutputAllocationV1[] allocations;
		PrivateTermsV1 privateTerms;
	}

	/// The cosigner's per-chunk authorization.
	#[derive(Debug, PartialEq, Eq)]
	struct CosignerAuthorizationV1 {
		address swapper;
		uint256 intentNonce;
		uint256 execAmount;
		uint64 orderNonce;
		uint256 limitAmount;
	}

	/// A swapper's authorization to cancel one or more of their intents.
	#[derive(Debug, PartialEq, Eq)]
	struct CancelIntentsV1 {
		address swapper;
		uint256[] nonces;
	}

	/// The ABI-encoded `hook_data` blob carried inside a resolved order.
	#[derive(Debug, PartialEq, Eq)]
	struct ChunkPayloadV1 {
		DcaIntentV1 intent;
		bytes swapperSignature;
		bytes32 privateTermsCommitment;
		CosignerAuthorizationV1 cosignerAuth;
		bytes cosignerSignature;
		bytes transferAuthorization;
	}
}

impl From<&PrivateTerms> for PrivateTermsV1 {
	fn from(terms: &PrivateTerms) -> Self {
		Self {
			totalAmount: terms.total_amount,
			frequency: terms.frequency,
			totalChunks: terms.total_chunks,
			salt: terms.salt,
			feedData: terms.feed_data.clone(),
		}
	}
}

impl From<PrivateTermsV1> for PrivateTerms {
	fn from(terms: PrivateTermsV1) -> Self {
		Self {
			total_amount: terms.totalAmount,
			frequency: terms.frequency,
			total_chunks: terms.totalChunks,
			salt: terms.salt,
			feed_data: terms.feedData,
		}
	}
}

impl From<&OutputAllocation> for OutputAllocationV1 {
	fn from(alloc: &OutputAllocation) -> Self {
		Self {
			recipient: alloc.recipient,
			basisPoints: alloc.basis_points,
		}
	}
}

impl From<OutputAllocationV1> for OutputAllocation {
	fn from(alloc: OutputAllocationV1) -> Self {
		Self {
			recipient: alloc.recipient,
			basis_points: alloc.basisPoints,
		}
	}
}

impl From<&Intent> for DcaIntentV1 {
	fn from(intent: &Intent) -> Self {
		Self {
			engine: intent.engine,
			chainId: U256::from(intent.chain_id),
			swapper: intent.swapper,
			nonce: intent.nonce,
			cosigner: intent.cosigner,
			isExactIn: intent.direction == TradeDirection::ExactInput,
			inputToken: intent.input_token,
			outputToken: intent.output_token,
			minPeriod: intent.min_period,
			maxPeriod: intent.max_period,
			deadline: intent.deadline,
			minChunkSize: intent.min_chunk_size,
			maxChunkSize: intent.max_chunk_size,
			minPrice: intent.min_price,
			allocations: intent.allocations.iter().map(Into::into).collect(),
			privateTerms: (&intent.private_terms).into(),
		}
	}
}

impl From<DcaIntentV1> for Intent {
	fn from(intent: DcaIntentV1) -> Self {
		Self {
			engine: intent.engine,
			chain_id: intent.chainId.saturating_to::<u64>(),
			swapper: intent.swapper,
			nonce: intent.nonce,
			cosigner: intent.cosigner,
			direction: if intent.isExactIn {
				TradeDirection::ExactInput
			} else {
				TradeDirection::ExactOutput
			},
			input_token: intent.inputToken,
			output_token: intent.outputToken,
			min_period: intent.minPeriod,
			max_period: intent.maxPeriod,
			deadline: intent.deadline,
			min_chunk_size: intent.minChunkSize,
			max_chunk_size: intent.maxChunkSize,
			min_price: intent.minPrice,
			allocations: intent.allocations.into_iter().map(Into::into).collect(),
			private_terms: intent.privateTerms.into(),
		}
	}
}

impl From<&CosignerAuthorization> for CosignerAuthorizationV1 {
	fn from(auth: &CosignerAuthorization) -> Self {
		Self {
			swapper: auth.swapper,
			intentNonce: auth.intent_nonce,
			execAmount: auth.exec_amount,
			orderNonce: auth.order_nonce,
			limitAmount: auth.limit_amount,
		}
	}
}

impl From<CosignerAuthorizationV1> for CosignerAuthorization {
	fn from(auth: CosignerAuthorizationV1) -> Self {
		Self {
			swapper: auth.swapper,
			intent_nonce: auth.intentNonce,
			exec_amount: auth.execAmount,
			order_nonce: auth.orderNonce,
			limit_amount: auth.limitAmount,
		}
	}
}

impl From<&ChunkPayload> for ChunkPayloadV1 {
	fn from(payload: &ChunkPayload) -> Self {
		Self {
			intent: (&payload.intent).into(),
			swapperSignature: payload.swapper_signature.clone(),
			privateTermsCommitment: payload.private_terms_commitment,
			cosignerAuth: (&payload.cosigner_auth).into(),
			cosignerSignature: payload.cosigner_signature.clone(),
			transferAuthorization: payload.transfer_authorization.clone(),
		}
	}
}

impl From<ChunkPayloadV1> for ChunkPayload {
	fn from(payload: ChunkPayloadV1) -> Self {
		Self {
			intent: payload.intent.into(),
			swapper_signature: payload.swapperSignature,
			private_terms_commitment: payload.privateTermsCommitment,
			cosigner_auth: payload.cosignerAuth.into(),
			cosigner_signature: payload.cosignerSignature,
			transfer_authorization: payload.transferAuthorization,
		}
	}
}
