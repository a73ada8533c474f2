//! The chunk authorization engine.
//!
//! [`AuthorizationEngine::authorize`] is the single entry point a caller
//! invokes per chunk: decode the payload, verify both signatures, run the
//! policy stages in order, then commit state and emit the settlement
//! instruction. Every call is all-or-nothing; a failure at any stage leaves
//! state untouched and reports a structured [`AuthorizationError`]. The
//! engine takes no locks: the host serializes calls touching the same intent
//! id, and different intent ids are fully independent.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

use cadence_hash::{decode_payload, domain, hash_cosigner_auth, hash_intent_with_commitment, signing_digest};
use cadence_policy::{
	check_allocations, check_chunk_size, check_cosigner_binding, check_output_distribution,
	check_price_floor, check_state_and_timing, check_static_binding, AuthorizationError,
};
use cadence_signature::SignatureVerifier;
use cadence_state::{ExecutionStateStore, StateError};
use cadence_types::{
	CadenceEvent, EventBus, ExecutionEvent, OutputTransfer, ResolvedOrder, SettlementInstruction,
};

mod builder;
mod lifecycle;

pub use builder::EngineBuilder;

/// Errors surfaced by the engine's entry points.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A policy stage refused the chunk; see [`AuthorizationError::kind`].
	#[error("Authorization failed: {0}")]
	Authorization(#[from] AuthorizationError),
	/// The cancellation latch was already set.
	#[error("Intent is already cancelled")]
	IntentAlreadyCancelled,
	/// The state backend failed; nothing was committed.
	#[error("State error: {0}")]
	State(String),
	/// The engine was assembled from an incomplete configuration.
	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<StateError> for EngineError {
	fn from(e: StateError) -> Self {
		match e {
			StateError::AlreadyCancelled => EngineError::IntentAlreadyCancelled,
			other => EngineError::State(other.to_string()),
		}
	}
}

/// Composition of hasher, verifier, policy, and state store behind the
/// per-chunk authorization entry point.
pub struct AuthorizationEngine {
	/// Identity of this deployment; intents must target it.
	address: Address,
	/// Chain this deployment executes on.
	chain_id: u64,
	/// EIP-712 domain derived from `address` and `chain_id`.
	domain: Eip712Domain,
	verifier: SignatureVerifier,
	store: ExecutionStateStore,
	event_bus: EventBus,
}

impl AuthorizationEngine {
	pub(crate) fn new(
		address: Address,
		chain_id: u64,
		verifier: SignatureVerifier,
		store: ExecutionStateStore,
		event_bus: EventBus,
	) -> Self {
		Self {
			address,
			chain_id,
			domain: domain(chain_id, address),
			verifier,
			store,
			event_bus,
		}
	}

	/// The deployment identity this engine authorizes for.
	pub fn address(&self) -> Address {
		self.address
	}

	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	/// Subscribes to engine events.
	pub fn events(&self) -> &EventBus {
		&self.event_bus
	}

	/// Authorizes one chunk of a DCA intent.
	///
	/// Runs the eight policy stages in their fixed order. On success the
	/// execution state is committed and a [`SettlementInstruction`] for the
	/// token-custody layer is returned; on failure no state changes and the
	/// error says exactly which stage refused and why.
	pub async fn authorize(
		&self,
		filler: Address,
		order: &ResolvedOrder,
	) -> Result<SettlementInstruction, EngineError> {
		let payload = decode_payload(&order.hook_data)
			.map_err(|e| AuthorizationError::MalformedPayload(e.to_string()))?;
		let intent = &payload.intent;
		let intent_id = intent.intent_id();

		// Stage 1: the swapper's standing authorization over the whole
		// intent, reconstructed from the private-terms commitment.
		let struct_hash = hash_intent_with_commitment(intent, payload.private_terms_commitment);
		let intent_digest = signing_digest(&self.domain, struct_hash);
		self.verifier
			.verify(intent_digest, intent.swapper, &payload.swapper_signature)
			.await
			.map_err(|e| AuthorizationError::InvalidSwapperSignature(e.to_string()))?;

		// Stages 2-3: static binding and allocation structure.
		check_static_binding(intent, order, self.address, self.chain_id)?;
		check_allocations(&intent.allocations)?;

		// Stage 4: the cosigner's authorization over this specific chunk.
		let auth = &payload.cosigner_auth;
		let auth_digest = signing_digest(&self.domain, hash_cosigner_auth(auth));
		self.verifier
			.verify(auth_digest, intent.cosigner, &payload.cosigner_signature)
			.await
			.map_err(|e| AuthorizationError::InvalidCosignerSignature(e.to_string()))?;
		check_cosigner_binding(intent, auth)?;

		// Stage 5: one state read; everything after is pure until commit.
		let state = self.store.read(&intent_id).await?;
		let now = current_timestamp();
		check_state_and_timing(intent, auth, &state, now)?;

		// Stages 6-8: chunk economics.
		check_chunk_size(intent, auth, order.input.amount)?;
		check_price_floor(intent, auth)?;
		check_output_distribution(intent, auth, &order.outputs)?;

		// All stages passed; commit is the only mutation of the call.
		let output_total = order
			.outputs
			.iter()
			.fold(U256::ZERO, |acc, o| acc.saturating_add(o.amount));
		let state = self
			.store
			.commit(&intent_id, order.input.amount, output_total, now)
			.await?;

		self.event_bus
			.publish(CadenceEvent::Execution(ExecutionEvent::ChunkExecuted {
				intent_id,
				order_nonce: auth.order_nonce,
				filler,
				input_amount: order.input.amount,
				output_amount: output_total,
			}))
			.ok();

		info!(
			intent_id = %intent_id,
			order_nonce = auth.order_nonce,
			executed_chunks = state.executed_chunks,
			%filler,
			"chunk authorized"
		);

		Ok(SettlementInstruction {
			intent_id,
			order_nonce: auth.order_nonce,
			swapper: intent.swapper,
			filler,
			input_token: order.input.token,
			input_amount: order.input.amount,
			outputs: order
				.outputs
				.iter()
				.map(|o| OutputTransfer {
					recipient: o.recipient,
					token: o.token,
					amount: o.amount,
				})
				.collect(),
			transfer_authorization: payload.transfer_authorization.clone(),
		})
	}

	pub(crate) async fn read_state(&self, intent_id: &B256) -> Result<cadence_types::ExecutionState, EngineError> {
		Ok(self.store.read(intent_id).await?)
	}

	pub(crate) fn store(&self) -> &ExecutionStateStore {
		&self.store
	}
}

/// Current unix time in seconds.
pub(crate) fn current_timestamp() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}
