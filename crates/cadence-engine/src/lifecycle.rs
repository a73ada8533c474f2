//! Intent lifecycle: cancellation and read-only queries.
//!
//! Cancellation is self-service: the boundary invoking the mutators first
//! proves ownership via [`AuthorizationEngine::verify_cancellation`], and the
//! engine derives the intent id from the swapper identity, so a swapper can
//! only ever latch their own intents. Cancellation is a state write, never an
//! interruption of an in-flight authorization.

use alloy_primitives::{Address, B256, U256};
use tracing::{info, warn};

use crate::{current_timestamp, AuthorizationEngine, EngineError};
use cadence_hash::{hash_cancellation, signing_digest};
use cadence_policy::AuthorizationError;
use cadence_types::{
	compute_intent_id, CadenceEvent, ExecutionState, IntentStatistics, LifecycleEvent,
};

impl AuthorizationEngine {
	/// Checks the swapper's signature over a cancellation of `nonces`.
	///
	/// The mutators below trust their caller; any outward-facing boundary
	/// must call this first so only the swapper can cancel their intents.
	/// Single cancellations verify as a one-element batch.
	pub async fn verify_cancellation(
		&self,
		swapper: Address,
		nonces: &[U256],
		signature: &[u8],
	) -> Result<(), EngineError> {
		let digest = signing_digest(&self.domain, hash_cancellation(swapper, nonces));
		self.verifier
			.verify(digest, swapper, signature)
			.await
			.map_err(|e| AuthorizationError::InvalidSwapperSignature(e.to_string()))?;
		Ok(())
	}

	/// Derives the intent id for a swapper/nonce pair.
	pub fn compute_intent_id(&self, swapper: Address, nonce: U256) -> B256 {
		compute_intent_id(swapper, nonce)
	}

	/// Latches the cancellation flag for one of the swapper's intents.
	///
	/// Fails with [`EngineError::IntentAlreadyCancelled`] if already latched;
	/// the latch is terminal either way.
	pub async fn cancel(&self, swapper: Address, nonce: U256) -> Result<(), EngineError> {
		let intent_id = compute_intent_id(swapper, nonce);
		self.store().latch_cancelled(&intent_id).await?;

		self.events()
			.publish(CadenceEvent::Lifecycle(LifecycleEvent::IntentCancelled {
				intent_id,
				swapper,
				nonce,
			}))
			.ok();

		info!(intent_id = %intent_id, %swapper, "intent cancelled");
		Ok(())
	}

	/// Cancels several of the swapper's intents, all-or-nothing.
	///
	/// Every nonce is validated before any latch is written, so a single
	/// already-cancelled (or duplicated) nonce aborts the whole batch with no
	/// state change. A backend fault mid-batch unwinds the latches already
	/// written from their pre-batch snapshots, and no events are published
	/// until every latch is in place.
	pub async fn cancel_batch(
		&self,
		swapper: Address,
		nonces: &[U256],
	) -> Result<(), EngineError> {
		let mut records: Vec<(B256, ExecutionState)> = Vec::with_capacity(nonces.len());
		for nonce in nonces {
			let intent_id = compute_intent_id(swapper, *nonce);
			if records.iter().any(|(id, _)| *id == intent_id) {
				return Err(EngineError::IntentAlreadyCancelled);
			}
			let state = self.read_state(&intent_id).await?;
			if state.cancelled {
				return Err(EngineError::IntentAlreadyCancelled);
			}
			records.push((intent_id, state));
		}

		for (index, (intent_id, _)) in records.iter().enumerate() {
			if let Err(e) = self.store().latch_cancelled(intent_id).await {
				for (id, snapshot) in &records[..index] {
					if let Err(unwind) = self.store().restore(id, snapshot).await {
						warn!(intent_id = %id, error = %unwind, "failed to unwind cancellation latch");
					}
				}
				return Err(e.into());
			}
		}

		for ((intent_id, _), nonce) in records.iter().zip(nonces) {
			self.events()
				.publish(CadenceEvent::Lifecycle(LifecycleEvent::IntentCancelled {
					intent_id: *intent_id,
					swapper,
					nonce: *nonce,
				}))
				.ok();
		}

		info!(%swapper, count = nonces.len(), "intent batch cancelled");
		Ok(())
	}

	/// Current execution state for an intent, zero-valued if never touched.
	pub async fn execution_state(&self, intent_id: &B256) -> Result<ExecutionState, EngineError> {
		self.read_state(intent_id).await
	}

	/// The sequence number the next chunk must carry.
	pub async fn next_order_nonce(&self, intent_id: &B256) -> Result<u64, EngineError> {
		Ok(self.read_state(intent_id).await?.next_order_nonce)
	}

	/// Whether an intent can still execute chunks.
	///
	/// False once cancelled or past a nonzero deadline. True if never
	/// executed; otherwise true iff the elapsed time since the last execution
	/// is within `max_period` (0 = unbounded).
	pub async fn is_active(
		&self,
		intent_id: &B256,
		max_period: u64,
		deadline: u64,
	) -> Result<bool, EngineError> {
		let state = self.read_state(intent_id).await?;
		let now = current_timestamp();

		if state.cancelled {
			return Ok(false);
		}
		if deadline != 0 && now > deadline {
			return Ok(false);
		}
		if state.executed_chunks == 0 {
			return Ok(true);
		}
		if max_period == 0 {
			return Ok(true);
		}
		Ok(now.saturating_sub(state.last_execution_time) <= max_period)
	}

	/// Aggregate execution statistics for an intent.
	pub async fn statistics(&self, intent_id: &B256) -> Result<IntentStatistics, EngineError> {
		let state = self.read_state(intent_id).await?;
		Ok(IntentStatistics::from_state(&state))
	}
}
