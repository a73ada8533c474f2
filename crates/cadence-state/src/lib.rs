//! Durable execution-state storage for the cadence engine.
//!
//! A [`StateStore`] backend persists one [`ExecutionState`] record per intent
//! id. The [`ExecutionStateStore`] service on top implements the engine's
//! read/update contract: reads return a zero-valued record for unknown
//! intents, commits apply exactly the per-chunk mutations, and cancellation
//! is a one-way latch. The engine performs no locking of its own; the host
//! serializes calls touching the same intent id, so backends only need to be
//! internally thread-safe.

use alloy_primitives::{B256, U256};
use async_trait::async_trait;
use thiserror::Error;

use cadence_types::{ConfigSchema, ExecutionState};

pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during state storage operations.
#[derive(Debug, Error)]
pub enum StateError {
	/// The cancellation latch was already set.
	#[error("Intent is already cancelled")]
	AlreadyCancelled,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Low-level interface a state backend must implement.
///
/// A record save replaces the whole record atomically; there are no partial
/// field updates at this layer.
#[async_trait]
pub trait StateStore: Send + Sync {
	/// Returns the configuration schema this backend validates against.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Loads the record for an intent id, if one was ever written.
	async fn load(&self, intent_id: &B256) -> Result<Option<ExecutionState>, StateError>;

	/// Replaces the record for an intent id.
	async fn save(&self, intent_id: &B256, state: &ExecutionState) -> Result<(), StateError>;
}

/// High-level state service implementing the engine's read/update contract.
pub struct ExecutionStateStore {
	backend: Box<dyn StateStore>,
}

impl ExecutionStateStore {
	pub fn new(backend: Box<dyn StateStore>) -> Self {
		Self { backend }
	}

	/// Reads the state for an intent, zero-valued if never written.
	pub async fn read(&self, intent_id: &B256) -> Result<ExecutionState, StateError> {
		Ok(self.backend.load(intent_id).await?.unwrap_or_default())
	}

	/// Commits one successful chunk execution and returns the updated state.
	///
	/// Only called after every policy stage passed; this is the sole mutation
	/// path besides cancellation.
	pub async fn commit(
		&self,
		intent_id: &B256,
		input_amount: U256,
		output_amount: U256,
		now: u64,
	) -> Result<ExecutionState, StateError> {
		let mut state = self.read(intent_id).await?;
		state.apply_execution(input_amount, output_amount, now);
		self.backend.save(intent_id, &state).await?;
		Ok(state)
	}

	/// Writes back a previously read snapshot.
	///
	/// Exists only so a half-applied batch can be unwound after a backend
	/// fault; it is not a general mutation path and can clear a latch the
	/// same batch just wrote.
	pub async fn restore(&self, intent_id: &B256, state: &ExecutionState) -> Result<(), StateError> {
		self.backend.save(intent_id, state).await
	}

	/// Sets the terminal cancellation latch.
	pub async fn latch_cancelled(&self, intent_id: &B256) -> Result<(), StateError> {
		let mut state = self.read(intent_id).await?;
		if state.cancelled {
			return Err(StateError::AlreadyCancelled);
		}
		state.cancelled = true;
		self.backend.save(intent_id, &state).await
	}
}

#[cfg(test)]
mod tests {
	use super::implementations::memory::MemoryStore;
	use super::*;

	fn store() -> ExecutionStateStore {
		ExecutionStateStore::new(Box::new(MemoryStore::new()))
	}

	#[tokio::test]
	async fn test_read_unknown_intent_is_zero_valued() {
		let store = store();
		let state = store.read(&B256::repeat_byte(0x01)).await.unwrap();
		assert_eq!(state, ExecutionState::default());
	}

	#[tokio::test]
	async fn test_commit_applies_chunk_mutations() {
		let store = store();
		let id = B256::repeat_byte(0x01);

		let state = store
			.commit(&id, U256::from(100), U256::from(180), 1_000)
			.await
			.unwrap();
		assert_eq!(state.next_order_nonce, 1);
		assert_eq!(state.executed_chunks, 1);
		assert_eq!(state.last_execution_time, 1_000);

		let state = store
			.commit(&id, U256::from(100), U256::from(175), 2_000)
			.await
			.unwrap();
		assert_eq!(state.next_order_nonce, 2);
		assert_eq!(state.total_input_executed, U256::from(200));
		assert_eq!(state.total_output_amount, U256::from(355));

		// Re-read sees the committed record.
		assert_eq!(store.read(&id).await.unwrap(), state);
	}

	#[tokio::test]
	async fn test_cancellation_latch_is_one_way() {
		let store = store();
		let id = B256::repeat_byte(0x02);

		store.latch_cancelled(&id).await.unwrap();
		assert!(store.read(&id).await.unwrap().cancelled);
		assert!(matches!(
			store.latch_cancelled(&id).await,
			Err(StateError::AlreadyCancelled)
		));
	}

	#[tokio::test]
	async fn test_restore_rewinds_a_fresh_latch() {
		let store = store();
		let id = B256::repeat_byte(0x04);

		let snapshot = store.read(&id).await.unwrap();
		store.latch_cancelled(&id).await.unwrap();
		store.restore(&id, &snapshot).await.unwrap();

		assert!(!store.read(&id).await.unwrap().cancelled);
		store.latch_cancelled(&id).await.unwrap();
	}

	#[tokio::test]
	async fn test_latch_preserves_counters() {
		let store = store();
		let id = B256::repeat_byte(0x03);

		store
			.commit(&id, U256::from(100), U256::from(180), 1_000)
			.await
			.unwrap();
		store.latch_cancelled(&id).await.unwrap();

		let state = store.read(&id).await.unwrap();
		assert!(state.cancelled);
		assert_eq!(state.executed_chunks, 1);
		assert_eq!(state.next_order_nonce, 1);
	}
}
