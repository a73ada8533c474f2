//! In-memory state backend.
//!
//! Suitable for tests and single-process deployments that accept losing
//! execution state on restart.

use crate::{StateError, StateStore};
use alloy_primitives::B256;
use async_trait::async_trait;
use cadence_types::{ConfigSchema, ExecutionState, Schema};
use dashmap::DashMap;

/// Thread-safe in-memory store keyed by intent id.
#[derive(Default)]
pub struct MemoryStore {
	records: DashMap<B256, ExecutionState>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

/// Configuration schema for [`MemoryStore`]; accepts an empty table.
pub struct MemoryStoreSchema;

impl ConfigSchema for MemoryStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), cadence_types::ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl StateStore for MemoryStore {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStoreSchema)
	}

	async fn load(&self, intent_id: &B256) -> Result<Option<ExecutionState>, StateError> {
		Ok(self.records.get(intent_id).map(|r| r.clone()))
	}

	async fn save(&self, intent_id: &B256, state: &ExecutionState) -> Result<(), StateError> {
		self.records.insert(*intent_id, state.clone());
		Ok(())
	}
}

/// Factory function to create an in-memory state backend from configuration.
pub fn create_store(_config: &toml::Value) -> Box<dyn StateStore> {
	Box::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_load_save_roundtrip() {
		let store = MemoryStore::new();
		let id = B256::repeat_byte(0xaa);

		assert!(store.load(&id).await.unwrap().is_none());

		let state = ExecutionState {
			next_order_nonce: 3,
			executed_chunks: 3,
			..Default::default()
		};
		store.save(&id, &state).await.unwrap();
		assert_eq!(store.load(&id).await.unwrap(), Some(state));
	}

	#[tokio::test]
	async fn test_records_are_independent() {
		let store = MemoryStore::new();
		let state = ExecutionState {
			cancelled: true,
			..Default::default()
		};
		store.save(&B256::repeat_byte(0x01), &state).await.unwrap();
		assert!(store
			.load(&B256::repeat_byte(0x02))
			.await
			.unwrap()
			.is_none());
	}
}
