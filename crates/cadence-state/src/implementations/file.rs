//! File-based state backend.
//!
//! Stores one JSON file per intent id under a base directory, providing
//! simple persistence without external dependencies. Writes go through a
//! temp file and an atomic rename so a crash never leaves a torn record.

use crate::{StateError, StateStore};
use alloy_primitives::B256;
use async_trait::async_trait;
use cadence_types::{ConfigSchema, ExecutionState, Field, FieldType, Schema};
use std::path::PathBuf;
use tokio::fs;

/// File-per-intent persistent store.
pub struct FileStore {
	/// Base directory path for state files.
	base_path: PathBuf,
}

impl FileStore {
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	fn record_path(&self, intent_id: &B256) -> PathBuf {
		self.base_path.join(format!("{}.json", hex::encode(intent_id)))
	}
}

/// Configuration schema for [`FileStore`].
pub struct FileStoreSchema;

impl ConfigSchema for FileStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), cadence_types::ValidationError> {
		let schema = Schema::new(vec![], vec![Field::new("path", FieldType::String)]);
		schema.validate(config)
	}
}

#[async_trait]
impl StateStore for FileStore {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStoreSchema)
	}

	async fn load(&self, intent_id: &B256) -> Result<Option<ExecutionState>, StateError> {
		let path = self.record_path(intent_id);
		match fs::read(&path).await {
			Ok(data) => {
				let state = serde_json::from_slice(&data)
					.map_err(|e| StateError::Serialization(e.to_string()))?;
				Ok(Some(state))
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(StateError::Backend(e.to_string())),
		}
	}

	async fn save(&self, intent_id: &B256, state: &ExecutionState) -> Result<(), StateError> {
		let path = self.record_path(intent_id);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StateError::Backend(e.to_string()))?;
		}

		let data =
			serde_json::to_vec(state).map_err(|e| StateError::Serialization(e.to_string()))?;

		// Write atomically by writing to a temp file then renaming.
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, data)
			.await
			.map_err(|e| StateError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StateError::Backend(e.to_string()))?;

		Ok(())
	}
}

/// Factory function to create a file state backend from configuration.
///
/// Configuration parameters:
/// - `path`: base directory for state files (default: "./data/state")
pub fn create_store(config: &toml::Value) -> Box<dyn StateStore> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/state")
		.to_string();

	Box::new(FileStore::new(PathBuf::from(path)))
}
