//! Engine assembly.

use alloy_primitives::Address;

use crate::{AuthorizationEngine, EngineError};
use cadence_signature::SignatureVerifier;
use cadence_state::{ExecutionStateStore, StateStore};
use cadence_types::EventBus;

const DEFAULT_EVENT_CAPACITY: usize = 1_000;

/// Builder wiring the engine's collaborators together.
///
/// The deployment address, chain id, and a state backend are required; the
/// verifier defaults to plain key-pair recovery with no smart signers.
#[derive(Default)]
pub struct EngineBuilder {
	address: Option<Address>,
	chain_id: Option<u64>,
	verifier: Option<SignatureVerifier>,
	backend: Option<Box<dyn StateStore>>,
	event_capacity: Option<usize>,
}

impl EngineBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Deployment identity intents must target.
	pub fn with_address(mut self, address: Address) -> Self {
		self.address = Some(address);
		self
	}

	/// Chain id intents must target.
	pub fn with_chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	/// Signature verifier, including any registered smart signers.
	pub fn with_verifier(mut self, verifier: SignatureVerifier) -> Self {
		self.verifier = Some(verifier);
		self
	}

	/// State backend holding the per-intent execution records.
	pub fn with_state_backend(mut self, backend: Box<dyn StateStore>) -> Self {
		self.backend = Some(backend);
		self
	}

	/// Event bus capacity; lagging subscribers miss events past it.
	pub fn with_event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = Some(capacity);
		self
	}

	pub fn build(self) -> Result<AuthorizationEngine, EngineError> {
		let address = self
			.address
			.ok_or_else(|| EngineError::Config("engine address is required".to_string()))?;
		let chain_id = self
			.chain_id
			.ok_or_else(|| EngineError::Config("chain id is required".to_string()))?;
		let backend = self
			.backend
			.ok_or_else(|| EngineError::Config("state backend is required".to_string()))?;

		Ok(AuthorizationEngine::new(
			address,
			chain_id,
			self.verifier.unwrap_or_default(),
			ExecutionStateStore::new(backend),
			EventBus::new(self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY)),
		))
	}
}
