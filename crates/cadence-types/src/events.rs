//! Engine event notifications.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CadenceEvent {
	Execution(ExecutionEvent),
	Lifecycle(LifecycleEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionEvent {
	ChunkExecuted {
		intent_id: B256,
		order_nonce: u64,
		filler: Address,
		input_amount: U256,
		output_amount: U256,
	},
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
	IntentCancelled {
		intent_id: B256,
		swapper: Address,
		nonce: U256,
	},
}

/// Broadcast bus for engine events. Subscribers that lag simply miss events;
/// the engine never blocks on publication.
pub struct EventBus {
	sender: broadcast::Sender<CadenceEvent>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<CadenceEvent> {
		self.sender.subscribe()
	}

	pub fn publish(
		&self,
		event: CadenceEvent,
	) -> Result<(), broadcast::error::SendError<CadenceEvent>> {
		self.sender.send(event)?;
		Ok(())
	}
}

impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}
