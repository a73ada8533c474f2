//! Durable per-intent execution state.

use alloy_primitives::{U256, U512};
use serde::{Deserialize, Serialize};

use crate::PRICE_SCALE;

/// Durable record keyed by intent id.
///
/// Created implicitly (all-zero) on first read, mutated only by a successful
/// chunk commit or by cancellation, and never deleted. `cancelled` is a
/// one-way latch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
	/// Sequence number the next chunk must carry.
	pub next_order_nonce: u64,
	/// Terminal cancellation latch.
	pub cancelled: bool,
	/// Number of chunks executed so far.
	pub executed_chunks: u64,
	/// Unix time of the most recent execution; 0 if never executed.
	pub last_execution_time: u64,
	/// Cumulative input committed across all chunks.
	pub total_input_executed: U256,
	/// Cumulative output delivered across all chunks.
	pub total_output_amount: U256,
}

impl ExecutionState {
	/// Applies a successful chunk execution.
	///
	/// Counters accumulate saturating so a commit can never panic; saturation
	/// is unreachable for real token supplies.
	pub fn apply_execution(&mut self, input_amount: U256, output_amount: U256, now: u64) {
		self.executed_chunks += 1;
		self.last_execution_time = now;
		self.total_input_executed = self.total_input_executed.saturating_add(input_amount);
		self.total_output_amount = self.total_output_amount.saturating_add(output_amount);
		self.next_order_nonce += 1;
	}
}

/// Read-only statistics derived from an execution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentStatistics {
	pub executed_chunks: u64,
	pub total_input: U256,
	pub total_output: U256,
	/// `total_output * 10^18 / total_input`, 0 when nothing was executed.
	pub average_price: U256,
	pub last_execution_time: u64,
}

impl IntentStatistics {
	pub fn from_state(state: &ExecutionState) -> Self {
		let average_price = if state.total_input_executed.is_zero() {
			U256::ZERO
		} else {
			let scaled = U512::from(state.total_output_amount) * U512::from(PRICE_SCALE)
				/ U512::from(state.total_input_executed);
			scaled.saturating_to::<U256>()
		};

		Self {
			executed_chunks: state.executed_chunks,
			total_input: state.total_input_executed,
			total_output: state.total_output_amount,
			average_price,
			last_execution_time: state.last_execution_time,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn eth(n: u64) -> U256 {
		U256::from(n) * U256::from(PRICE_SCALE)
	}

	#[test]
	fn test_apply_execution_updates_every_counter() {
		let mut state = ExecutionState::default();
		state.apply_execution(eth(100), eth(180), 1_000);

		assert_eq!(state.next_order_nonce, 1);
		assert_eq!(state.executed_chunks, 1);
		assert_eq!(state.last_execution_time, 1_000);
		assert_eq!(state.total_input_executed, eth(100));
		assert_eq!(state.total_output_amount, eth(180));
		assert!(!state.cancelled);

		state.apply_execution(eth(50), eth(90), 2_000);
		assert_eq!(state.next_order_nonce, 2);
		assert_eq!(state.executed_chunks, 2);
		assert_eq!(state.total_input_executed, eth(150));
	}

	#[test]
	fn test_average_price_is_output_over_input() {
		let mut state = ExecutionState::default();
		state.apply_execution(eth(100), eth(180), 1_000);

		let stats = IntentStatistics::from_state(&state);
		// 180e18 * 1e18 / 100e18 = 1.8e18
		assert_eq!(stats.average_price, U256::from(PRICE_SCALE) * U256::from(18) / U256::from(10));
	}

	#[test]
	fn test_average_price_zero_without_input() {
		let stats = IntentStatistics::from_state(&ExecutionState::default());
		assert_eq!(stats.average_price, U256::ZERO);
	}
}
