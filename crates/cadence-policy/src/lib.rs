//! Pure policy checks for chunk authorization.
//!
//! The engine runs these in a fixed order, each a hard stop:
//!
//! 1. swapper signature (verified by the engine, reported here)
//! 2. static binding ([`check_static_binding`])
//! 3. allocation structure ([`check_allocations`])
//! 4. cosigner signature + binding ([`check_cosigner_binding`])
//! 5. state and timing ([`check_state_and_timing`])
//! 6. chunk size ([`check_chunk_size`])
//! 7. price floor ([`check_price_floor`])
//! 8. output distribution ([`check_output_distribution`])
//!
//! The order matters for predictable failure reporting: cheap structural
//! rejections come before state reads, signatures gate everything that
//! interprets the payload. Every function here is read-only; only the engine
//! commits state, and only after all stages pass.

use alloy_primitives::{Address, U256, U512};
use std::collections::HashMap;

use cadence_types::{
	CosignerAuthorization, ExecutionState, Intent, OutputAllocation, OutputFill, ResolvedOrder,
	TradeDirection, BPS_DENOMINATOR, PRICE_SCALE,
};

mod error;

pub use error::{AuthorizationError, FailureKind};

/// Stage 2: the intent must target the executing deployment and the resolved
/// order must carry the intent's declared parties and tokens.
pub fn check_static_binding(
	intent: &Intent,
	order: &ResolvedOrder,
	executing_engine: Address,
	executing_chain: u64,
) -> Result<(), AuthorizationError> {
	if intent.engine != executing_engine {
		return Err(AuthorizationError::WrongEngine {
			intent: intent.engine,
			executing: executing_engine,
		});
	}
	if intent.chain_id != executing_chain {
		return Err(AuthorizationError::WrongChain {
			intent: intent.chain_id,
			executing: executing_chain,
		});
	}
	if order.swapper != intent.swapper {
		return Err(AuthorizationError::SwapperMismatch {
			intent: intent.swapper,
			order: order.swapper,
		});
	}
	if order.input.token != intent.input_token {
		return Err(AuthorizationError::InputTokenMismatch {
			intent: intent.input_token,
			order: order.input.token,
		});
	}
	for output in &order.outputs {
		if output.token != intent.output_token {
			return Err(AuthorizationError::OutputTokenMismatch {
				intent: intent.output_token,
				order: output.token,
			});
		}
	}
	Ok(())
}

/// Stage 3: allocations must be non-empty, strictly positive, and sum to
/// exactly 10_000 bps. The running total fails fast the moment it exceeds
/// 100 percent.
pub fn check_allocations(allocations: &[OutputAllocation]) -> Result<(), AuthorizationError> {
	if allocations.is_empty() {
		return Err(AuthorizationError::EmptyAllocations);
	}

	let denominator = U256::from(BPS_DENOMINATOR);
	let mut total = U256::ZERO;
	for alloc in allocations {
		if alloc.basis_points.is_zero() {
			return Err(AuthorizationError::ZeroAllocation {
				recipient: alloc.recipient,
			});
		}
		total = total.saturating_add(alloc.basis_points);
		if total > denominator {
			return Err(AuthorizationError::AllocationsExceed100Percent { total });
		}
	}

	if total != denominator {
		return Err(AuthorizationError::AllocationsNot100Percent { total });
	}
	Ok(())
}

/// Stage 4 (after the engine verified the cosigner signature): the
/// authorization must be scoped to this very intent.
pub fn check_cosigner_binding(
	intent: &Intent,
	auth: &CosignerAuthorization,
) -> Result<(), AuthorizationError> {
	if auth.swapper != intent.swapper {
		return Err(AuthorizationError::CosignerSwapperMismatch {
			intent: intent.swapper,
			authorization: auth.swapper,
		});
	}
	if auth.intent_nonce != intent.nonce {
		return Err(AuthorizationError::CosignerNonceMismatch {
			intent: intent.nonce,
			authorization: auth.intent_nonce,
		});
	}
	Ok(())
}

/// Stage 5: the intent must be live, the chunk in sequence, and the cadence
/// respected. The first chunk (`executed_chunks == 0`) is exempt from period
/// gating.
pub fn check_state_and_timing(
	intent: &Intent,
	auth: &CosignerAuthorization,
	state: &ExecutionState,
	now: u64,
) -> Result<(), AuthorizationError> {
	if state.cancelled {
		return Err(AuthorizationError::IntentIsCancelled);
	}
	if intent.deadline != 0 && now > intent.deadline {
		return Err(AuthorizationError::IntentExpired {
			deadline: intent.deadline,
			now,
		});
	}
	if auth.order_nonce != state.next_order_nonce {
		return Err(AuthorizationError::WrongChunkNonce {
			expected: state.next_order_nonce,
			actual: auth.order_nonce,
		});
	}
	if state.executed_chunks > 0 {
		let elapsed = now.saturating_sub(state.last_execution_time);
		if elapsed < intent.min_period {
			return Err(AuthorizationError::TooSoon {
				elapsed,
				min_period: intent.min_period,
			});
		}
		if intent.max_period != 0 && elapsed > intent.max_period {
			return Err(AuthorizationError::TooLate {
				elapsed,
				max_period: intent.max_period,
			});
		}
	}
	Ok(())
}

/// Stage 6: the authorized contractual amount must sit inside the intent's
/// chunk bounds and agree with the observed input.
pub fn check_chunk_size(
	intent: &Intent,
	auth: &CosignerAuthorization,
	order_input: U256,
) -> Result<(), AuthorizationError> {
	if auth.exec_amount < intent.min_chunk_size {
		return Err(AuthorizationError::ChunkSizeBelowMin {
			amount: auth.exec_amount,
			min: intent.min_chunk_size,
		});
	}
	if auth.exec_amount > intent.max_chunk_size {
		return Err(AuthorizationError::ChunkSizeAboveMax {
			amount: auth.exec_amount,
			max: intent.max_chunk_size,
		});
	}

	match intent.direction {
		TradeDirection::ExactInput => {
			if order_input != auth.exec_amount {
				return Err(AuthorizationError::InputAmountMismatch {
					expected: auth.exec_amount,
					actual: order_input,
				});
			}
		}
		TradeDirection::ExactOutput => {
			if order_input.is_zero() {
				return Err(AuthorizationError::ZeroInput);
			}
			if order_input > auth.limit_amount {
				return Err(AuthorizationError::InputAboveLimit {
					amount: order_input,
					limit: auth.limit_amount,
				});
			}
		}
	}
	Ok(())
}

/// Execution price of a chunk as output per input, scaled by 10^18.
///
/// Exact-input: `limit_amount` is the minimum acceptable output, so the
/// price is `limit * 10^18 / exec`. Exact-output: `limit_amount` is the
/// maximum acceptable input, so the price is `exec * 10^18 / limit`. A zero
/// denominator means an unboundedly good price and reports `U256::MAX`.
pub fn execution_price(
	direction: TradeDirection,
	exec_amount: U256,
	limit_amount: U256,
) -> U256 {
	let (numerator, denominator) = match direction {
		TradeDirection::ExactInput => (limit_amount, exec_amount),
		TradeDirection::ExactOutput => (exec_amount, limit_amount),
	};
	if denominator.is_zero() {
		return U256::MAX;
	}
	// 512-bit intermediate so an astronomically high true price saturates
	// instead of overflowing.
	let scaled = U512::from(numerator) * U512::from(PRICE_SCALE) / U512::from(denominator);
	scaled.saturating_to::<U256>()
}

/// Stage 7: the chunk's execution price must meet the intent's floor.
pub fn check_price_floor(
	intent: &Intent,
	auth: &CosignerAuthorization,
) -> Result<(), AuthorizationError> {
	let price = execution_price(intent.direction, auth.exec_amount, auth.limit_amount);
	if price < intent.min_price {
		return Err(AuthorizationError::PriceBelowMin {
			price,
			min_price: intent.min_price,
		});
	}
	Ok(())
}

/// Stage 8: the observed outputs must honor the declared allocation split and
/// the cosigner's economics.
///
/// Each allocation entry is checked independently against its expected share
/// `total * bps / 10_000`. Exact-input tolerates a one-unit deviation per
/// entry to absorb integer-division rounding; exact-output requires exact
/// equality. Note the tolerance is per entry, not a bound on the summed
/// rounding error, so cumulative rounding can favor one recipient across
/// entries; this matches the wire contract's documented behavior.
pub fn check_output_distribution(
	intent: &Intent,
	auth: &CosignerAuthorization,
	outputs: &[OutputFill],
) -> Result<(), AuthorizationError> {
	let mut observed: HashMap<Address, U256> = HashMap::new();
	let mut total = U256::ZERO;
	for output in outputs {
		let entry = observed.entry(output.recipient).or_default();
		*entry = entry.saturating_add(output.amount);
		total = total.saturating_add(output.amount);
	}

	for alloc in &intent.allocations {
		let expected = (U512::from(total) * U512::from(alloc.basis_points)
			/ U512::from(BPS_DENOMINATOR))
		.saturating_to::<U256>();
		let actual = observed.get(&alloc.recipient).copied().unwrap_or_default();

		let ok = match intent.direction {
			TradeDirection::ExactInput => actual.abs_diff(expected) <= U256::from(1),
			TradeDirection::ExactOutput => actual == expected,
		};
		if !ok {
			return Err(AuthorizationError::AllocationMismatch {
				recipient: alloc.recipient,
				actual,
				expected,
			});
		}
	}

	match intent.direction {
		TradeDirection::ExactInput => {
			if total < auth.limit_amount {
				return Err(AuthorizationError::InsufficientOutput {
					total,
					required: auth.limit_amount,
				});
			}
		}
		TradeDirection::ExactOutput => {
			if total != auth.exec_amount {
				return Err(AuthorizationError::WrongTotalOutput {
					total,
					expected: auth.exec_amount,
				});
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Bytes;
	use cadence_types::{AssetAmount, PrivateTerms};

	const ENGINE: Address = Address::repeat_byte(0xee);
	const CHAIN: u64 = 1;

	fn eth(n: u64) -> U256 {
		U256::from(n) * U256::from(PRICE_SCALE)
	}

	fn bps(n: u64) -> U256 {
		U256::from(n)
	}

	fn intent() -> Intent {
		Intent {
			engine: ENGINE,
			chain_id: CHAIN,
			swapper: Address::repeat_byte(0x11),
			nonce: U256::from(1),
			cosigner: Address::repeat_byte(0x22),
			direction: TradeDirection::ExactInput,
			input_token: Address::repeat_byte(0x33),
			output_token: Address::repeat_byte(0x44),
			min_period: 3_600,
			max_period: 86_400,
			deadline: 0,
			min_chunk_size: eth(10),
			max_chunk_size: eth(1_000),
			min_price: U256::ZERO,
			allocations: vec![
				OutputAllocation {
					recipient: Address::repeat_byte(0x55),
					basis_points: bps(9_000),
				},
				OutputAllocation {
					recipient: Address::repeat_byte(0x66),
					basis_points: bps(1_000),
				},
			],
			private_terms: PrivateTerms::default(),
		}
	}

	fn auth(intent: &Intent, exec: U256, order_nonce: u64, limit: U256) -> CosignerAuthorization {
		CosignerAuthorization {
			swapper: intent.swapper,
			intent_nonce: intent.nonce,
			exec_amount: exec,
			order_nonce,
			limit_amount: limit,
		}
	}

	fn order(intent: &Intent, input: U256, outputs: Vec<(Address, U256)>) -> ResolvedOrder {
		ResolvedOrder {
			swapper: intent.swapper,
			input: AssetAmount {
				token: intent.input_token,
				amount: input,
			},
			outputs: outputs
				.into_iter()
				.map(|(recipient, amount)| OutputFill {
					token: intent.output_token,
					amount,
					recipient,
				})
				.collect(),
			deadline: 0,
			hook_data: Bytes::new(),
		}
	}

	#[test]
	fn test_static_binding_accepts_matching_order() {
		let intent = intent();
		let order = order(&intent, eth(100), vec![(Address::repeat_byte(0x55), eth(180))]);
		assert!(check_static_binding(&intent, &order, ENGINE, CHAIN).is_ok());
	}

	#[test]
	fn test_static_binding_mismatches() {
		let intent = intent();
		let order = order(&intent, eth(100), vec![(Address::repeat_byte(0x55), eth(180))]);

		assert!(matches!(
			check_static_binding(&intent, &order, Address::repeat_byte(0xef), CHAIN),
			Err(AuthorizationError::WrongEngine { .. })
		));
		assert!(matches!(
			check_static_binding(&intent, &order, ENGINE, 10),
			Err(AuthorizationError::WrongChain {
				intent: 1,
				executing: 10
			})
		));

		let mut wrong_swapper = order.clone();
		wrong_swapper.swapper = Address::repeat_byte(0x99);
		assert!(matches!(
			check_static_binding(&intent, &wrong_swapper, ENGINE, CHAIN),
			Err(AuthorizationError::SwapperMismatch { .. })
		));

		let mut wrong_input = order.clone();
		wrong_input.input.token = Address::repeat_byte(0x99);
		assert!(matches!(
			check_static_binding(&intent, &wrong_input, ENGINE, CHAIN),
			Err(AuthorizationError::InputTokenMismatch { .. })
		));

		let mut wrong_output = order;
		wrong_output.outputs[0].token = Address::repeat_byte(0x99);
		assert!(matches!(
			check_static_binding(&intent, &wrong_output, ENGINE, CHAIN),
			Err(AuthorizationError::OutputTokenMismatch { .. })
		));
	}

	#[test]
	fn test_allocations_must_sum_to_exactly_10000() {
		let a = Address::repeat_byte(0x55);
		let b = Address::repeat_byte(0x66);
		let alloc = |points: u64| OutputAllocation {
			recipient: a,
			basis_points: bps(points),
		};

		assert!(check_allocations(&[alloc(10_000)]).is_ok());
		assert!(check_allocations(&[
			alloc(9_000),
			OutputAllocation {
				recipient: b,
				basis_points: bps(1_000)
			}
		])
		.is_ok());

		assert!(matches!(
			check_allocations(&[]),
			Err(AuthorizationError::EmptyAllocations)
		));
		assert!(matches!(
			check_allocations(&[alloc(10_000), OutputAllocation { recipient: b, basis_points: U256::ZERO }]),
			Err(AuthorizationError::ZeroAllocation { recipient }) if recipient == b
		));
		// Fail-fast on the running total: the second entry pushes past 100%.
		assert!(matches!(
			check_allocations(&[
				alloc(9_000),
				OutputAllocation {
					recipient: b,
					basis_points: bps(2_000)
				}
			]),
			Err(AuthorizationError::AllocationsExceed100Percent { total }) if total == bps(11_000)
		));
		assert!(matches!(
			check_allocations(&[alloc(9_999)]),
			Err(AuthorizationError::AllocationsNot100Percent { total }) if total == bps(9_999)
		));
	}

	#[test]
	fn test_cosigner_binding() {
		let intent = intent();
		let good = auth(&intent, eth(100), 0, eth(180));
		assert!(check_cosigner_binding(&intent, &good).is_ok());

		let mut wrong_swapper = good.clone();
		wrong_swapper.swapper = Address::repeat_byte(0x99);
		assert!(matches!(
			check_cosigner_binding(&intent, &wrong_swapper),
			Err(AuthorizationError::CosignerSwapperMismatch { .. })
		));

		let mut wrong_nonce = good;
		wrong_nonce.intent_nonce = U256::from(2);
		assert!(matches!(
			check_cosigner_binding(&intent, &wrong_nonce),
			Err(AuthorizationError::CosignerNonceMismatch { .. })
		));
	}

	#[test]
	fn test_first_chunk_exempt_from_period_gating() {
		let intent = intent();
		let auth = auth(&intent, eth(100), 0, eth(180));
		let state = ExecutionState::default();
		// No period check can fire before the first execution.
		assert!(check_state_and_timing(&intent, &auth, &state, 0).is_ok());
		assert!(check_state_and_timing(&intent, &auth, &state, u64::MAX).is_ok());
	}

	#[test]
	fn test_timing_gates_after_first_chunk() {
		let intent = intent();
		let mut state = ExecutionState::default();
		state.apply_execution(eth(100), eth(180), 100_000);
		let auth = auth(&intent, eth(100), 1, eth(180));

		assert!(matches!(
			check_state_and_timing(&intent, &auth, &state, 100_000 + 3_599),
			Err(AuthorizationError::TooSoon {
				elapsed: 3_599,
				min_period: 3_600
			})
		));
		assert!(check_state_and_timing(&intent, &auth, &state, 100_000 + 3_600).is_ok());
		assert!(check_state_and_timing(&intent, &auth, &state, 100_000 + 86_400).is_ok());
		assert!(matches!(
			check_state_and_timing(&intent, &auth, &state, 100_000 + 86_401),
			Err(AuthorizationError::TooLate {
				elapsed: 86_401,
				max_period: 86_400
			})
		));
	}

	#[test]
	fn test_zero_max_period_is_unbounded() {
		let mut intent = intent();
		intent.max_period = 0;
		let mut state = ExecutionState::default();
		state.apply_execution(eth(100), eth(180), 100_000);
		let auth = auth(&intent, eth(100), 1, eth(180));
		assert!(check_state_and_timing(&intent, &auth, &state, u64::MAX).is_ok());
	}

	#[test]
	fn test_deadline_and_cancellation() {
		let mut intent = intent();
		intent.deadline = 200_000;
		let auth = auth(&intent, eth(100), 0, eth(180));
		let state = ExecutionState::default();

		assert!(check_state_and_timing(&intent, &auth, &state, 200_000).is_ok());
		assert!(matches!(
			check_state_and_timing(&intent, &auth, &state, 200_001),
			Err(AuthorizationError::IntentExpired {
				deadline: 200_000,
				now: 200_001
			})
		));

		let cancelled = ExecutionState {
			cancelled: true,
			..Default::default()
		};
		assert!(matches!(
			check_state_and_timing(&intent, &auth, &cancelled, 0),
			Err(AuthorizationError::IntentIsCancelled)
		));
	}

	#[test]
	fn test_stale_and_future_nonces_rejected() {
		let intent = intent();
		let mut state = ExecutionState::default();
		state.apply_execution(eth(100), eth(180), 1);

		let stale = auth(&intent, eth(100), 0, eth(180));
		assert!(matches!(
			check_state_and_timing(&intent, &stale, &state, 100_000),
			Err(AuthorizationError::WrongChunkNonce {
				expected: 1,
				actual: 0
			})
		));

		let future = auth(&intent, eth(100), 5, eth(180));
		assert!(matches!(
			check_state_and_timing(&intent, &future, &state, 100_000),
			Err(AuthorizationError::WrongChunkNonce {
				expected: 1,
				actual: 5
			})
		));
	}

	#[test]
	fn test_chunk_size_bounds() {
		let intent = intent();

		let small = auth(&intent, eth(9), 0, eth(18));
		assert!(matches!(
			check_chunk_size(&intent, &small, eth(9)),
			Err(AuthorizationError::ChunkSizeBelowMin { .. })
		));

		let big = auth(&intent, eth(1_001), 0, eth(1_800));
		assert!(matches!(
			check_chunk_size(&intent, &big, eth(1_001)),
			Err(AuthorizationError::ChunkSizeAboveMax { .. })
		));

		let good = auth(&intent, eth(100), 0, eth(180));
		assert!(check_chunk_size(&intent, &good, eth(100)).is_ok());
		assert!(matches!(
			check_chunk_size(&intent, &good, eth(99)),
			Err(AuthorizationError::InputAmountMismatch { .. })
		));
	}

	#[test]
	fn test_exact_output_chunk_size() {
		let mut intent = intent();
		intent.direction = TradeDirection::ExactOutput;
		// exec is the required output; limit caps the input.
		let good = auth(&intent, eth(100), 0, eth(60));

		assert!(check_chunk_size(&intent, &good, eth(55)).is_ok());
		assert!(check_chunk_size(&intent, &good, eth(60)).is_ok());
		assert!(matches!(
			check_chunk_size(&intent, &good, U256::ZERO),
			Err(AuthorizationError::ZeroInput)
		));
		assert!(matches!(
			check_chunk_size(&intent, &good, eth(61)),
			Err(AuthorizationError::InputAboveLimit { .. })
		));
	}

	#[test]
	fn test_price_floor_exact_input_example() {
		// exec = 100e18, limit = 140e18, min_price = 1.5e18: the computed
		// price 1.4e18 is below the floor.
		let mut intent = intent();
		intent.min_price = eth(15) / U256::from(10);
		let below = auth(&intent, eth(100), 0, eth(140));

		let err = check_price_floor(&intent, &below).unwrap_err();
		assert_eq!(
			err,
			AuthorizationError::PriceBelowMin {
				price: eth(14) / U256::from(10),
				min_price: eth(15) / U256::from(10),
			}
		);

		// limit = 150e18 sits exactly on the floor.
		let at_floor = auth(&intent, eth(100), 0, eth(150));
		assert!(check_price_floor(&intent, &at_floor).is_ok());
	}

	#[test]
	fn test_price_floor_exact_output() {
		let mut intent = intent();
		intent.direction = TradeDirection::ExactOutput;
		intent.min_price = eth(2);

		// 100e18 out for at most 49e18 in: price just above 2e18.
		let good = auth(&intent, eth(100), 0, eth(49));
		assert!(check_price_floor(&intent, &good).is_ok());

		// 100e18 out for up to 51e18 in: price below 2e18.
		let bad = auth(&intent, eth(100), 0, eth(51));
		assert!(matches!(
			check_price_floor(&intent, &bad),
			Err(AuthorizationError::PriceBelowMin { .. })
		));
	}

	#[test]
	fn test_price_with_zero_denominator_is_unbounded() {
		assert_eq!(
			execution_price(TradeDirection::ExactInput, U256::ZERO, eth(1)),
			U256::MAX
		);
		assert_eq!(
			execution_price(TradeDirection::ExactOutput, eth(1), U256::ZERO),
			U256::MAX
		);
	}

	#[test]
	fn test_huge_price_saturates_instead_of_overflowing() {
		let price = execution_price(TradeDirection::ExactInput, U256::from(1), U256::MAX);
		assert_eq!(price, U256::MAX);
	}

	#[test]
	fn test_output_distribution_rounding_tolerance() {
		// 9000/1000 bps over 180e18 expects 162e18/18e18; one unit of
		// per-entry drift passes, more fails.
		let intent = intent();
		let auth = auth(&intent, eth(100), 0, eth(180));
		let a = intent.allocations[0].recipient;
		let b = intent.allocations[1].recipient;

		let exact = order(&intent, eth(100), vec![(a, eth(162)), (b, eth(18))]);
		assert!(check_output_distribution(&intent, &auth, &exact.outputs).is_ok());

		let off_by_one_wei = order(
			&intent,
			eth(100),
			vec![
				(a, eth(162) - U256::from(1)),
				(b, eth(18) + U256::from(1)),
			],
		);
		assert!(check_output_distribution(&intent, &auth, &off_by_one_wei.outputs).is_ok());

		// 161e18/19e18 is far more than one unit off the expected split.
		let skewed = order(&intent, eth(100), vec![(a, eth(161)), (b, eth(19))]);
		assert!(matches!(
			check_output_distribution(&intent, &auth, &skewed.outputs),
			Err(AuthorizationError::AllocationMismatch { .. })
		));

		let short = order(&intent, eth(100), vec![(a, eth(153)), (b, eth(27))]);
		let err = check_output_distribution(&intent, &auth, &short.outputs).unwrap_err();
		assert_eq!(
			err,
			AuthorizationError::AllocationMismatch {
				recipient: a,
				actual: eth(153),
				expected: eth(162),
			}
		);
	}

	#[test]
	fn test_output_distribution_total_floor() {
		let intent = intent();
		let auth = auth(&intent, eth(100), 0, eth(180));
		let a = intent.allocations[0].recipient;
		let b = intent.allocations[1].recipient;

		// Split is honored but the total misses the cosigner's minimum.
		let low = order(&intent, eth(100), vec![(a, eth(90)), (b, eth(10))]);
		assert!(matches!(
			check_output_distribution(&intent, &auth, &low.outputs),
			Err(AuthorizationError::InsufficientOutput { total, required })
				if total == eth(100) && required == eth(180)
		));

		// Overdelivery is fine for exact-input.
		let high = order(&intent, eth(100), vec![(a, eth(180)), (b, eth(20))]);
		assert!(check_output_distribution(&intent, &auth, &high.outputs).is_ok());
	}

	#[test]
	fn test_exact_output_distribution_requires_equality() {
		let mut intent = intent();
		intent.direction = TradeDirection::ExactOutput;
		let auth = auth(&intent, eth(180), 0, eth(100));
		let a = intent.allocations[0].recipient;
		let b = intent.allocations[1].recipient;

		let exact = order(&intent, eth(90), vec![(a, eth(162)), (b, eth(18))]);
		assert!(check_output_distribution(&intent, &auth, &exact.outputs).is_ok());

		// One unit of drift is not tolerated for exact-output.
		let drifted = order(
			&intent,
			eth(90),
			vec![(a, eth(162) - U256::from(1)), (b, eth(18) + U256::from(1))],
		);
		assert!(matches!(
			check_output_distribution(&intent, &auth, &drifted.outputs),
			Err(AuthorizationError::AllocationMismatch { .. })
		));

		// Overdelivery that still honors the split fails the total check.
		let over = order(&intent, eth(90), vec![(a, eth(180)), (b, eth(20))]);
		assert!(matches!(
			check_output_distribution(&intent, &auth, &over.outputs),
			Err(AuthorizationError::WrongTotalOutput { total, expected })
				if total == eth(200) && expected == eth(180)
		));
	}

	#[test]
	fn test_outputs_grouped_by_recipient() {
		// Two fills to the same recipient count as one allocation entry.
		let mut intent = intent();
		intent.allocations = vec![OutputAllocation {
			recipient: Address::repeat_byte(0x55),
			basis_points: bps(10_000),
		}];
		let auth = auth(&intent, eth(100), 0, eth(180));
		let a = intent.allocations[0].recipient;

		let split = order(&intent, eth(100), vec![(a, eth(100)), (a, eth(80))]);
		assert!(check_output_distribution(&intent, &auth, &split.outputs).is_ok());
	}

	#[test]
	fn test_failure_kinds() {
		assert_eq!(
			AuthorizationError::InvalidSwapperSignature("x".into()).kind(),
			FailureKind::Authorization
		);
		assert_eq!(
			AuthorizationError::EmptyAllocations.kind(),
			FailureKind::Structural
		);
		assert_eq!(
			AuthorizationError::WrongChunkNonce {
				expected: 1,
				actual: 0
			}
			.kind(),
			FailureKind::State
		);
		assert_eq!(
			AuthorizationError::PriceBelowMin {
				price: U256::ZERO,
				min_price: U256::from(1)
			}
			.kind(),
			FailureKind::Economic
		);
		assert_eq!(
			AuthorizationError::MalformedPayload("x".into()).kind(),
			FailureKind::Structural
		);
	}
}
