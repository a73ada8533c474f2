//! Signature verification for the cadence engine.
//!
//! Two independently pluggable verifier roles share one mechanism: given a
//! digest, a claimed signer identity, and a signature, either recover a
//! key-pair address and compare, or hand the pair to a registered
//! programmable ("smart") signer and accept only its success response. The
//! engine invokes this twice per chunk, once for the swapper's standing
//! authorization and once for the cosigner's per-chunk authorization.

use alloy_primitives::{Address, PrimitiveSignature, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod implementations {
	pub mod keyset;
}

/// Errors produced during signature verification.
#[derive(Debug, Error)]
pub enum SignatureError {
	#[error("Malformed signature: {0}")]
	Malformed(String),
	#[error("Signer mismatch: recovered {recovered}, expected {expected}")]
	SignerMismatch {
		recovered: Address,
		expected: Address,
	},
	#[error("Smart signer {0} rejected the signature")]
	Rejected(Address),
	#[error("Smart signer error: {0}")]
	SmartSigner(String),
}

/// Programmable signature validation, the EIP-1271 analog.
///
/// Implementations decide validity however they like; the verifier accepts
/// only an affirmative response.
#[async_trait]
pub trait SmartSigner: Send + Sync {
	/// Returns the configuration schema this signer validates against.
	fn config_schema(&self) -> Box<dyn cadence_types::ConfigSchema>;

	/// Returns whether `signature` is valid for `digest` under this signer's
	/// own rules.
	async fn is_valid_signature(
		&self,
		digest: B256,
		signature: &[u8],
	) -> Result<bool, SignatureError>;
}

/// Verifier service resolving claimed identities to either plain key-pair
/// recovery or a registered smart signer.
#[derive(Default)]
pub struct SignatureVerifier {
	smart_signers: HashMap<Address, Arc<dyn SmartSigner>>,
}

impl SignatureVerifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a smart signer for an identity. Claims for that identity are
	/// routed to the signer instead of address recovery.
	pub fn register_smart_signer(&mut self, identity: Address, signer: Arc<dyn SmartSigner>) {
		self.smart_signers.insert(identity, signer);
	}

	/// Verifies that `signature` over `digest` authorizes `signer`.
	pub async fn verify(
		&self,
		digest: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<(), SignatureError> {
		if let Some(smart) = self.smart_signers.get(&signer) {
			if smart.is_valid_signature(digest, signature).await? {
				Ok(())
			} else {
				Err(SignatureError::Rejected(signer))
			}
		} else {
			let recovered = recover_signer(digest, signature)?;
			if recovered == signer {
				Ok(())
			} else {
				Err(SignatureError::SignerMismatch {
					recovered,
					expected: signer,
				})
			}
		}
	}
}

/// Recovers the key-pair address behind a 65-byte `r ‖ s ‖ v` signature.
///
/// Accepts v in {0, 1, 27, 28}; anything else is malformed and fails without
/// attempting recovery.
pub fn recover_signer(digest: B256, signature: &[u8]) -> Result<Address, SignatureError> {
	if signature.len() != 65 {
		return Err(SignatureError::Malformed(format!(
			"expected 65 bytes, got {}",
			signature.len()
		)));
	}

	let r = U256::from_be_slice(&signature[0..32]);
	let s = U256::from_be_slice(&signature[32..64]);
	let parity = match signature[64] {
		0 | 27 => false,
		1 | 28 => true,
		v => {
			return Err(SignatureError::Malformed(format!(
				"unsupported recovery id {}",
				v
			)))
		}
	};

	PrimitiveSignature::new(r, s, parity)
		.recover_address_from_prehash(&digest)
		.map_err(|e| SignatureError::Malformed(e.to_string()))
}
