//! Smart signer backed by a fixed set of authorized keys.
//!
//! A signature is valid if it recovers to any member of the set. Useful for
//! cosigner identities operated by a rotation of automated signers (for
//! example a price-oracle fleet) behind one on-record address.

use crate::{recover_signer, SignatureError, SmartSigner};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use cadence_types::{ConfigSchema, Field, FieldType, Schema};

/// Validates a signature if the recovered key is an authorized set member.
pub struct KeySetSigner {
	/// Sorted for binary search.
	members: Vec<Address>,
}

impl KeySetSigner {
	pub fn new(mut members: Vec<Address>) -> Self {
		members.sort();
		members.dedup();
		Self { members }
	}
}

/// Configuration schema for [`KeySetSigner`].
pub struct KeySetSignerSchema;

impl ConfigSchema for KeySetSignerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), cadence_types::ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("members", FieldType::Array(Box::new(FieldType::String)))
					.with_validator(|value| {
						let members = value.as_array().unwrap();
						if members.is_empty() {
							return Err("members must not be empty".to_string());
						}
						for member in members {
							cadence_types::validate_address_field(member)?;
						}
						Ok(())
					}),
			],
			vec![],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl SmartSigner for KeySetSigner {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(KeySetSignerSchema)
	}

	async fn is_valid_signature(
		&self,
		digest: B256,
		signature: &[u8],
	) -> Result<bool, SignatureError> {
		// An unrecoverable signature is a rejection, not an error: the smart
		// signer's answer to "is this valid" is simply no.
		match recover_signer(digest, signature) {
			Ok(recovered) => Ok(self.members.binary_search(&recovered).is_ok()),
			Err(_) => Ok(false),
		}
	}
}

/// Factory function to create a key-set signer from configuration.
///
/// Configuration parameters:
/// - `members`: array of 0x-prefixed authorized addresses
///
/// Entries that are missing or unparseable are dropped rather than panicking;
/// validation against [`KeySetSignerSchema`] is where a malformed table gets
/// reported. An empty member set rejects every signature.
pub fn create_signer(config: &toml::Value) -> Box<dyn SmartSigner> {
	let members = config
		.get("members")
		.and_then(|v| v.as_array())
		.map(|values| {
			values
				.iter()
				.filter_map(|v| v.as_str())
				.filter_map(|s| s.parse::<Address>().ok())
				.collect()
		})
		.unwrap_or_default();

	Box::new(KeySetSigner::new(members))
}
