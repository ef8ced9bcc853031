//! Restitution records embedded in the binary.

use crate::coin::parse_amount;
use crate::error::MigrationError;
use blake2::digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};

type Blake2b256 = blake2::Blake2b<U32>;

/// JSON array of `{ "address", "amount" }` records applied by the upgrade.
pub const EMBEDDED_RECORDS_JSON: &str = include_str!("../data/cos_mints.json");

const DIGEST_DOMAIN: &[u8] = b"stake-restitution-records-v1";

/// One account to restore: bech32 account address and base-unit amount.
///
/// Both fields are kept as text so that malformed entries surface as
/// record-scoped failures during the run rather than as a JSON error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MintRecord {
    /// Bech32 account address.
    pub address: String,
    /// Decimal amount in the smallest unit.
    pub amount: String,
}

impl MintRecord {
    /// Convenience constructor.
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// Decode a JSON record array.
pub fn parse_records(raw: &str) -> Result<Vec<MintRecord>, MigrationError> {
    serde_json::from_str(raw).map_err(|err| MigrationError::Records(err.to_string()))
}

/// Decode the record set compiled into this crate.
pub fn embedded_records() -> Result<Vec<MintRecord>, MigrationError> {
    parse_records(EMBEDDED_RECORDS_JSON)
}

/// BLAKE2b-256 over the ordered record set, for audit logs.
pub fn records_digest(records: &[MintRecord]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(DIGEST_DOMAIN);
    hasher.update((records.len() as u64).to_be_bytes());
    for record in records {
        hasher.update(record.address.as_bytes());
        hasher.update([0u8]);
        hasher.update(record.amount.as_bytes());
        hasher.update([0u8]);
    }
    hasher.finalize().into()
}

/// Sum of all record amounts; fails on the first malformed amount.
pub fn records_total(records: &[MintRecord]) -> Result<u128, MigrationError> {
    let mut total: u128 = 0;
    for (index, record) in records.iter().enumerate() {
        let amount = parse_amount(&record.amount).map_err(|source| MigrationError::Amount {
            index,
            address: record.address.clone(),
            amount: record.amount.clone(),
            source,
        })?;
        total = total.checked_add(amount).ok_or_else(|| {
            MigrationError::Records(format!("record total overflows at record {index}"))
        })?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::{embedded_records, parse_records, records_digest, records_total, MintRecord};
    use crate::config::RestitutionConfig;
    use crate::error::MigrationError;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn embedded_set_is_well_formed() {
        let records = embedded_records().unwrap();
        assert_eq!(records.len(), 14);
        assert_eq!(records_total(&records).unwrap(), 4_867_584_512);

        let config = RestitutionConfig::default();
        let mut seen = HashSet::new();
        for record in &records {
            config.account(&record.address).unwrap();
            assert!(seen.insert(record.address.clone()), "duplicate {}", record.address);
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = json!([{"address": "a", "amount": "1", "memo": "x"}]).to_string();
        assert!(matches!(parse_records(&raw), Err(MigrationError::Records(_))));
    }

    #[test]
    fn digest_depends_on_order_and_content() {
        let a = MintRecord::new("secret1a", "1");
        let b = MintRecord::new("secret1b", "2");
        let forward = records_digest(&[a.clone(), b.clone()]);
        let reverse = records_digest(&[b.clone(), a.clone()]);
        assert_ne!(forward, reverse);
        assert_eq!(forward, records_digest(&[a.clone(), b]));
        assert_ne!(forward, records_digest(&[a, MintRecord::new("secret1b", "3")]));
    }

    #[test]
    fn total_reports_first_bad_amount() {
        let records = vec![
            MintRecord::new("secret1a", "5"),
            MintRecord::new("secret1b", "abc"),
            MintRecord::new("secret1c", "-1"),
        ];
        let err = records_total(&records).unwrap_err();
        assert_eq!(err.record_index(), Some(1));
    }
}
