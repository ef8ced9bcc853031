//! Post-upgrade check that every restitution account holds its delegation.

use crate::address::AccAddress;
use crate::coin::parse_amount;
use crate::config::RestitutionConfig;
use crate::error::MigrationError;
use crate::ledger::DelegationAuthority;
use crate::records::MintRecord;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Options for restitution verification.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Fail when any account is below its expected delegation.
    pub require_complete: bool,
}

/// Verification result summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySummary {
    /// Distinct accounts in the record set.
    pub accounts: usize,
    /// Accounts whose delegation is at least the restitution amount.
    pub satisfied: usize,
    /// Accounts below their restitution amount, in address order.
    pub short: Vec<String>,
    /// Sum of all record amounts.
    pub expected_total: u128,
}

impl VerifySummary {
    /// True when no account is short.
    pub fn is_complete(&self) -> bool {
        self.short.is_empty()
    }
}

/// Compare each account's delegation to the validator against the sum of its
/// records.  Delegations above the expected amount pass, since accounts may
/// have staked on their own before the upgrade.
pub fn verify_restitution<C, D>(
    ctx: &C,
    delegation: &D,
    records: &[MintRecord],
    config: &RestitutionConfig,
    opts: &VerifyOptions,
) -> Result<VerifySummary, MigrationError>
where
    D: DelegationAuthority<C>,
{
    let operator = config.validator()?;

    let mut expected: BTreeMap<AccAddress, u128> = BTreeMap::new();
    let mut expected_total: u128 = 0;
    for (index, record) in records.iter().enumerate() {
        let amount = parse_amount(&record.amount).map_err(|source| MigrationError::Amount {
            index,
            address: record.address.clone(),
            amount: record.amount.clone(),
            source,
        })?;
        let account = config
            .account(&record.address)
            .map_err(|source| MigrationError::Address {
                index,
                address: record.address.clone(),
                source,
            })?;
        let slot = expected.entry(account).or_default();
        *slot = slot.saturating_add(amount);
        expected_total = expected_total.saturating_add(amount);
    }

    let mut short = Vec::new();
    for (account, owed) in &expected {
        let held = delegation.delegation(ctx, account, &operator);
        if held < *owed {
            warn!(account = %account, expected = %owed, delegated = %held, "restitution short");
            short.push(account.to_string());
        }
    }

    let summary = VerifySummary {
        accounts: expected.len(),
        satisfied: expected.len() - short.len(),
        short,
        expected_total,
    };
    info!(
        accounts = summary.accounts,
        satisfied = summary.satisfied,
        expected_total = %summary.expected_total,
        "restitution verified"
    );
    if opts.require_complete && !summary.is_complete() {
        return Err(MigrationError::Incomplete {
            short: summary.short.len(),
            accounts: summary.accounts,
        });
    }
    Ok(summary)
}
