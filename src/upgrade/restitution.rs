//! Mint, transfer and delegate each restitution record.

use crate::coin::{parse_amount, Coin, Denom};
use crate::config::RestitutionConfig;
use crate::error::MigrationError;
use crate::ledger::{DelegationAuthority, MintAuthority, TransferAuthority, Validator};
use crate::records::{embedded_records, records_digest, MintRecord};
use tracing::{debug, error, info};

/// Outcome of a completed restitution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    /// Records minted, transferred and delegated.
    pub applied: usize,
    /// Sum of all minted amounts.
    pub total_minted: u128,
    /// Validator that received the delegations.
    pub validator: String,
    /// Hex BLAKE2b-256 digest of the applied record set.
    pub records_digest: String,
}

struct Authorities<'a, M, T, D> {
    mint: &'a M,
    transfer: &'a T,
    delegation: &'a D,
}

/// Applies a fixed record set against the mint, transfer and delegation authorities.
///
/// The first failing record aborts the run and the error is returned.
/// Mutations made for earlier records are left in the caller's context, as is
/// the mint of the failing record when its address fails to decode; discarding
/// them is the job of whatever transaction wraps the upgrade.
///
/// Applying twice mints and delegates twice.  The upgrade framework is
/// responsible for running it exactly once.
#[derive(Debug, Clone)]
pub struct MigrationApplier {
    config: RestitutionConfig,
    records: Vec<MintRecord>,
}

impl MigrationApplier {
    /// Applier over an explicit record set.
    pub fn new(config: RestitutionConfig, records: Vec<MintRecord>) -> Self {
        Self { config, records }
    }

    /// Applier over the record set compiled into the crate.
    pub fn from_embedded(config: RestitutionConfig) -> Result<Self, MigrationError> {
        Ok(Self::new(config, embedded_records()?))
    }

    /// Records in application order.
    pub fn records(&self) -> &[MintRecord] {
        &self.records
    }

    /// Configuration in use.
    pub fn config(&self) -> &RestitutionConfig {
        &self.config
    }

    /// Run every record in order, stopping at the first failure.
    pub fn apply<C, M, T, D>(
        &self,
        ctx: &mut C,
        mint: &M,
        transfer: &T,
        delegation: &D,
    ) -> Result<ApplySummary, MigrationError>
    where
        M: MintAuthority<C>,
        T: TransferAuthority<C>,
        D: DelegationAuthority<C>,
    {
        let denom = self.config.denom().map_err(log_abort)?;
        let operator = self.config.validator().map_err(log_abort)?;
        let validator = delegation
            .validator(ctx, &operator)
            .ok_or_else(|| MigrationError::ValidatorNotFound(operator.to_string()))
            .map_err(log_abort)?;

        let digest = hex::encode(records_digest(&self.records));
        info!(
            records = self.records.len(),
            digest = %digest,
            validator = %operator,
            denom = %denom,
            "applying stake restitution"
        );

        let authorities = Authorities {
            mint,
            transfer,
            delegation,
        };
        let mut total_minted: u128 = 0;
        for (index, record) in self.records.iter().enumerate() {
            let amount = self
                .apply_record(ctx, &authorities, &denom, &validator, index, record)
                .map_err(log_abort)?;
            total_minted = total_minted
                .checked_add(amount)
                .ok_or(MigrationError::TotalOverflow { index })
                .map_err(log_abort)?;
        }

        info!(
            applied = self.records.len(),
            total_minted = %total_minted,
            "stake restitution complete"
        );
        Ok(ApplySummary {
            applied: self.records.len(),
            total_minted,
            validator: operator.to_string(),
            records_digest: digest,
        })
    }

    fn apply_record<C, M, T, D>(
        &self,
        ctx: &mut C,
        authorities: &Authorities<'_, M, T, D>,
        denom: &Denom,
        validator: &Validator,
        index: usize,
        record: &MintRecord,
    ) -> Result<u128, MigrationError>
    where
        M: MintAuthority<C>,
        T: TransferAuthority<C>,
        D: DelegationAuthority<C>,
    {
        let amount = parse_amount(&record.amount).map_err(|source| MigrationError::Amount {
            index,
            address: record.address.clone(),
            amount: record.amount.clone(),
            source,
        })?;
        let coin = Coin::new(denom.clone(), amount);

        authorities
            .mint
            .mint_coins(ctx, &coin)
            .map_err(|source| MigrationError::Mint {
                index,
                address: record.address.clone(),
                coin: coin.to_string(),
                source,
            })?;
        debug!(index = index, coin = %coin, "minted");

        let account =
            self.config
                .account(&record.address)
                .map_err(|source| MigrationError::Address {
                    index,
                    address: record.address.clone(),
                    source,
                })?;

        authorities
            .transfer
            .send_coins_from_module_to_account(
                ctx,
                authorities.mint.module_name(),
                &account,
                &coin,
            )
            .map_err(|source| MigrationError::Transfer {
                index,
                address: record.address.clone(),
                coin: coin.to_string(),
                source,
            })?;
        debug!(index = index, account = %account, coin = %coin, "transferred");

        let shares = authorities
            .delegation
            .delegate(ctx, &account, validator, &coin)
            .map_err(|source| MigrationError::Delegate {
                index,
                address: record.address.clone(),
                validator: validator.operator.clone(),
                coin: coin.to_string(),
                source,
            })?;
        debug!(index = index, account = %account, shares = %shares, "delegated");

        Ok(amount)
    }
}

fn log_abort(err: MigrationError) -> MigrationError {
    error!(record = ?err.record_index(), error = %err, "stake restitution aborted");
    err
}
