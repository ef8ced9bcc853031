#![deny(missing_docs)]

//! # stake_restitution
//!
//! One-shot chain upgrade that restores stake lost by delegators of a
//! validator that was wrongly tombstoned.  At the `v1.4` upgrade height the
//! handler clears the validator's tombstone and unjails it, then walks a
//! fixed list of `{address, amount}` records compiled into the crate.  For
//! each record it mints the amount into the mint module account, sends it to
//! the account and delegates it to the restored validator.
//!
//! The first failure aborts the run.  Nothing is rolled back here; the host
//! discards the state of a failed upgrade.  Running the handler twice mints
//! twice.
//!
//! ## Layout
//!
//! * [`coin`]: exact `u128` amounts and validated denominations.
//! * [`address`]: bech32 account, operator and consensus addresses.
//! * [`config`]: network constants and their JSON form.
//! * [`records`]: the embedded record set and its audit digest.
//! * [`ledger`]: the authority traits the upgrade consumes, plus an
//!   in-memory ledger implementing them.
//! * [`upgrade`]: the handler, the record applier and post-run verification.
//!
//! ```
//! use stake_restitution::ledger::{
//!     BankKeeper, LedgerState, MintKeeper, SlashingKeeper, StakingKeeper, Validator,
//! };
//! use stake_restitution::upgrade::{Keepers, Upgrade, UpgradePlan, UPGRADE_NAME};
//! use stake_restitution::{Denom, COS_CONSENSUS_ADDRESS, COS_VALIDATOR_ADDRESS};
//!
//! let mut state = LedgerState::new(Denom::new("uscrt").unwrap());
//! state.add_validator(Validator {
//!     operator: COS_VALIDATOR_ADDRESS.to_string(),
//!     consensus: COS_CONSENSUS_ADDRESS.to_string(),
//!     status: Default::default(),
//!     jailed: true,
//!     tokens: 0,
//!     delegator_shares: 0,
//! });
//! state.set_signing_info(COS_CONSENSUS_ADDRESS, Default::default());
//!
//! let mint = MintKeeper::default();
//! let keepers = Keepers {
//!     mint: &mint,
//!     bank: &BankKeeper,
//!     staking: &StakingKeeper,
//!     slashing: &SlashingKeeper,
//! };
//! let summary = Upgrade::cos_restitution()
//!     .run(&UpgradePlan::new(UPGRADE_NAME, 1), &mut state, &keepers)
//!     .unwrap();
//! assert!(summary.applied > 0);
//! ```

pub mod address;
pub mod coin;
pub mod config;
pub mod error;
pub mod ledger;
pub mod records;
pub mod upgrade;

#[cfg(test)]
mod test_support;

pub use address::{AccAddress, AddressError, ConsAddress, ValAddress};
pub use coin::{parse_amount, AmountError, Coin, Denom};
pub use config::{
    Bech32Prefixes, RestitutionConfig, COS_CONSENSUS_ADDRESS, COS_VALIDATOR_ADDRESS,
    DEFAULT_DENOM, MINT_MODULE,
};
pub use error::{LedgerError, MigrationError};
pub use records::{embedded_records, parse_records, records_digest, MintRecord};
pub use upgrade::{
    ApplySummary, MigrationApplier, Upgrade, UpgradePlan, VerifyOptions, VerifySummary,
    UPGRADE_NAME,
};
