//! Ledger authorities consumed by the restitution routine.
//!
//! The routine never owns ledger state.  Each authority is a stateless handle
//! whose methods receive the caller's context (`C`), so mint, bank and
//! staking can all mutate the same state within one call without aliasing.
//! [`LedgerState`] and the keepers in [`keepers`] are an in-memory
//! implementation of the four traits.

pub mod keepers;
pub mod state;

pub use keepers::{BankKeeper, MintKeeper, SlashingKeeper, StakingKeeper};
pub use state::{LedgerState, Permission, SigningInfo, BONDED_POOL, NOT_BONDED_POOL};

use crate::address::{AccAddress, ConsAddress, ValAddress};
use crate::coin::Coin;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// Bonding status of a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BondStatus {
    /// Not in the active set.
    Unbonded,
    /// Leaving the active set.
    Unbonding,
    /// In the active set.
    #[default]
    Bonded,
}

/// Validator record as seen by the delegation authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Operator address (bech32).
    pub operator: String,
    /// Consensus address (bech32).
    pub consensus: String,
    /// Bonding status.
    #[serde(default)]
    pub status: BondStatus,
    /// Whether the validator is jailed.
    #[serde(default)]
    pub jailed: bool,
    /// Bonded tokens.
    #[serde(default)]
    pub tokens: u128,
    /// Total delegator shares issued.
    #[serde(default)]
    pub delegator_shares: u128,
}

/// Creates new supply into the mint module account.
pub trait MintAuthority<C> {
    /// Mint `coin` and credit it to the mint module account.
    fn mint_coins(&self, ctx: &mut C, coin: &Coin) -> Result<(), LedgerError>;

    /// Name of the module account credited by [`MintAuthority::mint_coins`].
    fn module_name(&self) -> &str;
}

/// Moves coins between holders.
pub trait TransferAuthority<C> {
    /// Send `coin` from module account `module` to account `to`.
    fn send_coins_from_module_to_account(
        &self,
        ctx: &mut C,
        module: &str,
        to: &AccAddress,
        coin: &Coin,
    ) -> Result<(), LedgerError>;
}

/// Stakes coins on behalf of accounts.
pub trait DelegationAuthority<C> {
    /// Look up a validator by operator address.
    fn validator(&self, ctx: &C, operator: &ValAddress) -> Option<Validator>;

    /// Delegate `coin` from the delegator's spendable balance to `validator`,
    /// returning the shares issued.
    fn delegate(
        &self,
        ctx: &mut C,
        delegator: &AccAddress,
        validator: &Validator,
        coin: &Coin,
    ) -> Result<u128, LedgerError>;

    /// Token value currently delegated by `delegator` to `operator`.
    fn delegation(&self, ctx: &C, delegator: &AccAddress, operator: &ValAddress) -> u128;
}

/// Tombstone and jail management.
pub trait SlashingAuthority<C> {
    /// Clear the tombstone on a consensus address.
    fn revert_tombstone(&self, ctx: &mut C, consensus: &ConsAddress) -> Result<(), LedgerError>;

    /// Release a jailed validator.
    fn unjail(&self, ctx: &mut C, operator: &ValAddress) -> Result<(), LedgerError>;
}
