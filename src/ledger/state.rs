//! In-memory ledger store for balances, supply, validators and delegations.

use super::{BondStatus, Validator};
use crate::address::AccAddress;
use crate::coin::Denom;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Module account holding tokens delegated to bonded validators.
pub const BONDED_POOL: &str = "bonded_tokens_pool";
/// Module account holding tokens delegated to unbonded or unbonding validators.
pub const NOT_BONDED_POOL: &str = "not_bonded_tokens_pool";

/// Capability granted to a module account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// May create supply.
    Minter,
    /// May destroy supply.
    Burner,
    /// May hold staked tokens.
    Staking,
}

/// Slashing record for a consensus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SigningInfo {
    /// Permanently banned from the validator set.
    pub tombstoned: bool,
}

/// Ledger state keyed by bech32 text (accounts) or `module:<name>` (module accounts).
///
/// Total supply is derived from balances, so state is only loaded through
/// [`LedgerState::from_genesis_json`] and never deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    bond_denom: Denom,
    balances: BTreeMap<String, BTreeMap<Denom, u128>>,
    supply: BTreeMap<Denom, u128>,
    modules: BTreeMap<String, Vec<Permission>>,
    validators: BTreeMap<String, Validator>,
    delegations: BTreeMap<String, BTreeMap<String, u128>>,
    signing_infos: BTreeMap<String, SigningInfo>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Genesis {
    bond_denom: Denom,
    #[serde(default)]
    balances: BTreeMap<String, BTreeMap<Denom, u128>>,
    #[serde(default)]
    modules: BTreeMap<String, Vec<Permission>>,
    #[serde(default)]
    validators: BTreeMap<String, Validator>,
    #[serde(default)]
    delegations: BTreeMap<String, BTreeMap<String, u128>>,
    #[serde(default)]
    signing_infos: BTreeMap<String, SigningInfo>,
}

/// Holder key for a module account.
pub fn module_holder(name: &str) -> String {
    format!("module:{name}")
}

fn default_modules() -> BTreeMap<String, Vec<Permission>> {
    let mut modules = BTreeMap::new();
    modules.insert(crate::config::MINT_MODULE.to_string(), vec![Permission::Minter]);
    modules.insert(
        BONDED_POOL.to_string(),
        vec![Permission::Burner, Permission::Staking],
    );
    modules.insert(
        NOT_BONDED_POOL.to_string(),
        vec![Permission::Burner, Permission::Staking],
    );
    modules
}

impl LedgerState {
    /// Empty ledger with the standard mint and staking pool modules.
    pub fn new(bond_denom: Denom) -> Self {
        Self {
            bond_denom,
            balances: BTreeMap::new(),
            supply: BTreeMap::new(),
            modules: default_modules(),
            validators: BTreeMap::new(),
            delegations: BTreeMap::new(),
            signing_infos: BTreeMap::new(),
        }
    }

    /// Load a genesis fixture from JSON.
    ///
    /// Total supply is recomputed from balances.  When no modules are listed
    /// the standard mint and staking pool modules are registered.
    pub fn from_genesis_json(raw: &str) -> Result<Self, String> {
        let genesis: Genesis = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let mut supply: BTreeMap<Denom, u128> = BTreeMap::new();
        for coins in genesis.balances.values() {
            for (denom, amount) in coins {
                let total = supply.entry(denom.clone()).or_default();
                *total = total
                    .checked_add(*amount)
                    .ok_or_else(|| format!("genesis supply of {denom} overflows"))?;
            }
        }
        let modules = if genesis.modules.is_empty() {
            default_modules()
        } else {
            genesis.modules
        };
        Ok(Self {
            bond_denom: genesis.bond_denom,
            balances: genesis.balances,
            supply,
            modules,
            validators: genesis.validators,
            delegations: genesis.delegations,
            signing_infos: genesis.signing_infos,
        })
    }

    /// Denomination accepted by staking.
    pub fn bond_denom(&self) -> &Denom {
        &self.bond_denom
    }

    /// Balance of any holder key.
    pub fn balance(&self, holder: &str, denom: &Denom) -> u128 {
        self.balances
            .get(holder)
            .and_then(|coins| coins.get(denom))
            .copied()
            .unwrap_or(0)
    }

    /// Spendable balance of an account.
    pub fn account_balance(&self, account: &AccAddress, denom: &Denom) -> u128 {
        self.balance(account.as_str(), denom)
    }

    /// Balance of a module account.
    pub fn module_balance(&self, module: &str, denom: &Denom) -> u128 {
        self.balance(&module_holder(module), denom)
    }

    /// Total supply of a denomination.
    pub fn supply_of(&self, denom: &Denom) -> u128 {
        self.supply.get(denom).copied().unwrap_or(0)
    }

    /// Permissions of a module account, `None` when it is not registered.
    pub fn module_permissions(&self, module: &str) -> Option<&[Permission]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    /// Register a module account with the given permissions.
    pub fn register_module(&mut self, module: &str, permissions: Vec<Permission>) {
        self.modules.insert(module.to_string(), permissions);
    }

    /// Validator by operator address.
    pub fn validator(&self, operator: &str) -> Option<&Validator> {
        self.validators.get(operator)
    }

    /// Insert or replace a validator.
    pub fn add_validator(&mut self, validator: Validator) {
        self.validators
            .insert(validator.operator.clone(), validator);
    }

    /// Signing info by consensus address.
    pub fn signing_info(&self, consensus: &str) -> Option<&SigningInfo> {
        self.signing_infos.get(consensus)
    }

    /// Insert or replace signing info.
    pub fn set_signing_info(&mut self, consensus: &str, info: SigningInfo) {
        self.signing_infos.insert(consensus.to_string(), info);
    }

    /// Shares held by `delegator` on `operator`.
    pub fn delegation_shares(&self, delegator: &str, operator: &str) -> u128 {
        self.delegations
            .get(delegator)
            .and_then(|by_val| by_val.get(operator))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn validator_mut(&mut self, operator: &str) -> Option<&mut Validator> {
        self.validators.get_mut(operator)
    }

    pub(crate) fn signing_info_mut(&mut self, consensus: &str) -> Option<&mut SigningInfo> {
        self.signing_infos.get_mut(consensus)
    }

    pub(crate) fn add_supply(&mut self, denom: &Denom, amount: u128) -> Result<(), LedgerError> {
        let total = self.supply.entry(denom.clone()).or_default();
        *total = total
            .checked_add(amount)
            .ok_or_else(|| LedgerError::SupplyOverflow(denom.to_string()))?;
        Ok(())
    }

    pub(crate) fn credit(
        &mut self,
        holder: &str,
        denom: &Denom,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let slot = self
            .balances
            .entry(holder.to_string())
            .or_default()
            .entry(denom.clone())
            .or_default();
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                holder: holder.to_string(),
                denom: denom.to_string(),
            })?;
        Ok(())
    }

    pub(crate) fn debit(
        &mut self,
        holder: &str,
        denom: &Denom,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let available = self.balance(holder, denom);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                holder: holder.to_string(),
                denom: denom.to_string(),
                needed: amount,
                available,
            });
        }
        if let Some(slot) = self
            .balances
            .get_mut(holder)
            .and_then(|coins| coins.get_mut(denom))
        {
            *slot -= amount;
        }
        Ok(())
    }

    pub(crate) fn add_delegation_shares(&mut self, delegator: &str, operator: &str, shares: u128) {
        let slot = self
            .delegations
            .entry(delegator.to_string())
            .or_default()
            .entry(operator.to_string())
            .or_default();
        *slot = slot.saturating_add(shares);
    }

    /// Staking pool holding tokens for a validator in `status`.
    pub fn pool_for(status: BondStatus) -> &'static str {
        match status {
            BondStatus::Bonded => BONDED_POOL,
            BondStatus::Unbonded | BondStatus::Unbonding => NOT_BONDED_POOL,
        }
    }
}
