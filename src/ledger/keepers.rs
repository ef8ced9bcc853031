//! Keeper handles implementing the ledger authorities over [`LedgerState`].

use super::state::{module_holder, LedgerState, Permission};
use super::{
    DelegationAuthority, MintAuthority, SlashingAuthority, TransferAuthority, Validator,
};
use crate::address::{AccAddress, ConsAddress, ValAddress};
use crate::coin::Coin;
use crate::config::MINT_MODULE;
use crate::error::LedgerError;

/// Mints into a single module account.
#[derive(Debug, Clone)]
pub struct MintKeeper {
    module: String,
}

impl MintKeeper {
    /// Keeper that mints into `module`.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }
}

impl Default for MintKeeper {
    fn default() -> Self {
        Self::new(MINT_MODULE)
    }
}

impl MintAuthority<LedgerState> for MintKeeper {
    fn mint_coins(&self, ctx: &mut LedgerState, coin: &Coin) -> Result<(), LedgerError> {
        let permissions = ctx
            .module_permissions(&self.module)
            .ok_or_else(|| LedgerError::UnknownModule(self.module.clone()))?;
        if !permissions.contains(&Permission::Minter) {
            return Err(LedgerError::MintNotPermitted(self.module.clone()));
        }
        if coin.is_zero() {
            return Ok(());
        }
        ctx.add_supply(&coin.denom, coin.amount)?;
        ctx.credit(&module_holder(&self.module), &coin.denom, coin.amount)
    }

    fn module_name(&self) -> &str {
        &self.module
    }
}

/// Balance transfers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankKeeper;

impl TransferAuthority<LedgerState> for BankKeeper {
    fn send_coins_from_module_to_account(
        &self,
        ctx: &mut LedgerState,
        module: &str,
        to: &AccAddress,
        coin: &Coin,
    ) -> Result<(), LedgerError> {
        if ctx.module_permissions(module).is_none() {
            return Err(LedgerError::UnknownModule(module.to_string()));
        }
        ctx.debit(&module_holder(module), &coin.denom, coin.amount)?;
        ctx.credit(to.as_str(), &coin.denom, coin.amount)
    }
}

/// Delegation bookkeeping.
///
/// This ledger never slashes, so shares are issued one-for-one with tokens
/// and the token value of a delegation equals its shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakingKeeper;

impl DelegationAuthority<LedgerState> for StakingKeeper {
    fn validator(&self, ctx: &LedgerState, operator: &ValAddress) -> Option<Validator> {
        ctx.validator(operator.as_str()).cloned()
    }

    fn delegate(
        &self,
        ctx: &mut LedgerState,
        delegator: &AccAddress,
        validator: &Validator,
        coin: &Coin,
    ) -> Result<u128, LedgerError> {
        if &coin.denom != ctx.bond_denom() {
            return Err(LedgerError::BondDenomMismatch {
                found: coin.denom.to_string(),
                expected: ctx.bond_denom().to_string(),
            });
        }
        let current = ctx
            .validator(&validator.operator)
            .ok_or_else(|| LedgerError::ValidatorNotFound(validator.operator.clone()))?;
        let tokens = current
            .tokens
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::SharesOverflow(validator.operator.clone()))?;
        let shares = current
            .delegator_shares
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::SharesOverflow(validator.operator.clone()))?;
        let pool = LedgerState::pool_for(current.status);

        ctx.debit(delegator.as_str(), &coin.denom, coin.amount)?;
        ctx.credit(&module_holder(pool), &coin.denom, coin.amount)?;
        if let Some(record) = ctx.validator_mut(&validator.operator) {
            record.tokens = tokens;
            record.delegator_shares = shares;
        }
        ctx.add_delegation_shares(delegator.as_str(), &validator.operator, coin.amount);
        Ok(coin.amount)
    }

    fn delegation(&self, ctx: &LedgerState, delegator: &AccAddress, operator: &ValAddress) -> u128 {
        ctx.delegation_shares(delegator.as_str(), operator.as_str())
    }
}

/// Tombstone and jail management.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlashingKeeper;

impl SlashingAuthority<LedgerState> for SlashingKeeper {
    fn revert_tombstone(
        &self,
        ctx: &mut LedgerState,
        consensus: &ConsAddress,
    ) -> Result<(), LedgerError> {
        let info = ctx
            .signing_info_mut(consensus.as_str())
            .ok_or_else(|| LedgerError::NoSigningInfo(consensus.to_string()))?;
        info.tombstoned = false;
        Ok(())
    }

    fn unjail(&self, ctx: &mut LedgerState, operator: &ValAddress) -> Result<(), LedgerError> {
        let validator = ctx
            .validator(operator.as_str())
            .ok_or_else(|| LedgerError::ValidatorNotFound(operator.to_string()))?;
        if !validator.jailed {
            return Err(LedgerError::ValidatorNotJailed(operator.to_string()));
        }
        let tombstoned = ctx
            .signing_info(&validator.consensus)
            .map(|info| info.tombstoned)
            .unwrap_or(false);
        if tombstoned {
            return Err(LedgerError::ValidatorTombstoned(operator.to_string()));
        }
        if let Some(record) = ctx.validator_mut(operator.as_str()) {
            record.jailed = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BankKeeper, MintKeeper, SlashingKeeper, StakingKeeper};
    use crate::address::{AccAddress, ConsAddress, ValAddress};
    use crate::coin::{Coin, Denom};
    use crate::error::LedgerError;
    use crate::ledger::state::{LedgerState, Permission, SigningInfo, BONDED_POOL, NOT_BONDED_POOL};
    use crate::ledger::{
        BondStatus, DelegationAuthority, MintAuthority, SlashingAuthority, TransferAuthority,
        Validator,
    };

    const VALOPER: &str = "secretvaloper1hscf4cjrhzsea5an5smt4z9aezhh4sf5jjrqka";
    const VALCONS: &str = "secretvalcons1hscf4cjrhzsea5an5smt4z9aezhh4sf5xpsu6u";
    const ACCOUNT: &str = "secret1tvdkgq9exlmd8g7yqn2vlttzmhk428qe84qnkq";

    fn uscrt(amount: u128) -> Coin {
        Coin::new(Denom::new("uscrt").unwrap(), amount)
    }

    fn ledger(status: BondStatus, jailed: bool) -> LedgerState {
        let mut state = LedgerState::new(Denom::new("uscrt").unwrap());
        state.add_validator(Validator {
            operator: VALOPER.to_string(),
            consensus: VALCONS.to_string(),
            status,
            jailed,
            tokens: 0,
            delegator_shares: 0,
        });
        state.set_signing_info(VALCONS, SigningInfo { tombstoned: jailed });
        state
    }

    fn account() -> AccAddress {
        AccAddress::from_bech32(ACCOUNT, "secret").unwrap()
    }

    fn valoper() -> ValAddress {
        ValAddress::from_bech32(VALOPER, "secretvaloper").unwrap()
    }

    #[test]
    fn mint_send_delegate_moves_coins_through_pools() {
        let mut state = ledger(BondStatus::Bonded, false);
        let denom = state.bond_denom().clone();

        MintKeeper::default().mint_coins(&mut state, &uscrt(100)).unwrap();
        assert_eq!(state.module_balance("mint", &denom), 100);
        assert_eq!(state.supply_of(&denom), 100);

        BankKeeper
            .send_coins_from_module_to_account(&mut state, "mint", &account(), &uscrt(100))
            .unwrap();
        assert_eq!(state.module_balance("mint", &denom), 0);
        assert_eq!(state.account_balance(&account(), &denom), 100);

        let validator = StakingKeeper.validator(&state, &valoper()).unwrap();
        let shares = StakingKeeper
            .delegate(&mut state, &account(), &validator, &uscrt(100))
            .unwrap();
        assert_eq!(shares, 100);
        assert_eq!(state.account_balance(&account(), &denom), 0);
        assert_eq!(state.module_balance(BONDED_POOL, &denom), 100);
        assert_eq!(StakingKeeper.delegation(&state, &account(), &valoper()), 100);
        assert_eq!(state.validator(VALOPER).unwrap().tokens, 100);
        assert_eq!(state.supply_of(&denom), 100);
    }

    #[test]
    fn unbonded_validator_uses_not_bonded_pool() {
        let mut state = ledger(BondStatus::Unbonded, false);
        let denom = state.bond_denom().clone();
        state.credit(ACCOUNT, &denom, 7).unwrap();
        let validator = StakingKeeper.validator(&state, &valoper()).unwrap();
        StakingKeeper
            .delegate(&mut state, &account(), &validator, &uscrt(7))
            .unwrap();
        assert_eq!(state.module_balance(NOT_BONDED_POOL, &denom), 7);
    }

    #[test]
    fn mint_requires_minter_permission() {
        let mut state = ledger(BondStatus::Bonded, false);
        state.register_module("mint", vec![Permission::Burner]);
        assert_eq!(
            MintKeeper::default().mint_coins(&mut state, &uscrt(1)),
            Err(LedgerError::MintNotPermitted("mint".to_string()))
        );
        assert_eq!(
            MintKeeper::new("treasury").mint_coins(&mut state, &uscrt(1)),
            Err(LedgerError::UnknownModule("treasury".to_string()))
        );
    }

    #[test]
    fn delegate_rejects_foreign_denom_and_overdraft() {
        let mut state = ledger(BondStatus::Bonded, false);
        let validator = StakingKeeper.validator(&state, &valoper()).unwrap();
        let foreign = Coin::new(Denom::new("uatom").unwrap(), 1);
        assert!(matches!(
            StakingKeeper.delegate(&mut state, &account(), &validator, &foreign),
            Err(LedgerError::BondDenomMismatch { .. })
        ));
        assert!(matches!(
            StakingKeeper.delegate(&mut state, &account(), &validator, &uscrt(1)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(state.validator(VALOPER).unwrap().tokens, 0);
    }

    #[test]
    fn revert_tombstone_then_unjail() {
        let mut state = ledger(BondStatus::Bonded, true);
        let cons = ConsAddress::from_bech32(VALCONS, "secretvalcons").unwrap();

        assert_eq!(
            SlashingKeeper.unjail(&mut state, &valoper()),
            Err(LedgerError::ValidatorTombstoned(VALOPER.to_string()))
        );
        SlashingKeeper.revert_tombstone(&mut state, &cons).unwrap();
        SlashingKeeper.unjail(&mut state, &valoper()).unwrap();
        assert!(!state.validator(VALOPER).unwrap().jailed);
        assert!(!state.signing_info(VALCONS).unwrap().tombstoned);

        assert_eq!(
            SlashingKeeper.unjail(&mut state, &valoper()),
            Err(LedgerError::ValidatorNotJailed(VALOPER.to_string()))
        );
    }

    #[test]
    fn revert_tombstone_requires_signing_info() {
        let mut state = LedgerState::new(Denom::new("uscrt").unwrap());
        let cons = ConsAddress::from_bech32(VALCONS, "secretvalcons").unwrap();
        assert_eq!(
            SlashingKeeper.revert_tombstone(&mut state, &cons),
            Err(LedgerError::NoSigningInfo(VALCONS.to_string()))
        );
    }
}
