//! Error types returned by the ledger authorities and the restitution routine.

use crate::address::AddressError;
use crate::coin::AmountError;
use thiserror::Error;

/// Failures reported by a ledger authority (mint, bank, staking, slashing).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("module account '{0}' does not exist")]
    /// Named module account is not registered.
    UnknownModule(String),
    #[error("module account '{0}' does not have minter permission")]
    /// Module is not allowed to create new supply.
    MintNotPermitted(String),
    #[error("total supply of {0} would overflow")]
    /// Minting would push total supply past the representable range.
    SupplyOverflow(String),
    #[error("balance of {holder} in {denom} would overflow")]
    /// Crediting would push a holder's balance past the representable range.
    BalanceOverflow {
        /// Holder being credited.
        holder: String,
        /// Denomination being credited.
        denom: String,
    },
    #[error("insufficient funds for {holder}: need {needed}{denom}, have {available}{denom}")]
    /// Holder cannot cover a debit.
    InsufficientFunds {
        /// Holder being debited.
        holder: String,
        /// Denomination being debited.
        denom: String,
        /// Requested amount.
        needed: u128,
        /// Current balance.
        available: u128,
    },
    #[error("validator {0} not found")]
    /// No validator is registered under the operator address.
    ValidatorNotFound(String),
    #[error("validator {0} is not jailed")]
    /// Unjail was requested for an active validator.
    ValidatorNotJailed(String),
    #[error("validator {0} is tombstoned")]
    /// Unjail was requested while the consensus key is still tombstoned.
    ValidatorTombstoned(String),
    #[error("no signing info found for consensus address {0}")]
    /// Consensus address has no slashing record.
    NoSigningInfo(String),
    #[error("cannot delegate {found}: bond denomination is {expected}")]
    /// Delegation used a denomination other than the staking bond denom.
    BondDenomMismatch {
        /// Denomination supplied.
        found: String,
        /// Denomination accepted by staking.
        expected: String,
    },
    #[error("delegator shares of validator {0} would overflow")]
    /// Share accounting would overflow.
    SharesOverflow(String),
}

/// Fatal outcome of the restitution upgrade.
///
/// Every variant aborts the whole upgrade.  Record-scoped variants carry the
/// zero-based record index and the address text as it appeared in the data set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("error reading restitution records: {0}")]
    /// Embedded record set is not valid JSON or has unexpected fields.
    Records(String),
    #[error("invalid restitution configuration: {0}")]
    /// Configuration failed to decode or validate.
    Config(String),
    #[error("error parsing mint of '{amount}' to {address} (record {index}): {source}")]
    /// Record amount is not a non-negative integer.
    Amount {
        /// Record index.
        index: usize,
        /// Record address text.
        address: String,
        /// Record amount text.
        amount: String,
        /// Decode failure.
        source: AmountError,
    },
    #[error("error converting human address {address} (record {index}): {source}")]
    /// Record address is not a valid account address.
    Address {
        /// Record index.
        index: usize,
        /// Record address text.
        address: String,
        /// Decode failure.
        source: AddressError,
    },
    #[error("validator address is not valid bech32: {0}")]
    /// Configured validator operator address failed to decode.
    ValidatorAddress(#[source] AddressError),
    #[error("consensus address is not valid bech32: {0}")]
    /// Configured consensus address failed to decode.
    ConsensusAddress(#[source] AddressError),
    #[error("restitution validator {0} not found")]
    /// Configured validator is not registered with staking.
    ValidatorNotFound(String),
    #[error("error minting {coin} for {address} (record {index}): {source}")]
    /// Mint authority refused the mint.
    Mint {
        /// Record index.
        index: usize,
        /// Record address text.
        address: String,
        /// Coin being minted.
        coin: String,
        /// Ledger failure.
        source: LedgerError,
    },
    #[error("error sending minted {coin} to {address} (record {index}): {source}")]
    /// Transfer authority refused the module-to-account send.
    Transfer {
        /// Record index.
        index: usize,
        /// Record address text.
        address: String,
        /// Coin being sent.
        coin: String,
        /// Ledger failure.
        source: LedgerError,
    },
    #[error("error delegating minted {coin} from {address} to {validator} (record {index}): {source}")]
    /// Delegation authority refused the delegation.
    Delegate {
        /// Record index.
        index: usize,
        /// Record address text.
        address: String,
        /// Validator operator address.
        validator: String,
        /// Coin being delegated.
        coin: String,
        /// Ledger failure.
        source: LedgerError,
    },
    #[error("minted total overflows at record {index}")]
    /// Running total of minted amounts no longer fits in 128 bits.  The
    /// record at `index` has already been applied when this is reported.
    TotalOverflow {
        /// Record index.
        index: usize,
    },
    #[error("failed to revert tombstone for {consensus}: {source}")]
    /// Slashing authority could not clear the tombstone.
    RevertTombstone {
        /// Consensus address.
        consensus: String,
        /// Ledger failure.
        source: LedgerError,
    },
    #[error("failed to unjail {validator}: {source}")]
    /// Slashing authority could not unjail the validator.
    Unjail {
        /// Validator operator address.
        validator: String,
        /// Ledger failure.
        source: LedgerError,
    },
    #[error("upgrade plan '{found}' does not match handler '{expected}'")]
    /// Handler was invoked for a different upgrade plan.
    PlanMismatch {
        /// Handler name.
        expected: String,
        /// Plan name supplied by the caller.
        found: String,
    },
    #[error("restitution incomplete: {short} of {accounts} accounts below expected stake")]
    /// Verification found accounts whose delegation is below the restitution amount.
    Incomplete {
        /// Accounts below their expected stake.
        short: usize,
        /// Accounts checked.
        accounts: usize,
    },
}

impl MigrationError {
    /// Index of the record that halted the run, if the failure was record-scoped.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::Amount { index, .. }
            | Self::Address { index, .. }
            | Self::Mint { index, .. }
            | Self::Transfer { index, .. }
            | Self::Delegate { index, .. }
            | Self::TotalOverflow { index } => Some(*index),
            _ => None,
        }
    }
}
