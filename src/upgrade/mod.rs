//! The `v1.4` upgrade handler.
//!
//! The handler runs once at the upgrade height: it restores the validator
//! slashed during the incident, then mints, transfers and delegates every
//! restitution record to it.  Any error aborts the upgrade and is returned to
//! the host, which is expected to halt rather than continue on partial state.

pub mod restitution;
pub mod tombstone;
pub mod verify;

pub use restitution::{ApplySummary, MigrationApplier};
pub use tombstone::revert_tombstone;
pub use verify::{verify_restitution, VerifyOptions, VerifySummary};

use crate::config::RestitutionConfig;
use crate::error::MigrationError;
use crate::ledger::{DelegationAuthority, MintAuthority, SlashingAuthority, TransferAuthority};
use crate::records::{embedded_records, MintRecord};
use tracing::info;

/// Name of the upgrade plan this handler answers to.
pub const UPGRADE_NAME: &str = "v1.4";

/// Upgrade plan as scheduled on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePlan {
    /// Plan name.
    pub name: String,
    /// Block height the plan executes at.
    pub height: u64,
}

impl UpgradePlan {
    /// Plan named `name` at `height`.
    pub fn new(name: impl Into<String>, height: u64) -> Self {
        Self {
            name: name.into(),
            height,
        }
    }
}

/// Authorities handed to the upgrade handler.
pub struct Keepers<'k, M, B, St, Sl> {
    /// Mint authority.
    pub mint: &'k M,
    /// Transfer authority.
    pub bank: &'k B,
    /// Delegation authority.
    pub staking: &'k St,
    /// Slashing authority.
    pub slashing: &'k Sl,
}

/// Upgrade handler bound to a name and configuration.
#[derive(Debug, Clone)]
pub struct Upgrade {
    name: String,
    config: RestitutionConfig,
}

impl Upgrade {
    /// The mainnet `v1.4` restitution upgrade.
    pub fn cos_restitution() -> Self {
        Self::new(UPGRADE_NAME, RestitutionConfig::default())
    }

    /// Handler for plan `name` with an explicit configuration.
    pub fn new(name: impl Into<String>, config: RestitutionConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Plan name this handler answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration in use.
    pub fn config(&self) -> &RestitutionConfig {
        &self.config
    }

    /// Run the upgrade against the embedded record set.
    pub fn run<C, M, B, St, Sl>(
        &self,
        plan: &UpgradePlan,
        ctx: &mut C,
        keepers: &Keepers<'_, M, B, St, Sl>,
    ) -> Result<ApplySummary, MigrationError>
    where
        M: MintAuthority<C>,
        B: TransferAuthority<C>,
        St: DelegationAuthority<C>,
        Sl: SlashingAuthority<C>,
    {
        let records = embedded_records()?;
        self.run_with(plan, ctx, keepers, records)
    }

    /// Run the upgrade against an explicit record set.
    pub fn run_with<C, M, B, St, Sl>(
        &self,
        plan: &UpgradePlan,
        ctx: &mut C,
        keepers: &Keepers<'_, M, B, St, Sl>,
        records: Vec<MintRecord>,
    ) -> Result<ApplySummary, MigrationError>
    where
        M: MintAuthority<C>,
        B: TransferAuthority<C>,
        St: DelegationAuthority<C>,
        Sl: SlashingAuthority<C>,
    {
        if plan.name != self.name {
            return Err(MigrationError::PlanMismatch {
                expected: self.name.clone(),
                found: plan.name.clone(),
            });
        }
        info!(plan = %plan.name, height = plan.height, "running upgrade handler");
        self.config.validate()?;

        revert_tombstone(ctx, keepers.slashing, &self.config)?;
        MigrationApplier::new(self.config.clone(), records).apply(
            ctx,
            keepers.mint,
            keepers.bank,
            keepers.staking,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Keepers, Upgrade, UpgradePlan, UPGRADE_NAME};
    use crate::coin::Denom;
    use crate::config::RestitutionConfig;
    use crate::error::MigrationError;
    use crate::ledger::{BankKeeper, MintKeeper, SlashingKeeper, StakingKeeper};
    use crate::records::{embedded_records, records_total, MintRecord};
    use crate::test_support::{restitution_ledger, ACCOUNTS, VALCONS, VALOPER};
    use crate::upgrade::{verify_restitution, VerifyOptions};

    fn keepers_run(
        upgrade: &Upgrade,
        plan: &UpgradePlan,
        state: &mut crate::ledger::LedgerState,
        records: Option<Vec<MintRecord>>,
    ) -> Result<super::ApplySummary, MigrationError> {
        let mint = MintKeeper::default();
        let keepers = Keepers {
            mint: &mint,
            bank: &BankKeeper,
            staking: &StakingKeeper,
            slashing: &SlashingKeeper,
        };
        match records {
            Some(records) => upgrade.run_with(plan, state, &keepers, records),
            None => upgrade.run(plan, state, &keepers),
        }
    }

    #[test]
    fn embedded_upgrade_restores_validator_and_stake() {
        let mut state = restitution_ledger();
        let upgrade = Upgrade::cos_restitution();
        let plan = UpgradePlan::new(UPGRADE_NAME, 1_794_500);

        let summary = keepers_run(&upgrade, &plan, &mut state, None).unwrap();

        let records = embedded_records().unwrap();
        let total = records_total(&records).unwrap();
        assert_eq!(summary.applied, records.len());
        assert_eq!(summary.total_minted, total);
        assert!(!state.validator(VALOPER).unwrap().jailed);
        assert!(!state.signing_info(VALCONS).unwrap().tombstoned);
        assert_eq!(state.supply_of(&Denom::new("uscrt").unwrap()), total);

        let verified = verify_restitution(
            &state,
            &StakingKeeper,
            &records,
            upgrade.config(),
            &VerifyOptions {
                require_complete: true,
            },
        )
        .unwrap();
        assert_eq!(verified.expected_total, total);
    }

    #[test]
    fn wrong_plan_is_refused_before_any_mutation() {
        let mut state = restitution_ledger();
        let before = state.clone();
        let err = keepers_run(
            &Upgrade::cos_restitution(),
            &UpgradePlan::new("v1.5", 10),
            &mut state,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MigrationError::PlanMismatch {
                expected: "v1.4".to_string(),
                found: "v1.5".to_string(),
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn bad_record_aborts_upgrade() {
        let mut state = restitution_ledger();
        let records = vec![
            MintRecord::new(ACCOUNTS[0], "10"),
            MintRecord::new(ACCOUNTS[1], "1.5"),
        ];
        let err = keepers_run(
            &Upgrade::cos_restitution(),
            &UpgradePlan::new(UPGRADE_NAME, 10),
            &mut state,
            Some(records),
        )
        .unwrap_err();
        assert_eq!(err.record_index(), Some(1));
    }

    #[test]
    fn invalid_config_stops_before_slashing_changes() {
        let mut state = restitution_ledger();
        let config = RestitutionConfig {
            denom: "U".to_string(),
            ..RestitutionConfig::default()
        };
        let err = keepers_run(
            &Upgrade::new(UPGRADE_NAME, config),
            &UpgradePlan::new(UPGRADE_NAME, 10),
            &mut state,
            Some(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::Config(_)));
        assert!(state.validator(VALOPER).unwrap().jailed);
    }
}
