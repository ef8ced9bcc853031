//! Restore the restitution validator to the active set.

use crate::config::RestitutionConfig;
use crate::error::MigrationError;
use crate::ledger::SlashingAuthority;
use tracing::info;

/// Clear the validator's tombstone, then unjail it.
///
/// Both steps must succeed; a validator that was never jailed is an error
/// because it means the upgrade is running against the wrong state.
pub fn revert_tombstone<C, S>(
    ctx: &mut C,
    slashing: &S,
    config: &RestitutionConfig,
) -> Result<(), MigrationError>
where
    S: SlashingAuthority<C>,
{
    let consensus = config.consensus()?;
    let operator = config.validator()?;

    slashing
        .revert_tombstone(ctx, &consensus)
        .map_err(|source| MigrationError::RevertTombstone {
            consensus: consensus.to_string(),
            source,
        })?;
    info!(consensus = %consensus, "tombstone reverted");

    slashing
        .unjail(ctx, &operator)
        .map_err(|source| MigrationError::Unjail {
            validator: operator.to_string(),
            source,
        })?;
    info!(validator = %operator, "validator unjailed");
    Ok(())
}
