//! Network constants for the restitution upgrade.
//!
//! [`RestitutionConfig::default`] carries the mainnet values.  Hosts that run
//! the routine against another network (or a test ledger) build a config from
//! JSON instead; every address in it is decoded before any ledger call.

use crate::address::{AccAddress, ConsAddress, ValAddress};
use crate::coin::Denom;
use crate::error::MigrationError;
use serde::{Deserialize, Serialize};

/// Native staking denomination.
pub const DEFAULT_DENOM: &str = "uscrt";
/// Operator address of the validator receiving the restored delegations.
pub const COS_VALIDATOR_ADDRESS: &str = "secretvaloper1hscf4cjrhzsea5an5smt4z9aezhh4sf5jjrqka";
/// Consensus address of the same validator.
pub const COS_CONSENSUS_ADDRESS: &str = "secretvalcons1hscf4cjrhzsea5an5smt4z9aezhh4sf5xpsu6u";
/// Module account that receives freshly minted coins.
pub const MINT_MODULE: &str = "mint";

/// Bech32 human-readable prefixes used by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bech32Prefixes {
    /// Account addresses.
    pub account: String,
    /// Validator operator addresses.
    pub validator: String,
    /// Validator consensus addresses.
    pub consensus: String,
}

impl Default for Bech32Prefixes {
    fn default() -> Self {
        Self {
            account: "secret".to_string(),
            validator: "secretvaloper".to_string(),
            consensus: "secretvalcons".to_string(),
        }
    }
}

/// Parameters of the restitution upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RestitutionConfig {
    /// Denomination minted and delegated.
    pub denom: String,
    /// Operator address of the restored validator.
    pub validator_address: String,
    /// Consensus address of the restored validator.
    pub consensus_address: String,
    /// Address prefixes.
    pub prefixes: Bech32Prefixes,
}

impl Default for RestitutionConfig {
    fn default() -> Self {
        Self {
            denom: DEFAULT_DENOM.to_string(),
            validator_address: COS_VALIDATOR_ADDRESS.to_string(),
            consensus_address: COS_CONSENSUS_ADDRESS.to_string(),
            prefixes: Bech32Prefixes::default(),
        }
    }
}

impl RestitutionConfig {
    /// Decode a config from JSON; omitted fields take mainnet defaults.
    pub fn from_json(raw: &str) -> Result<Self, MigrationError> {
        serde_json::from_str(raw).map_err(|err| MigrationError::Config(err.to_string()))
    }

    /// Validated staking denomination.
    pub fn denom(&self) -> Result<Denom, MigrationError> {
        Denom::new(&self.denom).map_err(|err| MigrationError::Config(err.to_string()))
    }

    /// Decoded validator operator address.
    pub fn validator(&self) -> Result<ValAddress, MigrationError> {
        ValAddress::from_bech32(&self.validator_address, &self.prefixes.validator)
            .map_err(MigrationError::ValidatorAddress)
    }

    /// Decoded validator consensus address.
    pub fn consensus(&self) -> Result<ConsAddress, MigrationError> {
        ConsAddress::from_bech32(&self.consensus_address, &self.prefixes.consensus)
            .map_err(MigrationError::ConsensusAddress)
    }

    /// Decode an account address under the configured account prefix.
    pub fn account(&self, address: &str) -> Result<AccAddress, crate::address::AddressError> {
        AccAddress::from_bech32(address, &self.prefixes.account)
    }

    /// Check every configured value without touching a ledger.
    pub fn validate(&self) -> Result<(), MigrationError> {
        self.denom()?;
        self.validator()?;
        self.consensus()?;
        if self.prefixes.account.is_empty() {
            return Err(MigrationError::Config(
                "account prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RestitutionConfig, COS_VALIDATOR_ADDRESS};
    use crate::error::MigrationError;
    use serde_json::json;

    #[test]
    fn mainnet_defaults_validate() {
        let config = RestitutionConfig::default();
        config.validate().unwrap();
        assert_eq!(config.validator().unwrap().as_str(), COS_VALIDATOR_ADDRESS);
        assert_eq!(
            config.validator().unwrap().as_bytes(),
            config.consensus().unwrap().as_bytes()
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let raw = json!({
            "validator_address": "secretvaloper1xfmltt7c7x5qh72tsgsz20fx44lmznnh4j0qwu",
            "consensus_address": "secretvalcons1xfmltt7c7x5qh72tsgsz20fx44lmznnhppuuza"
        })
        .to_string();
        let config = RestitutionConfig::from_json(&raw).unwrap();
        assert_eq!(config.denom, "uscrt");
        config.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = json!({"denom": "uscrt", "validator": "x"}).to_string();
        assert!(matches!(
            RestitutionConfig::from_json(&raw),
            Err(MigrationError::Config(_))
        ));
    }

    #[test]
    fn malformed_validator_is_reported() {
        let config = RestitutionConfig {
            validator_address: "secretvaloper1notbech32".to_string(),
            ..RestitutionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MigrationError::ValidatorAddress(_))
        ));
    }

    #[test]
    fn bad_denom_is_a_config_error() {
        let config = RestitutionConfig {
            denom: "u".to_string(),
            ..RestitutionConfig::default()
        };
        assert!(matches!(config.validate(), Err(MigrationError::Config(_))));
    }
}
