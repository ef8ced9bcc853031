//! Shared fixtures for unit tests.

use crate::ledger::LedgerState;
use serde_json::json;

pub(crate) const VALOPER: &str = "secretvaloper1hscf4cjrhzsea5an5smt4z9aezhh4sf5jjrqka";
pub(crate) const VALCONS: &str = "secretvalcons1hscf4cjrhzsea5an5smt4z9aezhh4sf5xpsu6u";
pub(crate) const OTHER_VALOPER: &str = "secretvaloper1xfmltt7c7x5qh72tsgsz20fx44lmznnh4j0qwu";

pub(crate) const ACCOUNTS: [&str; 4] = [
    "secret1tvdkgq9exlmd8g7yqn2vlttzmhk428qe84qnkq",
    "secret163hxa8fngr8x0cqn2e253sratfe0eu0lef2q6q",
    "secret10nx8je8njmnapcxdez65txh6pnyrv2zpvnujhw",
    "secret1sqzh5mnq9xjaem4hppnuh60hf2dvmzh4laa7eg",
];

/// Ledger in its pre-upgrade shape: the restitution validator is bonded,
/// jailed and tombstoned, and no restitution coins exist yet.
pub(crate) fn restitution_ledger() -> LedgerState {
    let genesis = json!({
        "bond_denom": "uscrt",
        "validators": {
            VALOPER: {
                "operator": VALOPER,
                "consensus": VALCONS,
                "status": "bonded",
                "jailed": true
            }
        },
        "signing_infos": {
            VALCONS: {"tombstoned": true}
        }
    });
    match LedgerState::from_genesis_json(&genesis.to_string()) {
        Ok(state) => state,
        Err(err) => panic!("fixture genesis must load: {err}"),
    }
}
