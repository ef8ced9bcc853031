//! Bech32 address codecs for accounts, validator operators and consensus keys.
//!
//! Each address kind is a distinct type so an account can never be passed
//! where a validator operator is expected.  All three share the same rules:
//! the checksum must be classic bech32 (not bech32m), the human-readable part
//! must equal the expected prefix, and the payload must be 1..=255 bytes.

use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;
use thiserror::Error;

/// Largest address payload accepted by the ledger.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Errors raised while decoding or encoding an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address string")]
    /// Input was empty or whitespace.
    Empty,
    #[error("invalid bech32 '{address}': {reason}")]
    /// Checksum, character set or variant check failed.
    Bech32 {
        /// Offending input.
        address: String,
        /// Decoder message.
        reason: String,
    },
    #[error("address '{address}' has prefix '{found}', expected '{expected}'")]
    /// Human-readable part does not match the chain prefix.
    Prefix {
        /// Offending input.
        address: String,
        /// Prefix found in the input.
        found: String,
        /// Prefix required by the chain configuration.
        expected: String,
    },
    #[error("address '{0}' decodes to an empty payload")]
    /// Payload carried no bytes.
    EmptyPayload(String),
    #[error("address '{address}' payload is {len} bytes (max 255)")]
    /// Payload is longer than the ledger allows.
    TooLong {
        /// Offending input.
        address: String,
        /// Decoded payload length.
        len: usize,
    },
}

fn decode_bech32(address: &str, expected_prefix: &str) -> Result<Vec<u8>, AddressError> {
    if address.trim().is_empty() {
        return Err(AddressError::Empty);
    }
    let (hrp, data, variant) = bech32::decode(address).map_err(|err| AddressError::Bech32 {
        address: address.to_string(),
        reason: err.to_string(),
    })?;
    if variant != Variant::Bech32 {
        return Err(AddressError::Bech32 {
            address: address.to_string(),
            reason: "bech32m checksum is not accepted for ledger addresses".to_string(),
        });
    }
    if hrp != expected_prefix {
        return Err(AddressError::Prefix {
            address: address.to_string(),
            found: hrp,
            expected: expected_prefix.to_string(),
        });
    }
    let bytes = Vec::<u8>::from_base32(&data).map_err(|err| AddressError::Bech32 {
        address: address.to_string(),
        reason: err.to_string(),
    })?;
    if bytes.is_empty() {
        return Err(AddressError::EmptyPayload(address.to_string()));
    }
    if bytes.len() > MAX_ADDRESS_LEN {
        return Err(AddressError::TooLong {
            address: address.to_string(),
            len: bytes.len(),
        });
    }
    Ok(bytes)
}

fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String, AddressError> {
    if bytes.is_empty() {
        return Err(AddressError::EmptyPayload(prefix.to_string()));
    }
    if bytes.len() > MAX_ADDRESS_LEN {
        return Err(AddressError::TooLong {
            address: prefix.to_string(),
            len: bytes.len(),
        });
    }
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32).map_err(|err| {
        AddressError::Bech32 {
            address: prefix.to_string(),
            reason: err.to_string(),
        }
    })
}

macro_rules! bech32_address {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            encoded: String,
            bytes: Vec<u8>,
        }

        impl $name {
            /// Decodes a bech32 string, requiring `prefix` as its human-readable part.
            pub fn from_bech32(address: &str, prefix: &str) -> Result<Self, AddressError> {
                let bytes = decode_bech32(address, prefix)?;
                Ok(Self {
                    encoded: address.to_ascii_lowercase(),
                    bytes,
                })
            }

            /// Encodes raw payload bytes under `prefix`.
            pub fn from_bytes(prefix: &str, bytes: &[u8]) -> Result<Self, AddressError> {
                let encoded = encode_bech32(prefix, bytes)?;
                Ok(Self {
                    encoded,
                    bytes: bytes.to_vec(),
                })
            }

            /// Raw payload bytes.
            pub fn as_bytes(&self) -> &[u8] {
                &self.bytes
            }

            /// Canonical lowercase bech32 text.
            pub fn as_str(&self) -> &str {
                &self.encoded
            }

            /// Payload rendered as lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(&self.bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.encoded)
            }
        }
    };
}

bech32_address!(
    /// Account address that can hold balances and delegate stake.
    AccAddress
);

bech32_address!(
    /// Validator operator address.
    ValAddress
);

bech32_address!(
    /// Validator consensus address, the key used by signing info and tombstones.
    ConsAddress
);
