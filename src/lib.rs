//! Signing-key tooling: generate EC P-384 JWKs and publish per-environment
//! key sets.
//!
//! Two binaries share this library. `jwks-gen` creates a key pair, prints the
//! private half to the console and stores the public JWK under an environment
//! directory. `jwks-build` compiles every currently valid public JWK into
//! `dist/<environment>.json`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod jwk;
pub mod keygen;
pub mod keyset;
pub mod ui;
pub mod utils;
pub mod version;

#[cfg(test)]
pub mod tests;

pub use error::{JwksError, Result};

/// Deployment environment a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    /// Environments in the order the builder processes them
    pub const ALL: [Environment; 2] = [Environment::Production, Environment::Staging];

    /// Directory name holding this environment's key files
    pub fn dir_name(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
