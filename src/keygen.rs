//! Key pair generation and public-key persistence

use std::path::PathBuf;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p384::elliptic_curve::sec1::ToEncodedPoint;
use p384::SecretKey;
use rand_core::OsRng;
use uuid::Uuid;

use crate::error::{JwksError, Result};
use crate::jwk::{self, Jwk, PrivateJwk};
use crate::utils::now_unix;
use crate::Environment;

/// UUID characters prefixed to a key identifier
const KID_PREFIX_LEN: usize = 4;

/// A freshly generated key pair
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    pub public: Jwk,
    pub private: PrivateJwk,
}

/// Outcome of persisting a generated key
#[derive(Debug)]
pub struct StoredKey {
    pub key: GeneratedKey,
    pub path: PathBuf,
    /// An existing file was replaced (`force` was set)
    pub overwrote: bool,
}

/// Derive a key identifier: the first 4 characters of a fresh v4 UUID,
/// an underscore, then the issued-at timestamp
pub fn derive_kid(iat: i64) -> String {
    let uuid = Uuid::new_v4().to_string();
    format!("{}_{}", &uuid[..KID_PREFIX_LEN], iat)
}

/// Generate a new EC P-384 signing key pair as a JWK record pair
///
/// Coordinates and the private scalar are base64url-encoded without padding.
pub fn generate_key_pair(kid: String, iat: i64) -> Result<GeneratedKey> {
    let secret = SecretKey::random(&mut OsRng);
    let point = secret.public_key().to_encoded_point(false);

    let x = point
        .x()
        .ok_or_else(|| JwksError::key_generation("public point has no x coordinate"))?;
    let y = point
        .y()
        .ok_or_else(|| JwksError::key_generation("public point has no y coordinate"))?;

    let x = URL_SAFE_NO_PAD.encode(x);
    let y = URL_SAFE_NO_PAD.encode(y);
    let d = URL_SAFE_NO_PAD.encode(secret.to_bytes());

    let public = Jwk {
        kty: jwk::KEY_TYPE.to_string(),
        crv: jwk::CURVE.to_string(),
        alg: jwk::ALGORITHM.to_string(),
        x: x.clone(),
        y: y.clone(),
        key_ops: vec![jwk::PUBLIC_KEY_OP.to_string()],
        usage: jwk::USAGE.to_string(),
        kid: kid.clone(),
        iat: Some(iat),
        exp: None,
    };

    let private = PrivateJwk {
        kty: jwk::KEY_TYPE.to_string(),
        crv: jwk::CURVE.to_string(),
        alg: jwk::ALGORITHM.to_string(),
        x,
        y,
        d,
        key_ops: vec![jwk::PRIVATE_KEY_OP.to_string()],
        usage: jwk::USAGE.to_string(),
        kid,
    };

    Ok(GeneratedKey { public, private })
}

/// Render the on-disk form of a public JWK: an optional `// comment` line,
/// the pretty-printed JSON, and a trailing newline
fn render_key_file(public: &Jwk, comment: Option<&str>) -> Result<String> {
    let body = serde_json::to_string_pretty(public)?;
    Ok(match comment {
        Some(comment) if !comment.is_empty() => format!("// {}\n{}\n", comment, body),
        _ => format!("{}\n", body),
    })
}

/// Generates key pairs and persists the public JWK under an environment
/// directory
pub struct KeygenService {
    base_dir: PathBuf,
}

impl KeygenService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path the key file for `name` is written to
    pub fn key_path(&self, environment: Environment, name: &str) -> PathBuf {
        self.base_dir
            .join(environment.dir_name())
            .join(format!("{}.jwk.jsonc", name))
    }

    /// Generate a key pair and write the public JWK file.
    ///
    /// Refuses to replace an existing file unless `force` is set; a missing
    /// file is the normal case, while any other existence-check failure
    /// propagates as fatal. The private half is only returned, never written.
    pub async fn generate(
        &self,
        environment: Environment,
        name: &str,
        comment: Option<&str>,
        force: bool,
    ) -> Result<StoredKey> {
        let path = self.key_path(environment, name);

        let exists = match tokio::fs::symlink_metadata(&path).await {
            Ok(_) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(JwksError::io_from_error("Check existing key", err)),
        };

        if exists && !force {
            return Err(JwksError::already_exists(path.display().to_string()));
        }

        let iat = now_unix();
        let key = generate_key_pair(derive_kid(iat), iat)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| JwksError::io_from_error("Create environment directory", e))?;
        }

        let contents = render_key_file(&key.public, comment)?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| JwksError::io_from_error("Write key file", e))?;

        tracing::debug!(path = %path.display(), kid = %key.public.kid, "wrote public JWK");

        Ok(StoredKey {
            key,
            path,
            overwrote: exists,
        })
    }
}
