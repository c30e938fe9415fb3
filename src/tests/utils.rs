//! Test utilities and helpers for unit tests

#[cfg(test)]
pub mod test_helpers {
    use std::path::PathBuf;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    /// Create a temporary directory for testing
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    /// Write a key file under `<dir>/<environment>/<filename>`
    pub fn write_key_file(
        dir: &TempDir,
        environment: &str,
        filename: &str,
        content: &str,
    ) -> PathBuf {
        let env_dir = dir.path().join(environment);
        std::fs::create_dir_all(&env_dir).expect("Failed to create environment dir");
        let path = env_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write key file");
        path
    }

    /// A structurally valid public JWK with the given key identifier
    pub fn sample_jwk_value(kid: &str) -> Value {
        json!({
            "kty": "EC",
            "crv": "P-384",
            "alg": "ES384",
            "x": "sample-x-coordinate",
            "y": "sample-y-coordinate",
            "key_ops": ["verify"],
            "use": "sig",
            "kid": kid,
        })
    }

    /// [`sample_jwk_value`] rendered as key-file text
    pub fn sample_key_text(kid: &str) -> String {
        format!("{}\n", sample_jwk_value(kid))
    }
}
