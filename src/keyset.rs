//! Key-set compilation for publishing
//!
//! Scans the per-environment key directories and compiles every currently
//! valid public JWK into one `dist/<environment>.json` document. A defective
//! key file is reported and skipped; it never blocks the rest of the set.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{JwksError, Result};
use crate::jwk::{self, Jwk, JwkSet};
use crate::ui::UI;
use crate::utils::{now_unix, parse_jsonc};
use crate::Environment;

/// Directory the compiled key sets are written to
pub const DIST_DIR: &str = "dist";

/// Result of building one environment's key set
#[derive(Debug)]
pub struct BuildReport {
    pub environment: Environment,
    /// Keys published into the dist document
    pub published: usize,
    /// File names skipped because their contents were defective
    pub skipped: Vec<String>,
}

/// Compiles per-environment JWK sets from the key directories
pub struct BuildService {
    base_dir: PathBuf,
    key_file_pattern: Regex,
    ui: UI,
}

impl BuildService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            // *.jwk, *.jwk.json, *.jwk.jsonc
            key_file_pattern: Regex::new(r"(?i)\.jwk(\.jsonc?)?$").expect("key file pattern"),
            ui: UI::new(),
        }
    }

    /// Build and write the key sets for all environments, production first
    pub async fn build_all(&self) -> Result<Vec<BuildReport>> {
        let mut reports = Vec::with_capacity(Environment::ALL.len());
        for environment in Environment::ALL {
            reports.push(self.build_environment(environment).await?);
        }
        Ok(reports)
    }

    /// Build one environment's key set and write `dist/<environment>.json`
    ///
    /// Keys are collected in directory-listing order; no sorting and no
    /// deduplication by `kid`. I/O errors are fatal, per-file defects are not.
    pub async fn build_environment(&self, environment: Environment) -> Result<BuildReport> {
        let input_dir = self.base_dir.join(environment.dir_name());
        tracing::debug!(dir = %input_dir.display(), "scanning key directory");

        let mut set = JwkSet { keys: Vec::new() };
        let mut skipped = Vec::new();

        let mut entries = tokio::fs::read_dir(&input_dir)
            .await
            .map_err(|e| JwksError::io_from_error("List key directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| JwksError::io_from_error("List key directory", e))?
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !self.key_file_pattern.is_match(&file_name) {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| JwksError::io_from_error("List key directory", e))?;
            if !file_type.is_file() {
                continue;
            }

            match self.read_key(&entry.path()).await {
                Ok(Some(key)) => set.keys.push(key.to_published()),
                Ok(None) => {}
                Err(err) if err.is_key_file_defect() => {
                    self.ui.error(&format!("Invalid JWK in file: {}", file_name));
                    tracing::debug!(file = %file_name, %err, "skipping defective key file");
                    skipped.push(file_name);
                }
                Err(err) => return Err(err),
            }
        }

        self.write_key_set(environment, &set).await?;

        Ok(BuildReport {
            environment,
            published: set.keys.len(),
            skipped,
        })
    }

    /// Read, parse and validate one key file.
    ///
    /// Returns `None` when the key is outside its validity window: carrying
    /// an `iat` in the future or an `exp` in the past.
    async fn read_key(&self, path: &Path) -> Result<Option<Jwk>> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| JwksError::io_from_error("Read key file", e))?;

        let value = parse_jsonc(&text)?;
        let key = jwk::parse(&value)?;

        if !key.is_valid_at(now_unix()) {
            tracing::debug!(kid = %key.kid, "key outside validity window");
            return Ok(None);
        }

        Ok(Some(key))
    }

    async fn write_key_set(&self, environment: Environment, set: &JwkSet) -> Result<()> {
        let dist_dir = self.base_dir.join(DIST_DIR);
        tokio::fs::create_dir_all(&dist_dir)
            .await
            .map_err(|e| JwksError::io_from_error("Create dist directory", e))?;

        let out_path = dist_dir.join(format!("{}.json", environment));
        let body = serde_json::to_string(set)?;
        tokio::fs::write(&out_path, body)
            .await
            .map_err(|e| JwksError::io_from_error("Write key set", e))?;

        tracing::debug!(path = %out_path.display(), keys = set.keys.len(), "wrote key set");
        Ok(())
    }
}
