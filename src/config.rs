use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use crate::embedding::download::{default_model_dir, model_files_present};
use crate::embedding::onnx::{BERT_MAX_POSITIONS, DEFAULT_MAX_TOKENS};
use crate::vectorize::tfidf::DEFAULT_MAX_FEATURES;

/// Default listen address; the service has no auth, so stay on loopback.
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (TEXTVEC_BIND)
    pub bind: String,
    /// Port the HTTP server listens on (TEXTVEC_PORT)
    pub port: u16,
    /// Directory containing model.onnx and tokenizer.json (TEXTVEC_MODEL_DIR)
    pub model_dir: PathBuf,
    /// Vocabulary cap for TF-IDF (TEXTVEC_MAX_FEATURES)
    pub max_features: usize,
    /// Token truncation length for BERT (TEXTVEC_MAX_TOKENS)
    pub max_tokens: usize,
    /// Request body cap in bytes, unlimited when unset (TEXTVEC_MAX_BODY_BYTES)
    pub max_body_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. `load` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_features: usize = parse_var(&lookup, "TEXTVEC_MAX_FEATURES", DEFAULT_MAX_FEATURES)?;
        if max_features == 0 {
            anyhow::bail!("TEXTVEC_MAX_FEATURES must be at least 1");
        }

        let max_tokens: usize = parse_var(&lookup, "TEXTVEC_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        // [CLS] and [SEP] take two slots on their own.
        if max_tokens < 2 {
            anyhow::bail!("TEXTVEC_MAX_TOKENS must be at least 2");
        }
        if max_tokens > BERT_MAX_POSITIONS {
            anyhow::bail!(
                "TEXTVEC_MAX_TOKENS must be at most {BERT_MAX_POSITIONS} (the model's position limit), got {max_tokens}"
            );
        }

        let max_body_bytes = match lookup("TEXTVEC_MAX_BODY_BYTES") {
            Some(raw) => {
                let bytes: usize = raw
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid TEXTVEC_MAX_BODY_BYTES={raw:?}: {e}"))?;
                if bytes == 0 {
                    anyhow::bail!("TEXTVEC_MAX_BODY_BYTES must be at least 1");
                }
                Some(bytes)
            }
            None => None,
        };

        Ok(Self {
            bind: lookup("TEXTVEC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: parse_var(&lookup, "TEXTVEC_PORT", DEFAULT_PORT)?,
            model_dir: lookup("TEXTVEC_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_model_dir),
            max_features,
            max_tokens,
            max_body_bytes,
        })
    }

    /// Check that the embedding model has been downloaded.
    /// Call this before loading the model for `serve` or `embed`.
    pub fn require_model(&self) -> Result<()> {
        if !model_files_present(&self.model_dir) {
            anyhow::bail!(
                "BERT model files not found in {}\n\
                 Run `textvec download-model` to download them,\n\
                 or point TEXTVEC_MODEL_DIR at a directory with model.onnx and tokenizer.json.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}
