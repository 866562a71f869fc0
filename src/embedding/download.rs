// Model download helper for the BERT encoder.
//
// Fetches the ONNX export of bert-base-uncased and its tokenizer from
// HuggingFace. Files are stored in a platform-appropriate directory
// (~/.local/share/textvec/models/ on Linux) so they persist across runs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo hosting an ONNX export of bert-base-uncased.
const BERT_HF_URL: &str = "https://huggingface.co/Xenova/bert-base-uncased/resolve/main";

/// Remote paths within the repo.
const REMOTE_MODEL_FILE: &str = "onnx/model.onnx";
const REMOTE_TOKENIZER_FILE: &str = "tokenizer.json";

/// Local file names inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Subdirectory name for the model under the data directory.
pub const MODEL_NAME: &str = "bert-base-uncased";

/// Returns the default directory for the model files.
/// Uses the platform data directory: ~/.local/share/textvec/models/bert-base-uncased on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("textvec")
        .join("models")
        .join(MODEL_NAME)
}

/// Check whether both the model and the tokenizer exist.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join(MODEL_FILE).exists() && dir.join(TOKENIZER_FILE).exists()
}

/// Download the ONNX model and tokenizer into `dir`.
///
/// Skips files that already exist. Creates the directory as needed.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let client = reqwest::Client::new();

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if tokenizer_path.exists() {
        info!("Tokenizer already exists, skipping");
        println!("  {} (already exists)", TOKENIZER_FILE);
    } else {
        println!("  Downloading {}...", TOKENIZER_FILE);
        download_file(
            &client,
            &format!("{}/{}", BERT_HF_URL, REMOTE_TOKENIZER_FILE),
            &tokenizer_path,
            false,
        )
        .await?;
    }

    let model_path = dir.join(MODEL_FILE);
    if model_path.exists() {
        info!("Model already exists, skipping");
        println!("  {} (already exists)", MODEL_FILE);
    } else {
        println!("  Downloading {} (~440 MB)...", MODEL_FILE);
        download_file(
            &client,
            &format!("{}/{}", BERT_HF_URL, REMOTE_MODEL_FILE),
            &model_path,
            true,
        )
        .await?;
    }

    Ok(())
}

/// Stream a single file from `url` to `dest`.
///
/// Writes to a `.part` file first and renames on completion so an
/// interrupted download never leaves a truncated model behind.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        let pb = match response.content_length() {
            Some(size) => {
                let pb = ProgressBar::new(size);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .expect("valid template")
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner} {bytes}")
                        .expect("valid template"),
                );
                pb
            }
        };
        Some(pb)
    } else {
        None
    };

    let partial = dest.with_extension("part");
    let mut file = std::fs::File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }
    file.flush()
        .with_context(|| format!("Failed to flush {}", partial.display()))?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_textvec() {
        let dir = default_model_dir();
        let path_str = dir.to_string_lossy();
        assert!(
            path_str.contains("textvec") && path_str.ends_with(MODEL_NAME),
            "Expected path under textvec/models/{MODEL_NAME}, got: {path_str}"
        );
    }

    #[test]
    fn test_model_files_present_false_when_missing() {
        let dir = std::env::temp_dir().join("textvec-test-nonexistent");
        assert!(!model_files_present(&dir));
    }

    #[test]
    fn test_model_files_present_requires_both_files() {
        let dir = std::env::temp_dir().join("textvec-download-test-partial");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), b"fake").unwrap();

        assert!(!model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_model_files_present_true_when_files_exist() {
        let dir = std::env::temp_dir().join("textvec-download-test-complete");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODEL_FILE), b"fake").unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), b"fake").unwrap();

        assert!(model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
