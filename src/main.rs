use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use textvec::config::Config;
use textvec::embedding::download::download_model;
use textvec::embedding::onnx::OnnxEmbedder;
use textvec::embedding::traits::Embedder;
use textvec::output::matrix_json;
use textvec::vectorize::tfidf::TfIdfVectorizer;
use textvec::web::{run_server, AppState};

/// textvec: turn batches of text into TF-IDF or BERT vectors over HTTP.
#[derive(Parser)]
#[command(name = "textvec", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the BERT model and serve /generate-tfidf and /generate-bert
    Serve {
        /// Port to listen on (overrides TEXTVEC_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides TEXTVEC_BIND)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Download the bert-base-uncased ONNX model and tokenizer (~440 MB)
    DownloadModel,

    /// Print the TF-IDF matrix for the given texts as JSON
    Tfidf {
        /// Texts forming one batch
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Print BERT embeddings for the given texts as JSON
    Embed {
        /// Texts to embed
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("textvec=info,tower_http=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            config.require_model()?;
            let embedder = load_embedder(&config)?;
            let state = AppState::new(embedder, TfIdfVectorizer::new(config.max_features))
                .with_body_limit(config.max_body_bytes);

            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let port = port.unwrap_or(config.port);
            run_server(state, &bind, port).await?;
        }

        Commands::DownloadModel => {
            println!("Downloading bert-base-uncased (ONNX)...");
            println!("  Destination: {}", config.model_dir.display());

            download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `textvec serve`.");
        }

        Commands::Tfidf { texts } => {
            let vectorizer = TfIdfVectorizer::new(config.max_features);
            let matrix = vectorizer.fit_transform(&texts)?;
            info!(
                columns = matrix.column_count(),
                "Vocabulary: {}",
                matrix.vocabulary.join(", ")
            );
            println!("{}", matrix_json(&matrix.rows)?);
        }

        Commands::Embed { texts } => {
            config.require_model()?;
            let embedder = load_embedder(&config)?;
            let embeddings = embedder.embed_batch(&texts).await?;
            println!("{}", matrix_json(&embeddings)?);
        }
    }

    Ok(())
}

/// Load the ONNX embedder once; the returned handle is shared read-only.
fn load_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    info!(model_dir = %config.model_dir.display(), "Loading BERT model...");
    let embedder = OnnxEmbedder::load(&config.model_dir, config.max_tokens)
        .context("Failed to initialize the BERT embedder")?;
    Ok(Arc::new(embedder))
}
