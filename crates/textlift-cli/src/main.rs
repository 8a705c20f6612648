//! Command-line interface for textlift.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use textlift::{ExtractionConfig, Extractor};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textlift", version, about = "Extract plain text from PDFs, DOCX files, and images")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a textlift.toml config file (defaults to discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from a single file
    Extract {
        /// The file to extract
        path: PathBuf,

        /// Client-facing file name used for classification (defaults to the path's file name)
        #[arg(long)]
        name: Option<String>,

        /// Media-type hint, takes precedence over the file extension
        #[arg(long)]
        content_type: Option<String>,

        /// Emit the result as JSON ({kind, text, charCount})
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP extraction server
    #[cfg(feature = "api")]
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ExtractionConfig> {
    match path {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading config file");
            ExtractionConfig::from_toml_file(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => match ExtractionConfig::discover().context("discovering config file")? {
            Some(config) => {
                tracing::info!("using discovered textlift.toml");
                Ok(config)
            }
            None => Ok(ExtractionConfig::default()),
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Extract {
            path,
            name,
            content_type,
            json,
        } => {
            let file_name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .context("input path has no file name; pass --name")?,
            };

            let extractor = Extractor::new(config);
            let result = extractor
                .extract_file(&path, &file_name, content_type.as_deref())
                .await
                .with_context(|| format!("extracting {}", path.display()))?;
            tracing::info!(kind = %result.kind, chars = result.text.chars().count(), "extraction finished");

            if json {
                let payload = serde_json::json!({
                    "kind": result.kind,
                    "text": result.text,
                    "charCount": result.text.chars().count(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", result.text);
            }
        }

        #[cfg(feature = "api")]
        Command::Serve { host, port } => {
            textlift::api::serve_with_config_and_limits(&host, port, config, Default::default())
                .await
                .context("running API server")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}
