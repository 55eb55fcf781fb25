use chrono::Utc;
use clap::{Parser, Subcommand};
use pdf_qa_core::{
    CharacterNgramEmbedder, GeneratorConfig, LopdfExtractor, OpenAiGenerator, QaConfig,
    QaPipeline, TextExtractor, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-qa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a question about a PDF document.
    Ask {
        /// Path to the PDF.
        #[arg(long)]
        pdf: PathBuf,
        /// The question to ask.
        #[arg(long)]
        question: String,
        /// Chunk length in characters.
        #[arg(long, default_value = "1000")]
        chunk_size: usize,
        /// Overlap between neighboring chunks in characters.
        #[arg(long, default_value = "200")]
        chunk_overlap: usize,
        /// Number of chunks to retrieve as context.
        #[arg(long, default_value = "3")]
        top_k: usize,
        /// Model credential; falls back to the environment.
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Chat model to use.
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
        /// OpenAI-compatible API base URL.
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
        /// Request timeout for the model call, in seconds.
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
        /// Print the retrieved chunks before the answer.
        #[arg(long, default_value_t = false)]
        show_context: bool,
    },
    /// Print the extracted text of a PDF (debugging aid).
    Extract {
        /// Path to the PDF.
        #[arg(long)]
        pdf: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "pdf-qa boot"
    );

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Ask {
            pdf,
            question,
            chunk_size,
            chunk_overlap,
            top_k,
            api_key,
            model,
            base_url,
            timeout_secs,
            show_context,
        } => {
            let generator = OpenAiGenerator::new(GeneratorConfig {
                api_key: api_key.clone(),
                base_url,
                model,
                request_timeout: Duration::from_secs(timeout_secs),
                ..GeneratorConfig::default()
            })
            .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            let config = QaConfig {
                chunk_size,
                chunk_overlap,
                top_k,
                api_key,
            };

            let mut pipeline = QaPipeline::new(
                config,
                LopdfExtractor,
                CharacterNgramEmbedder::default(),
                generator,
            );

            let report = pipeline
                .build_index(&pdf)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            info!(
                document_id = %report.document_id,
                title = %report.title,
                chunk_count = report.chunk_count,
                "index built"
            );

            pipeline
                .init_generator()
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            if show_context {
                let hits = pipeline
                    .retrieve(&question)
                    .map_err(|error| anyhow::anyhow!(error.to_string()))?;
                for hit in hits {
                    println!(
                        "[context {}] score={:.4} chunk={}",
                        hit.rank + 1,
                        hit.score,
                        hit.chunk.chunk_index
                    );
                    println!("{}", hit.chunk.text);
                }
            }

            let answer = pipeline
                .query(&question)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("{answer}");
        }
        Command::Extract { pdf } => {
            let text = LopdfExtractor
                .extract(&pdf)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("{text}");
        }
    }

    Ok(())
}
