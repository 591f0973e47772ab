use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use studycards_common::logger::{init_logging, LogOutput};
use studycards_common::{AppConfig, GenerationRequest};
use studycards_llm::{ChatCompletionsClient, StudyGenerator};
use studycards_server::library::{JsonLibraryStore, ResultStore};
use studycards_server::types::GenerateResponse;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
            return;
        }
    }
    dotenv::dotenv().ok();
}

#[derive(Parser)]
#[command(name = "studycards")]
#[command(about = "StudyCards - flashcards and quizzes generated from lesson text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the saved library
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Generate study material once and print it as JSON
    Generate {
        /// Read lesson text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Lesson text given inline
        #[arg(long)]
        text: Option<String>,

        /// Number of flashcards (3, 5, 10 or 15)
        #[arg(long, default_value_t = 5)]
        flashcards: u32,

        /// Number of quiz questions (3, 5, 10 or 15)
        #[arg(long, default_value_t = 5)]
        quiz: u32,

        /// Store the result in the library
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI overrides are applied as env vars so AppConfig::from_env sees them
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port, data_dir }) => {
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            if let Some(dir) = &data_dir {
                std::env::set_var("STUDYCARDS_DATA_DIR", dir);
            }
            serve().await
        }
        Some(Commands::Generate {
            file,
            text,
            flashcards,
            quiz,
            save,
        }) => generate_once(file, text, flashcards, quiz, save).await,
        None => serve().await,
    }
}

async fn serve() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(
        LogOutput::Server {
            log_dir: &config.log_dir,
        },
        &config.log_level,
    )?;

    tracing::info!("StudyCards starting...");
    tracing::info!("  Model: {}", config.model);
    tracing::info!("  Data: {}", config.data_dir.display());

    println!("Server listening on http://{}", config.server_bind_address());

    studycards_server::start_server(config).await?;
    Ok(())
}

async fn generate_once(
    file: Option<PathBuf>,
    text: Option<String>,
    flashcards: u32,
    quiz: u32,
    save: bool,
) -> Result<()> {
    let config = AppConfig::from_env()?;
    // stdout carries the JSON result, logs go to stderr
    init_logging(LogOutput::Cli, &config.log_level)?;

    let lesson_text = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read lesson file {}", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => bail!("Provide lesson text with --file or --text"),
    };

    let request = GenerationRequest::new(lesson_text, flashcards, quiz)?;
    let client = ChatCompletionsClient::from_config(&config)?;
    let generator = StudyGenerator::new(Arc::new(client));

    let result = generator.generate(&request).await?;

    let saved = if save {
        let library = JsonLibraryStore::open(&config.data_dir)?;
        Some(library.save_result(&result).await?)
    } else {
        None
    };

    let output = serde_json::to_string_pretty(&GenerateResponse { result, saved })?;
    println!("{}", output);
    Ok(())
}
