use clap::{Parser, Subcommand};
use engine::{DiagnosisService, EngineConfig, InferenceError};
use serde::Serialize;
use shared::{BatchItem, BatchOutcome, BatchResult};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

#[derive(Parser)]
#[command(name = "leafdoc", about = "Plant disease diagnosis from leaf photos")]
struct Cli {
    /// Path to engine.yaml (defaults to config/engine.yaml)
    #[arg(long, global = true, env = "ENGINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Diagnose one image, or a batch when several are given
    Classify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show knowledge base details for a class id
    Describe { class_id: String },
    /// List every registered disease class
    List,
    /// Treatment plan for a class id at a given confidence
    Recommend {
        class_id: String,
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,
    },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::debug!("Current working directory: {}", current_dir.display());
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let service = match DiagnosisService::synthetic(config) {
        Ok(service) => service,
        Err(e) => {
            log::error!("Failed to start diagnosis service: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Classify { paths } if paths.len() == 1 => match read_image(&paths[0]) {
            Ok(bytes) => match service.classify_image(&bytes) {
                Ok(result) => print_json(&result),
                Err(e) => fail(&e),
            },
            Err(e) => fail(&e),
        },
        Command::Classify { paths } => print_json(&classify_paths(&service, &paths)),
        Command::Describe { class_id } => print_json(&service.describe_disease(&class_id)),
        Command::List => print_json(&service.list_known_diseases()),
        Command::Recommend {
            class_id,
            confidence,
        } => print_json(&service.recommend_treatment(&class_id, confidence)),
    }
}

fn load_config(path: Option<&Path>) -> EngineConfig {
    let loaded = match path {
        Some(path) => EngineConfig::from_path(path),
        None => EngineConfig::load(),
    };
    match loaded {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default engine config: {}", e);
            EngineConfig::default()
        }
    }
}

fn validate_extension(path: &Path) -> Result<(), InferenceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(InferenceError::UnsupportedFileType(format!(
            "{} (allowed: {})",
            path.display(),
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, InferenceError> {
    validate_extension(path)?;
    let bytes = std::fs::read(path).map_err(|e| {
        InferenceError::InvalidImageFormat(format!("{}: {}", path.display(), e))
    })?;
    if bytes.is_empty() {
        return Err(InferenceError::EmptyInput);
    }
    Ok(bytes)
}

/// Files that fail the caller-level checks keep their slot in the batch.
fn classify_paths(service: &DiagnosisService, paths: &[PathBuf]) -> BatchResult {
    let reads: Vec<Result<Vec<u8>, InferenceError>> = paths.iter().map(|p| read_image(p)).collect();
    let readable: Vec<&[u8]> = reads
        .iter()
        .filter_map(|r| r.as_ref().ok().map(Vec::as_slice))
        .collect();
    let mut classified = service.classify_batch(&readable).items.into_iter();

    let items = reads
        .iter()
        .enumerate()
        .map(|(index, read)| {
            let outcome = match read {
                Ok(_) => classified.next().map(|item| item.outcome).unwrap_or_else(|| {
                    BatchOutcome::Error(
                        InferenceError::ClassificationUnavailable("missing batch result".into())
                            .to_record(),
                    )
                }),
                Err(e) => {
                    log::error!("Skipping {}: {}", paths[index].display(), e);
                    BatchOutcome::Error(e.to_record())
                }
            };
            BatchItem { index, outcome }
        })
        .collect();
    BatchResult::from_items(items)
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn fail(err: &InferenceError) -> ExitCode {
    log::error!("{}", err);
    print_json(&err.to_record());
    ExitCode::FAILURE
}
