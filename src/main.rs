//! job-signal: deduplicate job signals and rank them for a candidate

use chrono::Utc;
use clap::Parser;
use job_signal::cli::{
    self, Cli, Commands, ConfigAction, ModelAction, RecordKind, HASHING_EMBEDDING,
};
use job_signal::config::{Config, OutputFormat};
use job_signal::error::{JobSignalError, Result};
use job_signal::input::InputManager;
use job_signal::output::formatter::{save_json, save_report_to_file, suggest_filename};
use job_signal::output::report::{RankingReport, RankingSummary, ReportMetadata};
use job_signal::output::ReportGenerator;
use job_signal::processing::dedup::{dedupe_raw, dedupe_structured_with_prefix};
use job_signal::processing::embedding_manager::EmbeddingModelManager;
use job_signal::processing::embeddings::{EmbeddingProvider, HashingEmbedder, Model2VecEmbedder};
use job_signal::processing::pipeline::{RankOptions, RankingPipeline};
use job_signal::schema::SourceKey;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

const INPUT_EXTENSIONS: [&str; 3] = ["json", "jsonl", "ndjson"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Reset and path must work even when the stored config no longer validates
    if let Commands::Config {
        action: Some(action @ (ConfigAction::Reset | ConfigAction::Path)),
    } = &cli.command
    {
        if let Err(e) = run_config_file_action(action, &config_path) {
            error!("Command failed: {}", e);
            process::exit(1);
        }
        return;
    }

    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Dedupe { input, kind, save } => {
            validate_input(&input, "Input file")?;
            let mut input_manager = InputManager::new();

            println!("🧹 Deduplicating {}", input.display());
            let (before, after) = match kind {
                RecordKind::Raw => {
                    let signals = input_manager.load_signals(&input).await?;
                    let unique = dedupe_raw(&signals);
                    if let Some(path) = &save {
                        save_json(&unique, path)?;
                    }
                    (signals.len(), unique.len())
                }
                RecordKind::Jobs => {
                    let jobs = input_manager.load_jobs(&input).await?;
                    let unique =
                        dedupe_structured_with_prefix(&jobs, config.dedup.key_prefix_chars);
                    if let Some(path) = &save {
                        save_json(&unique, path)?;
                    }
                    (jobs.len(), unique.len())
                }
            };

            println!(
                "✅ {} records in, {} unique, {} duplicates removed",
                before,
                after,
                before - after
            );
            if let Some(path) = &save {
                println!("💾 Saved to: {}", path.display());
            }
        }

        Commands::Rank {
            jobs,
            profile,
            locations,
            sources,
            days,
            include_invalid,
            embedding,
            top,
            output,
            save,
            detailed,
        } => {
            let start = Instant::now();
            validate_input(&jobs, "Jobs file")?;
            validate_input(&profile, "Profile file")?;

            let output_format = output.map(OutputFormat::from).unwrap_or(config.output.format);
            let top_results = top.unwrap_or(config.output.top_results);
            let detailed = detailed || config.output.detailed;

            let mut input_manager = InputManager::new();
            let job_records = input_manager.load_jobs(&jobs).await?;
            let candidate = input_manager.load_profile(&profile).await?;

            let embedding_id =
                embedding.unwrap_or_else(|| config.models.default_embedding_model.clone());
            let embedder = load_embedder(&config, &embedding_id).await?;
            println!("🧠 Embeddings: {} (dimension {})", embedder.name(), embedder.dimension());

            let options = RankOptions {
                locations: locations.clone(),
                sources: sources.iter().map(|s| SourceKey::new(s.as_str())).collect(),
                days_limit: days,
                include_invalid,
            };
            let pipeline = RankingPipeline::new(&config, embedder.as_ref())?;
            let outcome = pipeline.run(&job_records, &candidate, &options, Utc::now())?;

            let report = RankingReport::new(
                ReportMetadata {
                    generated_at: Utc::now(),
                    tool_version: env!("CARGO_PKG_VERSION").to_string(),
                    jobs_file: jobs.display().to_string(),
                    profile_file: profile.display().to_string(),
                    embedding_model: embedder.name().to_string(),
                    processing_time_ms: start.elapsed().as_millis() as u64,
                },
                RankingSummary {
                    jobs_loaded: outcome.jobs_loaded,
                    jobs_after_dedup: outcome.jobs_after_dedup,
                    jobs_after_filters: outcome.jobs_after_filters,
                    weights: config.ranking.weights,
                    locations,
                    sources,
                    days_limit: days,
                },
                &outcome.ranked,
                top_results,
                outcome.skill_gaps,
                outcome.top_skills,
            );

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
            let rendered = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(output_format, &jobs.to_string_lossy(), true))
                    } else {
                        path
                    };
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(
                config.models_dir().clone(),
                &config.models.available_models,
            )
            .await?;

            match action {
                ModelAction::List => {
                    println!("📦 Embedding models ({})\n", config.models_dir().display());
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(&model.id) {
                            "✅ downloaded"
                        } else {
                            "⬇️  available"
                        };
                        let default_marker = if model.id == config.models.default_embedding_model {
                            " (default)"
                        } else {
                            ""
                        };
                        println!(
                            "  {}{} [{} MB] {}",
                            model.id, default_marker, model.size_mb, status
                        );
                        println!("    {}", model.description);
                    }
                    println!(
                        "\n💡 Use `--embedding {}` to rank without a model",
                        HASHING_EMBEDDING
                    );
                }

                ModelAction::Download { model } => {
                    let model_id =
                        manager.resolve_model_id(&model).ok_or_else(|| unknown_model(&model))?;
                    if manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded", model_id);
                        return Ok(());
                    }
                    println!("⬇️  Downloading model: {}", model_id);
                    let path = manager.download_model(&model_id).await?;
                    println!("✅ Model '{}' downloaded to {}", model_id, path.display());
                }

                ModelAction::Info { model } => {
                    let model_id =
                        manager.resolve_model_id(&model).ok_or_else(|| unknown_model(&model))?;
                    if let Some(info) = manager.get_model_info(&model_id) {
                        println!("📋 Model Information for '{}'\n", info.id);
                        println!("Repository: {}", info.repo_id);
                        println!("Size: {} MB", info.size_mb);
                        if let Some(dimensions) = info.dimensions {
                            println!("Dimensions: {}", dimensions);
                        }
                        println!("Description: {}", info.description);
                        match manager.get_model_path(&model_id) {
                            Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                            None => println!(
                                "Status: ⬇️  Run `job-signal models download {}`",
                                model_id
                            ),
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("Models Directory: {}", config.models_dir().display());
                println!("Default Embedding Model: {}", config.models.default_embedding_model);
                let weights = &config.ranking.weights;
                println!("\nRanking Weights:");
                println!("  Embedding: {:.1}%", weights.embedding * 100.0);
                println!("  Location: {:.1}%", weights.location * 100.0);
                println!("  Recency: {:.1}%", weights.recency * 100.0);
                println!("  Skill overlap: {:.1}%", weights.skill_overlap * 100.0);
                println!("\nRecency horizon: {} days", config.ranking.recency_horizon_days);
                println!("Dedup key prefix: {} chars", config.dedup.key_prefix_chars);
                println!("Output: {:?}, top {}", config.output.format, config.output.top_results);
            }

            Some(action @ (ConfigAction::Reset | ConfigAction::Path)) => {
                run_config_file_action(&action, config_path)?;
            }
        },
    }

    Ok(())
}

/// Config actions that never read the current file
fn run_config_file_action(action: &ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Reset => {
            println!("🔄 Resetting configuration to defaults...");
            Config::reset_to(config_path)?;
            println!("✅ Configuration reset: {}", config_path.display());
        }
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Show => {}
    }
    Ok(())
}

fn unknown_model(model: &str) -> JobSignalError {
    JobSignalError::ModelError(format!("Unknown embedding model: {}", model))
}

fn validate_input(path: &Path, label: &str) -> Result<()> {
    cli::validate_file_extension(path, &INPUT_EXTENSIONS)
        .map_err(|e| JobSignalError::InvalidInput(format!("{}: {}", label, e)))
}

/// Hashing embedder for "hashing", otherwise a Model2Vec model downloaded on demand
async fn load_embedder(config: &Config, embedding_id: &str) -> Result<Box<dyn EmbeddingProvider>> {
    if embedding_id == HASHING_EMBEDDING {
        info!("Using model-free hashing embeddings");
        return Ok(Box::new(HashingEmbedder::default()));
    }

    let mut manager =
        EmbeddingModelManager::new(config.models_dir().clone(), &config.models.available_models)
            .await?;
    let model_id = manager
        .resolve_model_id(embedding_id)
        .unwrap_or_else(|| embedding_id.to_string());
    let model_path: PathBuf = match manager.get_model_path(&model_id) {
        Some(path) => path,
        None => {
            println!("⬇️  Embedding model '{}' not found locally, downloading...", model_id);
            manager.ensure_model_available(&model_id).await?
        }
    };

    Ok(Box::new(Model2VecEmbedder::new(&model_path, &model_id, config.models.batch_size)?))
}
