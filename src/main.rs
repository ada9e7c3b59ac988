use clap::Parser;
use hero_grouping::app::pipelines::grouping_pipeline::PARTIAL_JSON;
use hero_grouping::config::toml_config::TomlConfig;
use hero_grouping::config::{CliConfig, Command, GroupArgs, SplitArgs};
use hero_grouping::core::Storage;
use hero_grouping::utils::error::{ErrorSeverity, GroupingError, Result};
use hero_grouping::utils::{logger, validation::Validate};
use hero_grouping::{app::tasks, EtlEngine, GroupingPipeline, LocalStorage};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match &cli.command {
        Command::Group(args) => run_group(args, cli.monitor).await,
        Command::Split(args) => run_split(args).await,
        Command::Generate(args) => {
            tasks::generate_file(&LocalStorage::default(), args.count, args.seed, &args.output)
                .await
                .map(|_| args.output.clone())
        }
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Completed successfully");
            println!("✅ Completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

async fn run_group(args: &GroupArgs, monitor_flag: bool) -> Result<String> {
    let config = args.resolve()?;
    config.validate()?;
    tracing::info!("📁 Input: {}, output: {}", config.run.input_path, config.load.output_path);

    let monitor_enabled = monitor_flag || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Ctrl-C 只在兩次比對之間生效
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current search");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let partial_path = Path::new(&config.load.output_path)
        .join(PARTIAL_JSON)
        .to_string_lossy()
        .into_owned();
    let pipeline = GroupingPipeline::new(LocalStorage::default(), config).with_cancel_flag(cancel);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Err(GroupingError::Aborted { partial }) => {
            // 中斷時保留已完成的分組
            LocalStorage::default()
                .write_file(&partial_path, &serde_json::to_vec_pretty(&partial)?)
                .await?;
            tracing::warn!("Partial result ({} groups) saved to {}", partial.points, partial_path);
            Err(GroupingError::Aborted { partial })
        }
        other => other,
    }
}

async fn run_split(args: &SplitArgs) -> Result<String> {
    let criteria = match &args.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            config.cohort_criteria()
        }
        None => Default::default(),
    };

    let storage = LocalStorage::default();
    let split = tasks::split_file(&storage, &args.input, &args.output_dir, &criteria).await?;
    tracing::info!("Major cohort: {}, minor cohort: {}", split.major.len(), split.minor.len());
    Ok(args.output_dir.clone())
}
