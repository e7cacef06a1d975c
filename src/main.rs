use chrono::Local;
use clap::Parser;
use erp_rules::config::sync_config::SourceKind;
use erp_rules::core::sources::{ApiSource, FileSource};
use erp_rules::domain::finance::margin::{budget_variance, ProfitBreakdown};
use erp_rules::domain::{dates, hse, notifications};
use erp_rules::utils::error::ErrorSeverity;
use erp_rules::utils::{logger, validation::Validate};
use erp_rules::{CliConfig, Command, ErpError, LocalStorage, SyncConfig, SyncRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = execute(config.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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

    Ok(())
}

async fn execute(command: Command) -> Result<(), ErpError> {
    match command {
        Command::Sync { config, dry_run } => run_sync(&config, dry_run).await,
        Command::Margin {
            revenue,
            direct_cost,
            overhead,
            budget,
        } => {
            let breakdown = ProfitBreakdown::new(revenue, direct_cost, overhead);
            breakdown.validate()?;
            let summary = breakdown.summarize();
            println!("Revenue:      {}", notifications::format_currency_idr(revenue));
            println!(
                "Gross profit: {} ({:.2}%)",
                notifications::format_currency_idr(summary.gross_profit),
                summary.gross_margin
            );
            println!(
                "Net profit:   {} ({:.2}%)",
                notifications::format_currency_idr(summary.net_profit),
                summary.net_margin
            );
            println!("Health:       {}", summary.health.label());
            if let Some(budget) = budget {
                let variance = budget_variance(budget, direct_cost + overhead);
                println!(
                    "Budget:       {} ({:+.2}%{})",
                    notifications::format_currency_idr(variance.amount),
                    variance.percent,
                    if variance.over_budget { ", over budget" } else { "" }
                );
            }
            Ok(())
        }
        Command::Risk {
            likelihood,
            consequence,
        } => {
            let assessment = hse::assess_risk_raw(likelihood, consequence)?;
            println!(
                "Risk score {} ({:?} x {:?}): {}",
                assessment.score,
                assessment.likelihood,
                assessment.consequence,
                assessment.level.label()
            );
            println!("Review within {} days", assessment.level.review_interval_days());
            if assessment.level.requires_work_stop() {
                println!("⚠️  Stop work until controls reduce the risk");
            }
            Ok(())
        }
        Command::Transition { document, from, to } => match to {
            Some(to) => {
                if document.validate_transition_str(&from, &to)? {
                    println!("✅ {} -> {} is allowed", from, to);
                    Ok(())
                } else {
                    Err(ErpError::InvalidTransition {
                        document: document.document_name().to_string(),
                        from,
                        to,
                    })
                }
            }
            None => {
                let next = document.allowed_next_str(&from)?;
                if next.is_empty() {
                    println!("'{}' is a terminal status", from);
                } else {
                    println!("From '{}': {}", from, next.join(", "));
                }
                Ok(())
            }
        },
        Command::Backoff { retry_count } => {
            let minutes = notifications::backoff_delay_minutes(retry_count);
            let at = notifications::next_retry_at(chrono::Utc::now(), retry_count);
            println!("Retry in {} minutes (at {})", minutes, at.to_rfc3339());
            Ok(())
        }
        Command::Expiry {
            expires_on,
            today,
            warning_days,
        } => {
            let expires_on = dates::parse_date(&expires_on)?;
            let today = match today {
                Some(today) => dates::parse_date(&today)?,
                None => Local::now().date_naive(),
            };
            let status = dates::expiry_status(expires_on, today, warning_days);
            println!("{}", serde_json::to_string(&status)?);
            Ok(())
        }
    }
}

async fn run_sync(config_path: &str, dry_run: bool) -> Result<(), ErpError> {
    tracing::info!("📁 Loading sync configuration from: {}", config_path);
    let config = SyncConfig::from_file(config_path)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let transformer = config.transformer()?;
    if dry_run {
        println!(
            "🔍 {}: {} -> {} [{}]",
            config.sync.name,
            config.mapping.source_table,
            config.mapping.target_table,
            transformer.target_fields().join(", ")
        );
        return Ok(());
    }

    let output_dir = config.output_dir();
    let storage = LocalStorage::new(&output_dir);
    let report = match config.source.r#type {
        SourceKind::File => {
            let path = config.source.path.clone().unwrap_or_default();
            let source = FileSource::new(
                LocalStorage::new(config.source_root()),
                path,
                config.source.records_path.clone(),
            );
            SyncRunner::new(source, storage, transformer)
                .with_bundle_name(config.bundle_name())
                .run()
                .await?
        }
        SourceKind::Api => {
            let source = ApiSource::new(config.source.endpoint.clone().unwrap_or_default())
                .with_headers(config.source.headers.clone().unwrap_or_default())
                .with_timeout(config.source.timeout_seconds)
                .with_records_path(config.source.records_path.clone());
            SyncRunner::new(source, storage, transformer)
                .with_bundle_name(config.bundle_name())
                .run()
                .await?
        }
    };

    println!("✅ Sync '{}' completed", report.mapping);
    println!(
        "   fetched {}, transformed {}, skipped {}, failed {}",
        report.fetched, report.transformed, report.skipped, report.failed
    );
    println!("📁 Output saved to: {}", output_dir.join(&report.bundle_path).display());
    Ok(())
}
