use anyhow::Context;
use log::{info, warn};
use tb_monthly_report::utils::logging::StageProgress;
use tb_monthly_report::{ReportConfig, run_report_with_observer};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ReportConfig::default();
    info!(
        "Building report for {} from {} to {}",
        config.region,
        config.anchor,
        config.effective_run_date()
    );

    let progress = StageProgress::new();
    let summary = match run_report_with_observer(&config, &progress) {
        Ok(summary) => summary,
        Err(e) => {
            progress.abandon();
            return Err(e).with_context(|| {
                format!("failed to build report {}", config.paths.output.display())
            });
        }
    };
    progress.finish("done");

    info!(
        "Loaded {} records; {} after cohort, {} after geography, {} after calendar",
        summary.rows_loaded, summary.after_cohort, summary.after_geography, summary.after_calendar
    );
    info!(
        "Dropped {} cases without a municipality reference, {} outside {}, {} without a calendar date",
        summary.unmatched_geography,
        summary.outside_region,
        config.region,
        summary.unmatched_calendar
    );
    info!(
        "Wrote {} rows ({} municipalities × {} periods) to {}",
        summary.output_rows,
        summary.municipality_universe,
        summary.period_universe,
        config.paths.output.display()
    );
    if summary.null_dates > 0 {
        warn!("{} records had no usable diagnosis date", summary.null_dates);
    }
    for label in &summary.untranslated_labels {
        warn!("Untranslated period label in output: {label}");
    }

    Ok(())
}
