//! pKa-corr: pKa Agreement Statistics CLI Tool
//!
//! Loads a table of predicted and experimental pKa values, removes outliers,
//! and reports RMSD and error-weighted correlation overall and per residue.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use pkacorr::cli::{confirm_overwrite, Cli};
use pkacorr::pipeline::{load_dataset, run_analysis};
use pkacorr::report::{export_metrics, ExportParams, MetricsSummary};
use pkacorr::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mapping = cli.column_mapping();
    let config = cli.analysis_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &mapping, config.threshold, config.mode);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading input file...");
    let loaded = load_dataset(&cli.input, &mapping, cli.infer_schema_length)?;
    if loaded.skipped_rows > 0 {
        finish_with_warning(&spinner, "Dataset loaded with skipped rows");
        print_count(
            "row(s) with missing or non-numeric values",
            loaded.skipped_rows,
            Some("(skipped)"),
        );
    } else {
        finish_with_success(&spinner, "Dataset loaded");
    }

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", loaded.total_rows);
    println!("      Usable rows: {}", loaded.dataset.len());
    println!("      Categories: {}", loaded.dataset.categories().len());
    print_step_time(step_start.elapsed());

    // Step 2: Outlier removal and metrics
    print_step_header(2, "Outlier Removal & Metrics");

    let step_start = Instant::now();
    let spinner = create_spinner("Filtering outliers and computing metrics...");
    let report = run_analysis(&loaded.dataset, &config).with_context(|| {
        format!(
            "Analysis of '{}' vs '{}' over {} row(s) failed",
            mapping.predicted,
            mapping.experimental,
            loaded.dataset.len()
        )
    })?;
    finish_with_success(&spinner, "Metrics computed");

    if report.filter.removed == 0 {
        print_info("No outliers found");
    } else {
        print_count(
            "outlier(s)",
            report.filter.removed,
            Some(&format!("(|z| > {:.2})", config.threshold)),
        );
        print_success("Removed outliers");
    }
    let failed = report.categories.failed_count();
    if failed > 0 {
        print_warning(&format!("{} category metric(s) could not be computed", failed));
    }
    print_step_time(step_start.elapsed());

    // Summary
    MetricsSummary::new(&report, loaded.skipped_rows).display();

    // Step 3: Export
    if !cli.no_export {
        print_step_header(3, "Save Results");

        let output_path = cli.output_path();
        let proceed =
            cli.no_confirm || !output_path.exists() || confirm_overwrite(&output_path)?;

        if proceed {
            let step_start = Instant::now();
            let input_file = cli.input.display().to_string();
            let params = ExportParams {
                input_file: &input_file,
                mapping: &mapping,
                threshold: config.threshold,
                mode: config.mode,
                skipped_rows: loaded.skipped_rows,
            };
            export_metrics(&report, &output_path, &params)?;
            print_success(&format!("Saved to {}", output_path.display()));
            print_step_time(step_start.elapsed());
        } else {
            print_info("Export skipped");
        }
    }

    print_completion();

    Ok(())
}
