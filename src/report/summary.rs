//! Console report of overall and per-category agreement metrics

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{AnalysisReport, CategoryOutcome, MetricResult};

/// Text shown for a category with no rows left to score
pub const NO_DATA_TEXT: &str = "No data available";

/// One-line rendering of a category outcome, e.g.
/// `Correlation = 0.912, RMSD = 0.455`.
pub fn format_outcome(outcome: &CategoryOutcome) -> String {
    match outcome {
        CategoryOutcome::Computed(m) => format_metrics(m),
        CategoryOutcome::NoData => NO_DATA_TEXT.to_string(),
        CategoryOutcome::Failed(e) => format!("Failed: {}", e),
    }
}

pub fn format_metrics(metrics: &MetricResult) -> String {
    match metrics.correlation {
        Some(r) => format!("Correlation = {:.3}, RMSD = {:.3}", r, metrics.rmsd),
        None => format!("RMSD = {:.3}", metrics.rmsd),
    }
}

/// Summary of an analysis run for terminal display
#[derive(Debug)]
pub struct MetricsSummary<'a> {
    report: &'a AnalysisReport,
    skipped_rows: usize,
}

impl<'a> MetricsSummary<'a> {
    pub fn new(report: &'a AnalysisReport, skipped_rows: usize) -> Self {
        Self {
            report,
            skipped_rows,
        }
    }

    pub fn display(&self) {
        let report = self.report;

        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("AGREEMENT SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Input Rows"),
            Cell::new(report.input_rows + self.skipped_rows),
        ]);
        if self.skipped_rows > 0 {
            table.add_row(vec![
                Cell::new("⚠️  Skipped (Malformed)"),
                Cell::new(self.skipped_rows).fg(Color::Yellow),
            ]);
        }
        table.add_row(vec![
            Cell::new("🗑️  Removed (Outliers)"),
            Cell::new(report.filter.removed).fg(if report.filter.removed == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Rows Scored"),
            Cell::new(report.filter.kept())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        if let Some(r) = report.overall.correlation {
            table.add_row(vec![
                Cell::new("🔗 Weighted Correlation"),
                Cell::new(format!("{:.3}", r))
                    .fg(correlation_color(r))
                    .add_attribute(Attribute::Bold),
            ]);
        }
        table.add_row(vec![
            Cell::new("📏 RMSD"),
            Cell::new(format!("{:.3}", report.overall.rmsd)).add_attribute(Attribute::Bold),
        ]);
        if let Some(margin) = report.error_margin {
            table.add_row(vec![
                Cell::new("± Error Margin"),
                Cell::new(format!("{:.3}", margin)),
            ]);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if report.categories.is_empty() {
            return;
        }

        println!();
        println!(
            "    {} {}",
            style("📝").cyan(),
            style("RESIDUE-SPECIFIC METRICS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Residue").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Correlation").add_attribute(Attribute::Bold),
            Cell::new("RMSD").add_attribute(Attribute::Bold),
        ]);

        for entry in report.categories.iter() {
            let mut row = vec![Cell::new(&entry.category), Cell::new(entry.rows)];
            match &entry.outcome {
                CategoryOutcome::Computed(m) => {
                    row.push(match m.correlation {
                        Some(r) => Cell::new(format!("{:.3}", r)).fg(correlation_color(r)),
                        None => Cell::new("-").fg(Color::DarkGrey),
                    });
                    row.push(Cell::new(format!("{:.3}", m.rmsd)));
                }
                other => {
                    let color = if other.is_no_data() {
                        Color::DarkGrey
                    } else {
                        Color::Red
                    };
                    row.push(Cell::new(format_outcome(other)).fg(color));
                    row.push(Cell::new("-").fg(Color::DarkGrey));
                }
            }
            table.add_row(row);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn correlation_color(r: f64) -> Color {
    if r >= 0.8 {
        Color::Green
    } else if r >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}
