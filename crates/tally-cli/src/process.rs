//! Process a receipt directory and emit the requested reports.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use tally_core::report::{format_range_total, render_pie_chart, to_json, ChartOutcome};
use tally_core::{
    category_totals, collect_files, process_files, range_total, OpenAiExtractor, TallyConfig,
};

/// Arguments for processing a directory.
#[derive(Args)]
pub struct ProcessArgs {
    /// Directory containing receipt images
    #[arg(required = true)]
    dirpath: PathBuf,

    /// Print the extracted receipts as JSON
    #[arg(long)]
    print: bool,

    /// Total expenses between START and END (YYYY-MM-DD, inclusive)
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    expenses: Option<Vec<String>>,

    /// Generate a pie chart of expenses by category
    #[arg(long)]
    plot: bool,

    /// Where to save the pie chart (default from config)
    #[arg(long, value_name = "PATH")]
    plot_output: Option<PathBuf>,
}

pub async fn run(args: ProcessArgs, config: TallyConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let files = collect_files(&args.dirpath)
        .with_context(|| format!("reading directory {}", args.dirpath.display()))?;

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let extractor = OpenAiExtractor::new(config.extraction.clone());
    let result = process_files(&files, &extractor, |file| {
        pb.set_message(file.name.clone());
        pb.inc(1);
    })
    .await;

    let collection = match result {
        Ok(collection) => {
            pb.finish_and_clear();
            collection
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    info!(
        "Processed {} receipts in {:?}",
        collection.len(),
        start.elapsed()
    );

    if args.print {
        println!("{}", to_json(&collection)?);
    }

    if let Some(range) = &args.expenses {
        let (from, to) = (&range[0], &range[1]);
        let total = range_total(&collection, from, to);
        debug!(
            "Range total counted {} receipts, skipped {:?}",
            total.counted, total.skipped
        );
        println!("{}", format_range_total(from, to, total.total));
    }

    if args.plot {
        let path = args
            .plot_output
            .clone()
            .unwrap_or_else(|| config.chart.output_path.clone());
        let totals = category_totals(&collection);

        match render_pie_chart(&totals, &path, config.chart.width, config.chart.height)? {
            ChartOutcome::NoData => println!("No valid data to plot."),
            ChartOutcome::Saved { path, slices } => {
                for slice in &slices {
                    println!("  {}", slice.percent_label());
                }
                println!("Pie chart saved to {}", path.display());
            }
        }
    }

    Ok(())
}
