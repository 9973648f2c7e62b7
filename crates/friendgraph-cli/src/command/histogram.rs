//! Text rendering of attribute distributions
//!
//! Reads a processed attribute file and prints summary statistics followed by
//! one bar per histogram bin.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use friendgraph_pipeline::loader;
use friendgraph_stats::{
    histogram::Histogram,
    summary::{self, Summary},
};

use crate::util;

const PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

#[derive(Debug, Clone, Args)]
pub(crate) struct HistogramArg {
    /// Processed attribute file (JSON object of user ID to value)
    file: PathBuf,

    /// Name of the value shown in the title
    #[arg(long, default_value = "Value")]
    name: String,

    /// Number of bins
    #[arg(long, default_value_t = 100)]
    bins: usize,

    /// Lower bound of the displayed range
    #[arg(long, requires = "max")]
    min: Option<f64>,

    /// Upper bound of the displayed range
    #[arg(long, requires = "min")]
    max: Option<f64>,

    /// Show probability density instead of counts
    #[arg(long)]
    density: bool,

    /// Width of the longest bar in characters
    #[arg(long, default_value_t = 50)]
    width: usize,
}

pub(crate) fn run(arg: &HistogramArg) -> anyhow::Result<()> {
    let reader = util::open_reader("attribute", &arg.file)?;
    let map = loader::read_attribute_map(reader)
        .with_context(|| format!("Failed to read attribute file: {}", arg.file.display()))?;

    let sorted = summary::sorted_values(map.into_values());
    let Some(stats) = Summary::from_sorted(&sorted) else {
        anyhow::bail!("No values in {}", arg.file.display());
    };

    println!("Histogram of {}s", arg.name);
    println!("==========================================\n");
    print_summary(&stats, &sorted);
    println!();

    let range = arg.min.zip(arg.max);
    let histogram = Histogram::new(sorted, arg.bins, range);
    let heights = if arg.density {
        histogram.density()
    } else {
        histogram.counts().into_iter().map(to_f64).collect()
    };
    print_bars(&histogram, &heights, arg.width, arg.density);
    println!(
        "\n  ({} of {} values in range)",
        histogram.total(),
        stats.count
    );
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn to_f64(count: u64) -> f64 {
    count as f64
}

fn print_summary(stats: &Summary, sorted: &[f64]) {
    println!(
        "  {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Count", "Min", "Max", "Mean", "Median", "Std Dev"
    );
    println!(
        "  {:>8} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
        stats.count, stats.min, stats.max, stats.mean, stats.median, stats.std_dev
    );
    let percentiles = PERCENTILES
        .iter()
        .filter_map(|p| Some(format!("P{p}={:.4}", summary::percentile(sorted, *p)?)))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {percentiles}");
}

fn print_bars(histogram: &Histogram, heights: &[f64], width: usize, density: bool) {
    for ((bin, height), bar_len) in histogram
        .bins
        .iter()
        .zip(heights)
        .zip(bar_lengths(heights, width))
    {
        let label = if density {
            format!("{height:.4}")
        } else {
            format!("{height}")
        };
        println!(
            "  [{:>12.4}, {:>12.4})  {:>10}  {}",
            bin.range.start,
            bin.range.end,
            label,
            "#".repeat(bar_len)
        );
    }
}

/// Bar length of each height, scaled so the tallest bar is `width` long.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn bar_lengths(heights: &[f64], width: usize) -> Vec<usize> {
    let max_height = heights.iter().copied().fold(0.0, f64::max);
    heights
        .iter()
        .map(|height| {
            if max_height > 0.0 {
                ((height / max_height) * width as f64).round() as usize
            } else {
                0
            }
        })
        .collect()
}
