use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use univerify::chart::{self, Series};
use univerify::workload::{self, Order, Sample};
use univerify::{logger, Variant};

/// Times bulk inserts and random searches on each tree, writes the per-size
/// means as CSV and draws SVG charts of every trial and of the trend across
/// sizes.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// Tree sizes to test
    #[clap(long, num_args = 1.., default_values_t = [1000, 10000, 25000, 50000])]
    n_values: Vec<usize>,
    /// Trials per size
    #[clap(long, default_value_t = 5)]
    trials: u64,
    /// Searches per trial
    #[clap(long, default_value_t = 1000)]
    searches: usize,
    /// Where the CSV and SVG files go
    #[clap(long, default_value = "benchmarks")]
    out_dir: PathBuf,
    /// Insertion order
    #[clap(long, value_enum, default_value_t = Order::Random)]
    mode: Order,
    /// Trees to compare
    #[clap(long, value_enum, num_args = 1.., default_values_t = Variant::ALL)]
    trees: Vec<Variant>,
    /// Enables verbose logging
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

const Y_DESC: &str = "μs per operation";

/// What each chart measures, and the word its file name uses for it.
const METRICS: [(fn(&Sample) -> f64, &str); 2] = [
    (|s: &Sample| s.insert_micros, "inserts"),
    (|s: &Sample| s.search_micros, "searches"),
];

/// Every sample for one tree size, indexed like `Args::trees`.
struct Row {
    n: usize,
    samples: Vec<Vec<Sample>>,
}

fn main() {
    if let Err(err) = run() {
        log::error!("{:?}", err);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(args.verbose, logger::Mode::Batch);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rows = Vec::with_capacity(args.n_values.len());
    for &n in &args.n_values {
        log::info!(
            action = "Running";
            "n={n} with {} trials (searches={}), mode={:?}",
            args.trials,
            args.searches,
            args.mode
        );

        let mut samples = vec![Vec::new(); args.trees.len()];
        for t in 0..args.trials {
            let mut line = format!("trial {}:", t + 1);
            for (i, &variant) in args.trees.iter().enumerate() {
                // Every tree sees the same keys and search targets within a trial.
                let mut rng = StdRng::seed_from_u64(1000 + t);
                let keys = workload::generate_keys(n, args.mode, &mut rng);
                let sample = workload::run_trial(variant, &keys, args.searches, &mut rng);

                write!(
                    line,
                    " {variant}_insert={:.1}μs {variant}_search={:.1}μs",
                    sample.insert_micros, sample.search_micros
                )?;
                samples[i].push(sample);
            }
            log::info!("{line}");
        }

        let row = Row { n, samples };
        for (metric, name) in METRICS {
            let path = args.out_dir.join(format!("benchmark_n_{n}_{name}.svg"));
            let series = trial_series(&args.trees, &row, metric);
            chart::trial_bars(&path, &format!("Trial {name}, n={n}"), Y_DESC, &series)?;
            log::info!(action = "Saved"; "{}", path.display());
        }
        rows.push(row);
    }

    for (metric, name) in METRICS {
        let csv = args.out_dir.join(format!("benchmark_{name}.csv"));
        write_csv(&csv, &args.trees, &rows, metric)?;
        log::info!(action = "Saved"; "{name} averages to {}", csv.display());

        let path = args.out_dir.join(format!("trend_{name}.svg"));
        let series = trend_series(&args.trees, &rows, metric);
        chart::trend_lines(&path, &format!("Mean {name} across n"), Y_DESC, &args.n_values, &series)?;
        log::info!(action = "Saved"; "{}", path.display());
    }

    Ok(())
}

fn write_csv(
    path: &Path,
    trees: &[Variant],
    rows: &[Row],
    metric: impl Fn(&Sample) -> f64,
) -> anyhow::Result<()> {
    let mut csv = String::from("n");
    for tree in trees {
        write!(csv, ",{}", column_name(*tree))?;
    }
    csv.push('\n');

    for row in rows {
        write!(csv, "{}", row.n)?;
        for samples in &row.samples {
            let values: Vec<f64> = samples.iter().map(&metric).collect();
            write!(csv, ",{:.1}", workload::mean(&values))?;
        }
        csv.push('\n');
    }

    fs::write(path, csv).with_context(|| format!("writing {}", path.display()))
}

fn column_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Bst => "BST",
        Variant::Avl => "AVL",
        Variant::Splay => "Splay",
    }
}

fn trial_series(trees: &[Variant], row: &Row, metric: fn(&Sample) -> f64) -> Vec<Series> {
    trees
        .iter()
        .zip(&row.samples)
        .map(|(tree, samples)| Series {
            name: column_name(*tree).to_string(),
            values: samples.iter().map(metric).collect(),
        })
        .collect()
}

fn trend_series(trees: &[Variant], rows: &[Row], metric: fn(&Sample) -> f64) -> Vec<Series> {
    trees
        .iter()
        .enumerate()
        .map(|(i, tree)| Series {
            name: column_name(*tree).to_string(),
            values: rows
                .iter()
                .map(|row| {
                    let values: Vec<f64> = row.samples[i].iter().map(metric).collect();
                    workload::mean(&values)
                })
                .collect(),
        })
        .collect()
}
