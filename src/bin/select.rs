//! select: run stepwise forward and genetic algorithm selection over datasets.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use silhouette_select::{Comparison, Dataset, DatasetLayout, SelectionReport, Selector, Settings};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "select")]
#[command(about = "Unsupervised feature selection scored by the silhouette coefficient")]
#[command(version)]
struct Cli {
    /// Comma-separated data files; iris.data, glass.data and spambase.data
    /// are recognized by name
    #[arg(required = true)]
    datasets: Vec<PathBuf>,

    /// Target number of clusters (required for unrecognized files)
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Columns to drop from the start of every row
    #[arg(long)]
    skip_leading: Option<usize>,

    /// Columns to drop from the end of every row
    #[arg(long)]
    skip_trailing: Option<usize>,

    /// Individuals per generation of the genetic search
    #[arg(short, long)]
    population: Option<usize>,

    /// Generations of the genetic search
    #[arg(short, long)]
    generations: Option<usize>,

    /// Per-gene flip probability
    #[arg(long)]
    mutation: Option<f64>,

    /// Cap on K-Means rounds per fit
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Search strategy to run
    #[arg(short, long, value_enum, default_value_t = MethodArg::Both)]
    method: MethodArg,

    /// Directory receiving per-run reports and the comparison
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Sfs,
    Gas,
    Both,
}

impl MethodArg {
    fn sfs(self) -> bool {
        matches!(self, Self::Sfs | Self::Both)
    }

    fn gas(self) -> bool {
        matches!(self, Self::Gas | Self::Both)
    }
}

impl Cli {
    fn layout(&self, path: &Path) -> Result<DatasetLayout> {
        let layout = match (self.clusters, DatasetLayout::infer(path)) {
            (Some(clusters), Some(preset)) => DatasetLayout { clusters, ..preset },
            (Some(clusters), None) => DatasetLayout::new(clusters),
            (None, Some(preset)) => preset,
            (None, None) => bail!(
                "cannot infer a layout for {}; pass --clusters",
                path.display()
            ),
        };
        let skip_leading = self.skip_leading.unwrap_or(layout.skip_leading);
        let skip_trailing = self.skip_trailing.unwrap_or(layout.skip_trailing);
        Ok(layout.skip_leading(skip_leading).skip_trailing(skip_trailing))
    }

    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(population) = self.population {
            settings.population_size = population;
        }
        if let Some(generations) = self.generations {
            settings.generations = generations;
        }
        if let Some(mutation) = self.mutation {
            settings.mutation_probability = mutation;
        }
        settings.max_iterations = self.max_iterations;
        settings.seed = self.seed;
        settings
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let selector = Selector::new(cli.settings());
    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let mut comparison = Comparison::new();
    for path in &cli.datasets {
        let layout = cli.layout(path)?;
        let data = Dataset::load(path, &layout)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        let mut reports = Vec::new();
        if cli.method.sfs() {
            let report = selector
                .select_sfs(&data)
                .with_context(|| format!("selecting features of {}", data.name()))?;
            reports.push(SelectionReport::from_sfs(&data, &report));
        }
        if cli.method.gas() {
            let report = selector
                .select_gas(&data)
                .with_context(|| format!("selecting features of {}", data.name()))?;
            reports.push(SelectionReport::from_gas(&data, &report));
        }
        for report in reports {
            println!("{} {}", data.name(), report.method().title());
            println!("{report}");
            if let Some(dir) = &cli.output_dir {
                report
                    .write_to(dir)
                    .with_context(|| format!("writing {}", report.file_name()))?;
            }
            comparison.push(report);
        }
    }

    print!("{comparison}");
    if let Some(dir) = &cli.output_dir {
        comparison
            .write_to(dir)
            .context("writing comparison report")?;
    }
    Ok(())
}
