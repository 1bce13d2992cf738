//! Plain-text reports of selection runs.
//!
//! A [`SelectionReport`] captures one run in original units: scores are
//! rounded to five places and cluster members are denormalized and rounded
//! to one place. A [`Comparison`] lines up the runs of several datasets.

use crate::core::FeatureSubset;
use crate::data::Dataset;
use crate::gas::GasReport;
use crate::kmeans::Clustering;
use crate::sfs::SfsReport;
use std::fmt::{self, Display, Formatter};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const SCORE_PLACES: i32 = 5;
const VALUE_PLACES: i32 = 1;
const COMPARISON_FILE: &str = "Compare-all-results.txt";

/// Search strategy that produced a report.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Stepwise forward selection.
    Sfs,
    /// Genetic algorithm selection.
    Gas,
}

impl Method {
    /// Full name used as a section heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Sfs => "Stepwise Forward Selection",
            Self::Gas => "Genetic Algorithm Selection",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sfs => "SFS",
            Self::Gas => "GAS",
        })
    }
}

/// One run rendered in the dataset's original units.
///
/// # Examples
/// ```
/// use silhouette_select::report::{Method, SelectionReport};
/// use silhouette_select::{Dataset, FeatureSubset};
///
/// let data = Dataset::from_rows("Toy", vec![vec![2.0], vec![4.0]], 1).unwrap();
/// let subset = FeatureSubset::full(1);
/// let report = SelectionReport::new(Method::Sfs, &data, &subset, 0.123456, None);
/// assert_eq!(report.score(), 0.12346);
/// assert_eq!(report.file_name(), "Toy-SFS-output.txt");
/// assert!(report.to_string().starts_with("Final feature set: [ 0 ]\n"));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionReport {
    method: Method,
    dataset: String,
    features: Vec<usize>,
    score: f64,
    clusters: Vec<Vec<Vec<f64>>>,
}

impl SelectionReport {
    /// Builds a report from a selection and the clustering behind its score.
    #[must_use]
    pub fn new(
        method: Method,
        data: &Dataset,
        selected: &FeatureSubset,
        score: f64,
        clustering: Option<&Clustering>,
    ) -> Self {
        let clusters: Vec<Vec<Vec<f64>>> = clustering
            .map(|clustering| {
                clustering
                    .clusters()
                    .iter()
                    .map(|members| {
                        members
                            .iter()
                            .filter_map(|&index| data.denormalized(index))
                            .map(|row| {
                                row.into_iter()
                                    .map(|value| round_to(value, VALUE_PLACES))
                                    .collect::<Vec<f64>>()
                            })
                            .collect()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            dataset: data.name().to_owned(),
            features: selected.indices().collect(),
            score: round_to(score, SCORE_PLACES),
            clusters,
        }
    }

    /// Report for a stepwise forward selection run.
    #[must_use]
    pub fn from_sfs(data: &Dataset, report: &SfsReport) -> Self {
        Self::new(
            Method::Sfs,
            data,
            &report.selected,
            report.score,
            report.clustering.as_ref(),
        )
    }

    /// Report for a genetic algorithm run.
    #[must_use]
    pub fn from_gas(data: &Dataset, report: &GasReport) -> Self {
        Self::new(
            Method::Gas,
            data,
            &report.selected,
            report.score,
            report.clustering.as_ref(),
        )
    }

    /// Strategy that produced the run.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Dataset name.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Selected columns, ascending.
    #[must_use]
    pub fn features(&self) -> &[usize] {
        &self.features
    }

    /// Rounded score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Denormalized, rounded member rows per cluster.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<Vec<f64>>] {
        &self.clusters
    }

    /// File the report is appended to by [`Self::write_to`].
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}-output.txt", self.dataset, self.method)
    }

    /// Appends the report to [`Self::file_name`] inside `dir`.
    ///
    /// # Errors
    /// Propagates I/O failures opening or writing the file.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        append(&path, self)?;
        log::info!("wrote {} report to {}", self.method, path.display());
        Ok(path)
    }
}

impl Display for SelectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final feature set: {}", Bracketed(self.features.as_slice()))?;
        writeln!(f, "Best performance: {:.5}", self.score)?;
        writeln!(f, "-------------------------")?;
        writeln!(f, "Best clusters:")?;
        for (number, members) in self.clusters.iter().enumerate() {
            writeln!(f, "\tCluster {}", number + 1)?;
            for row in members {
                writeln!(f, "\t\t{}", Bracketed(row.as_slice()))?;
            }
        }
        Ok(())
    }
}

/// Side-by-side summary of the runs over several datasets.
///
/// Reports are grouped by dataset in the order the datasets first appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    reports: Vec<SelectionReport>,
}

impl Comparison {
    /// Creates an empty comparison.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a run.
    pub fn push(&mut self, report: SelectionReport) {
        self.reports.push(report);
    }

    /// Runs added so far.
    #[must_use]
    pub fn reports(&self) -> &[SelectionReport] {
        &self.reports
    }

    /// Appends the comparison to `Compare-all-results.txt` inside `dir`.
    ///
    /// # Errors
    /// Propagates I/O failures opening or writing the file.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(COMPARISON_FILE);
        append(&path, self)?;
        log::info!("wrote comparison to {}", path.display());
        Ok(path)
    }

    fn datasets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for report in &self.reports {
            if !names.contains(&report.dataset()) {
                names.push(report.dataset());
            }
        }
        names
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Perform Stepwise Forward Selection and Genetic Algorithm Selection on {} datasets. \
             Performance is measured by calculating the Silhouette Coefficient after K-Means clustering.",
            self.datasets().len()
        )?;
        writeln!(f)?;
        for name in self.datasets() {
            writeln!(f, "{name}")?;
            writeln!(f, "-----------")?;
            for report in self.reports.iter().filter(|report| report.dataset() == name) {
                writeln!(f, "{}:", report.method().title())?;
                writeln!(f, "Selected features: {}", Bracketed(report.features()))?;
                writeln!(f, "Performance: {:.5}", report.score())?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// `[ a b c ]` rendering shared by feature lists and member rows.
struct Bracketed<'a, T>(&'a [T]);

impl<T: Display> Display for Bracketed<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for value in self.0 {
            write!(f, "{value:.1} ")?;
        }
        f.write_str("]")
    }
}

fn append(path: &Path, content: &impl Display) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    write!(writer, "{content}")?;
    writer.flush()
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}
