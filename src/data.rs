//! Dataset loading and per-column min-max normalization.
//!
//! Rows are comma-separated numeric fields. A [`DatasetLayout`] says how many
//! leading columns (row ids) and trailing columns (class labels) to drop and
//! how many clusters the selection should target. Every remaining column is
//! rescaled to `[0, 1]` using its global minimum and maximum, which are kept
//! so that reports can show values in their original units.

use crate::kmeans::{ClusteringError, KMeans};
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Column bounds observed before normalization.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    /// Smallest raw value.
    pub min: f64,
    /// Largest raw value.
    pub max: f64,
}

impl ColumnRange {
    /// Maps a raw value into `[0, 1]`. Constant columns map to `0.0`.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (value - self.min) / span
        } else {
            0.0
        }
    }

    /// Maps a normalized value back to raw units.
    #[must_use]
    pub fn denormalize(&self, value: f64) -> f64 {
        value * (self.max - self.min) + self.min
    }

    fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// How a raw file maps onto features and a target cluster count.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    /// Target number of clusters.
    pub clusters: usize,
    /// Columns dropped from the start of every row.
    pub skip_leading: usize,
    /// Columns dropped from the end of every row.
    pub skip_trailing: usize,
    /// Display name; the file stem is used when absent.
    pub label: Option<String>,
}

impl DatasetLayout {
    /// A layout keeping every column.
    #[must_use]
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            skip_leading: 0,
            skip_trailing: 0,
            label: None,
        }
    }

    /// UCI Iris: four measurements and a class label, three classes.
    #[must_use]
    pub fn iris() -> Self {
        Self::new(3).skip_trailing(1).label("Iris")
    }

    /// UCI Glass: a row id, nine measurements and a class label, six classes.
    #[must_use]
    pub fn glass() -> Self {
        Self::new(6).skip_leading(1).skip_trailing(1).label("Glass")
    }

    /// UCI Spambase: 57 attributes and a spam flag, two classes.
    #[must_use]
    pub fn spambase() -> Self {
        Self::new(2).skip_trailing(1).label("Spam")
    }

    /// Picks a preset from a well-known file name.
    ///
    /// # Examples
    /// ```
    /// use silhouette_select::DatasetLayout;
    /// assert_eq!(DatasetLayout::infer("data/iris.data"), Some(DatasetLayout::iris()));
    /// assert_eq!(DatasetLayout::infer("other.csv"), None);
    /// ```
    pub fn infer(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().file_name()?.to_str()? {
            "iris.data" => Some(Self::iris()),
            "glass.data" => Some(Self::glass()),
            "spambase.data" => Some(Self::spambase()),
            _ => None,
        }
    }

    /// Sets the number of leading columns to drop.
    #[must_use]
    pub fn skip_leading(mut self, columns: usize) -> Self {
        self.skip_leading = columns;
        self
    }

    /// Sets the number of trailing columns to drop.
    #[must_use]
    pub fn skip_trailing(mut self, columns: usize) -> Self {
        self.skip_trailing = columns;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Errors raised while loading a dataset. All of them are fatal.
#[derive(Debug)]
pub enum DataError {
    /// The file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A field is not a finite number.
    Parse {
        /// One-based line number.
        line: usize,
        /// Zero-based column in the raw row.
        column: usize,
        /// Offending text.
        value: String,
    },
    /// A row is too short for the layout.
    TooFewColumns {
        /// One-based line number.
        line: usize,
        /// Fields present.
        found: usize,
        /// Fields the layout needs.
        required: usize,
    },
    /// A row has a different number of features than the first one.
    RaggedRow {
        /// One-based line number, or row position for in-memory rows.
        line: usize,
        /// Feature count of the first row.
        expected: usize,
        /// Feature count of this row.
        found: usize,
    },
    /// No instances were found.
    Empty,
    /// Rows carry no feature columns.
    NoFeatures,
    /// The cluster count cannot be satisfied.
    InvalidClusterCount {
        /// Requested number of clusters.
        clusters: usize,
        /// Number of instances available.
        instances: usize,
    },
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse {
                line,
                column,
                value,
            } => write!(f, "line {line}, column {column}: '{value}' is not a number"),
            Self::TooFewColumns {
                line,
                found,
                required,
            } => write!(
                f,
                "line {line} has {found} fields but the layout needs at least {required}"
            ),
            Self::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line} has {found} features but {expected} were expected"
            ),
            Self::Empty => f.write_str("dataset has no instances"),
            Self::NoFeatures => f.write_str("dataset has no feature columns"),
            Self::InvalidClusterCount {
                clusters,
                instances,
            } => write!(
                f,
                "cluster count must be within 1..={instances} (received {clusters})"
            ),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Normalized, immutable feature matrix with its target cluster count.
///
/// # Examples
/// ```
/// use silhouette_select::Dataset;
/// let data = Dataset::from_rows("toy", vec![vec![2.0, 10.0], vec![4.0, 30.0]], 2).unwrap();
/// assert_eq!(data.instances(), &[vec![0.0, 0.0], vec![1.0, 1.0]]);
/// assert_eq!(data.denormalize(1, 0.5), Some(20.0));
/// assert_eq!(data.denormalize(2, 0.5), None);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    instances: Vec<Vec<f64>>,
    clusters: usize,
    ranges: Vec<ColumnRange>,
}

impl Dataset {
    /// Reads and normalizes a comma-separated file.
    ///
    /// # Errors
    /// Returns [`DataError`] when the file cannot be read or its contents are
    /// malformed.
    pub fn load(path: impl AsRef<Path>, layout: &DatasetLayout) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = layout.label.clone().unwrap_or_else(|| {
            path.file_stem()
                .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
        });
        log::info!("loading {} as {name}", path.display());
        Self::parse(name, &text, layout)
    }

    /// Parses comma-separated text. Blank lines are skipped.
    ///
    /// # Errors
    /// Returns [`DataError`] on malformed rows or an impossible cluster count.
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        layout: &DatasetLayout,
    ) -> Result<Self, DataError> {
        let required = layout.skip_leading + layout.skip_trailing + 1;
        let mut rows = Vec::new();
        let mut width = None;
        for (offset, line) in text.lines().enumerate() {
            let number = offset + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < required {
                return Err(DataError::TooFewColumns {
                    line: number,
                    found: fields.len(),
                    required,
                });
            }
            let kept = layout.skip_leading..fields.len() - layout.skip_trailing;
            let row = fields[kept.clone()]
                .iter()
                .zip(kept)
                .map(|(field, column)| {
                    field
                        .parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .ok_or_else(|| DataError::Parse {
                            line: number,
                            column,
                            value: (*field).to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, DataError>>()?;
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(DataError::RaggedRow {
                    line: number,
                    expected,
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        Self::from_rows(name, rows, layout.clusters)
    }

    /// Normalizes in-memory rows.
    ///
    /// # Errors
    /// Returns [`DataError`] when there are no rows or features, rows differ
    /// in length, or `clusters` is not within `1..=rows`.
    pub fn from_rows(
        name: impl Into<String>,
        mut rows: Vec<Vec<f64>>,
        clusters: usize,
    ) -> Result<Self, DataError> {
        let name = name.into();
        let width = rows.first().ok_or(DataError::Empty)?.len();
        if width == 0 {
            return Err(DataError::NoFeatures);
        }
        if let Some((position, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(DataError::RaggedRow {
                line: position + 1,
                expected: width,
                found: row.len(),
            });
        }
        if clusters == 0 || clusters > rows.len() {
            return Err(DataError::InvalidClusterCount {
                clusters,
                instances: rows.len(),
            });
        }
        let ranges: Vec<ColumnRange> = (0..width)
            .map(|column| {
                rows.iter().fold(
                    ColumnRange {
                        min: f64::INFINITY,
                        max: f64::NEG_INFINITY,
                    },
                    |range, row| ColumnRange {
                        min: range.min.min(row[column]),
                        max: range.max.max(row[column]),
                    },
                )
            })
            .collect();
        for (column, range) in ranges.iter().enumerate() {
            if range.is_degenerate() {
                log::warn!("{name}: column {column} is constant ({}); normalized to 0", range.min);
            }
        }
        for row in &mut rows {
            for (value, range) in row.iter_mut().zip(&ranges) {
                *value = range.normalize(*value);
            }
        }
        log::info!(
            "{name}: {} instances, {width} features, {clusters} clusters",
            rows.len()
        );
        Ok(Self {
            name,
            instances: rows,
            clusters,
            ranges,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized rows.
    #[must_use]
    pub fn instances(&self) -> &[Vec<f64>] {
        &self.instances
    }

    /// Target cluster count.
    #[must_use]
    pub fn clusters(&self) -> usize {
        self.clusters
    }

    /// Number of feature columns.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.ranges.len()
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Always `false`; construction rejects empty datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bounds per column.
    #[must_use]
    pub fn ranges(&self) -> &[ColumnRange] {
        &self.ranges
    }

    /// Maps a normalized value of `column` back to raw units, or `None` when
    /// `column` is out of range.
    #[must_use]
    pub fn denormalize(&self, column: usize, value: f64) -> Option<f64> {
        self.ranges.get(column).map(|range| range.denormalize(value))
    }

    /// Instance `index` in raw units, or `None` when out of range.
    #[must_use]
    pub fn denormalized(&self, index: usize) -> Option<Vec<f64>> {
        self.instances.get(index).map(|row| {
            row.iter()
                .zip(&self.ranges)
                .map(|(&value, range)| range.denormalize(value))
                .collect()
        })
    }

    /// Clustering engine over this dataset's matrix and cluster count.
    ///
    /// # Errors
    /// Propagates [`ClusteringError`]; a constructed dataset always satisfies
    /// the engine's requirements.
    pub fn kmeans(&self) -> Result<KMeans<'_>, ClusteringError> {
        KMeans::new(&self.instances, self.clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLASS_SAMPLE: &str = "\
1,1.52101,13.64,4.49,1
2,1.51761,13.89,3.60,1

3,1.51618,13.53,3.55,2
";

    #[test]
    fn parse_drops_layout_columns_and_normalizes() {
        let layout = DatasetLayout::new(2).skip_leading(1).skip_trailing(1);
        let data = Dataset::parse("glass", GLASS_SAMPLE, &layout).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.num_features(), 3);
        assert_eq!(data.clusters(), 2);
        assert_eq!(data.instances()[0][0], 1.0);
        assert_eq!(data.instances()[2][0], 0.0);
        assert_eq!(data.ranges()[2], ColumnRange { min: 3.55, max: 4.49 });
        for row in data.instances() {
            assert!(row.iter().all(|value| (0.0..=1.0).contains(value)));
        }
    }

    #[test]
    fn denormalization_round_trips() {
        let rows = vec![
            vec![-3.5, 120.0, 0.001],
            vec![7.25, 80.0, 0.004],
            vec![0.0, 100.0, 0.002],
        ];
        let data = Dataset::from_rows("round-trip", rows.clone(), 2).unwrap();
        for (index, raw) in rows.iter().enumerate() {
            let restored = data.denormalized(index).unwrap();
            for (expected, found) in raw.iter().zip(&restored) {
                assert!((expected - found).abs() < 1e-9, "{expected} vs {found}");
            }
        }
        assert!(data.denormalized(3).is_none());
        assert_eq!(data.denormalize(1, 1.0), Some(120.0));
        assert_eq!(data.denormalize(3, 0.5), None);
    }

    #[test]
    fn constant_columns_normalize_to_zero() {
        let data = Dataset::from_rows("flat", vec![vec![5.0, 1.0], vec![5.0, 2.0]], 1).unwrap();
        assert_eq!(data.instances()[0][0], 0.0);
        assert_eq!(data.instances()[1][0], 0.0);
        assert_eq!(data.denormalized(1).unwrap(), vec![5.0, 2.0]);
    }

    #[test]
    fn parse_reports_bad_fields() {
        let layout = DatasetLayout::new(1).skip_trailing(1);
        let err = Dataset::parse("bad", "1.0,2.0,a\n1.0,x,b\n", &layout).unwrap_err();
        match err {
            DataError::Parse { line, column, value } => {
                assert_eq!((line, column, value.as_str()), (2, 1, "x"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn parse_rejects_short_and_ragged_rows() {
        let layout = DatasetLayout::new(1).skip_leading(1).skip_trailing(1);
        assert!(matches!(
            Dataset::parse("short", "1,2\n", &layout),
            Err(DataError::TooFewColumns { line: 1, found: 2, required: 3 })
        ));
        assert!(matches!(
            Dataset::parse("ragged", "1,2,3,4\n1,2,3\n", &layout),
            Err(DataError::RaggedRow { line: 2, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn rejects_impossible_cluster_counts() {
        assert!(matches!(
            Dataset::from_rows("tiny", vec![vec![1.0]], 2),
            Err(DataError::InvalidClusterCount { clusters: 2, instances: 1 })
        ));
        assert!(matches!(Dataset::from_rows("none", vec![], 1), Err(DataError::Empty)));
        assert!(matches!(
            Dataset::from_rows("hollow", vec![vec![]], 1),
            Err(DataError::NoFeatures)
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Dataset::load("does/not/exist.data", &DatasetLayout::new(2)).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.data"));
    }
}
