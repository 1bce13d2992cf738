use silhouette_select::{
    Comparison, DataError, Dataset, DatasetLayout, SelectionReport, Selector, Settings,
};
use std::fs;
use std::path::PathBuf;

const IRIS_SAMPLE: &str = "\
5.1,3.5,1.4,0.2,Iris-setosa
4.9,3.0,1.4,0.2,Iris-setosa
4.7,3.2,1.3,0.2,Iris-setosa
5.0,3.6,1.4,0.2,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.4,3.2,4.5,1.5,Iris-versicolor
6.9,3.1,4.9,1.5,Iris-versicolor
5.5,2.3,4.0,1.3,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica
5.8,2.7,5.1,1.9,Iris-virginica
7.1,3.0,5.9,2.1,Iris-virginica
6.3,2.9,5.6,1.8,Iris-virginica

";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "silhouette-select-{name}-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn iris_file_runs_end_to_end() {
    let dir = scratch("pipeline");
    let path = dir.join("iris.data");
    fs::write(&path, IRIS_SAMPLE).unwrap();

    let layout = DatasetLayout::infer(&path).unwrap();
    let data = Dataset::load(&path, &layout).unwrap();
    assert_eq!(data.name(), "Iris");
    assert_eq!(data.len(), 12);
    assert_eq!(data.num_features(), 4);
    assert_eq!(data.clusters(), 3);
    let first = data.denormalized(0).unwrap();
    for (expected, found) in [5.1, 3.5, 1.4, 0.2].iter().zip(&first) {
        assert!((expected - found).abs() < 1e-9);
    }

    let mut settings = Settings::default();
    settings.population_size = 8;
    settings.generations = 2;
    settings.seed = Some(4);
    let selector = Selector::new(settings);
    let sfs = SelectionReport::from_sfs(&data, &selector.select_sfs(&data).unwrap());
    let gas = SelectionReport::from_gas(&data, &selector.select_gas(&data).unwrap());

    let sfs_path = sfs.write_to(&dir).unwrap();
    let gas_path = gas.write_to(&dir).unwrap();
    assert!(sfs_path.ends_with("Iris-SFS-output.txt"));
    assert!(gas_path.ends_with("Iris-GAS-output.txt"));
    let written = fs::read_to_string(&sfs_path).unwrap();
    assert!(written.starts_with("Final feature set: [ "));
    assert!(written.contains("Best clusters:\n\tCluster 1\n"));

    let mut comparison = Comparison::new();
    comparison.push(sfs);
    comparison.push(gas);
    let compare_path = comparison.write_to(&dir).unwrap();
    let summary = fs::read_to_string(compare_path).unwrap();
    assert!(summary.contains("Iris\n-----------\nStepwise Forward Selection:\n"));
    assert!(summary.contains("Genetic Algorithm Selection:\n"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn malformed_file_fails_with_its_location() {
    let dir = scratch("malformed");
    let path = dir.join("measurements.csv");
    fs::write(&path, "1.0,2.0,a\n1.5,abc,b\n").unwrap();
    let layout = DatasetLayout::new(2).skip_trailing(1);
    let err = Dataset::load(&path, &layout).unwrap_err();
    match err {
        DataError::Parse {
            line,
            column,
            value,
        } => assert_eq!((line, column, value.as_str()), (2, 1, "abc")),
        other => panic!("unexpected error {other}"),
    }
    fs::remove_dir_all(&dir).unwrap();
}
