use casfig::config::{FigureConfig, PathsConfig};
use casfig::core::table::Table;
use casfig::error::FigureError;
use casfig::figures::fig5;

#[test]
fn missing_columns_are_listed_sorted() {
    let table = Table::from_reader(fig5::INPUT, "fpr,score\n0,1\n".as_bytes()).unwrap();
    let err = fig5::prepare(&table).unwrap_err();
    assert_eq!(
        err.to_string(),
        "results_roc.csv missing columns: [\"tpr_A\", \"tpr_B\"]"
    );
}

#[test]
fn missing_file_names_the_expected_path() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = FigureConfig {
        paths: PathsConfig {
            root: dir.path().to_path_buf(),
            ..PathsConfig::default()
        },
        ..FigureConfig::default()
    };
    let err = fig5::run(&cfg).unwrap_err();
    let err = err.downcast::<FigureError>().expect("typed error");
    match *err {
        FigureError::MissingInput { ref path } => {
            assert!(path.ends_with("data/results_roc.csv"));
        }
        ref other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().starts_with("Missing input CSV: "));
}
