use approx::assert_relative_eq;
use casfig::core::table::Table;
use casfig::error::FigureError;
use casfig::figures::fig6;

const SCALES: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

fn table_from(f: impl Fn(f64, f64) -> f64) -> Table {
    let mut csv = String::from("alpha,beta,CAS\n");
    for a in SCALES {
        for b in SCALES {
            csv.push_str(&format!("{a},{b},{}\n", f(a, b)));
        }
    }
    Table::from_reader(fig6::INPUT, csv.as_bytes()).expect("parse table")
}

#[test]
fn additive_surface_has_zero_residual() {
    let table = table_from(|a, b| 0.3 * a + 2.0 * b * b + 1.0);
    let data = fig6::prepare(&table).expect("prepare grid");
    assert_eq!(data.residual.n_rows(), SCALES.len());
    assert_eq!(data.residual.n_cols(), SCALES.len());
    for i in 0..SCALES.len() {
        for j in 0..SCALES.len() {
            assert_relative_eq!(data.residual.get(i, j), 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn product_surface_residual_is_mixed_difference() {
    let table = table_from(|a, b| a * b);
    let data = fig6::prepare(&table).expect("prepare grid");
    for (i, &a) in data.cas.rows.iter().enumerate() {
        for (j, &b) in data.cas.cols.iter().enumerate() {
            assert_relative_eq!(data.cas.get(i, j), a * b, epsilon = 1e-12);
            // a*b - a - b + 1 = (a - 1)(b - 1)
            assert_relative_eq!(data.residual.get(i, j), (a - 1.0) * (b - 1.0), epsilon = 1e-12);
        }
    }
}

#[test]
fn residual_vanishes_on_reference_lines() {
    let table = table_from(|a, b| (a * b).exp());
    let data = fig6::prepare(&table).expect("prepare grid");
    let base = SCALES.iter().position(|&s| s == 1.0).unwrap();
    for k in 0..SCALES.len() {
        assert_relative_eq!(data.residual.get(base, k), 0.0, epsilon = 1e-9);
        assert_relative_eq!(data.residual.get(k, base), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn sparse_grid_reports_missing_point() {
    let csv = "alpha,beta,CAS\n1,1,0.1\n1,2,0.2\n2,1,0.3\n";
    let table = Table::from_reader(fig6::INPUT, csv.as_bytes()).unwrap();
    let err = fig6::prepare(&table).unwrap_err();
    match err {
        FigureError::MissingGridPoint { alpha, beta, .. } => {
            assert_eq!(alpha, 2.0);
            assert_eq!(beta, 2.0);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
